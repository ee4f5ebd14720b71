use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    let defaults = config.defaults.clone().unwrap_or_default();
    let options = config.route_options();

    println!("{} {}", "Config file:".bold(), path.display());
    println!();
    println!(
        "  defaults.margin:         {}",
        defaults.margin.map(|m| m.to_string()).unwrap_or_else(|| format!(
            "{} (scene default)",
            orthoroute::scene::DEFAULT_MARGIN
        ))
    );
    println!(
        "  defaults.format:         {}",
        defaults.format.as_deref().unwrap_or("text")
    );
    println!("  defaults.max_iterations: {}", options.max_iterations);

    if !path.exists() {
        println!();
        println!(
            "{}",
            "No config file yet. Use `orthoroute config set <key> <value>` to create one.".dimmed()
        );
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Set".green().bold(),
        path.display()
    );
    Ok(())
}
