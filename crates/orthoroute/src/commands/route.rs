use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

use orthoroute::router::serialize::path_to_string;
use orthoroute::{Point, Routed, Strategy};

use crate::cli::OutputFormat;
use crate::config::Config;

#[derive(Serialize)]
struct RouteEntry<'a> {
    from: String,
    to: String,
    strategy: Strategy,
    path: &'a [Point],
}

/// Run the route command.
pub fn run(scene_path: &Path, format: Option<OutputFormat>, margin: Option<&str>) -> Result<()> {
    let config = Config::load_or_default();
    let scene = super::load_scene(scene_path, margin, &config)?;
    let format = format.unwrap_or_else(|| config.format());

    let routed = scene.route_all(&config.route_options())?;

    for (connector, r) in scene.connectors.iter().zip(&routed) {
        if r.strategy == Strategy::Direct {
            warn!(
                from = %connector.from,
                to = %connector.to,
                "no obstacle-free route, drawing a direct connection"
            );
        }
    }

    match format {
        OutputFormat::Json => {
            let entries: Vec<RouteEntry> = scene
                .connectors
                .iter()
                .zip(&routed)
                .map(|(c, r)| RouteEntry {
                    from: c.from.to_string(),
                    to: c.to.to_string(),
                    strategy: r.strategy,
                    path: &r.path,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            if routed.is_empty() {
                println!("{}", "No connectors in the scene.".yellow());
            }
            for (c, r) in scene.connectors.iter().zip(&routed) {
                println!(
                    "{} -> {}: {} {}",
                    c.from.to_string().bold(),
                    c.to.to_string().bold(),
                    path_to_string(&r.path),
                    strategy_label(r)
                );
            }
        }
    }

    Ok(())
}

fn strategy_label(routed: &Routed) -> colored::ColoredString {
    match routed.strategy {
        Strategy::General => "[general]".green(),
        Strategy::Relaxed => "[relaxed]".yellow(),
        Strategy::Direct => "[direct]".red(),
    }
}
