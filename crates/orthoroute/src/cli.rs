use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orthoroute")]
#[command(author, version, about)]
#[command(long_about = "Obstacle-avoiding orthogonal connector routing.\n\n\
    Describe shapes, obstacles and connectors in a YAML or JSON scene and get\n\
    rectilinear paths that leave each shape through its connection point.\n\n\
    Examples:\n  \
    orthoroute route diagram.yaml                Print one path per connector\n  \
    orthoroute route diagram.yaml --format json  Print paths as JSON\n  \
    orthoroute render diagram.yaml -o out.png    Draw the scene and its routes")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Route every connector of a scene and print the paths
    Route {
        /// Scene file (.yaml, .yml or .json)
        scene: PathBuf,

        /// Output format (defaults to the configured format, then text)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Shape clearance, e.g. 10 or 12x8 (overrides the scene and the config)
        #[arg(long)]
        margin: Option<String>,
    },

    /// Draw a scene and its routed connectors into a PNG image
    Render {
        /// Scene file (.yaml, .yml or .json)
        scene: PathBuf,

        /// Output image
        #[arg(short, long, default_value = "routes.png")]
        output: PathBuf,

        /// Pixels per diagram unit
        #[arg(long, default_value = "2")]
        scale: u32,

        /// Shape clearance, e.g. 10 or 12x8 (overrides the scene and the config)
        #[arg(long)]
        margin: Option<String>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (defaults.margin, defaults.format, defaults.max_iterations)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Route {
                scene,
                format,
                margin,
            }) => crate::commands::route::run(&scene, format, margin.as_deref()),
            Some(Commands::Render {
                scene,
                output,
                scale,
                margin,
            }) => crate::commands::render::run(
                &scene,
                &output,
                scale,
                margin.as_deref(),
                self.quiet,
            ),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("orthoroute {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                use clap::CommandFactory;
                let mut cmd = Self::command();
                cmd.print_help()?;
                println!();
                Ok(())
            }
        }
    }
}
