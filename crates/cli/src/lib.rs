pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use barkeep_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "barkeep",
    about = "Barkeep drink recommendation CLI",
    long_about = "Run the drink recommendation engine and its fallback scorer against JSON request files.",
    after_help = "Examples:\n  barkeep recommend --request request.json\n  barkeep similar --menu menu.json --item-id 3\n  barkeep config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file to load instead of barkeep.toml")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Override the log level (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Override the log format (compact|pretty|json)")]
    log_format: Option<LogFormat>,
    #[arg(long, global = true, help = "Override engine.min_stock")]
    min_stock: Option<u32>,
    #[arg(long, global = true, help = "Override engine.min_rating")]
    min_rating: Option<f64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run the full recommendation pipeline on a request file")]
    Recommend {
        #[arg(long, help = "JSON recommendation request")]
        request: PathBuf,
        #[arg(long, help = "Use today's season when the request names none")]
        current_season: bool,
    },
    #[command(about = "Recommend menu items for a preference profile, with fallback")]
    Personalize {
        #[arg(long, help = "JSON body with user_id, profile, items, constraints and limit")]
        request: PathBuf,
        #[arg(long, help = "Override fallback.recommendation_limit; a limit in the body wins")]
        limit: Option<usize>,
    },
    #[command(about = "Find menu items similar to one item, with fallback")]
    Similar {
        #[arg(long, help = "JSON array of menu items")]
        menu: PathBuf,
        #[arg(long, help = "Id of the reference item")]
        item_id: u64,
        #[arg(long, help = "Override fallback.similar_limit")]
        limit: Option<usize>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        let (recommendation_limit, similar_limit) = match self.command {
            Command::Personalize { limit, .. } => (limit, None),
            Command::Similar { limit, .. } => (None, limit),
            Command::Recommend { .. } | Command::Config => (None, None),
        };

        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                log_level: self.log_level.clone(),
                log_format: self.log_format,
                min_stock: self.min_stock,
                min_rating: self.min_rating,
                recommendation_limit,
                similar_limit,
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    if let Ok(config) = AppConfig::load(options.clone()) {
        if let Err(error) = init_logging(&config) {
            eprintln!("{error:#}");
        }
    }

    let result = match cli.command {
        Command::Recommend { request, current_season } => {
            commands::recommend::run(options, &request, current_season)
        }
        Command::Personalize { request, .. } => commands::personalize::run(options, &request),
        Command::Similar { menu, item_id, .. } => commands::similar::run(options, &menu, item_id),
        Command::Config => commands::config::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the JSON payload.
fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    use barkeep_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match config.logging.format {
        Compact => builder.compact().try_init(),
        Pretty => builder.pretty().try_init(),
        Json => builder.json().try_init(),
    };
    installed.map_err(|error| anyhow!("could not install log subscriber: {error}"))
}
