//! portscout - loopback port CLI
//!
//! Exit status is 0 when a usable port was found, 1 otherwise.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use portscout::{
    PortscoutError, Resolution, ResolveConfig, CONFIG_FILE_NAME, DEFAULT_SCAN_ATTEMPTS,
};

#[derive(Parser)]
#[command(name = "portscout")]
#[command(version)]
#[command(about = "Probe loopback ports and pick a free one", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a single port is free
    Probe {
        /// Port to probe
        port: u16,
    },
    /// Find the first free port at or after START
    Scan {
        /// First port to probe
        start: u16,
        /// Number of consecutive ports to try
        #[arg(long, default_value_t = DEFAULT_SCAN_ATTEMPTS)]
        max_attempts: u16,
    },
    /// Resolve a preferred port, switching to a nearby one if it is taken
    Resolve {
        /// Preferred port (overrides the config file)
        port: Option<u16>,
        /// Fail instead of switching when the preferred port is taken
        #[arg(long)]
        no_auto_switch: bool,
        /// Ports scanned after the preferred one (overrides the config file)
        #[arg(long)]
        window: Option<u16>,
        /// Config file (defaults to ./.portscout.yaml when present)
        #[arg(long, short)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Give up after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("portscout={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the effective config from the optional file and CLI overrides
fn load_config(
    port: Option<u16>,
    no_auto_switch: bool,
    window: Option<u16>,
    config: Option<PathBuf>,
) -> Result<ResolveConfig, PortscoutError> {
    let from_file = match config {
        Some(path) => Some(ResolveConfig::load(path)?),
        None => {
            let cwd = std::env::current_dir()?;
            if cwd.join(CONFIG_FILE_NAME).exists() {
                Some(ResolveConfig::load_from_dir(cwd)?)
            } else {
                None
            }
        }
    };

    let mut config = match (from_file, port) {
        (Some(mut config), Some(port)) => {
            config.preferred_port = port;
            config
        }
        (Some(config), None) => config,
        (None, Some(port)) => ResolveConfig::new(port),
        (None, None) => {
            return Err(PortscoutError::Config(format!(
                "no port given and no {} found",
                CONFIG_FILE_NAME
            )))
        }
    };

    if no_auto_switch {
        config.auto_switch = false;
    }
    if let Some(window) = window {
        config.switch_window = window;
    }
    config.validate()?;

    Ok(config)
}

async fn handle_resolve(
    config: &ResolveConfig,
    timeout_ms: Option<u64>,
) -> Result<Resolution, PortscoutError> {
    let resolver = config.resolver();
    let resolution = resolver.resolve(config.preferred_port, config.auto_switch);

    match timeout_ms {
        // A zero budget expires before the first bind
        Some(0) => Err(PortscoutError::Timeout(0)),
        Some(ms) => tokio::time::timeout(Duration::from_millis(ms), resolution)
            .await
            .map_err(|_| PortscoutError::Timeout(ms)),
        None => Ok(resolution.await),
    }
}

fn print_resolution(resolution: &Resolution, format: OutputFormat) -> Result<(), PortscoutError> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&resolution.report())?);
        }
        OutputFormat::Text => match resolution.port() {
            Some(port) => {
                if resolution.switched() {
                    eprintln!("{} {}", "!".yellow(), resolution);
                }
                println!("{}", port);
            }
            None => eprintln!("{} {}", "✗".red(), resolution),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Probe { port } => {
            if portscout::probe(port).await {
                println!("{} Port {} is available", "✓".green(), port);
            } else {
                println!("{} Port {} is in use", "✗".red(), port);
                std::process::exit(1);
            }
        }

        Commands::Scan { start, max_attempts } => {
            match portscout::scan(start, max_attempts).await {
                Some(port) => println!("{}", port),
                None => {
                    match portscout::PortRange::from_start(start, max_attempts) {
                        Some(range) => eprintln!(
                            "{} No available ports found in range {}",
                            "✗".red(),
                            range
                        ),
                        None => eprintln!("{} No ports to scan", "✗".red()),
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Resolve {
            port,
            no_auto_switch,
            window,
            config,
            format,
            timeout_ms,
        } => {
            let config = match load_config(port, no_auto_switch, window, config) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("{} {}", "✗".red(), e);
                    std::process::exit(1);
                }
            };

            let resolution = match handle_resolve(&config, timeout_ms).await {
                Ok(resolution) => resolution,
                Err(e) => {
                    eprintln!("{} {}", "✗".red(), e);
                    std::process::exit(1);
                }
            };

            print_resolution(&resolution, format)?;
            if !resolution.is_resolved() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
