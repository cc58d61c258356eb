use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod presenter;

use commands::{
    open_companion, ConfigCommand, LogoutCommand, QueueCommand, RecordCommand, SettingsCommand,
    VehiclesCommand,
};
use config::Config;
use lubelog_core::LocalStore;

#[derive(Parser)]
#[command(name = "lubelog")]
#[command(version)]
#[command(about = "Log fuel-ups and odometer readings to a LubeLogger server, offline or not", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List vehicles
    Vehicles(VehiclesCommand),

    /// Add a fuel or odometer record
    Record(RecordCommand),

    /// Manage entries saved while offline
    Queue(QueueCommand),

    /// Manage local settings
    Settings(SettingsCommand),

    /// Forget cached vehicle data
    Logout,

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("lubelog=debug,lubelog_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Vehicles(cmd)) => {
            let mut companion = open_companion(&config, false)?;
            cmd.run(&mut companion).await?;
        }
        Some(Commands::Record(cmd)) => {
            let mut companion = open_companion(&config, false)?;
            cmd.run(&mut companion).await?;
        }
        Some(Commands::Queue(cmd)) => {
            let mut companion = open_companion(&config, cmd.assume_yes())?;
            cmd.run(&mut companion).await?;
        }
        Some(Commands::Settings(cmd)) => {
            let store = LocalStore::new(config.data_dir.value.clone());
            cmd.run(&store)?;
        }
        Some(Commands::Logout) => {
            let mut companion = open_companion(&config, false)?;
            LogoutCommand.run(&mut companion)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
