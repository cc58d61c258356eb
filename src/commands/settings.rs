use clap::{Args, Subcommand};

use lubelog_core::{LocalStore, RefreshInterval};

/// Local settings kept in the data directory
#[derive(Args)]
pub struct SettingsCommand {
    #[command(subcommand)]
    pub command: SettingsSubcommand,
}

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show settings and sync state
    Show,
    /// Set how often the vehicle list is refreshed automatically
    RefreshInterval {
        /// Number of days, or "off" to disable
        interval: RefreshInterval,
    },
}

impl SettingsCommand {
    pub fn run(&self, store: &LocalStore) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            SettingsSubcommand::Show => {
                println!("Data directory: {}", store.data_dir().display());
                println!("Refresh interval: {}", store.refresh_interval()?);
                match store.last_fetch_time()? {
                    Some(at) => println!("Last vehicle fetch: {}", at.format("%Y-%m-%d %H:%M UTC")),
                    None => println!("Last vehicle fetch: never"),
                }
                println!("Saved entries: {}", store.entry_count()?);
                Ok(())
            }

            SettingsSubcommand::RefreshInterval { interval } => {
                store.set_refresh_interval(*interval)?;
                tracing::info!("Refresh interval set to {}", interval);
                match interval {
                    RefreshInterval::Disabled => println!("✓ Automatic refresh disabled"),
                    RefreshInterval::Days(_) => {
                        println!("✓ Vehicle list will refresh every {}", interval)
                    }
                }
                Ok(())
            }
        }
    }
}
