//! Offline queue commands.

use clap::{Args, Subcommand};

use lubelog_core::{DeleteOutcome, QueuedEntry, Record, RetryOutcome, VehicleCache};

use super::{CliCompanion, OutputFormat};

/// Manage records saved while the server was unreachable
#[derive(Args)]
pub struct QueueCommand {
    #[command(subcommand)]
    pub command: QueueSubcommand,
}

#[derive(Subcommand)]
pub enum QueueSubcommand {
    /// List saved entries
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Submit one saved entry
    Retry {
        /// Position in `lubelog queue list` (starting at 1)
        position: usize,
    },
    /// Submit every saved entry in order
    RetryAll,
    /// Delete a saved entry without submitting it
    Delete {
        /// Position in `lubelog queue list` (starting at 1)
        position: usize,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

impl QueueCommand {
    /// Whether confirmations should be answered automatically.
    pub fn assume_yes(&self) -> bool {
        matches!(self.command, QueueSubcommand::Delete { yes: true, .. })
    }

    pub async fn run(&self, companion: &mut CliCompanion) -> Result<(), Box<dyn std::error::Error>> {
        if let Err(e) = companion.load_cached_vehicles() {
            tracing::warn!("Failed to read cached vehicles: {}", e);
        }

        match &self.command {
            QueueSubcommand::List { format } => {
                let entries = companion.store().load_entries()?;
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&entries)?);
                    }
                    OutputFormat::Text => print_entries(&entries, companion.vehicles()),
                }
                Ok(())
            }

            QueueSubcommand::Retry { position } => {
                let index = to_index(*position)?;
                match companion.retry_entry(index).await? {
                    RetryOutcome::Submitted(_) => Ok(()),
                    RetryOutcome::StillQueued { .. } => {
                        Err(format!("Entry {} is still saved", position).into())
                    }
                }
            }

            QueueSubcommand::RetryAll => {
                let report = companion.retry_all().await?;
                if report.attempted == 0 && report.remaining.is_empty() {
                    println!("No saved entries.");
                    return Ok(());
                }
                if !report.remaining.is_empty() {
                    println!();
                    println!("Still saved:");
                    print_entries(&report.remaining, companion.vehicles());
                }
                Ok(())
            }

            QueueSubcommand::Delete { position, .. } => {
                let index = to_index(*position)?;
                if let DeleteOutcome::Cancelled = companion.delete_entry(index)? {
                    println!("Deletion cancelled.");
                }
                Ok(())
            }
        }
    }
}

fn to_index(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| "Positions start at 1".to_string())
}

fn print_entries(entries: &[QueuedEntry], vehicles: &VehicleCache) {
    if entries.is_empty() {
        println!("No saved entries.");
        return;
    }

    for (i, entry) in entries.iter().enumerate() {
        println!("{}. {}", i + 1, describe(entry, vehicles));
    }
}

/// "Gas for 2015 Mazda 3 on 2025-02-10: 50000, 10 fuel, $45.50"
fn describe(entry: &QueuedEntry, vehicles: &VehicleCache) -> String {
    let name = vehicles.name_of(entry.vehicle_id);
    let saved = entry.timestamp.format("%Y-%m-%d %H:%M");
    match &entry.record {
        Record::Gas(gas) => {
            let mut details = Vec::new();
            if let Some(odometer) = gas.odometer {
                details.push(odometer.to_string());
            }
            if let Some(fuel) = gas.fuel_consumed {
                details.push(format!("{} fuel", fuel));
            }
            if let Some(cost) = gas.cost {
                details.push(format!("${:.2}", cost));
            }
            format!(
                "Gas for {} on {}: {} (saved {})",
                name,
                gas.date,
                details.join(", "),
                saved
            )
        }
        Record::Odometer(odometer) => format!(
            "Odometer for {} on {}: {} (saved {})",
            name, odometer.date, odometer.odometer, saved
        ),
    }
}
