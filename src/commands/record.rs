//! Record entry commands.

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

use lubelog_core::{GasRecord, OdometerRecord, Record, SubmitOutcome, VehicleCache};

use super::{follow, CliCompanion};

/// Add a fuel or odometer record
#[derive(Args)]
pub struct RecordCommand {
    #[command(subcommand)]
    pub command: RecordSubcommand,
}

#[derive(Subcommand)]
pub enum RecordSubcommand {
    /// Add a fuel-up
    Gas {
        /// Vehicle ID (see `lubelog vehicles`)
        vehicle_id: i64,
        /// Date of the fuel-up (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Odometer (or engine hours) reading
        #[arg(long)]
        odometer: Option<u64>,
        /// Fuel consumed
        #[arg(long)]
        fuel: Option<f64>,
        /// Total cost
        #[arg(long)]
        cost: Option<f64>,
        /// The tank was not filled to full
        #[arg(long)]
        partial: bool,
        /// A previous fuel-up was not recorded
        #[arg(long)]
        missed: bool,
        #[arg(long)]
        notes: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Add an odometer reading
    Odometer {
        /// Vehicle ID (see `lubelog vehicles`)
        vehicle_id: i64,
        /// Date of the reading (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Odometer (or engine hours) reading
        #[arg(long)]
        reading: u64,
        #[arg(long)]
        notes: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

impl RecordCommand {
    pub async fn run(&self, companion: &mut CliCompanion) -> Result<(), Box<dyn std::error::Error>> {
        companion.start().await;

        let (vehicle_id, record) = self.build()?;
        validate(companion.vehicles(), vehicle_id, &record)?;

        let outcome = companion.submit(vehicle_id, record).await;
        follow(outcome.navigation(), companion.vehicles());

        match outcome {
            SubmitOutcome::Submitted { .. } | SubmitOutcome::Queued { .. } => Ok(()),
            SubmitOutcome::Failed { .. } => Err("Record was not submitted".into()),
        }
    }

    fn build(&self) -> Result<(i64, Record), String> {
        match &self.command {
            RecordSubcommand::Gas {
                vehicle_id,
                date,
                odometer,
                fuel,
                cost,
                partial,
                missed,
                notes,
                tags,
            } => {
                let mut record = GasRecord::new(date.unwrap_or_else(today))
                    .with_fill_to_full(!partial)
                    .with_missed_fuel_up(*missed)
                    .with_tags(tags.clone());
                if let Some(odometer) = odometer {
                    record = record.with_odometer(*odometer);
                }
                if let Some(fuel) = fuel {
                    if !fuel.is_finite() || *fuel < 0.0 {
                        return Err("Fuel consumed must be a non-negative number".to_string());
                    }
                    record = record.with_fuel_consumed(*fuel);
                }
                if let Some(cost) = cost {
                    if !cost.is_finite() || *cost < 0.0 {
                        return Err("Cost must be a non-negative number".to_string());
                    }
                    record = record.with_cost(*cost);
                }
                if let Some(notes) = notes {
                    record = record.with_notes(notes.clone());
                }
                Ok((*vehicle_id, Record::Gas(record)))
            }
            RecordSubcommand::Odometer {
                vehicle_id,
                date,
                reading,
                notes,
                tags,
            } => {
                let mut record =
                    OdometerRecord::new(date.unwrap_or_else(today), *reading).with_tags(tags.clone());
                if let Some(notes) = notes {
                    record = record.with_notes(notes.clone());
                }
                Ok((*vehicle_id, Record::Odometer(record)))
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Checks the record against the cached vehicle, if there is a cache.
fn validate(vehicles: &VehicleCache, vehicle_id: i64, record: &Record) -> Result<(), String> {
    if vehicles.is_empty() {
        return Ok(());
    }
    let Some(vehicle) = vehicles.find(vehicle_id) else {
        return Err(format!(
            "Unknown vehicle ID {}. Run 'lubelog vehicles' to list them.",
            vehicle_id
        ));
    };
    if let Record::Gas(gas) = record {
        if gas.odometer.is_none() && vehicle.requires_odometer() {
            return Err(format!(
                "{} requires a reading ({}). Pass --odometer.",
                vehicle.display_name(),
                vehicle.odometer_label()
            ));
        }
    }
    Ok(())
}
