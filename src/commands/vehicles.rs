use clap::Args;

use lubelog_core::RefreshDecision;

use super::{print_vehicles, CliCompanion, OutputFormat};

/// List vehicles on the server
#[derive(Args)]
pub struct VehiclesCommand {
    /// Fetch from the server even if the cached list is fresh
    #[arg(long)]
    pub refresh: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl VehiclesCommand {
    pub async fn run(&self, companion: &mut CliCompanion) -> Result<(), Box<dyn std::error::Error>> {
        let decision = if self.refresh {
            companion.load_cached_vehicles()?;
            companion.refresh_now().await
        } else {
            companion.start().await
        };
        tracing::debug!("Vehicle refresh: {:?}", decision);

        if decision == RefreshDecision::NoCredentials && companion.vehicles().is_empty() {
            return Err("No server configured and no cached vehicles".into());
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(companion.vehicles().all())?);
            }
            OutputFormat::Text => print_vehicles(companion.vehicles()),
        }
        Ok(())
    }
}
