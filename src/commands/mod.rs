mod config_cmd;
mod logout;
mod queue;
mod record;
mod settings;
mod vehicles;

pub use config_cmd::ConfigCommand;
pub use logout::LogoutCommand;
pub use queue::QueueCommand;
pub use record::RecordCommand;
pub use settings::SettingsCommand;
pub use vehicles::VehiclesCommand;

use clap::ValueEnum;

use lubelog_core::{ApiClient, Companion, Credentials, LocalStore, Navigation, Screen, VehicleCache};

use crate::config::Config;
use crate::presenter::TerminalPresenter;

pub type CliCompanion = Companion<ApiClient, Option<Credentials>, TerminalPresenter>;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Builds a companion from the loaded configuration.
pub fn open_companion(
    config: &Config,
    assume_yes: bool,
) -> Result<CliCompanion, Box<dyn std::error::Error>> {
    let api = ApiClient::new(config.request_timeout())?;
    let store = LocalStore::new(config.data_dir.value.clone());
    Ok(Companion::new(
        api,
        config.server.credentials(),
        TerminalPresenter::new(assume_yes),
        store,
    ))
}

/// Acts on a navigation directive. Only the vehicle list has a rendering.
pub fn follow(navigation: Navigation, vehicles: &VehicleCache) {
    if let Navigation::To(Screen::VehicleList) = navigation {
        println!();
        print_vehicles(vehicles);
    }
}

pub fn print_vehicles(vehicles: &VehicleCache) {
    if vehicles.is_empty() {
        println!("No vehicles found.");
        return;
    }

    println!("{:<6} {:<32} {:<16}", "ID", "VEHICLE", "IDENTIFIER");
    for vehicle in vehicles.all() {
        println!(
            "{:<6} {:<32} {:<16}",
            vehicle.id(),
            vehicle.display_name(),
            vehicle.identifier()
        );
    }
}
