mod queued_entry;
mod record;
mod record_type;
mod refresh_interval;
mod vehicle;

pub use queued_entry::QueuedEntry;
pub use record::{GasRecord, OdometerRecord, Record};
pub use record_type::RecordType;
pub use refresh_interval::{RefreshInterval, DISABLED_SENTINEL};
pub use vehicle::{ExtraField, Vehicle, VehicleData};
