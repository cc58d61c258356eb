//! LubeLog Companion Core Library
//!
//! Record submission to a LubeLogger server with an offline queue, retry and
//! staleness-triggered refresh of the vehicle list.

pub mod api;
pub mod companion;
pub mod credentials;
pub mod models;
pub mod presenter;
pub mod storage;
pub mod vehicles;

pub use api::{ApiClient, ApiError, RecordApi, DEFAULT_TIMEOUT, IDEMPOTENCY_HEADER};
pub use companion::{
    BulkRetryReport, Companion, DeleteOutcome, RefreshDecision, RetryError, RetryOutcome,
    SubmitError, SubmitMode, SubmitOutcome,
};
pub use credentials::{CredentialSource, Credentials};
pub use models::{
    ExtraField, GasRecord, OdometerRecord, QueuedEntry, Record, RecordType, RefreshInterval,
    Vehicle, VehicleData,
};
pub use presenter::{Navigation, NoticeKind, Presenter, Screen, SubmissionState, SubmissionTarget};
pub use storage::{LocalStore, StorageError, StoreKey};
pub use vehicles::VehicleCache;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
