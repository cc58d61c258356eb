//! LubeLogger REST API access.

mod client;
mod error;

pub use client::{ApiClient, RecordApi, DEFAULT_TIMEOUT, IDEMPOTENCY_HEADER};
pub use error::ApiError;
