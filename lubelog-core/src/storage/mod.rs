//! Durable local storage.
//!
//! Each [`StoreKey`] maps to one file in the data directory:
//! - `saved_entries.json`: queued records awaiting retry, in insertion order
//! - `last_fetch_time`: RFC 3339 instant of the last successful vehicle fetch
//! - `refresh_interval`: days between automatic refreshes, `-1` for never
//! - `vehicles.json`: cached vehicle list

mod local_store;
mod store_key;

pub use local_store::{LocalStore, StorageError};
pub use store_key::StoreKey;
