use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::Record;

/// A record that could not be delivered and waits in the offline queue.
///
/// `id` is the stable identity of the entry. It is assigned when the record is
/// first attempted and travels with every retry as the idempotency key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedEntry {
    pub id: Uuid,
    pub vehicle_id: i64,
    pub record: Record,
    pub timestamp: DateTime<Utc>,
}

impl QueuedEntry {
    pub fn new(id: Uuid, vehicle_id: i64, record: Record) -> Self {
        Self {
            id,
            vehicle_id,
            record,
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
