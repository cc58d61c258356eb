//! Named durable keys held by the local store.

/// Keys that can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    /// Ordered sequence of queued entries awaiting retry.
    SavedEntries,
    /// Instant of the last successful vehicle fetch (RFC 3339).
    LastFetchTime,
    /// Refresh interval setting in days, `-1` when disabled.
    RefreshInterval,
    /// Cached vehicle list.
    Vehicles,
}

impl StoreKey {
    /// Returns the filename for this key.
    pub fn filename(&self) -> &'static str {
        match self {
            StoreKey::SavedEntries => "saved_entries.json",
            StoreKey::LastFetchTime => "last_fetch_time",
            StoreKey::RefreshInterval => "refresh_interval",
            StoreKey::Vehicles => "vehicles.json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_key_filename() {
        assert_eq!(StoreKey::SavedEntries.filename(), "saved_entries.json");
        assert_eq!(StoreKey::LastFetchTime.filename(), "last_fetch_time");
        assert_eq!(StoreKey::RefreshInterval.filename(), "refresh_interval");
        assert_eq!(StoreKey::Vehicles.filename(), "vehicles.json");
    }
}
