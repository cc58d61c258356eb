//! File-backed storage for the offline queue, settings and cached data.

use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use uuid::Uuid;

use super::StoreKey;
use crate::models::{QueuedEntry, RefreshInterval, Vehicle};

const QUEUE_LOCK_FILE: &str = "saved_entries.lock";

/// Durable key/value storage rooted at a data directory.
///
/// Every value is written whole: a temporary file is written next to the
/// target and renamed over it. Queue mutations additionally hold an
/// exclusive lock on `saved_entries.lock` so concurrent processes cannot
/// interleave a read-modify-write.
#[derive(Clone, Debug)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    /// Creates a new store with a custom data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    /// Returns the full path for a key.
    pub fn path(&self, key: StoreKey) -> PathBuf {
        self.data_dir.join(key.filename())
    }

    /// Checks if a key exists on disk.
    pub fn exists(&self, key: StoreKey) -> bool {
        self.path(key).exists()
    }

    // ---------------------------------------------------------------------
    // Offline queue
    // ---------------------------------------------------------------------

    /// Loads the queued entries in insertion order.
    ///
    /// A missing file is an empty queue.
    pub fn load_entries(&self) -> Result<Vec<QueuedEntry>, StorageError> {
        match self.read(StoreKey::SavedEntries)? {
            Some(contents) => serde_json::from_str(&contents).map_err(|e| {
                StorageError::ParseError(self.path(StoreKey::SavedEntries), e.to_string())
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Number of queued entries.
    pub fn entry_count(&self) -> Result<usize, StorageError> {
        Ok(self.load_entries()?.len())
    }

    /// Whether an entry with this id is still queued.
    ///
    /// Read under the lock so a removal in progress elsewhere is seen whole.
    pub fn contains_entry(&self, id: Uuid) -> Result<bool, StorageError> {
        let _lock = self.lock_queue()?;
        Ok(self.load_entries()?.iter().any(|e| e.id == id))
    }

    /// Appends an entry to the end of the queue.
    pub fn append_entry(&self, entry: &QueuedEntry) -> Result<(), StorageError> {
        let _lock = self.lock_queue()?;
        let mut entries = self.load_entries()?;
        entries.push(entry.clone());
        self.write_entries(&entries)?;
        tracing::info!(
            "Queued {} record for vehicle {} ({} pending)",
            entry.record.record_type(),
            entry.vehicle_id,
            entries.len()
        );
        Ok(())
    }

    /// Removes the entry with the given id from the current queue.
    ///
    /// The queue is re-read under the lock, so entries appended by others
    /// since the caller's snapshot are kept. Returns the removed entry, or
    /// `None` if it was already gone.
    pub fn remove_entry(&self, id: Uuid) -> Result<Option<QueuedEntry>, StorageError> {
        let _lock = self.lock_queue()?;
        let mut entries = self.load_entries()?;
        let Some(position) = entries.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let removed = entries.remove(position);
        self.write_entries(&entries)?;
        Ok(Some(removed))
    }

    fn write_entries(&self, entries: &[QueuedEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| {
            StorageError::ParseError(self.path(StoreKey::SavedEntries), e.to_string())
        })?;
        self.write(StoreKey::SavedEntries, json.as_bytes())
    }

    fn lock_queue(&self) -> Result<File, StorageError> {
        self.ensure_dir()?;
        let path = self.data_dir.join(QUEUE_LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| StorageError::IoError(path.clone(), e))?;
        file.lock_exclusive()
            .map_err(|e| StorageError::IoError(path, e))?;
        Ok(file)
    }

    // ---------------------------------------------------------------------
    // Last successful fetch
    // ---------------------------------------------------------------------

    pub fn last_fetch_time(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        let Some(contents) = self.read(StoreKey::LastFetchTime)? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(contents.trim())
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| {
                StorageError::ParseError(self.path(StoreKey::LastFetchTime), e.to_string())
            })
    }

    pub fn set_last_fetch_time(&self, at: DateTime<Utc>) -> Result<(), StorageError> {
        self.write(StoreKey::LastFetchTime, at.to_rfc3339().as_bytes())
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Returns the stored refresh interval, or the default when never set.
    pub fn refresh_interval(&self) -> Result<RefreshInterval, StorageError> {
        let Some(contents) = self.read(StoreKey::RefreshInterval)? else {
            return Ok(RefreshInterval::default());
        };
        let path = self.path(StoreKey::RefreshInterval);
        let value: i64 = contents.trim().parse().map_err(|_| {
            StorageError::ParseError(path.clone(), format!("not a number: {}", contents.trim()))
        })?;
        RefreshInterval::from_stored(value).map_err(|e| StorageError::ParseError(path, e))
    }

    pub fn set_refresh_interval(&self, interval: RefreshInterval) -> Result<(), StorageError> {
        self.write(
            StoreKey::RefreshInterval,
            interval.to_stored().to_string().as_bytes(),
        )
    }

    // ---------------------------------------------------------------------
    // Vehicle cache
    // ---------------------------------------------------------------------

    /// Loads the cached vehicle list. `None` if nothing was ever fetched.
    pub fn load_vehicles(&self) -> Result<Option<Vec<Vehicle>>, StorageError> {
        match self.read(StoreKey::Vehicles)? {
            Some(contents) => serde_json::from_str(&contents).map(Some).map_err(|e| {
                StorageError::ParseError(self.path(StoreKey::Vehicles), e.to_string())
            }),
            None => Ok(None),
        }
    }

    pub fn save_vehicles(&self, vehicles: &[Vehicle]) -> Result<(), StorageError> {
        let json = serde_json::to_string(vehicles).map_err(|e| {
            StorageError::ParseError(self.path(StoreKey::Vehicles), e.to_string())
        })?;
        self.write(StoreKey::Vehicles, json.as_bytes())
    }

    /// Forgets cached vehicles and the last fetch time.
    pub fn clear_cached_data(&self) -> Result<(), StorageError> {
        self.remove(StoreKey::Vehicles)?;
        self.remove(StoreKey::LastFetchTime)
    }

    // ---------------------------------------------------------------------
    // Raw file access
    // ---------------------------------------------------------------------

    fn read(&self, key: StoreKey) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    fn write(&self, key: StoreKey, bytes: &[u8]) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let path = self.path(key);
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, bytes).map_err(|e| StorageError::IoError(tmp_path.clone(), e))?;
        fs::rename(&tmp_path, &path).map_err(|e| StorageError::IoError(path, e))?;

        Ok(())
    }

    fn remove(&self, key: StoreKey) -> Result<(), StorageError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))
    }
}

/// Errors that can occur during local storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// Stored contents could not be parsed (or serialized).
    ParseError(PathBuf, String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::ParseError(path, e) => {
                write!(f, "Failed to parse {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            StorageError::ParseError(_, _) => None,
        }
    }
}
