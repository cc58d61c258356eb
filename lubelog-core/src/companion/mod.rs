//! The offline-resilient record submission subsystem.
//!
//! A [`Companion`] owns everything one client session needs: the API, the
//! credential source, the presenter, the local store and the vehicle cache.
//! Its operations are split across modules:
//!
//! - `submitter`: one delivery attempt and its classification
//! - `enqueuer`: persisting a record that could not reach the server
//! - `retry`: single and bulk replay of the queue, and deletion
//! - `refresher`: staleness-triggered refresh of the vehicle list
//!
//! All operations take `&mut self`, so a companion has at most one
//! submission in flight.

mod enqueuer;
mod refresher;
mod retry;
mod submitter;
#[cfg(test)]
pub(crate) mod test_support;

pub use refresher::RefreshDecision;
pub use retry::{BulkRetryReport, DeleteOutcome, RetryError, RetryOutcome};
pub use submitter::{SubmitError, SubmitMode, SubmitOutcome};

use chrono::{DateTime, Utc};

use crate::api::{ApiError, RecordApi};
use crate::credentials::{CredentialSource, Credentials};
use crate::presenter::{NoticeKind, Presenter};
use crate::storage::{LocalStore, StorageError};
use crate::vehicles::VehicleCache;

pub struct Companion<A, C, P> {
    api: A,
    credentials: C,
    presenter: P,
    store: LocalStore,
    vehicles: VehicleCache,
}

impl<A, C, P> Companion<A, C, P>
where
    A: RecordApi,
    C: CredentialSource,
    P: Presenter,
{
    /// Creates a companion with an empty vehicle cache.
    ///
    /// Call [`start`](Self::start) or
    /// [`load_cached_vehicles`](Self::load_cached_vehicles) to populate it.
    pub fn new(api: A, credentials: C, presenter: P, store: LocalStore) -> Self {
        Self {
            api,
            credentials,
            presenter,
            store,
            vehicles: VehicleCache::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn vehicles(&self) -> &VehicleCache {
        &self.vehicles
    }

    /// Fills the vehicle cache from disk. Returns false if nothing is cached.
    pub fn load_cached_vehicles(&mut self) -> Result<bool, StorageError> {
        match self.store.load_vehicles()? {
            Some(vehicles) => {
                self.vehicles.replace(vehicles);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Start-up: load the cache, fetch if empty, otherwise refresh when stale,
    /// then remind the user about queued entries.
    pub async fn start(&mut self) -> RefreshDecision {
        let cached = match self.load_cached_vehicles() {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Failed to read cached vehicles, refetching: {}", e);
                false
            }
        };

        let decision = match self.credentials.credentials() {
            None => RefreshDecision::NoCredentials,
            Some(credentials) if !cached => {
                self.presenter
                    .notify("No cached vehicles found, fetching...", NoticeKind::Info);
                match self.refresh_vehicles(&credentials).await {
                    Ok(_) => RefreshDecision::Refreshed,
                    Err(_) => RefreshDecision::RefreshFailed,
                }
            }
            Some(_) => self.refresh_if_stale().await,
        };

        self.remind_pending();
        decision
    }

    /// The app came back to the foreground: refresh when stale and remind
    /// the user about queued entries.
    pub async fn foreground(&mut self) -> RefreshDecision {
        let decision = self.refresh_if_stale().await;
        self.remind_pending();
        decision
    }

    fn remind_pending(&self) {
        if let Some(reminder) = self.pending_reminder() {
            self.presenter.notify(&reminder, NoticeKind::Info);
        }
    }

    /// "2 entries are saved and waiting to be submitted", or `None` when the
    /// queue is empty or unreadable.
    pub fn pending_reminder(&self) -> Option<String> {
        let count = match self.store.entry_count() {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Failed to read saved entries: {}", e);
                return None;
            }
        };
        match count {
            0 => None,
            1 => Some("1 entry is saved and waiting to be submitted".to_string()),
            n => Some(format!("{} entries are saved and waiting to be submitted", n)),
        }
    }

    /// Fetches the vehicle list, caches it and records the fetch time.
    pub async fn refresh_vehicles(&mut self, credentials: &Credentials) -> Result<usize, ApiError> {
        self.refresh_vehicles_at(credentials, Utc::now()).await
    }

    pub(crate) async fn refresh_vehicles_at(
        &mut self,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<usize, ApiError> {
        tracing::info!("Fetching vehicles from {}", credentials.domain());

        let vehicles = match self.api.fetch_vehicles(credentials).await {
            Ok(vehicles) => vehicles,
            Err(e) => {
                tracing::error!("Failed to fetch vehicles: {}", e);
                let kind = match e {
                    ApiError::Rejected {
                        status: 401 | 403, ..
                    } => NoticeKind::Blocking,
                    _ => NoticeKind::Error,
                };
                self.presenter.notify(
                    &format!(
                        "Error fetching vehicles: {}. Please check credentials and server address.",
                        e
                    ),
                    kind,
                );
                return Err(e);
            }
        };

        let count = vehicles.len();
        if let Err(e) = self.store.save_vehicles(&vehicles) {
            tracing::warn!("Failed to cache vehicles: {}", e);
        }
        if let Err(e) = self.store.set_last_fetch_time(now) {
            tracing::warn!("Failed to record fetch time: {}", e);
        }
        self.vehicles.replace(vehicles);

        tracing::info!("Fetched {} vehicle(s)", count);
        Ok(count)
    }

    /// Manual refresh, regardless of staleness.
    pub async fn refresh_now(&mut self) -> RefreshDecision {
        let Some(credentials) = self.credentials.credentials() else {
            self.presenter.notify(
                "Unable to refresh, try logging in again",
                NoticeKind::Blocking,
            );
            return RefreshDecision::NoCredentials;
        };
        self.presenter
            .notify("Refreshing vehicle list...", NoticeKind::Info);
        match self.refresh_vehicles(&credentials).await {
            Ok(_) => RefreshDecision::Refreshed,
            Err(_) => RefreshDecision::RefreshFailed,
        }
    }

    /// Forgets cached vehicle data. Queued entries are kept.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.vehicles.clear();
        self.store.clear_cached_data()?;
        self.presenter
            .notify("You have been logged out.", NoticeKind::Info);
        Ok(())
    }
}
