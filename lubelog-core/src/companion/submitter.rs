//! One delivery attempt of a record and what follows from its result.

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::Companion;
use crate::api::{ApiError, RecordApi};
use crate::credentials::CredentialSource;
use crate::models::{QueuedEntry, Record};
use crate::presenter::{
    Navigation, NoticeKind, Presenter, Screen, SubmissionState, SubmissionTarget,
};
use crate::storage::StorageError;

/// Whether a record comes straight from the form or from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    FirstAttempt,
    Retry,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// No HTTP response was obtained. The record is worth retrying.
    #[error("{0}")]
    Unreachable(ApiError),

    /// The server answered but did not accept the record.
    #[error("{0}")]
    Rejected(ApiError),

    #[error("Credentials not found. Please log in again.")]
    ConfigurationMissing,

    #[error("Failed to save entry: {0}")]
    Storage(#[from] StorageError),
}

impl SubmitError {
    fn classify(error: ApiError) -> Self {
        if error.is_unreachable() {
            SubmitError::Unreachable(error)
        } else {
            SubmitError::Rejected(error)
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    /// The server accepted the record.
    Submitted {
        response: Value,
        navigation: Navigation,
    },
    /// The server was unreachable and the record went to the offline queue.
    Queued {
        entry: QueuedEntry,
        navigation: Navigation,
    },
    Failed {
        error: SubmitError,
        navigation: Navigation,
    },
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted { .. })
    }

    pub fn navigation(&self) -> Navigation {
        match self {
            SubmitOutcome::Submitted { navigation, .. }
            | SubmitOutcome::Queued { navigation, .. }
            | SubmitOutcome::Failed { navigation, .. } => *navigation,
        }
    }
}

impl<A, C, P> Companion<A, C, P>
where
    A: RecordApi,
    C: CredentialSource,
    P: Presenter,
{
    /// Submits a freshly entered record, queueing it if the server is
    /// unreachable.
    pub async fn submit(&mut self, vehicle_id: i64, record: Record) -> SubmitOutcome {
        self.deliver(vehicle_id, record, Uuid::new_v4(), SubmitMode::FirstAttempt)
            .await
    }

    /// Makes exactly one delivery attempt.
    ///
    /// `key` is sent as the idempotency key and becomes the queue entry id if
    /// a first attempt ends up queued. In retry mode nothing is ever queued.
    pub async fn deliver(
        &mut self,
        vehicle_id: i64,
        record: Record,
        key: Uuid,
        mode: SubmitMode,
    ) -> SubmitOutcome {
        match self.attempt(vehicle_id, &record, key, mode).await {
            Ok(response) => SubmitOutcome::Submitted {
                response,
                navigation: match mode {
                    SubmitMode::FirstAttempt => Navigation::Back,
                    SubmitMode::Retry => Navigation::Stay,
                },
            },
            Err(SubmitError::Unreachable(_)) if mode == SubmitMode::FirstAttempt => {
                self.queue_unreachable(key, vehicle_id, record)
            }
            Err(error) => SubmitOutcome::Failed {
                error,
                navigation: Navigation::Stay,
            },
        }
    }

    /// Sends the record and reports the result to the presenter.
    ///
    /// Never queues. A first-attempt Unreachable is left for the caller to
    /// queue, so no error notice is shown for it here.
    pub(crate) async fn attempt(
        &mut self,
        vehicle_id: i64,
        record: &Record,
        key: Uuid,
        mode: SubmitMode,
    ) -> Result<Value, SubmitError> {
        let target = match mode {
            SubmitMode::FirstAttempt => SubmissionTarget::Form(record.record_type()),
            SubmitMode::Retry => SubmissionTarget::Entry(key),
        };

        let Some(credentials) = self.credentials.credentials() else {
            tracing::warn!("No credentials available, not submitting");
            self.presenter
                .notify(&SubmitError::ConfigurationMissing.to_string(), NoticeKind::Blocking);
            self.presenter
                .submission_state(target, SubmissionState::Failed);
            return Err(SubmitError::ConfigurationMissing);
        };

        self.presenter
            .submission_state(target, SubmissionState::Submitting);
        tracing::debug!(
            "Submitting {} record for vehicle {} ({:?}, key {})",
            record.record_type(),
            vehicle_id,
            mode,
            key
        );

        let result = self
            .api
            .add_record(&credentials, vehicle_id, record, key)
            .await;

        match result {
            Ok(response) => {
                self.presenter
                    .submission_state(target, SubmissionState::Succeeded);
                self.presenter.notify(
                    &format!("{} record saved successfully!", record.record_type().label()),
                    NoticeKind::Success,
                );
                if mode == SubmitMode::FirstAttempt {
                    // Failure is already reported to the presenter.
                    let _ = self.refresh_vehicles(&credentials).await;
                }
                Ok(response)
            }
            Err(e) => {
                self.presenter
                    .submission_state(target, SubmissionState::Failed);
                let error = SubmitError::classify(e);
                tracing::debug!("Submission of {} failed: {}", key, error);

                let queued_by_caller = mode == SubmitMode::FirstAttempt
                    && matches!(error, SubmitError::Unreachable(_));
                if !queued_by_caller {
                    self.presenter
                        .notify(&format!("Error: {}", error), NoticeKind::Error);
                }
                Err(error)
            }
        }
    }

    fn queue_unreachable(&self, key: Uuid, vehicle_id: i64, record: Record) -> SubmitOutcome {
        match self.enqueue_offline(key, vehicle_id, record) {
            Ok(entry) => SubmitOutcome::Queued {
                entry,
                navigation: Navigation::To(Screen::VehicleList),
            },
            Err(e) => {
                tracing::error!("Failed to queue record offline: {}", e);
                let error = SubmitError::Storage(e);
                self.presenter
                    .notify(&format!("Error: {}", error), NoticeKind::Error);
                SubmitOutcome::Failed {
                    error,
                    navigation: Navigation::Stay,
                }
            }
        }
    }
}
