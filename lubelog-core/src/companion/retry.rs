//! Replaying the offline queue.
//!
//! Entries are addressed by position in the current queue. Confirmed
//! successes are removed by id from a freshly re-read queue, one at a time,
//! so entries queued while a bulk retry is running are never lost.

use thiserror::Error;

use super::{Companion, SubmitError, SubmitMode};
use crate::api::RecordApi;
use crate::credentials::CredentialSource;
use crate::models::QueuedEntry;
use crate::presenter::{NoticeKind, Presenter, SubmissionState, SubmissionTarget};
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum RetryError {
    #[error("No saved entry at position {index} ({len} saved)")]
    NoSuchEntry { index: usize, len: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug)]
pub enum RetryOutcome {
    /// Accepted by the server and removed from the queue.
    Submitted(QueuedEntry),
    /// Still in the queue.
    StillQueued {
        entry: QueuedEntry,
        error: SubmitError,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkRetryReport {
    pub attempted: usize,
    pub submitted: usize,
    pub rejected: usize,
    pub unreachable: usize,
    /// Entries left in the queue by this run, in queue order.
    pub remaining: Vec<QueuedEntry>,
}

impl BulkRetryReport {
    pub fn summary(&self) -> String {
        let noun = if self.submitted == 1 { "entry" } else { "entries" };
        let mut summary = format!(
            "Finished. {} {} submitted (of {} attempted).",
            self.submitted, noun, self.attempted
        );
        if self.rejected > 0 {
            summary.push_str(&format!(
                " {} rejected by the server and need correction.",
                self.rejected
            ));
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(QueuedEntry),
    /// The user declined the confirmation.
    Cancelled,
}

impl<A, C, P> Companion<A, C, P>
where
    A: RecordApi,
    C: CredentialSource,
    P: Presenter,
{
    /// Retries the entry at `index` (0-based) once.
    pub async fn retry_entry(&mut self, index: usize) -> Result<RetryOutcome, RetryError> {
        let entry = self.entry_at(index)?;

        match self.resubmit(&entry).await {
            Ok(()) => {
                self.store.remove_entry(entry.id)?;
                self.publish_queue();
                Ok(RetryOutcome::Submitted(entry))
            }
            Err(error) => {
                self.presenter
                    .submission_state(SubmissionTarget::Entry(entry.id), SubmissionState::Idle);
                Ok(RetryOutcome::StillQueued { entry, error })
            }
        }
    }

    /// Retries every queued entry in order, one at a time.
    ///
    /// Stops early if credentials are missing, leaving the rest untouched.
    pub async fn retry_all(&mut self) -> Result<BulkRetryReport, RetryError> {
        let snapshot = self.store.load_entries()?;
        if snapshot.is_empty() {
            return Ok(BulkRetryReport::default());
        }

        self.presenter.notify(
            &format!("Attempting to submit {} saved entries...", snapshot.len()),
            NoticeKind::Info,
        );
        tracing::info!("Retrying {} saved entries", snapshot.len());

        let mut report = BulkRetryReport::default();
        let mut pending = snapshot.into_iter();

        while let Some(entry) = pending.next() {
            // Another process may have deleted or submitted it since the snapshot.
            if !self.store.contains_entry(entry.id)? {
                tracing::info!("Skipping {}, no longer saved", entry.id);
                continue;
            }

            let result = self.resubmit(&entry).await;
            match result {
                Ok(()) => {
                    report.attempted += 1;
                    match self.store.remove_entry(entry.id) {
                        Ok(Some(_)) => {
                            report.submitted += 1;
                            self.publish_queue();
                        }
                        Ok(None) => {
                            tracing::warn!("{} was removed elsewhere while being submitted", entry.id)
                        }
                        Err(e) => {
                            report.submitted += 1;
                            tracing::error!("Submitted {} but could not remove it: {}", entry.id, e)
                        }
                    }
                }
                Err(SubmitError::ConfigurationMissing) => {
                    report.remaining.push(entry);
                    report.remaining.extend(pending.by_ref());
                    break;
                }
                Err(error) => {
                    report.attempted += 1;
                    match error {
                        SubmitError::Unreachable(_) => report.unreachable += 1,
                        _ => report.rejected += 1,
                    }
                    self.presenter
                        .submission_state(SubmissionTarget::Entry(entry.id), SubmissionState::Idle);
                    report.remaining.push(entry);
                }
            }
        }

        tracing::info!(
            "Bulk retry finished: {} of {} submitted",
            report.submitted,
            report.attempted
        );
        self.presenter.notify(&report.summary(), NoticeKind::Info);
        Ok(report)
    }

    /// Deletes the entry at `index` (0-based) after confirmation.
    pub fn delete_entry(&mut self, index: usize) -> Result<DeleteOutcome, RetryError> {
        let entry = self.entry_at(index)?;

        if !self
            .presenter
            .confirm("Are you sure you want to delete this saved entry?")
        {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.store.remove_entry(entry.id)?;
        tracing::info!("Deleted saved entry {}", entry.id);
        self.publish_queue();
        self.presenter.notify("Entry deleted.", NoticeKind::Success);
        Ok(DeleteOutcome::Deleted(entry))
    }

    fn entry_at(&self, index: usize) -> Result<QueuedEntry, RetryError> {
        let mut entries = self.store.load_entries()?;
        let len = entries.len();
        if index >= len {
            return Err(RetryError::NoSuchEntry { index, len });
        }
        Ok(entries.swap_remove(index))
    }

    async fn resubmit(&mut self, entry: &QueuedEntry) -> Result<(), SubmitError> {
        self.attempt(entry.vehicle_id, &entry.record, entry.id, SubmitMode::Retry)
            .await
            .map(|_| ())
    }

    fn publish_queue(&self) {
        match self.store.load_entries() {
            Ok(entries) => self.presenter.queue_changed(&entries),
            Err(e) => tracing::warn!("Failed to reload saved entries: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_single_retry_of_only_entry_empties_queue() {
        let mut ctx = setup();
        let entry = queued(&ctx, 1, gas(50.0));

        let outcome = ctx.companion.retry_entry(0).await.unwrap();

        assert!(matches!(outcome, RetryOutcome::Submitted(ref e) if *e == entry));
        assert_eq!(ctx.companion.store().entry_count().unwrap(), 0);
        assert_eq!(*ctx.companion.presenter().renders.borrow(), vec![0]);
    }

    #[tokio::test]
    async fn test_single_retry_reuses_entry_id_as_key() {
        let mut ctx = setup();
        let entry = queued(&ctx, 3, odometer(1234));
        ctx.companion.api().script(&[Scripted::Unreachable]);

        ctx.companion.retry_entry(0).await.unwrap();
        ctx.companion.retry_entry(0).await.unwrap();

        let calls = ctx.companion.api().calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(vehicle, _, key)| *vehicle == 3 && *key == entry.id));
    }

    #[tokio::test]
    async fn test_failed_single_retry_keeps_entry_and_restores_idle() {
        let mut ctx = setup();
        let entry = queued(&ctx, 1, gas(50.0));
        ctx.companion.api().script(&[Scripted::Reject(500)]);

        let outcome = ctx.companion.retry_entry(0).await.unwrap();

        assert!(matches!(
            outcome,
            RetryOutcome::StillQueued {
                error: SubmitError::Rejected(_),
                ..
            }
        ));
        assert_eq!(ctx.companion.store().load_entries().unwrap(), vec![entry.clone()]);
        assert_eq!(
            ctx.companion.presenter().states.borrow().last().copied(),
            Some((SubmissionTarget::Entry(entry.id), SubmissionState::Idle))
        );
    }

    #[tokio::test]
    async fn test_retry_out_of_range() {
        let mut ctx = setup();
        queued(&ctx, 1, gas(50.0));

        let err = ctx.companion.retry_entry(1).await.unwrap_err();

        assert!(matches!(err, RetryError::NoSuchEntry { index: 1, len: 1 }));
        assert_eq!(ctx.companion.api().call_count(), 0);
    }

    #[tokio::test]
    async fn test_bulk_retry_empty_queue_is_silent() {
        let mut ctx = setup();

        let report = ctx.companion.retry_all().await.unwrap();

        assert_eq!(report, BulkRetryReport::default());
        assert!(ctx.companion.presenter().notices.borrow().is_empty());
        assert_eq!(ctx.companion.api().call_count(), 0);
    }

    #[tokio::test]
    async fn test_bulk_retry_removes_only_successes_in_order() {
        let mut ctx = setup();
        let first = queued(&ctx, 1, gas(10.0));
        let second = queued(&ctx, 2, odometer(20));
        let third = queued(&ctx, 3, gas(30.0));
        ctx.companion
            .api()
            .script(&[Scripted::Accept, Scripted::Unreachable, Scripted::Accept]);

        let report = ctx.companion.retry_all().await.unwrap();

        assert_eq!(report.attempted, 3);
        assert_eq!(report.submitted, 2);
        assert_eq!(report.unreachable, 1);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.remaining, vec![second.clone()]);
        assert_eq!(ctx.companion.store().load_entries().unwrap(), vec![second.clone()]);

        let attempted: Vec<Uuid> = ctx
            .companion
            .api()
            .calls
            .borrow()
            .iter()
            .map(|(_, _, key)| *key)
            .collect();
        assert_eq!(attempted, vec![first.id, second.id, third.id]);

        assert_eq!(*ctx.companion.presenter().renders.borrow(), vec![2, 1]);
        assert!(ctx
            .companion
            .presenter()
            .has_notice("Attempting to submit 3 saved entries..."));
        assert_eq!(
            ctx.companion.presenter().last_notice().unwrap().0,
            "Finished. 2 entries submitted (of 3 attempted)."
        );
    }

    #[tokio::test]
    async fn test_bulk_retry_counts_rejected_separately() {
        let mut ctx = setup();
        queued(&ctx, 1, gas(10.0));
        queued(&ctx, 1, gas(11.0));
        ctx.companion
            .api()
            .script(&[Scripted::Reject(400), Scripted::Unreachable]);

        let report = ctx.companion.retry_all().await.unwrap();

        assert_eq!(report.submitted, 0);
        assert_eq!(report.rejected, 1);
        assert_eq!(report.unreachable, 1);
        assert_eq!(report.remaining.len(), 2);
        assert_eq!(
            report.summary(),
            "Finished. 0 entries submitted (of 2 attempted). 1 rejected by the server and need correction."
        );
    }

    #[tokio::test]
    async fn test_bulk_retry_keeps_entry_appended_mid_run() {
        let mut ctx = setup();
        queued(&ctx, 1, gas(10.0));
        queued(&ctx, 1, gas(20.0));
        let late = QueuedEntry::new(Uuid::new_v4(), 9, odometer(77));
        ctx.companion
            .api()
            .inject_during_next_call(ctx.companion.store().clone(), late.clone());

        let report = ctx.companion.retry_all().await.unwrap();

        assert_eq!(report.submitted, 2);
        assert!(report.remaining.is_empty());
        assert_eq!(ctx.companion.store().load_entries().unwrap(), vec![late]);
        // The late entry was not part of this run.
        assert_eq!(ctx.companion.api().call_count(), 2);
    }

    #[tokio::test]
    async fn test_bulk_retry_skips_entry_deleted_mid_run() {
        let mut ctx = setup();
        let first = queued(&ctx, 1, gas(10.0));
        let second = queued(&ctx, 1, gas(20.0));
        ctx.companion
            .api()
            .remove_during_next_call(ctx.companion.store().clone(), second.id);

        let report = ctx.companion.retry_all().await.unwrap();

        assert_eq!(report.attempted, 1);
        assert_eq!(report.submitted, 1);
        assert!(report.remaining.is_empty());
        assert_eq!(ctx.companion.store().entry_count().unwrap(), 0);
        let calls = ctx.companion.api().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2, first.id);
    }

    #[tokio::test]
    async fn test_bulk_retry_does_not_count_entry_removed_during_its_call() {
        let mut ctx = setup();
        let entry = queued(&ctx, 1, gas(10.0));
        ctx.companion
            .api()
            .remove_during_next_call(ctx.companion.store().clone(), entry.id);

        let report = ctx.companion.retry_all().await.unwrap();

        assert_eq!(report.attempted, 1);
        assert_eq!(report.submitted, 0);
        assert_eq!(ctx.companion.store().entry_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_single_retry_leaves_one_copy_queued() {
        let mut ctx = setup();
        let entry = queued(&ctx, 2, odometer(4321));
        ctx.companion.api().script(&[Scripted::Unreachable]);

        let outcome = ctx.companion.retry_entry(0).await.unwrap();

        assert!(matches!(
            outcome,
            RetryOutcome::StillQueued {
                error: SubmitError::Unreachable(_),
                ..
            }
        ));
        assert_eq!(ctx.companion.store().load_entries().unwrap(), vec![entry]);
        assert!(!ctx
            .companion
            .presenter()
            .has_notice("Network offline. Record saved for later."));
    }

    #[tokio::test]
    async fn test_bulk_retry_without_credentials_stops() {
        let mut ctx = setup_logged_out();
        let first = queued(&ctx, 1, gas(10.0));
        let second = queued(&ctx, 1, gas(20.0));

        let report = ctx.companion.retry_all().await.unwrap();

        assert_eq!(report.attempted, 0);
        assert_eq!(report.remaining, vec![first.clone(), second.clone()]);
        assert_eq!(ctx.companion.store().load_entries().unwrap(), vec![first, second]);
        let blocking = ctx
            .companion
            .presenter()
            .notices
            .borrow()
            .iter()
            .filter(|(_, kind)| *kind == NoticeKind::Blocking)
            .count();
        assert_eq!(blocking, 1);
    }

    #[test]
    fn test_summary_singular() {
        let report = BulkRetryReport {
            attempted: 1,
            submitted: 1,
            ..Default::default()
        };
        assert_eq!(report.summary(), "Finished. 1 entry submitted (of 1 attempted).");
    }

    #[test]
    fn test_delete_confirmed() {
        let mut ctx = setup();
        let first = queued(&ctx, 1, gas(10.0));
        let second = queued(&ctx, 1, gas(20.0));

        let outcome = ctx.companion.delete_entry(0).unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted(first));
        assert_eq!(ctx.companion.store().load_entries().unwrap(), vec![second]);
        assert_eq!(*ctx.companion.presenter().renders.borrow(), vec![1]);
        assert!(ctx.companion.presenter().has_notice("Entry deleted."));
    }

    #[test]
    fn test_delete_declined_changes_nothing() {
        let mut ctx = setup();
        let entry = queued(&ctx, 1, gas(10.0));
        ctx.companion.presenter().answer.set(false);

        let outcome = ctx.companion.delete_entry(0).unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(ctx.companion.store().load_entries().unwrap(), vec![entry]);
        assert!(ctx.companion.presenter().renders.borrow().is_empty());
        assert!(ctx.companion.presenter().notices.borrow().is_empty());
    }

    #[test]
    fn test_delete_out_of_range() {
        let mut ctx = setup();

        let err = ctx.companion.delete_entry(0).unwrap_err();

        assert!(matches!(err, RetryError::NoSuchEntry { index: 0, len: 0 }));
    }
}
