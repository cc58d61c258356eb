use uuid::Uuid;

use super::Companion;
use crate::api::RecordApi;
use crate::credentials::CredentialSource;
use crate::models::{QueuedEntry, Record};
use crate::presenter::{NoticeKind, Presenter};
use crate::storage::StorageError;

impl<A, C, P> Companion<A, C, P>
where
    A: RecordApi,
    C: CredentialSource,
    P: Presenter,
{
    /// Stamps the record with the current instant and appends it to the end
    /// of the offline queue.
    pub(crate) fn enqueue_offline(
        &self,
        id: Uuid,
        vehicle_id: i64,
        record: Record,
    ) -> Result<QueuedEntry, StorageError> {
        let entry = QueuedEntry::new(id, vehicle_id, record);
        self.store.append_entry(&entry)?;

        self.presenter.notify(
            "Network offline. Record saved for later.",
            NoticeKind::Error,
        );
        Ok(entry)
    }
}
