//! Scripted collaborators for companion tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use chrono::NaiveDate;
use serde_json::Value;
use tempfile::TempDir;
use uuid::Uuid;

use super::Companion;
use crate::api::{ApiError, RecordApi};
use crate::credentials::Credentials;
use crate::models::{GasRecord, OdometerRecord, QueuedEntry, Record, Vehicle};
use crate::presenter::{NoticeKind, Presenter, SubmissionState, SubmissionTarget};
use crate::storage::LocalStore;

/// Result the fake server gives for the next `add_record` call.
#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Accept,
    Unreachable,
    Reject(u16),
}

#[derive(Default)]
pub struct FakeApi {
    outcomes: RefCell<VecDeque<Scripted>>,
    /// (vehicle id, record, idempotency key) per `add_record` call.
    pub calls: RefCell<Vec<(i64, Record, Uuid)>>,
    pub fetches: Cell<usize>,
    pub fail_fetch: Cell<bool>,
    /// Runs while the next `add_record` call is in flight.
    during_next_call: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl FakeApi {
    pub fn script(&self, outcomes: &[Scripted]) {
        self.outcomes.borrow_mut().extend(outcomes.iter().copied());
    }

    /// Another writer appends `entry` while the next call is in flight.
    pub fn inject_during_next_call(&self, store: LocalStore, entry: QueuedEntry) {
        *self.during_next_call.borrow_mut() = Some(Box::new(move || {
            store.append_entry(&entry).unwrap();
        }));
    }

    /// Another writer deletes entry `id` while the next call is in flight.
    pub fn remove_during_next_call(&self, store: LocalStore, id: Uuid) {
        *self.during_next_call.borrow_mut() = Some(Box::new(move || {
            store.remove_entry(id).unwrap();
        }));
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl RecordApi for FakeApi {
    async fn add_record(
        &self,
        _credentials: &Credentials,
        vehicle_id: i64,
        record: &Record,
        idempotency_key: Uuid,
    ) -> Result<Value, ApiError> {
        self.calls
            .borrow_mut()
            .push((vehicle_id, record.clone(), idempotency_key));

        let hook = self.during_next_call.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }

        let outcome = self
            .outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or(Scripted::Accept);
        match outcome {
            Scripted::Accept => Ok(serde_json::json!({ "success": true })),
            Scripted::Unreachable => Err(ApiError::Unreachable("connection refused".into())),
            Scripted::Reject(status) => Err(ApiError::Rejected {
                status,
                body: "validation failed".into(),
            }),
        }
    }

    async fn fetch_vehicles(&self, _credentials: &Credentials) -> Result<Vec<Vehicle>, ApiError> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail_fetch.get() {
            return Err(ApiError::Unreachable("connection refused".into()));
        }
        Ok(serde_json::from_str(
            r#"[{"vehicleData": {"id": 1, "year": 2015, "make": "Mazda", "model": "3"}}]"#,
        )
        .unwrap())
    }
}

pub struct RecordingPresenter {
    pub notices: RefCell<Vec<(String, NoticeKind)>>,
    pub states: RefCell<Vec<(SubmissionTarget, SubmissionState)>>,
    pub renders: RefCell<Vec<usize>>,
    pub answer: Cell<bool>,
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self {
            notices: RefCell::default(),
            states: RefCell::default(),
            renders: RefCell::default(),
            answer: Cell::new(true),
        }
    }
}

impl RecordingPresenter {
    pub fn last_notice(&self) -> Option<(String, NoticeKind)> {
        self.notices.borrow().last().cloned()
    }

    pub fn has_notice(&self, needle: &str) -> bool {
        self.notices.borrow().iter().any(|(m, _)| m.contains(needle))
    }
}

impl Presenter for RecordingPresenter {
    fn notify(&self, message: &str, kind: NoticeKind) {
        self.notices.borrow_mut().push((message.to_string(), kind));
    }

    fn submission_state(&self, target: SubmissionTarget, state: SubmissionState) {
        self.states.borrow_mut().push((target, state));
    }

    fn queue_changed(&self, entries: &[QueuedEntry]) {
        self.renders.borrow_mut().push(entries.len());
    }

    fn confirm(&self, _prompt: &str) -> bool {
        self.answer.get()
    }
}

pub type TestCompanion = Companion<FakeApi, Option<Credentials>, RecordingPresenter>;

pub struct TestContext {
    pub companion: TestCompanion,
    pub _temp_dir: TempDir,
}

pub fn setup() -> TestContext {
    setup_with(Some(Credentials::new("http://lube.test", "me", "secret")))
}

pub fn setup_logged_out() -> TestContext {
    setup_with(None)
}

fn setup_with(credentials: Option<Credentials>) -> TestContext {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path().to_path_buf());
    TestContext {
        companion: Companion::new(
            FakeApi::default(),
            credentials,
            RecordingPresenter::default(),
            store,
        ),
        _temp_dir: temp_dir,
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
}

pub fn gas(cost: f64) -> Record {
    Record::Gas(
        GasRecord::new(date())
            .with_odometer(50_000)
            .with_fuel_consumed(10.0)
            .with_cost(cost)
            .with_notes("regular"),
    )
}

pub fn odometer(reading: u64) -> Record {
    Record::Odometer(OdometerRecord::new(date(), reading))
}

/// Seeds the queue directly, bypassing the submitter.
pub fn queued(ctx: &TestContext, vehicle_id: i64, record: Record) -> QueuedEntry {
    let entry = QueuedEntry::new(Uuid::new_v4(), vehicle_id, record);
    ctx.companion.store().append_entry(&entry).unwrap();
    entry
}
