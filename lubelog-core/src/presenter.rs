//! The seam between the submission subsystem and whatever displays it.
//!
//! The core never touches a UI toolkit. It publishes notices, per-submission
//! state and queue contents to a [`Presenter`], asks it for confirmation, and
//! returns a [`Navigation`] directive for the caller to act on.

use uuid::Uuid;

use crate::models::{QueuedEntry, RecordType};

/// Style of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
    /// Needs the user's attention before anything else (e.g. log in again).
    Blocking,
}

/// What a submission is attached to in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionTarget {
    /// The entry form for a first attempt.
    Form(RecordType),
    /// A queued entry being retried.
    Entry(Uuid),
}

/// Lifecycle of one submission, observed by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Failed,
    Succeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    VehicleList,
}

/// Where the caller should go after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Stay where you are (keep the form data).
    Stay,
    /// Return to the previous screen.
    Back,
    To(Screen),
}

pub trait Presenter {
    fn notify(&self, message: &str, kind: NoticeKind);

    fn submission_state(&self, _target: SubmissionTarget, _state: SubmissionState) {}

    /// Called with the full queue whenever it changed.
    fn queue_changed(&self, _entries: &[QueuedEntry]) {}

    /// Asks the user a yes/no question.
    fn confirm(&self, prompt: &str) -> bool;
}
