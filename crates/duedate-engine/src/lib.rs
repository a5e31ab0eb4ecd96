//! # duedate-engine
//!
//! Deterministic due-date extraction for to-do lists.
//!
//! Given free-form task text such as `"Team meeting Friday at 3pm"` and a
//! caller-supplied reference instant, the engine resolves the relative date and
//! clock time to a concrete local datetime and returns the task text with the
//! phrase removed. No clock is read internally, so every result is
//! reproducible from its inputs.
//!
//! ## Modules
//!
//! - [`extract`] — Task text + reference instant → optional due date and cleaned text
//! - [`phrase`] — Ordered date-phrase and time-phrase tables used by the extractor
//! - [`countdown`] — Time remaining until a due date, overdue detection
//! - [`task`] — Build a task draft from user input and an optional explicit due date
//! - [`error`] — Error types

pub mod countdown;
pub mod error;
pub mod extract;
pub mod phrase;
pub mod task;

pub use countdown::{
    due_label, due_status, is_overdue, parse_due_local, time_remaining, Countdown, DueStatus,
};
pub use error::DueDateError;
pub use extract::{extract, extract_with_options, ExtractOptions, Extraction};
pub use task::TaskDraft;
