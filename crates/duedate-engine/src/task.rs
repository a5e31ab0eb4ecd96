//! Task drafts: user input turned into text plus an optional due date.
//!
//! This is the policy a to-do front end applies on "add task": run the
//! extractor over the typed text; when it finds a date phrase, the resolved
//! datetime becomes the due date and the cleaned text becomes the task text.
//! Otherwise the text and the explicit due-date field are kept as entered.
//! Storage is left to the caller.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::countdown::{due_label, due_status, DueStatus};
use crate::error::{DueDateError, Result};
use crate::extract::{extract_with_options, serialize_local_minute, ExtractOptions};

/// A task ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub text: String,
    pub completed: bool,
    #[serde(serialize_with = "serialize_optional_local_minute")]
    pub due_date: Option<NaiveDateTime>,
}

impl TaskDraft {
    /// Build a draft from typed `text` and an optional explicit due date.
    ///
    /// A due date found in the text takes precedence over `explicit_due`.
    ///
    /// The stored text is normally the extractor's cleaned text. When the date
    /// phrase was the whole text the cleaned text is empty, and this overrides
    /// that: the typed text is stored instead so the task is never blank.
    ///
    /// # Errors
    ///
    /// Returns [`DueDateError::EmptyTask`] if `text` is empty or whitespace.
    pub fn from_input(
        text: &str,
        explicit_due: Option<NaiveDateTime>,
        now: NaiveDateTime,
        options: &ExtractOptions,
    ) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DueDateError::EmptyTask);
        }

        let draft = match extract_with_options(text, now, options) {
            Some(found) => {
                let text = if found.cleaned_text.is_empty() {
                    text.to_string()
                } else {
                    found.cleaned_text
                };
                Self {
                    text,
                    completed: false,
                    due_date: Some(found.due),
                }
            }
            None => Self {
                text: text.to_string(),
                completed: false,
                due_date: explicit_due,
            },
        };

        Ok(draft)
    }

    /// Countdown state for display, or `None` when the task is completed or
    /// has no due date.
    pub fn status(&self, now: NaiveDateTime) -> Option<DueStatus> {
        if self.completed {
            return None;
        }
        self.due_date.map(|due| due_status(due, now))
    }

    /// Short due-date label for display, e.g. `"Feb 20, 03:00 PM"`.
    pub fn due_label(&self, now: NaiveDateTime) -> Option<String> {
        self.due_date.map(|due| due_label(due, now))
    }
}

fn serialize_optional_local_minute<S: Serializer>(
    dt: &Option<NaiveDateTime>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match dt {
        Some(dt) => serialize_local_minute(dt, serializer),
        None => serializer.serialize_none(),
    }
}
