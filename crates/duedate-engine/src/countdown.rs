//! Time remaining until a due date.
//!
//! Pure helpers behind a task list's live countdown: every function takes the
//! reference instant explicitly, so a caller re-renders by calling again with
//! a fresh `now`.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::DueDateError;

/// Remaining time at or below which a countdown is flagged urgent (5 minutes).
pub const URGENT_THRESHOLD_SECONDS: i64 = 5 * 60;

/// Abbreviated month, day, 12-hour clock.
const DUE_LABEL_FORMAT: &str = "%b %-d, %I:%M %p";

/// Decomposed time remaining until a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    /// Total whole seconds remaining.
    pub total_seconds: i64,
    pub days: i64,
    /// Hours component (0-23).
    pub hours: i64,
    /// Minutes component (0-59).
    pub minutes: i64,
    /// Seconds component (0-59).
    pub seconds: i64,
    /// True when at most [`URGENT_THRESHOLD_SECONDS`] remain.
    pub urgent: bool,
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(
                f,
                "{}d {}h {}m {}s",
                self.days, self.hours, self.minutes, self.seconds
            )
        } else if self.hours > 0 {
            write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
        } else {
            write!(f, "{}m {}s", self.minutes, self.seconds)
        }
    }
}

/// Whether a due date is still ahead or already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DueStatus {
    Upcoming(Countdown),
    Overdue,
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Upcoming(countdown) => write!(f, "{countdown}"),
            DueStatus::Overdue => f.write_str("TIME'S UP!"),
        }
    }
}

/// True when `due` lies strictly before `now`.
pub fn is_overdue(due: NaiveDateTime, now: NaiveDateTime) -> bool {
    due < now
}

/// Compute the time remaining from `now` until `due`.
///
/// Returns `None` once the due date has passed.
pub fn time_remaining(due: NaiveDateTime, now: NaiveDateTime) -> Option<Countdown> {
    if is_overdue(due, now) {
        return None;
    }

    let total_seconds = (due - now).num_seconds();
    let days = total_seconds / 86400;
    let remainder = total_seconds % 86400;
    let hours = remainder / 3600;
    let remainder = remainder % 3600;
    let minutes = remainder / 60;
    let seconds = remainder % 60;

    Some(Countdown {
        total_seconds,
        days,
        hours,
        minutes,
        seconds,
        urgent: total_seconds <= URGENT_THRESHOLD_SECONDS,
    })
}

/// Classify `due` relative to `now`.
pub fn due_status(due: NaiveDateTime, now: NaiveDateTime) -> DueStatus {
    match time_remaining(due, now) {
        Some(countdown) => DueStatus::Upcoming(countdown),
        None => DueStatus::Overdue,
    }
}

/// Short display label for a due date, e.g. `"Feb 20, 03:00 PM"`.
///
/// Overdue dates carry a trailing `" (overdue)"` marker.
pub fn due_label(due: NaiveDateTime, now: NaiveDateTime) -> String {
    let label = due.format(DUE_LABEL_FORMAT).to_string();
    if is_overdue(due, now) {
        format!("{label} (overdue)")
    } else {
        label
    }
}

/// Parse a local due date in `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS` form.
///
/// # Errors
///
/// Returns [`DueDateError::InvalidDatetime`] if the string matches neither form.
pub fn parse_due_local(s: &str) -> Result<NaiveDateTime, DueDateError> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| {
            DueDateError::InvalidDatetime(format!("'{s}': {e} (expected YYYY-MM-DDTHH:MM)"))
        })
}
