//! Due-date extraction from free-form task text.
//!
//! [`extract`] scans task text such as `"Team meeting Friday at 3pm"` for one
//! date phrase and, optionally, one time phrase (see [`crate::phrase`]),
//! resolves them against a caller-supplied reference instant, and returns the
//! resolved local datetime together with the text minus those phrases.
//!
//! # Resolution rules
//!
//! - The first date phrase in table order wins; later date words stay in the text.
//! - The time phrase is searched in what remains after the date phrase is removed.
//! - `tonight` and `in N hours` fix the time themselves; no time phrase is taken.
//! - A date without a time phrase resolves at [`ExtractOptions::default_time`] (09:00).
//! - A time phrase without a date phrase is ambiguous and yields `None`.
//!
//! The function never fails: every string is valid input, and absence of a
//! phrase is reported as `None`.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::phrase::{truncate_to_minute, DateResolution, DATE_PHRASES, TIME_PHRASES};

/// Wire format of a resolved due date (`YYYY-MM-DDTHH:MM`, local time).
pub const LOCAL_MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Options for [`extract_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Time of day used when a date phrase has no accompanying time phrase.
    pub default_time: NaiveTime,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            default_time: NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is a valid time"),
        }
    }
}

/// A resolved due date and the task text with the date/time phrases removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    /// The resolved local datetime, seconds always zero.
    #[serde(rename = "dueDateTimeLocal", serialize_with = "serialize_local_minute")]
    pub due: NaiveDateTime,
    /// The input minus the matched phrases, whitespace-collapsed and trimmed.
    pub cleaned_text: String,
}

impl Extraction {
    /// The due date formatted as `YYYY-MM-DDTHH:MM`.
    pub fn due_local(&self) -> String {
        self.due.format(LOCAL_MINUTE_FORMAT).to_string()
    }
}

/// Extract a due date from `text`, resolving relative phrases against `now`.
///
/// Uses a 09:00 default time. For a different default, use
/// [`extract_with_options`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use duedate_engine::extract;
///
/// // Wednesday, February 18, 2026, 14:30
/// let now = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap().and_hms_opt(14, 30, 0).unwrap();
///
/// let result = extract("Team meeting Friday at 3pm", now).unwrap();
/// assert_eq!(result.due_local(), "2026-02-20T15:00");
/// assert_eq!(result.cleaned_text, "Team meeting");
///
/// assert!(extract("Buy milk", now).is_none());
/// ```
pub fn extract(text: &str, now: NaiveDateTime) -> Option<Extraction> {
    extract_with_options(text, now, &ExtractOptions::default())
}

/// Extract a due date from `text` with options.
///
/// Returns `None` when `text` contains no date phrase, including when it holds
/// only a time phrase such as `"at noon"`.
pub fn extract_with_options(
    text: &str,
    now: NaiveDateTime,
    options: &ExtractOptions,
) -> Option<Extraction> {
    let Some((kind, date_match)) = DATE_PHRASES
        .iter()
        .find_map(|phrase| phrase.resolve(text, now).map(|m| (phrase.kind(), m)))
    else {
        trace!("no date phrase found");
        return None;
    };

    debug!(
        rule = ?kind,
        phrase = &text[date_match.span.clone()],
        "matched date phrase"
    );
    let mut remaining = remove_span(text, date_match.span);

    let due = match date_match.value {
        DateResolution::Instant(instant) => instant,
        DateResolution::Date(date) => {
            let time_match = TIME_PHRASES
                .iter()
                .find_map(|phrase| phrase.resolve(&remaining).map(|m| (phrase.label(), m)));

            let time = match time_match {
                Some((label, m)) => {
                    debug!(
                        rule = label,
                        phrase = &remaining[m.span.clone()],
                        "matched time phrase"
                    );
                    remaining = remove_span(&remaining, m.span);
                    m.value
                }
                None => options.default_time,
            };
            date.and_time(time)
        }
    };

    Some(Extraction {
        due: truncate_to_minute(due).unwrap_or(due),
        cleaned_text: collapse_whitespace(&remaining),
    })
}

/// Remove the byte range `span` from `text`.
fn remove_span(text: &str, span: std::ops::Range<usize>) -> String {
    let mut out = String::with_capacity(text.len() - span.len());
    out.push_str(&text[..span.start]);
    out.push_str(&text[span.end..]);
    out
}

/// Collapse whitespace runs to single spaces and trim both ends.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn serialize_local_minute<S: Serializer>(
    dt: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&dt.format(LOCAL_MINUTE_FORMAT))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        // Wednesday, February 18, 2026, 14:30
        at(2026, 2, 18, 14, 30)
    }

    fn due(text: &str) -> String {
        extract(text, now()).unwrap().due_local()
    }

    fn cleaned(text: &str) -> String {
        extract(text, now()).unwrap().cleaned_text
    }

    // ── no match ────────────────────────────────────────────────────────

    #[test]
    fn test_plain_text_is_no_match() {
        assert!(extract("Buy milk", now()).is_none());
        assert!(extract("Finish the quarterly report", now()).is_none());
    }

    #[test]
    fn test_time_only_is_no_match() {
        assert!(extract("at noon", now()).is_none());
        assert!(extract("Lunch with Sam at 12:30pm", now()).is_none());
        assert!(extract("Call mom in the evening", now()).is_none());
    }

    #[test]
    fn test_keyword_inside_word_is_no_match() {
        assert!(extract("Update todays notes", now()).is_none());
        assert!(extract("Review the fortnightly plan", now()).is_none());
    }

    // ── anchored dates ──────────────────────────────────────────────────

    #[test]
    fn test_today_defaults_to_nine() {
        let result = extract("today", now()).unwrap();
        assert_eq!(result.due, at(2026, 2, 18, 9, 0));
        assert_eq!(result.cleaned_text, "");
    }

    #[test]
    fn test_tomorrow_morning() {
        let result = extract("tomorrow morning", now()).unwrap();
        assert_eq!(result.due, at(2026, 2, 19, 8, 0));
        assert_eq!(result.cleaned_text, "");
    }

    #[test]
    fn test_tomorrow_crosses_month_end() {
        let result = extract("Pay rent tomorrow", at(2026, 2, 28, 20, 0)).unwrap();
        assert_eq!(result.due_local(), "2026-03-01T09:00");
    }

    #[test]
    fn test_tonight_fixes_nine_pm() {
        assert_eq!(due("Watch the game tonight"), "2026-02-18T21:00");
    }

    #[test]
    fn test_tonight_ignores_other_time_phrases() {
        let result = extract("Dinner tonight at 7pm", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-18T21:00");
        // The time phrase is not consumed, so it stays in the text.
        assert_eq!(result.cleaned_text, "Dinner at 7pm");
    }

    // ── weekdays ────────────────────────────────────────────────────────

    #[test]
    fn test_friday_at_3pm() {
        let result = extract("Team meeting Friday at 3pm", now()).unwrap();
        assert_eq!(result.due, at(2026, 2, 20, 15, 0));
        assert_eq!(result.cleaned_text, "Team meeting");
    }

    #[test]
    fn test_friday_from_friday_is_a_week_later() {
        let friday = at(2026, 2, 20, 10, 0);
        assert_eq!(friday.weekday(), Weekday::Fri);
        let result = extract("Friday at 3pm", friday).unwrap();
        assert_eq!(result.due, at(2026, 2, 27, 15, 0));
    }

    #[test]
    fn test_todays_own_weekday_never_resolves_to_today() {
        // now() is a Wednesday
        assert_eq!(due("wednesday standup"), "2026-02-25T09:00");
    }

    #[test]
    fn test_weekday_with_minutes() {
        assert_eq!(due("Dentist monday at 10:15am"), "2026-02-23T10:15");
        assert_eq!(cleaned("Dentist monday at 10:15am"), "Dentist");
    }

    #[test]
    fn test_weekdays_tested_in_calendar_order() {
        // Sunday precedes Thursday in the table, regardless of text position.
        let result = extract("Thursday or Sunday", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-22T09:00");
        assert_eq!(result.cleaned_text, "Thursday or");
    }

    // ── offsets ─────────────────────────────────────────────────────────

    #[test]
    fn test_next_week() {
        let result = extract("Plan sprint next week", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-25T09:00");
        assert_eq!(result.cleaned_text, "Plan sprint");
    }

    #[test]
    fn test_in_n_days_with_time() {
        let result = extract("Submit taxes in 3 days at 5pm", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-21T17:00");
        assert_eq!(result.cleaned_text, "Submit taxes");
    }

    #[test]
    fn test_in_2_hours() {
        let result = extract("in 2 hours", now()).unwrap();
        assert_eq!(result.due, at(2026, 2, 18, 16, 30));
        assert_eq!(result.cleaned_text, "");
    }

    #[test]
    fn test_in_hours_rolls_over_midnight() {
        let late = at(2026, 2, 18, 23, 45);
        let result = extract("Check the oven in 2 hours", late).unwrap();
        assert_eq!(result.due_local(), "2026-02-19T01:45");
        assert_eq!(result.cleaned_text, "Check the oven");
    }

    #[test]
    fn test_in_hours_skips_time_phrases() {
        let result = extract("Call back in 1 hour this afternoon", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-18T15:30");
        assert_eq!(result.cleaned_text, "Call back this afternoon");
    }

    #[test]
    fn test_in_hours_zeroes_seconds() {
        let now = NaiveDate::from_ymd_opt(2026, 2, 18)
            .unwrap()
            .and_hms_milli_opt(8, 5, 59, 750)
            .unwrap();
        let result = extract("in 4 hours", now).unwrap();
        assert_eq!(result.due, at(2026, 2, 18, 12, 5));
    }

    // ── time phrases ────────────────────────────────────────────────────

    #[test]
    fn test_twelve_am_boundary() {
        assert_eq!(due("tomorrow at 12am"), "2026-02-19T00:00");
    }

    #[test]
    fn test_twelve_pm_boundary() {
        assert_eq!(due("tomorrow at 12pm"), "2026-02-19T12:00");
    }

    #[test]
    fn test_bare_clock_without_at() {
        let result = extract("Standup tomorrow 9:45 am sharp", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-19T09:45");
        assert_eq!(result.cleaned_text, "Standup sharp");
    }

    #[test]
    fn test_named_times() {
        assert_eq!(due("tomorrow at noon"), "2026-02-19T12:00");
        assert_eq!(due("tomorrow at midnight"), "2026-02-19T00:00");
        assert_eq!(due("tomorrow afternoon"), "2026-02-19T14:00");
        assert_eq!(due("tomorrow evening"), "2026-02-19T18:00");
        assert_eq!(due("tomorrow night"), "2026-02-19T21:00");
    }

    #[test]
    fn test_clock_beats_named_time() {
        let result = extract("tomorrow morning at 7:30am", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-19T07:30");
        assert_eq!(result.cleaned_text, "morning");
    }

    #[test]
    fn test_invalid_clock_falls_back_to_default() {
        let result = extract("Review tomorrow at 13pm", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-19T09:00");
        assert_eq!(result.cleaned_text, "Review at 13pm");
    }

    #[test]
    fn test_valid_clock_after_invalid_one() {
        let result = extract("Review tomorrow at 13pm or at 4pm", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-19T16:00");
        assert_eq!(result.cleaned_text, "Review at 13pm or");
    }

    #[test]
    fn test_positive_count_after_zero_count() {
        let result = extract("not in 0 days but in 2 days", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-20T09:00");
        assert_eq!(result.cleaned_text, "not in 0 days but");
    }

    #[test]
    fn test_custom_default_time() {
        let options = ExtractOptions {
            default_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        };
        let result = extract_with_options("Ship it today", now(), &options).unwrap();
        assert_eq!(result.due_local(), "2026-02-18T17:00");
    }

    // ── text cleanup ────────────────────────────────────────────────────

    #[test]
    fn test_phrase_at_start_middle_and_end() {
        assert_eq!(cleaned("tomorrow buy milk"), "buy milk");
        assert_eq!(cleaned("buy tomorrow milk"), "buy milk");
        assert_eq!(cleaned("buy milk tomorrow"), "buy milk");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(cleaned("  Email \t Bob   tomorrow   at 3pm  now "), "Email Bob now");
    }

    #[test]
    fn test_only_first_priority_date_is_stripped() {
        let result = extract("Move tomorrow's call to friday today", now()).unwrap();
        // `today` outranks both other date words.
        assert_eq!(result.due_local(), "2026-02-18T09:00");
        assert_eq!(result.cleaned_text, "Move tomorrow's call to friday");
    }

    #[test]
    fn test_only_first_occurrence_is_stripped() {
        let result = extract("tomorrow and tomorrow", now()).unwrap();
        assert_eq!(result.cleaned_text, "and tomorrow");
    }

    #[test]
    fn test_case_preserved_in_remaining_words() {
        let result = extract("Call ACME Corp TOMORROW", now()).unwrap();
        assert_eq!(result.cleaned_text, "Call ACME Corp");
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let upper = extract("Pay Bills TOMORROW AT 3PM", now()).unwrap();
        let lower = extract("Pay Bills tomorrow at 3pm", now()).unwrap();
        assert_eq!(upper.due, lower.due);
        assert_eq!(upper.cleaned_text, lower.cleaned_text);
    }

    #[test]
    fn test_idempotent_on_cleaned_text() {
        for text in [
            "Team meeting Friday at 3pm",
            "tomorrow morning jog",
            "Dinner tonight at 7pm",
            "Pay rent in 3 days",
            "Check the oven in 2 hours",
        ] {
            let first = extract(text, now()).unwrap();
            assert!(
                extract(&first.cleaned_text, now()).is_none(),
                "residual phrase in {:?}",
                first.cleaned_text
            );
        }
    }

    #[test]
    fn test_multibyte_text_around_phrase() {
        let result = extract("Café ☕ tomorrow à 3pm", now()).unwrap();
        assert_eq!(result.due_local(), "2026-02-19T15:00");
        assert_eq!(result.cleaned_text, "Café ☕ à");
    }

    // ── serialization ───────────────────────────────────────────────────

    #[test]
    fn test_extraction_serializes_camel_case() {
        let result = extract("Team meeting Friday at 3pm", now()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "dueDateTimeLocal": "2026-02-20T15:00",
                "cleanedText": "Team meeting",
            })
        );
    }
}
