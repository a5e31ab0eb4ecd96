//! Ordered phrase tables for due-date extraction.
//!
//! Each table is a list of `(kind, pattern)` pairs evaluated top to bottom;
//! the extractor takes the first entry that matches. All patterns are
//! case-insensitive and anchored on word boundaries, so `"tonight"` never
//! matches the `night` time phrase and `"Tuesdays"` is not a weekday.
//!
//! # Date phrases (priority order)
//!
//! | Phrase | Resolves to |
//! |--------|-------------|
//! | `today` | the reference date |
//! | `tomorrow` | reference date + 1 day |
//! | `tonight` | the reference date at 21:00 (time fixed) |
//! | `sunday` .. `saturday` | next such weekday strictly after today |
//! | `next week` | reference date + 7 days |
//! | `in N days` | reference date + N days |
//! | `in N hours` | reference instant + N hours (time fixed) |
//!
//! # Time phrases (priority order)
//!
//! `at H:MM am|pm`, `at H am|pm`, `H:MM am|pm`, `H am|pm`, `at noon`,
//! `at midnight`, `morning`, `afternoon`, `evening`, `night`.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use regex::{Captures, Regex};

/// Hour assigned by `tonight`.
const TONIGHT_HOUR: u32 = 21;

/// Weekday names in the order they are tested.
const WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Sun, "sunday"),
    (Weekday::Mon, "monday"),
    (Weekday::Tue, "tuesday"),
    (Weekday::Wed, "wednesday"),
    (Weekday::Thu, "thursday"),
    (Weekday::Fri, "friday"),
    (Weekday::Sat, "saturday"),
];

// ── Date phrases ────────────────────────────────────────────────────────────

/// The category of a date phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    Today,
    Tomorrow,
    Tonight,
    Weekday(Weekday),
    NextWeek,
    InDays,
    InHours,
}

/// What a matched date phrase resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateResolution {
    /// A calendar date; the time of day still has to be found.
    Date(NaiveDate),
    /// A complete instant. `tonight` and `in N hours` fix the time themselves.
    Instant(NaiveDateTime),
}

/// A matched phrase: where it sits in the searched text and what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch<T> {
    pub span: Range<usize>,
    pub value: T,
}

/// One row of the date-phrase table.
#[derive(Debug)]
pub struct DatePhrase {
    kind: DateKind,
    pattern: Regex,
}

impl DatePhrase {
    fn new(kind: DateKind, pattern: &str) -> Self {
        Self {
            kind,
            pattern: compile(pattern),
        }
    }

    pub fn kind(&self) -> DateKind {
        self.kind
    }

    /// Find the first occurrence of this phrase in `text` that resolves
    /// against `now`.
    ///
    /// An occurrence whose count is zero or pushes the date past the calendar
    /// range is skipped in favour of later ones. Returns `None` when no
    /// occurrence resolves.
    pub fn resolve(&self, text: &str, now: NaiveDateTime) -> Option<PhraseMatch<DateResolution>> {
        self.pattern.captures_iter(text).find_map(|caps| {
            let span = caps.get(0)?.range();
            let value = self.resolve_captures(&caps, now)?;
            Some(PhraseMatch { span, value })
        })
    }

    fn resolve_captures(&self, caps: &Captures<'_>, now: NaiveDateTime) -> Option<DateResolution> {
        let today = now.date();

        let value = match self.kind {
            DateKind::Today => DateResolution::Date(today),
            DateKind::Tomorrow => DateResolution::Date(today.succ_opt()?),
            DateKind::Tonight => {
                let time = NaiveTime::from_hms_opt(TONIGHT_HOUR, 0, 0)?;
                DateResolution::Instant(today.and_time(time))
            }
            DateKind::Weekday(target) => DateResolution::Date(next_weekday(today, target)?),
            DateKind::NextWeek => DateResolution::Date(today.checked_add_days(Days::new(7))?),
            DateKind::InDays => {
                let n = positive_count(caps)?;
                DateResolution::Date(today.checked_add_days(Days::new(n))?)
            }
            DateKind::InHours => {
                let n = i64::try_from(positive_count(caps)?).ok()?;
                let shifted = now.checked_add_signed(chrono::Duration::try_hours(n)?)?;
                DateResolution::Instant(truncate_to_minute(shifted)?)
            }
        };

        Some(value)
    }
}

/// The date-phrase table in priority order.
pub static DATE_PHRASES: LazyLock<Vec<DatePhrase>> = LazyLock::new(|| {
    let mut table = vec![
        DatePhrase::new(DateKind::Today, r"\btoday\b"),
        DatePhrase::new(DateKind::Tomorrow, r"\btomorrow\b"),
        DatePhrase::new(DateKind::Tonight, r"\btonight\b"),
    ];
    table.extend(
        WEEKDAYS
            .iter()
            .map(|(day, name)| DatePhrase::new(DateKind::Weekday(*day), &format!(r"\b{name}\b"))),
    );
    table.extend([
        DatePhrase::new(DateKind::NextWeek, r"\bnext\s+week\b"),
        DatePhrase::new(DateKind::InDays, r"\bin\s+(?P<count>\d+)\s+days?\b"),
        DatePhrase::new(DateKind::InHours, r"\bin\s+(?P<count>\d+)\s+hours?\b"),
    ]);
    table
});

// ── Time phrases ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeKind {
    /// 12-hour clock with `hour`, optional `minute` and `meridiem` groups.
    Clock,
    /// A fixed time of day ("at noon", "evening").
    Named { hour: u32, minute: u32 },
}

/// One row of the time-phrase table.
#[derive(Debug)]
pub struct TimePhrase {
    label: &'static str,
    kind: TimeKind,
    pattern: Regex,
}

impl TimePhrase {
    fn clock(label: &'static str, pattern: &str) -> Self {
        Self {
            label,
            kind: TimeKind::Clock,
            pattern: compile(pattern),
        }
    }

    fn named(label: &'static str, pattern: &str, hour: u32, minute: u32) -> Self {
        Self {
            label,
            kind: TimeKind::Named { hour, minute },
            pattern: compile(pattern),
        }
    }

    /// Short human-readable name of the pattern, used in log events.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Find the first occurrence of this phrase in `text` that converts to a
    /// valid time of day.
    ///
    /// A clock reading outside 1–12 hours or 0–59 minutes is skipped and the
    /// search continues with later occurrences.
    pub fn resolve(&self, text: &str) -> Option<PhraseMatch<NaiveTime>> {
        self.pattern.captures_iter(text).find_map(|caps| {
            let span = caps.get(0)?.range();
            let value = match self.kind {
                TimeKind::Clock => clock_time(&caps)?,
                TimeKind::Named { hour, minute } => NaiveTime::from_hms_opt(hour, minute, 0)?,
            };
            Some(PhraseMatch { span, value })
        })
    }
}

/// The time-phrase table in priority order.
pub static TIME_PHRASES: LazyLock<Vec<TimePhrase>> = LazyLock::new(|| {
    vec![
        TimePhrase::clock(
            "at h:mm am/pm",
            r"\bat\s+(?P<hour>\d{1,2}):(?P<minute>\d{2})\s*(?P<meridiem>am|pm)\b",
        ),
        TimePhrase::clock(
            "at h am/pm",
            r"\bat\s+(?P<hour>\d{1,2})\s*(?P<meridiem>am|pm)\b",
        ),
        TimePhrase::clock(
            "h:mm am/pm",
            r"\b(?P<hour>\d{1,2}):(?P<minute>\d{2})\s*(?P<meridiem>am|pm)\b",
        ),
        TimePhrase::clock("h am/pm", r"\b(?P<hour>\d{1,2})\s*(?P<meridiem>am|pm)\b"),
        TimePhrase::named("at noon", r"\bat\s+noon\b", 12, 0),
        TimePhrase::named("at midnight", r"\bat\s+midnight\b", 0, 0),
        TimePhrase::named("morning", r"\bmorning\b", 8, 0),
        TimePhrase::named("afternoon", r"\bafternoon\b", 14, 0),
        TimePhrase::named("evening", r"\bevening\b", 18, 0),
        TimePhrase::named("night", r"\bnight\b", 21, 0),
    ]
});

// ── Helpers ─────────────────────────────────────────────────────────────────

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("phrase table patterns are valid regexes")
}

/// Next occurrence of `target` strictly after `from`.
fn next_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let ahead = (7 + target.num_days_from_sunday() - from.weekday().num_days_from_sunday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    from.checked_add_days(Days::new(u64::from(ahead)))
}

/// The `count` group as a positive integer.
fn positive_count(caps: &Captures<'_>) -> Option<u64> {
    caps.name("count")?
        .as_str()
        .parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
}

/// Convert a 12-hour clock capture to a 24-hour time.
fn clock_time(caps: &Captures<'_>) -> Option<NaiveTime> {
    let hour: u32 = caps.name("hour")?.as_str().parse().ok()?;
    let minute: u32 = match caps.name("minute") {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let is_pm = caps.name("meridiem")?.as_str().eq_ignore_ascii_case("pm");

    if !(1..=12).contains(&hour) {
        return None;
    }

    let hour24 = match (hour, is_pm) {
        (12, true) => 12,
        (12, false) => 0,
        (h, true) => h + 12,
        (h, false) => h,
    };

    NaiveTime::from_hms_opt(hour24, minute, 0)
}

/// Drop seconds and sub-second precision.
pub(crate) fn truncate_to_minute(dt: NaiveDateTime) -> Option<NaiveDateTime> {
    dt.with_second(0)?.with_nanosecond(0)
}

// ── Tests ───────────────────────────────────────────────────────────────────
