mod palette;
mod time_remaining;


use std::{fmt, hash::Hash};

use chrono::{DateTime, Days, Local, Offset, TimeDelta, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use palette::{AVAILABLE_ICONS, DEFAULT_ICON, EventColor};
pub use time_remaining::TimeRemaining;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EventId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// A user-defined countdown target.
///
/// Two events are equal iff their ids are equal. An edited event is a new value
/// carrying the old id, so equality survives edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    id: EventId,
    pub title: String,
    pub date: DateTime<Local>,
    pub color_name: String,
    pub icon_name: String,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        date: DateTime<Local>,
        color_name: impl Into<String>,
        icon_name: impl Into<String>,
    ) -> Self {
        Self::with_id(EventId::new(), title, date, color_name, icon_name)
    }

    pub fn with_id(
        id: EventId,
        title: impl Into<String>,
        date: DateTime<Local>,
        color_name: impl Into<String>,
        icon_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            date,
            color_name: color_name.into(),
            icon_name: icon_name.into(),
        }
    }

    /// Blue, with the calendar icon.
    pub fn with_defaults(title: impl Into<String>, date: DateTime<Local>) -> Self {
        Self::new(title, date, EventColor::default().name(), DEFAULT_ICON)
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn color(&self) -> EventColor {
        EventColor::resolve(&self.color_name)
    }

    pub fn has_passed(&self, now: DateTime<Local>) -> bool {
        self.date <= now
    }

    pub fn time_remaining(&self, now: DateTime<Local>) -> TimeRemaining {
        TimeRemaining::between(&now, &self.date)
    }

    pub fn formatted_date(&self) -> String {
        self.date.format("%B %-d, %Y at %-I:%M %p").to_string()
    }

    pub fn relative_date_string(&self, now: DateTime<Local>) -> String {
        relative_phrase(self.date.signed_duration_since(now))
    }

    pub fn is_today(&self, now: DateTime<Local>) -> bool {
        self.date.date_naive() == now.date_naive()
    }

    pub fn is_tomorrow(&self, now: DateTime<Local>) -> bool {
        now.date_naive().succ_opt() == Some(self.date.date_naive())
    }

    pub fn is_this_week(&self, now: DateTime<Local>) -> bool {
        let week_from_now = add_calendar_days(&now, 7);
        self.date > now && self.date <= week_from_now
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Same wall-clock time `days` calendar days later. See [`shift_calendar_days`]
/// for how daylight-saving gaps and overlaps resolve; out-of-range results
/// leave `from` unchanged.
pub(crate) fn add_calendar_days<Tz: TimeZone>(from: &DateTime<Tz>, days: u64) -> DateTime<Tz> {
    shift_calendar_days(from, days).unwrap_or_else(|| from.clone())
}

/// Same wall-clock time `days` calendar days later, or `None` past the end of
/// the representable range.
///
/// A repeated local time resolves to its earlier instant. A skipped local time
/// is read with the offset in force a day earlier, landing just after the gap.
/// The result is strictly increasing in `days`.
pub(crate) fn shift_calendar_days<Tz: TimeZone>(
    from: &DateTime<Tz>,
    days: u64,
) -> Option<DateTime<Tz>> {
    let timezone = from.timezone();
    let naive = from.naive_local().checked_add_days(Days::new(days))?;

    if let Some(shifted) = timezone.from_local_datetime(&naive).earliest() {
        return Some(shifted);
    }

    let offset_before_gap = naive
        .checked_sub_days(Days::new(1))
        .and_then(|day_before| timezone.from_local_datetime(&day_before).earliest())
        .map_or_else(|| from.offset().fix(), |day_before| day_before.offset().fix());
    let utc = naive.checked_sub_signed(TimeDelta::seconds(i64::from(
        offset_before_gap.local_minus_utc(),
    )))?;
    Some(timezone.from_utc_datetime(&utc))
}

const RELATIVE_UNITS: [(&str, u64); 7] = [
    ("year", 365 * 86_400),
    ("month", 30 * 86_400),
    ("week", 7 * 86_400),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

fn relative_phrase(delta: TimeDelta) -> String {
    let seconds = delta.num_seconds();
    if seconds == 0 {
        return "now".to_string();
    }

    let magnitude = seconds.unsigned_abs();
    let (unit, value) = RELATIVE_UNITS
        .iter()
        .find(|(_, size)| magnitude >= *size)
        .map(|(unit, size)| (*unit, magnitude / size))
        .unwrap_or(("second", magnitude));

    let phrase = format!("{value} {unit}{}", if value == 1 { "" } else { "s" });
    if seconds > 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}
