use chrono::{DateTime, TimeZone};

use super::shift_calendar_days;

/// Countdown breakdown for a single event, recomputed on every tick.
///
/// `days` counts calendar days in the event's time zone, so a day spanning a
/// daylight-saving change is 23 or 25 hours long. The remaining fields are the
/// exact duration left after those days; `hours` is always below 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub has_passed: bool,
}

impl TimeRemaining {
    pub fn new(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
            has_passed: false,
        }
    }

    pub fn passed() -> Self {
        Self {
            has_passed: true,
            ..Self::default()
        }
    }

    pub fn between<Tz: TimeZone>(now: &DateTime<Tz>, date: &DateTime<Tz>) -> Self {
        if date <= now {
            return Self::passed();
        }

        let total_days = date.clone().signed_duration_since(now).num_days().max(0) as u64;
        let shifted = |days: u64| shift_calendar_days(now, days);

        let mut days = total_days;
        while days > 0 && shifted(days).is_none_or(|anchor| anchor > *date) {
            days -= 1;
        }
        while shifted(days + 1).is_some_and(|anchor| anchor <= *date) {
            days += 1;
        }

        let anchor = match days {
            0 => now.clone(),
            _ => shifted(days).unwrap_or_else(|| now.clone()),
        };
        let rest = date.clone().signed_duration_since(&anchor).num_seconds().max(0) as u64;
        // The extra hour of a 25-hour day can leave a full day in `rest`.
        let days = days + rest / 86_400;
        let rest = rest % 86_400;

        Self::new(days, rest / 3_600, rest % 3_600 / 60, rest % 60)
    }

    pub fn total_seconds(&self) -> u64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }

    pub fn formatted(&self) -> String {
        if self.has_passed {
            return "Event passed".to_string();
        }

        if self.days > 0 {
            format!("{}d {}h {}m", self.days, self.hours, self.minutes)
        } else if self.hours > 0 {
            format!("{}h {}m {}s", self.hours, self.minutes, self.seconds)
        } else if self.minutes > 0 {
            format!("{}m {}s", self.minutes, self.seconds)
        } else {
            format!("{}s", self.seconds)
        }
    }

    pub fn detailed_formatted(&self) -> String {
        if self.has_passed {
            return "Event has already occurred".to_string();
        }

        let mut parts = Vec::with_capacity(4);
        for (value, unit) in [
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
        ] {
            if value > 0 {
                parts.push(pluralize(value, unit));
            }
        }
        if self.seconds > 0 || parts.is_empty() {
            parts.push(pluralize(self.seconds, "second"));
        }

        parts.join(" ")
    }
}

fn pluralize(value: u64, unit: &str) -> String {
    if value == 1 {
        format!("{value} {unit}")
    } else {
        format!("{value} {unit}s")
    }
}
