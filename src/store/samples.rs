use chrono::{DateTime, Local, TimeZone};

use crate::event::{EventColor, add_calendar_days};

pub(crate) struct SampleEvent {
    pub title: &'static str,
    pub days_from_now: u64,
    pub hour: u32,
    pub minute: u32,
    pub color: EventColor,
    pub icon_name: &'static str,
}

/// Seeded on first run, when nothing has been saved yet.
pub(crate) const SAMPLE_EVENTS: [SampleEvent; 3] = [
    SampleEvent {
        title: "Meeting with Team",
        days_from_now: 1,
        hour: 14,
        minute: 30,
        color: EventColor::Blue,
        icon_name: "briefcase",
    },
    SampleEvent {
        title: "Movie Night",
        days_from_now: 3,
        hour: 20,
        minute: 0,
        color: EventColor::Purple,
        icon_name: "film",
    },
    SampleEvent {
        title: "Birthday Party",
        days_from_now: 7,
        hour: 19,
        minute: 0,
        color: EventColor::Pink,
        icon_name: "birthday.cake",
    },
];

impl SampleEvent {
    /// The sample's wall-clock time on its day. When that local time does not
    /// exist the unadjusted day offset is used.
    pub(crate) fn date(&self, now: DateTime<Local>) -> DateTime<Local> {
        let day = add_calendar_days(&now, self.days_from_now);
        day.date_naive()
            .and_hms_opt(self.hour, self.minute, 0)
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .unwrap_or(day)
    }
}
