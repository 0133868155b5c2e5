//! The editable form behind "new event" and "edit event" screens.
//!
//! The store accepts any title; rejecting blank titles is this layer's job.

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::{
    event::{DEFAULT_ICON, Event, EventColor, add_calendar_days},
    store::EventStore,
};

pub const QUICK_ADD_TITLE: &str = "New Event";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Event title must not be empty")]
    EmptyTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickDate {
    Tomorrow,
    NextWeek,
    ThirtyDays,
    NextYear,
}

impl QuickDate {
    pub const ALL: [QuickDate; 4] = [
        QuickDate::Tomorrow,
        QuickDate::NextWeek,
        QuickDate::ThirtyDays,
        QuickDate::NextYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QuickDate::Tomorrow => "Tomorrow",
            QuickDate::NextWeek => "Next Week",
            QuickDate::ThirtyDays => "30 Days",
            QuickDate::NextYear => "Next Year",
        }
    }

    pub fn days(self) -> u64 {
        match self {
            QuickDate::Tomorrow => 1,
            QuickDate::NextWeek => 7,
            QuickDate::ThirtyDays => 30,
            QuickDate::NextYear => 365,
        }
    }

    pub fn date_from(self, now: DateTime<Local>) -> DateTime<Local> {
        add_calendar_days(&now, self.days())
    }

    fn quick_add_style(self) -> (EventColor, &'static str) {
        match self {
            QuickDate::Tomorrow => (EventColor::Orange, "sun.max"),
            QuickDate::NextWeek => (EventColor::Blue, "calendar"),
            QuickDate::ThirtyDays => (EventColor::Purple, "calendar.badge.clock"),
            QuickDate::NextYear => (EventColor::Teal, "sparkles"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: DateTime<Local>,
    pub color_name: String,
    pub icon_name: String,
}

impl EventDraft {
    /// Blank draft for tomorrow at the current time.
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            title: String::new(),
            date: QuickDate::Tomorrow.date_from(now),
            color_name: EventColor::default().name().to_string(),
            icon_name: DEFAULT_ICON.to_string(),
        }
    }

    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date,
            color_name: event.color_name.clone(),
            icon_name: event.icon_name.clone(),
        }
    }

    pub fn quick_add(quick_date: QuickDate, now: DateTime<Local>) -> Self {
        let (color, icon_name) = quick_date.quick_add_style();
        Self {
            title: QUICK_ADD_TITLE.to_string(),
            date: quick_date.date_from(now),
            color_name: color.name().to_string(),
            icon_name: icon_name.to_string(),
        }
    }

    pub fn apply_quick_date(&mut self, quick_date: QuickDate, now: DateTime<Local>) {
        self.date = quick_date.date_from(now);
    }

    pub fn validated_title(&self) -> Result<&str, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        Ok(title)
    }

    pub fn is_valid(&self) -> bool {
        self.validated_title().is_ok()
    }

    /// Adds the draft as a new event, or replaces `editing` when given.
    /// Returns `Ok(None)` if `editing` is no longer in the store.
    pub fn save_into(
        &self,
        store: &EventStore,
        editing: Option<&Event>,
    ) -> Result<Option<Event>, DraftError> {
        let title = self.validated_title()?;
        let saved = match editing {
            Some(existing) => store.update_event(
                existing,
                title,
                self.date,
                self.color_name.as_str(),
                self.icon_name.as_str(),
            ),
            None => Some(store.add_event(
                title,
                self.date,
                self.color_name.as_str(),
                self.icon_name.as_str(),
            )),
        };
        Ok(saved)
    }
}
