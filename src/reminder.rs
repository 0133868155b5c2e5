mod dispatcher;
mod local_service;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::event::{Event, EventId};

pub use dispatcher::{ReminderDispatcher, ReminderSender};
pub use local_service::{LocalReminderService, LogDeliveryChannel, ReminderDeliveryChannel};

pub const REMINDER_TITLE: &str = "Event Countdown";

/// A one-shot notification tied to an event. The event id doubles as the
/// reminder identifier, so scheduling an id again replaces the old reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: EventId,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Local>,
}

impl Reminder {
    pub fn for_event(event: &Event) -> Self {
        Self {
            id: event.id(),
            title: REMINDER_TITLE.to_string(),
            body: format!("{} is starting now!", event.title),
            fire_at: event.date,
        }
    }
}

/// The host's local notification facility.
///
/// Calls are made from a background dispatcher; their errors are logged and
/// never reach the event store's callers.
#[async_trait]
pub trait ReminderService: Send + Sync + 'static {
    async fn request_permission(&self) -> anyhow::Result<bool>;
    async fn schedule(&self, reminder: Reminder) -> anyhow::Result<()>;
    async fn cancel(&self, id: EventId) -> anyhow::Result<()>;
}
