use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta};

use crate::{
    clock::Clock,
    event::EventId,
    reminder::{Reminder, ReminderService},
    storage::KeyValueStorage,
};

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.lock() = now;
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock() += delta;
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Local>> {
        self.now.lock().unwrap()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.lock()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderCall {
    RequestPermission,
    Schedule(Reminder),
    Cancel(EventId),
}

/// Records every call; optionally fails each one after recording it.
#[derive(Default)]
pub struct RecordingReminderService {
    calls: Mutex<Vec<ReminderCall>>,
    fail: bool,
}

impl RecordingReminderService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ReminderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn scheduled_ids(&self) -> Vec<EventId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ReminderCall::Schedule(reminder) => Some(reminder.id),
                _ => None,
            })
            .collect()
    }

    pub fn cancelled_ids(&self) -> Vec<EventId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ReminderCall::Cancel(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ReminderCall) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            anyhow::bail!("Reminder service unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ReminderService for RecordingReminderService {
    async fn request_permission(&self) -> anyhow::Result<bool> {
        self.record(ReminderCall::RequestPermission)?;
        Ok(true)
    }

    async fn schedule(&self, reminder: Reminder) -> anyhow::Result<()> {
        self.record(ReminderCall::Schedule(reminder))
    }

    async fn cancel(&self, id: EventId) -> anyhow::Result<()> {
        self.record(ReminderCall::Cancel(id))
    }
}

pub struct FailingStorage;

impl KeyValueStorage for FailingStorage {
    fn store(&self, _key: &str, _bytes: &[u8]) -> anyhow::Result<()> {
        anyhow::bail!("Disk full")
    }

    fn load(&self, _key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        anyhow::bail!("Permission denied")
    }
}

mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn manual_clock_moves_only_when_told() {
        let start = Local.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).single().unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(TimeDelta::minutes(90));
        assert_eq!(clock.now(), start + TimeDelta::minutes(90));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
