mod samples;
mod ticker;


use std::{
    collections::{BTreeSet, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Local};
use tokio::sync::watch;

use crate::{
    appsettings::StoreSettings,
    clock::Clock,
    event::{Event, EventId},
    reminder::{Reminder, ReminderDispatcher, ReminderService},
    storage::{KeyValueStorage, decode_events, encode_events},
};

use samples::SAMPLE_EVENTS;
use ticker::Ticker;

/// Owns the event collection.
///
/// The collection is kept sorted ascending by date with unique ids. Every
/// mutation persists the whole collection, publishes it to subscribers and
/// enqueues the matching reminder calls before returning. Mutations never wait
/// on the reminder service and are applied one at a time, whichever thread
/// they come from.
///
/// Must be created inside a tokio runtime; call [`EventStore::dispose`] to
/// stop the countdown tick and drain pending reminder calls.
pub struct EventStore {
    events: watch::Sender<Vec<Event>>,
    now: watch::Receiver<DateTime<Local>>,
    storage: Arc<dyn KeyValueStorage>,
    storage_key: String,
    clock: Arc<dyn Clock>,
    reminders: ReminderDispatcher,
    ticker: Option<Ticker>,
}

impl EventStore {
    pub fn init(
        settings: &StoreSettings,
        storage: Arc<dyn KeyValueStorage>,
        reminder_service: Arc<dyn ReminderService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = watch::channel(Vec::new());
        let (now_sender, now) = watch::channel(clock.now());

        let mut store = Self {
            events,
            now,
            storage,
            storage_key: settings.storage_key.clone(),
            clock: Arc::clone(&clock),
            reminders: ReminderDispatcher::start(reminder_service),
            ticker: None,
        };

        match store.load() {
            Some(events) => {
                log::info!("Loaded {} saved events", events.len());
                store.events.send_replace(events);
            }
            None if settings.bootstrap_samples => store.add_sample_events(),
            None => log::info!("Starting with an empty event list"),
        }

        store.ticker = Some(Ticker::start(now_sender, clock, settings.tick_interval()));
        store.reminders.sender().request_permission();

        store
    }

    /// Stops the countdown tick and waits for enqueued reminder calls to finish.
    pub async fn dispose(self) {
        let Self {
            ticker, reminders, ..
        } = self;
        if let Some(ticker) = ticker {
            ticker.stop().await;
        }
        reminders.shutdown().await;
        log::info!("Event store disposed");
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Event>> {
        self.events.subscribe()
    }

    /// The display time, refreshed on every countdown tick.
    pub fn now(&self) -> DateTime<Local> {
        *self.now.borrow()
    }

    pub fn subscribe_now(&self) -> watch::Receiver<DateTime<Local>> {
        self.now.clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<Event> {
        self.events.borrow().iter().find(|event| event.id() == id).cloned()
    }

    pub fn upcoming_events(&self, now: DateTime<Local>) -> Vec<Event> {
        self.filtered(|event| !event.has_passed(now))
    }

    pub fn past_events(&self, now: DateTime<Local>) -> Vec<Event> {
        self.filtered(|event| event.has_passed(now))
    }

    pub fn next_event(&self, now: DateTime<Local>) -> Option<Event> {
        self.events
            .borrow()
            .iter()
            .find(|event| !event.has_passed(now))
            .cloned()
    }

    pub fn add_event(
        &self,
        title: impl Into<String>,
        date: DateTime<Local>,
        color_name: impl Into<String>,
        icon_name: impl Into<String>,
    ) -> Event {
        let event = Event::new(title, date, color_name, icon_name);
        log::info!("Adding event {} \"{}\" at {}", event.id(), event.title, event.date);

        self.events.send_if_modified(|events| {
            events.push(event.clone());
            self.commit(events);
            self.schedule_reminder(&event);
            true
        });

        event
    }

    /// Replaces the event with the same id as `existing`. Returns `None` and
    /// changes nothing when no such event is stored.
    pub fn update_event(
        &self,
        existing: &Event,
        title: impl Into<String>,
        date: DateTime<Local>,
        color_name: impl Into<String>,
        icon_name: impl Into<String>,
    ) -> Option<Event> {
        let id = existing.id();
        let mut updated = None;

        self.events.send_if_modified(|events| {
            let Some(slot) = events.iter_mut().find(|event| event.id() == id) else {
                return false;
            };
            *slot = Event::with_id(id, title, date, color_name, icon_name);
            let event = slot.clone();
            log::info!("Updating event {id} \"{}\" at {}", event.title, event.date);

            self.commit(events);
            self.reschedule_reminder(&event);
            updated = Some(event);
            true
        });

        if updated.is_none() {
            log::debug!("Ignoring update of unknown event {id}");
        }
        updated
    }

    /// Removes every stored event with the id of `event` and cancels its reminder.
    pub fn delete_event(&self, event: &Event) {
        let id = event.id();

        let removed = self.events.send_if_modified(|events| {
            let before = events.len();
            events.retain(|stored| stored.id() != id);
            let removed = events.len() != before;
            if removed {
                self.commit(events);
            }
            self.reminders.sender().cancel(id);
            removed
        });

        if removed {
            log::info!("Deleted event {id}");
        } else {
            log::debug!("Ignoring delete of unknown event {id}");
        }
    }

    /// Removes events by their position in the current sorted list and cancels
    /// their reminders. Out-of-range positions are ignored.
    pub fn delete_events_at(&self, positions: impl IntoIterator<Item = usize>) -> Vec<Event> {
        let positions: BTreeSet<usize> = positions.into_iter().collect();
        let mut removed = Vec::new();

        self.events.send_if_modified(|events| {
            let mut position = 0;
            events.retain(|event| {
                let keep = !positions.contains(&position);
                position += 1;
                if !keep {
                    removed.push(event.clone());
                }
                keep
            });

            if removed.is_empty() {
                return false;
            }
            self.commit(events);
            for event in &removed {
                self.reminders.sender().cancel(event.id());
            }
            true
        });

        if !removed.is_empty() {
            log::info!("Deleted {} events by position", removed.len());
        }
        removed
    }

    fn filtered(&self, predicate: impl Fn(&Event) -> bool) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|event| predicate(event))
            .cloned()
            .collect()
    }

    /// Runs under the collection's write lock, so concurrent mutations persist
    /// and enqueue reminder calls in the order they are applied.
    fn commit(&self, events: &mut [Event]) {
        events.sort_by_key(|event| event.date);
        self.persist(events);
    }

    fn persist(&self, events: &[Event]) {
        let result = encode_events(events)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| self.storage.store(&self.storage_key, &bytes));

        if let Err(error) = result {
            log::error!("Could not save events: {error:#}");
        }
    }

    fn load(&self) -> Option<Vec<Event>> {
        let bytes = match self.storage.load(&self.storage_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                log::info!("No saved events under {}", self.storage_key);
                return None;
            }
            Err(error) => {
                log::warn!("Could not load saved events: {error:#}");
                return None;
            }
        };

        match decode_events(&bytes) {
            Ok(events) => Some(dedup_by_id(events)),
            Err(error) => {
                log::warn!("Saved events are unreadable, starting over: {error}");
                None
            }
        }
    }

    fn add_sample_events(&self) {
        let now = self.clock.now();
        log::info!("Adding sample events");
        for sample in &SAMPLE_EVENTS {
            self.add_event(
                sample.title,
                sample.date(now),
                sample.color.name(),
                sample.icon_name,
            );
        }
    }

    fn schedule_reminder(&self, event: &Event) {
        if event.has_passed(self.clock.now()) {
            log::debug!("Not scheduling a reminder for past event {}", event.id());
            return;
        }
        self.reminders.sender().schedule(Reminder::for_event(event));
    }

    fn reschedule_reminder(&self, event: &Event) {
        if event.has_passed(self.clock.now()) {
            self.reminders.sender().cancel(event.id());
        } else {
            self.reminders.sender().reschedule(Reminder::for_event(event));
        }
    }
}

fn dedup_by_id(events: Vec<Event>) -> Vec<Event> {
    let mut seen = HashSet::new();
    let total = events.len();
    let unique: Vec<Event> = events
        .into_iter()
        .filter(|event| seen.insert(event.id()))
        .collect();

    if unique.len() != total {
        log::warn!("Dropped {} saved events with duplicate ids", total - unique.len());
    }
    unique
}
