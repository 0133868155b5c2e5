use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use chrono::TimeDelta;
use tokio::{
    sync::RwLock,
    task::{self, JoinHandle},
};
use tokio_util::sync::CancellationToken;

use crate::{clock::Clock, event::EventId};

use super::{Reminder, ReminderService};

#[async_trait]
pub trait ReminderDeliveryChannel: Send + Sync + 'static {
    async fn deliver(&self, reminder: &Reminder);
}

pub struct LogDeliveryChannel;

#[async_trait]
impl ReminderDeliveryChannel for LogDeliveryChannel {
    async fn deliver(&self, reminder: &Reminder) {
        log::info!("🔔 {}: {}", reminder.title, reminder.body);
    }
}

struct ScheduledTask {
    task: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ScheduledTask {
    fn cancel(self) {
        self.cancellation_token.cancel();
    }
}

type ReminderTaskStore = RwLock<HashMap<EventId, ScheduledTask>>;

/// Fires one-shot reminders from inside the process, one task per event id.
///
/// Reminders are armed whether or not permission has been granted; at fire
/// time a reminder without permission is dropped with a warning.
pub struct LocalReminderService {
    tasks: Arc<ReminderTaskStore>,
    delivery_channel: Arc<dyn ReminderDeliveryChannel>,
    clock: Arc<dyn Clock>,
    enabled: bool,
    permission_granted: Arc<AtomicBool>,
}

impl LocalReminderService {
    pub fn new(
        delivery_channel: Arc<dyn ReminderDeliveryChannel>,
        clock: Arc<dyn Clock>,
        enabled: bool,
    ) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            delivery_channel,
            clock,
            enabled,
            permission_granted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn pending_count(&self) -> usize {
        let mut tasks = self.tasks.write().await;
        clean_finished_tasks(&mut tasks);
        tasks.len()
    }

    pub async fn is_pending(&self, id: EventId) -> bool {
        self.tasks
            .read()
            .await
            .get(&id)
            .is_some_and(|scheduled| !scheduled.task.is_finished())
    }

    fn create_reminder_task(
        &self,
        reminder: Reminder,
        delay: std::time::Duration,
    ) -> ScheduledTask {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();
        let delivery_channel = Arc::clone(&self.delivery_channel);
        let permission_granted = Arc::clone(&self.permission_granted);

        let task = task::spawn(async move {
            tokio::select! {
                _ = task_cancellation_token.cancelled() => {
                    log::debug!("Reminder {} was cancelled", reminder.id);
                }
                _ = tokio::time::sleep(delay) => {
                    if permission_granted.load(Ordering::SeqCst) {
                        delivery_channel.deliver(&reminder).await;
                    } else {
                        log::warn!("Reminder {} fired without permission, dropping it", reminder.id);
                    }
                }
            }
        });

        ScheduledTask {
            task,
            cancellation_token,
        }
    }
}

#[async_trait]
impl ReminderService for LocalReminderService {
    async fn request_permission(&self) -> anyhow::Result<bool> {
        self.permission_granted.store(self.enabled, Ordering::SeqCst);
        Ok(self.enabled)
    }

    async fn schedule(&self, reminder: Reminder) -> anyhow::Result<()> {
        let id = reminder.id;
        let delta = reminder.fire_at - self.clock.now();
        if delta <= TimeDelta::zero() {
            anyhow::bail!("Fire time {} is not in the future", reminder.fire_at);
        }
        let delay = delta.to_std()?;

        let mut tasks = self.tasks.write().await;
        clean_finished_tasks(&mut tasks);
        if let Some(previous) = tasks.remove(&id) {
            log::debug!("Replacing pending reminder {id}");
            previous.cancel();
        }

        log::info!("Arming reminder {id} in {}s", delay.as_secs());
        let scheduled = self.create_reminder_task(reminder, delay);
        tasks.insert(id, scheduled);

        Ok(())
    }

    async fn cancel(&self, id: EventId) -> anyhow::Result<()> {
        if let Some(scheduled) = self.tasks.write().await.remove(&id) {
            scheduled.cancel();
        }
        Ok(())
    }
}

impl Drop for LocalReminderService {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.tasks.try_write() {
            for (_, scheduled) in tasks.drain() {
                scheduled.cancel();
            }
        }
    }
}

fn clean_finished_tasks(tasks: &mut HashMap<EventId, ScheduledTask>) {
    let before = tasks.len();
    tasks.retain(|_, scheduled| !scheduled.task.is_finished());
    let after = tasks.len();

    if before != after {
        log::debug!("Cleaned up {} finished reminder tasks", before - after);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use chrono::{DateTime, Local, TimeZone};

    use crate::{event::Event, test_utils::ManualClock};

    use super::*;

    type Delivered = Arc<Mutex<Vec<Reminder>>>;

    struct TestDeliveryChannel {
        delivered: Delivered,
    }

    #[async_trait]
    impl ReminderDeliveryChannel for TestDeliveryChannel {
        async fn deliver(&self, reminder: &Reminder) {
            self.delivered.lock().unwrap().push(reminder.clone());
        }
    }

    struct TestContext {
        delivered: Delivered,
        service: LocalReminderService,
        now: DateTime<Local>,
    }

    impl TestContext {
        fn new(enabled: bool) -> Self {
            let now = Local.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).single().unwrap();
            let delivered = Arc::new(Mutex::new(Vec::new()));
            let channel = TestDeliveryChannel {
                delivered: Arc::clone(&delivered),
            };
            let service =
                LocalReminderService::new(Arc::new(channel), Arc::new(ManualClock::new(now)), enabled);

            Self {
                delivered,
                service,
                now,
            }
        }

        fn reminder_in(&self, delta: TimeDelta) -> Reminder {
            Reminder::for_event(&Event::with_defaults("Standup", self.now + delta))
        }

        fn delivered(&self) -> Vec<Reminder> {
            self.delivered.lock().unwrap().clone()
        }
    }

    async fn wait(delta: TimeDelta) {
        tokio::time::sleep(delta.to_std().unwrap() + Duration::from_secs(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn fires_at_the_reminder_time() {
        let ctx = TestContext::new(true);
        ctx.service.request_permission().await.unwrap();
        let reminder = ctx.reminder_in(TimeDelta::minutes(5));

        ctx.service.schedule(reminder.clone()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(299)).await;
        assert!(ctx.delivered().is_empty());

        wait(TimeDelta::seconds(1)).await;
        assert_eq!(ctx.delivered(), vec![reminder]);
        assert_eq!(ctx.service.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reminder_never_fires() {
        let ctx = TestContext::new(true);
        ctx.service.request_permission().await.unwrap();
        let reminder = ctx.reminder_in(TimeDelta::minutes(5));

        ctx.service.schedule(reminder.clone()).await.unwrap();
        assert!(ctx.service.is_pending(reminder.id).await);
        ctx.service.cancel(reminder.id).await.unwrap();

        wait(TimeDelta::minutes(5)).await;
        assert!(ctx.delivered().is_empty());
        assert!(!ctx.service.is_pending(reminder.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduling_same_id_replaces_previous_reminder() {
        let ctx = TestContext::new(true);
        ctx.service.request_permission().await.unwrap();
        let early = ctx.reminder_in(TimeDelta::minutes(1));
        let late = Reminder {
            fire_at: ctx.now + TimeDelta::minutes(10),
            ..early.clone()
        };

        ctx.service.schedule(early).await.unwrap();
        ctx.service.schedule(late.clone()).await.unwrap();

        wait(TimeDelta::minutes(10)).await;
        assert_eq!(ctx.delivered(), vec![late]);
    }

    #[tokio::test(start_paused = true)]
    async fn past_fire_time_is_rejected() {
        let ctx = TestContext::new(true);

        let result = ctx.service.schedule(ctx.reminder_in(TimeDelta::minutes(-1))).await;

        assert!(result.is_err());
        assert_eq!(ctx.service.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn denied_permission_drops_reminder_at_fire_time() {
        let ctx = TestContext::new(false);
        assert!(!ctx.service.request_permission().await.unwrap());

        ctx.service
            .schedule(ctx.reminder_in(TimeDelta::seconds(30)))
            .await
            .unwrap();
        wait(TimeDelta::seconds(30)).await;

        assert!(ctx.delivered().is_empty());
    }
}
