use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Local};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::clock::Clock;

/// Periodically publishes the clock's current time for countdown rendering.
/// Dropping the ticker stops it.
pub(crate) struct Ticker {
    guard: DropGuard,
    task: JoinHandle<()>,
}

impl Ticker {
    pub(crate) fn start(
        sender: watch::Sender<DateTime<Local>>,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> Self {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();

        let task = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = task_cancellation_token.cancelled() => {
                        log::debug!("Countdown tick stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        sender.send_replace(clock.now());
                    }
                }
            }
        });

        Self {
            guard: cancellation_token.drop_guard(),
            task,
        }
    }

    pub(crate) async fn stop(self) {
        let Self { guard, task } = self;
        drop(guard);
        if let Err(error) = task.await {
            log::error!("Countdown tick task failed: {error}");
        }
    }
}
