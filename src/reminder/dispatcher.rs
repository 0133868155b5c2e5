use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::event::EventId;

use super::{Reminder, ReminderService};

#[derive(Debug)]
enum ReminderCommand {
    RequestPermission,
    Schedule(Reminder),
    Cancel(EventId),
    Reschedule(Reminder),
}

/// Enqueues reminder calls without waiting for them.
#[derive(Clone)]
pub struct ReminderSender(mpsc::UnboundedSender<ReminderCommand>);

impl ReminderSender {
    pub fn request_permission(&self) {
        self.send(ReminderCommand::RequestPermission);
    }

    pub fn schedule(&self, reminder: Reminder) {
        self.send(ReminderCommand::Schedule(reminder));
    }

    pub fn cancel(&self, id: EventId) {
        self.send(ReminderCommand::Cancel(id));
    }

    /// Cancels whatever is pending for the id, then schedules the new reminder.
    pub fn reschedule(&self, reminder: Reminder) {
        self.send(ReminderCommand::Reschedule(reminder));
    }

    fn send(&self, command: ReminderCommand) {
        if let Err(error) = self.0.send(command) {
            log::warn!("Reminder dispatcher has stopped, dropping {:?}", error.0);
        }
    }
}

/// Runs reminder calls one at a time, in the order they were enqueued.
pub struct ReminderDispatcher {
    sender: ReminderSender,
    task: JoinHandle<()>,
}

impl ReminderDispatcher {
    pub fn start(service: Arc<dyn ReminderService>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            handle_commands(service, rx).await;
        });

        Self {
            sender: ReminderSender(tx),
            task,
        }
    }

    pub fn sender(&self) -> &ReminderSender {
        &self.sender
    }

    /// Closes the queue and waits until everything already enqueued has run.
    /// Clones of the sender keep the queue open.
    pub async fn shutdown(self) {
        let Self { sender, task } = self;
        drop(sender);
        if let Err(error) = task.await {
            log::error!("Reminder dispatcher task failed: {error}");
        }
    }
}

async fn handle_commands(
    service: Arc<dyn ReminderService>,
    mut receiver: mpsc::UnboundedReceiver<ReminderCommand>,
) {
    while let Some(command) = receiver.recv().await {
        log::debug!("Reminder dispatcher got {command:?}");
        match command {
            ReminderCommand::RequestPermission => request_permission(service.as_ref()).await,
            ReminderCommand::Schedule(reminder) => schedule(service.as_ref(), reminder).await,
            ReminderCommand::Cancel(id) => cancel(service.as_ref(), id).await,
            ReminderCommand::Reschedule(reminder) => {
                cancel(service.as_ref(), reminder.id).await;
                schedule(service.as_ref(), reminder).await;
            }
        }
    }
    log::debug!("Reminder dispatcher shutting down");
}

async fn request_permission(service: &dyn ReminderService) {
    match service.request_permission().await {
        Ok(true) => log::info!("Reminder permission granted"),
        Ok(false) => log::warn!("Reminder permission denied, reminders will not fire"),
        Err(error) => log::error!("Could not request reminder permission: {error:#}"),
    }
}

async fn schedule(service: &dyn ReminderService, reminder: Reminder) {
    let id = reminder.id;
    let fire_at = reminder.fire_at;
    match service.schedule(reminder).await {
        Ok(()) => log::info!("Scheduled reminder {id} for {fire_at}"),
        Err(error) => log::error!("Error scheduling reminder {id}: {error:#}"),
    }
}

async fn cancel(service: &dyn ReminderService, id: EventId) {
    if let Err(error) = service.cancel(id).await {
        log::error!("Error cancelling reminder {id}: {error:#}");
    }
}
