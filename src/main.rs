use std::sync::Arc;

use anyhow::Context;
use eventcount::{
    EventStore,
    appsettings::AppSettings,
    clock::{Clock, SystemClock},
    reminder::{LocalReminderService, LogDeliveryChannel},
    storage::FileKeyValueStorage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    pretty_env_logger::init();

    let settings = AppSettings::new().context("Could not load settings")?;
    log::info!("Using data directory {}", settings.storage.data_dir.display());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let storage = Arc::new(FileKeyValueStorage::new(&settings.storage.data_dir)?);
    let reminders = Arc::new(LocalReminderService::new(
        Arc::new(LogDeliveryChannel),
        Arc::clone(&clock),
        settings.reminders.enabled,
    ));

    let store = EventStore::init(&settings.store, storage, reminders, clock);
    for event in store.events() {
        log::info!(
            "{} \"{}\" {} ({})",
            event.color(),
            event.title,
            event.formatted_date(),
            event.relative_date_string(store.now())
        );
    }

    let mut now = store.subscribe_now();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = now.changed() => {
                if changed.is_err() {
                    break;
                }
                let now = *now.borrow_and_update();
                match store.next_event(now) {
                    Some(event) => log::info!(
                        "{}: {}",
                        event.title,
                        event.time_remaining(now).formatted()
                    ),
                    None => log::info!("No upcoming events"),
                }
            }
        }
    }

    store.dispose().await;
    Ok(())
}
