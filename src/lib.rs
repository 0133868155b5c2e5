pub mod appsettings;
pub mod clock;
pub mod draft;
pub mod event;
pub mod reminder;
pub mod storage;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use event::{Event, EventColor, EventId, TimeRemaining};
pub use store::EventStore;
