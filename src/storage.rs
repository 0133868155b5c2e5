mod codec;
mod file_storage;
mod key_value;

pub use codec::{CodecError, decode_events, encode_events};
pub use file_storage::FileKeyValueStorage;
pub use key_value::{InMemoryKeyValueStorage, KeyValueStorage};

/// Key the event collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "SavedEvents";
