//! The key-value port the wizard persists its draft through.

pub mod json_backend;
pub mod memory;

use crate::errors::BookingError;

pub type Result<T> = std::result::Result<T, BookingError>;

/// Single-writer string store addressed by key. Writes overwrite.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

pub use json_backend::JsonSnapshotStore;
pub use memory::MemorySnapshotStore;
