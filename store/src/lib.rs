//! Storage for relay state.
//!
//! State machines are plain values; this crate persists them as versioned
//! snapshots behind the [`StateStore`] trait. The file-backed store is used by
//! the node, the in-memory one from `bridge-nullables` by tests.

pub mod error;
pub mod file;
pub mod migration;
pub mod snapshot;

pub use error::StoreError;
pub use file::FileStateStore;
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
pub use snapshot::{load_snapshot, save_snapshot, SnapshotEnvelope};

/// Keyed blob storage plus a schema version marker.
pub trait StateStore {
    fn put_blob(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// `Ok(None)` when the key has never been written.
    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn delete_blob(&self, key: &str) -> Result<(), StoreError>;

    /// Zero for a store that has never been initialised.
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn put_blob(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).put_blob(key, value)
    }

    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_blob(key)
    }

    fn delete_blob(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete_blob(key)
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        (**self).get_schema_version()
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        (**self).set_schema_version(version)
    }
}
