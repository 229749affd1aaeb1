//! Schema migration engine.
//!
//! Tracks a monotonically increasing schema version in the store and runs
//! sequential migrations to bring an older store up to date.

use crate::{StateStore, StoreError};

/// The schema version that the current code expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

pub struct Migrator;

impl Migrator {
    /// Check the stored schema version and run any needed migrations.
    ///
    /// Version 0 is a fresh store. A version higher than
    /// [`CURRENT_SCHEMA_VERSION`] was written by newer code and is refused.
    pub fn run(store: &impl StateStore) -> Result<u32, StoreError> {
        let current = store.get_schema_version()?;

        if current == CURRENT_SCHEMA_VERSION {
            tracing::debug!(version = current, "state schema is up to date");
            return Ok(current);
        }

        if current > CURRENT_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: current,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        for version in current..CURRENT_SCHEMA_VERSION {
            tracing::info!(from = version, to = version + 1, "running migration");
            run_migration(store, version, version + 1)?;
        }

        store.set_schema_version(CURRENT_SCHEMA_VERSION)?;
        tracing::info!(version = CURRENT_SCHEMA_VERSION, "migration complete");
        Ok(CURRENT_SCHEMA_VERSION)
    }
}

fn run_migration(_store: &impl StateStore, from: u32, to: u32) -> Result<(), StoreError> {
    match (from, to) {
        // Blank slate; snapshots are written on first save.
        (0, 1) => Ok(()),
        _ => Err(StoreError::Corruption(format!(
            "unknown migration: {from} -> {to}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileStateStore;

    #[test]
    fn fresh_store_is_brought_to_current() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(dir.path()).unwrap();
        assert_eq!(Migrator::run(&store).unwrap(), CURRENT_SCHEMA_VERSION);
        assert_eq!(store.get_schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
        // Idempotent.
        assert_eq!(Migrator::run(&store).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn newer_store_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(dir.path()).unwrap();
        store.set_schema_version(CURRENT_SCHEMA_VERSION + 1).unwrap();
        assert!(matches!(
            Migrator::run(&store),
            Err(StoreError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn unknown_migration_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(dir.path()).unwrap();
        assert!(run_migration(&store, 99, 100).is_err());
    }
}
