//! Versioned snapshots: `bincode(SnapshotEnvelope { schema_version, body })`
//! where `body` is the bincode encoding of the state value.

use crate::migration::CURRENT_SCHEMA_VERSION;
use crate::{StateStore, StoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub schema_version: u32,
    pub body: Vec<u8>,
}

pub fn save_snapshot<T: Serialize>(
    store: &impl StateStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let envelope = SnapshotEnvelope {
        schema_version: CURRENT_SCHEMA_VERSION,
        body: bincode::serialize(value)?,
    };
    let bytes = bincode::serialize(&envelope)?;
    store.put_blob(key, &bytes)?;
    tracing::debug!(key, bytes = bytes.len(), "snapshot saved");
    Ok(())
}

/// Load a snapshot, or `Ok(None)` if none was ever saved under `key`.
pub fn load_snapshot<T: DeserializeOwned>(
    store: &impl StateStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(bytes) = store.get_blob(key)? else {
        return Ok(None);
    };
    let envelope: SnapshotEnvelope = bincode::deserialize(&bytes)
        .map_err(|e| StoreError::Corruption(format!("{key}: {e}")))?;
    if envelope.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: envelope.schema_version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    if envelope.schema_version < CURRENT_SCHEMA_VERSION {
        return Err(StoreError::Corruption(format!(
            "{key}: snapshot version {} predates the oldest readable version",
            envelope.schema_version
        )));
    }
    let value = bincode::deserialize(&envelope.body)
        .map_err(|e| StoreError::Corruption(format!("{key}: {e}")))?;
    tracing::debug!(key, bytes = bytes.len(), "snapshot loaded");
    Ok(Some(value))
}
