//! Nullable store: thread-safe in-memory blobs for testing.

use bridge_store::{StateStore, StoreError};
use std::collections::HashMap;
use std::sync::Mutex;

pub struct NullStateStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    schema_version: Mutex<u32>,
}

impl NullStateStore {
    pub fn new() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            schema_version: Mutex::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NullStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for NullStateStore {
    fn put_blob(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }

    fn delete_blob(&self, key: &str) -> Result<(), StoreError> {
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        Ok(*self.schema_version.lock().unwrap())
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        *self.schema_version.lock().unwrap() = version;
        Ok(())
    }
}
