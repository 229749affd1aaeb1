//! Directory-backed store: one file per key, replaced atomically.

use crate::{StateStore, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SCHEMA_FILE: &str = "schema_version";
const BLOB_EXTENSION: &str = "bin";

pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "opened state store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(StoreError::Backend(format!("invalid key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.{BLOB_EXTENSION}")))
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl StateStore for FileStateStore {
    fn put_blob(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.blob_path(key)?;
        self.write_atomic(&path, value)
    }

    fn get_blob(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        read_optional(&self.blob_path(key)?)
    }

    fn delete_blob(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.blob_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match read_optional(&self.dir.join(SCHEMA_FILE))? {
            None => Ok(0),
            Some(bytes) => {
                let raw: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption(format!("schema marker has {} bytes", bytes.len()))
                })?;
                Ok(u32::from_le_bytes(raw))
            }
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.write_atomic(&self.dir.join(SCHEMA_FILE), &version.to_le_bytes())
    }
}
