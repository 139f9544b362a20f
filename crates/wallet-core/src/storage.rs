//! Durable key-value storage for the registry and connection records.
//!
//! Values are JSON strings. Keys are arbitrary strings; chain `hd_path`s
//! such as `m/44'/118'/0'/0/0` are used directly as keys.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::WalletError;

pub trait KvStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, WalletError>;
    fn put(&self, key: &str, value: &str) -> Result<(), WalletError>;
    fn remove(&self, key: &str) -> Result<(), WalletError>;
}

impl dyn KvStore {
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, WalletError> {
        self.get(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(Into::into)
    }

    pub fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), WalletError> {
        let raw = serde_json::to_string(value)?;
        self.put(key, &raw)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    kv: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, WalletError> {
        Ok(self.kv.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), WalletError> {
        self.kv.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), WalletError> {
        self.kv.write().remove(key);
        Ok(())
    }
}

/// One file per key under a data directory. File names are the hex of the
/// key, so path separators in keys are harmless.
pub struct FileStore {
    dir: PathBuf,
    // Writes land in a temp file first and are renamed into place.
    write_lock: parking_lot::Mutex<()>,
}

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, WalletError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: parking_lot::Mutex::new(()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hex::encode(key)))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, WalletError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), WalletError> {
        let _guard = self.write_lock.lock();
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), WalletError> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
