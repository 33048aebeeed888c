//! Persisted key-value flags (maintenance mode and friends).

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagStoreError {
    #[error("failed to access flag file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("flag file {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode flags for {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("flag file {} must hold a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

/// Key-value flag storage.
///
/// Values are JSON so that both the string form written by the browser
/// (`"true"`) and the boolean form written by the settings endpoint (`true`)
/// survive unchanged.
pub trait FlagStore {
    fn get(&self, key: &str) -> Result<Option<Value>, FlagStoreError>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), FlagStoreError>;
}

impl<S: FlagStore + ?Sized> FlagStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>, FlagStoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), FlagStoreError> {
        (**self).set(key, value)
    }
}

/// Whether maintenance mode is on.
///
/// Only `true` and `"true"` count. Any read failure counts as off: the flag
/// store must never lock users out by accident.
pub fn maintenance_active<S: FlagStore + ?Sized>(store: &S, key: &str) -> bool {
    match store.get(key) {
        Ok(Some(Value::Bool(on))) => on,
        Ok(Some(Value::String(s))) => s == "true",
        Ok(_) => false,
        Err(err) => {
            tracing::warn!(error = %err, key, "cannot read maintenance flag; assuming off");
            false
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    values: HashMap<String, Value>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Result<Option<Value>, FlagStoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), FlagStoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Flags persisted as one JSON object on disk.
///
/// The file is re-read on every lookup so toggles from another process are
/// picked up on the next navigation. A missing file means "no flags set".
#[derive(Debug, Clone)]
pub struct JsonFileFlagStore {
    path: PathBuf,
}

impl JsonFileFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, FlagStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(FlagStoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(FlagStoreError::NotAnObject {
                path: self.path.clone(),
            }),
            Err(source) => Err(FlagStoreError::Parse {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl FlagStore for JsonFileFlagStore {
    fn get(&self, key: &str) -> Result<Option<Value>, FlagStoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), FlagStoreError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value);

        let encoded = serde_json::to_string_pretty(&Value::Object(map)).map_err(|source| {
            FlagStoreError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, encoded).map_err(|source| FlagStoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(key, path = %self.path.display(), "flag updated");
        Ok(())
    }
}
