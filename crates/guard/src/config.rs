//! Guard configuration.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::flags::{FlagStore, JsonFileFlagStore, MemoryFlagStore};

pub const DEFAULT_MAINTENANCE_KEY: &str = "system_maintenance";

pub const ENV_MAINTENANCE_KEY: &str = "KONSUT_MAINTENANCE_KEY";
pub const ENV_FLAGS_PATH: &str = "KONSUT_FLAGS_PATH";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Flag-store key holding the maintenance switch.
    pub maintenance_key: String,

    /// JSON file backing the flag store. In-memory flags when unset.
    pub flags_path: Option<PathBuf>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            maintenance_key: DEFAULT_MAINTENANCE_KEY.to_string(),
            flags_path: None,
        }
    }
}

impl GuardConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup(ENV_MAINTENANCE_KEY) {
            Some(key) => config.maintenance_key = key,
            None => tracing::debug!(
                key = DEFAULT_MAINTENANCE_KEY,
                "{ENV_MAINTENANCE_KEY} not set; using default"
            ),
        }

        match lookup(ENV_FLAGS_PATH) {
            Some(path) if !path.trim().is_empty() => config.flags_path = Some(PathBuf::from(path)),
            _ => tracing::warn!("{ENV_FLAGS_PATH} not set; maintenance flags are in-memory only"),
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maintenance_key.trim().is_empty() {
            return Err(ConfigError::Blank("maintenance_key"));
        }
        Ok(())
    }

    /// Flag store described by this configuration.
    pub fn flag_store(&self) -> Box<dyn FlagStore> {
        match &self.flags_path {
            Some(path) => Box::new(JsonFileFlagStore::new(path.clone())),
            None => Box::new(MemoryFlagStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = GuardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GuardConfig::default());
        assert_eq!(config.maintenance_key, "system_maintenance");
    }

    #[test]
    fn reads_overrides() {
        let config = GuardConfig::from_lookup(lookup(&[
            (ENV_MAINTENANCE_KEY, "ops_lockdown"),
            (ENV_FLAGS_PATH, "/var/lib/konsut/flags.json"),
        ]))
        .unwrap();
        assert_eq!(config.maintenance_key, "ops_lockdown");
        assert_eq!(config.flags_path, Some(PathBuf::from("/var/lib/konsut/flags.json")));
    }

    #[test]
    fn blank_key_is_rejected() {
        let err = GuardConfig::from_lookup(lookup(&[(ENV_MAINTENANCE_KEY, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Blank("maintenance_key"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: GuardConfig = serde_json::from_str(r#"{"flags_path": "flags.json"}"#).unwrap();
        assert_eq!(config.maintenance_key, DEFAULT_MAINTENANCE_KEY);
        assert_eq!(config.flags_path, Some(PathBuf::from("flags.json")));
    }
}
