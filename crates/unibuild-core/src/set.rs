//! Owning collection of device configs for one document
//!
//! `ConfigSet` wraps each entry of the document's device list, runs firmware
//! resolution exactly once, and is read-only from then on.

use crate::device::DeviceConfig;
use crate::firmware;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Malformed document: no chromeos/configs device list")]
    MissingDeviceList,
    #[error("Malformed document: device entry missing required string 'name'")]
    MissingName,
}

/// The full set of device configurations from one document.
#[derive(Debug)]
pub struct ConfigSet {
    configs: Vec<DeviceConfig>,
}

impl ConfigSet {
    /// Build the set from a parsed document. Expects the device list at
    /// `chromeos.configs`.
    pub fn new(doc: Value) -> Result<Self, ConfigError> {
        Self::with_filter(doc, |_| true)
    }

    /// Build the set, keeping only devices whose name passes `filter`. The
    /// narrowing happens before resolution, so filtered-out devices take no
    /// part in firmware grouping or whitelabel scans.
    pub fn with_filter<F>(doc: Value, filter: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> bool,
    {
        let entries = doc
            .get("chromeos")
            .and_then(|c| c.get("configs"))
            .and_then(Value::as_array)
            .ok_or(ConfigError::MissingDeviceList)?;

        let mut configs = Vec::new();
        for entry in entries {
            let config = DeviceConfig::new(entry.clone())?;
            if filter(config.name()) {
                configs.push(config);
            }
        }

        let resolved = firmware::resolve(&configs);
        for (config, info) in configs.iter_mut().zip(resolved) {
            config.set_firmware_info(info);
        }
        info!(devices = configs.len(), "configuration set resolved");
        Ok(Self { configs })
    }

    /// Parse a JSON document string and build the set.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Self::new(serde_json::from_str(content)?)
    }

    /// Load and parse a JSON document file and build the set.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Device configs in document order.
    pub fn device_configs(&self) -> &[DeviceConfig] {
        &self.configs
    }

    /// Look up one device by model name.
    pub fn device_config(&self, name: &str) -> Option<&DeviceConfig> {
        self.configs.iter().find(|c| c.name() == name)
    }
}
