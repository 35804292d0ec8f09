//! Per-device configuration wrapper with typed accessors

use crate::firmware::FirmwareInfo;
use crate::set::ConfigError;
use crate::tree;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A file to install: source path in the build tree, destination on the
/// target filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseFile {
    pub source: String,
    pub destination: String,
}

/// A touch firmware file; carries an extra symlink installed beside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchFile {
    pub source: String,
    pub destination: String,
    pub symlink: String,
}

/// One hardware variant's configuration subtree, plus the firmware identity
/// map resolved for it at [`ConfigSet`](crate::ConfigSet) construction.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    node: Value,
    name: String,
    firmware_info: BTreeMap<String, FirmwareInfo>,
}

impl DeviceConfig {
    /// Wrap one entry of the document's device list. The entry must carry a
    /// string `name`; anything else is a malformed document.
    pub(crate) fn new(node: Value) -> Result<Self, ConfigError> {
        let name = match node.get("name").and_then(Value::as_str) {
            Some(n) => n.to_string(),
            None => return Err(ConfigError::MissingName),
        };
        Ok(Self {
            node,
            name,
            firmware_info: BTreeMap::new(),
        })
    }

    /// Model name of this device.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw configuration subtree for this device.
    pub fn node(&self) -> &Value {
        &self.node
    }

    /// Mapping at a slash-delimited path, empty when absent.
    pub fn properties(&self, path: &str) -> &Map<String, Value> {
        tree::properties(&self.node, path)
    }

    /// Scalar property at `path`/`key`, empty string when absent.
    pub fn property(&self, path: &str, key: &str) -> String {
        tree::property(&self.node, path, key)
    }

    /// The `/firmware` subtree, or empty when the device has none or opts out
    /// with a truthy `no-firmware` flag.
    pub fn firmware_config(&self) -> &Map<String, Value> {
        let fw = self.properties("/firmware");
        if tree::value(fw, "no-firmware").is_some_and(tree::is_truthy) {
            return tree::empty();
        }
        fw
    }

    /// Resolved firmware identities, keyed by model name or derived signature
    /// id. Empty until the resolver has run.
    pub fn firmware_info(&self) -> &BTreeMap<String, FirmwareInfo> {
        &self.firmware_info
    }

    pub(crate) fn set_firmware_info(&mut self, info: BTreeMap<String, FirmwareInfo>) {
        self.firmware_info = info;
    }

    fn files_at(&self, path: &str) -> Vec<BaseFile> {
        let region = self.properties(path);
        let Some(Value::Array(items)) = tree::value(region, "files") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|item| BaseFile {
                source: item.get("source").map(tree::render_scalar).unwrap_or_default(),
                destination: item
                    .get("destination")
                    .map(tree::render_scalar)
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Touch firmware files under `/touch`, empty when none are declared.
    pub fn touch_firmware_files(&self) -> Vec<TouchFile> {
        let touch = self.properties("/touch");
        let Some(Value::Array(items)) = tree::value(touch, "files") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|item| TouchFile {
                source: item.get("source").map(tree::render_scalar).unwrap_or_default(),
                destination: item
                    .get("destination")
                    .map(tree::render_scalar)
                    .unwrap_or_default(),
                symlink: item.get("symlink").map(tree::render_scalar).unwrap_or_default(),
            })
            .collect()
    }

    /// ARC files under `/arc`.
    pub fn arc_files(&self) -> Vec<BaseFile> {
        self.files_at("/arc")
    }

    /// Audio files under `/audio/main`.
    pub fn audio_files(&self) -> Vec<BaseFile> {
        self.files_at("/audio/main")
    }

    /// Thermal files under `/thermal`.
    pub fn thermal_files(&self) -> Vec<BaseFile> {
        self.files_at("/thermal")
    }

    /// The device's wallpaper, as a set for symmetry with the other file
    /// accessors; cardinality is at most one.
    pub fn wallpaper_files(&self) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        if let Some(root) = self.node.as_object() {
            if let Some(wallpaper) = tree::value(root, "wallpaper") {
                if tree::is_truthy(wallpaper) {
                    result.insert(tree::render_scalar(wallpaper));
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device(node: Value) -> DeviceConfig {
        DeviceConfig::new(node).unwrap()
    }

    #[test]
    fn test_name_required() {
        assert!(DeviceConfig::new(json!({"firmware": {}})).is_err());
        assert!(DeviceConfig::new(json!({"name": 7})).is_err());
        assert_eq!(device(json!({"name": "boxy"})).name(), "boxy");
    }

    #[test]
    fn test_firmware_config_absent() {
        let d = device(json!({"name": "boxy"}));
        assert!(d.firmware_config().is_empty());
    }

    #[test]
    fn test_firmware_config_no_firmware_flag() {
        let d = device(json!({
            "name": "boxy",
            "firmware": {"no-firmware": true, "main-image": "img.bin"}
        }));
        assert!(d.firmware_config().is_empty());
    }

    #[test]
    fn test_firmware_config_present() {
        let d = device(json!({
            "name": "boxy",
            "firmware": {"main-image": "img.bin", "no-firmware": false}
        }));
        assert_eq!(
            tree::value(d.firmware_config(), "main-image"),
            Some(&json!("img.bin"))
        );
    }

    #[test]
    fn test_touch_firmware_files() {
        let d = device(json!({
            "name": "boxy",
            "touch": {
                "files": [{"source": "a", "destination": "b", "symlink": "c"}]
            }
        }));
        assert_eq!(
            d.touch_firmware_files(),
            vec![TouchFile {
                source: "a".to_string(),
                destination: "b".to_string(),
                symlink: "c".to_string(),
            }]
        );
    }

    #[test]
    fn test_file_accessors_empty_when_absent() {
        let d = device(json!({"name": "boxy", "thermal": {}}));
        assert!(d.touch_firmware_files().is_empty());
        assert!(d.arc_files().is_empty());
        assert!(d.audio_files().is_empty());
        assert!(d.thermal_files().is_empty());
        assert!(d.wallpaper_files().is_empty());
    }

    #[test]
    fn test_audio_files_nested_path() {
        let d = device(json!({
            "name": "boxy",
            "audio": {
                "main": {
                    "files": [
                        {"source": "cras/a.ini", "destination": "/etc/cras/a.ini"},
                        {"source": "ucm/b.conf", "destination": "/usr/share/b.conf"}
                    ]
                }
            }
        }));
        let files = d.audio_files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].source, "cras/a.ini");
        assert_eq!(files[1].destination, "/usr/share/b.conf");
    }

    #[test]
    fn test_wallpaper_files() {
        let d = device(json!({"name": "boxy", "wallpaper": "shelves"}));
        let files = d.wallpaper_files();
        assert_eq!(files.len(), 1);
        assert!(files.contains("shelves"));

        // Present but empty counts as no wallpaper
        let d = device(json!({"name": "boxy", "wallpaper": ""}));
        assert!(d.wallpaper_files().is_empty());
    }
}
