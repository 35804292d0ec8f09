//! Unibuild Core - query API over the unified device-configuration document
//!
//! This crate provides the foundational types for querying a family of
//! hardware product variants from one parsed configuration document:
//! - Slash-delimited property access over the document tree
//! - Per-device wrappers with typed accessors for firmware config and
//!   auxiliary install-file lists (touch, ARC, audio, thermal, wallpaper)
//! - Firmware identity resolution across devices that share images,
//!   including whitelabel signature derivation

pub mod device;
pub mod firmware;
pub mod set;
pub mod tree;

pub use device::{BaseFile, DeviceConfig, TouchFile};
pub use firmware::{FirmwareInfo, SIG_ID_IN_CUSTOMIZATION_ID};
pub use set::{ConfigError, ConfigSet};
