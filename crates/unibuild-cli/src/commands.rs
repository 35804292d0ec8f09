//! Subcommand implementations, each producing output lines

use anyhow::{bail, Result};
use unibuild_core::{ConfigSet, DeviceConfig};

/// Which auxiliary file list to report.
#[derive(Debug, Clone, Copy)]
pub enum FileKind {
    Arc,
    Audio,
    Thermal,
}

pub fn list_models(set: &ConfigSet) -> Vec<String> {
    set.device_configs()
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

pub fn get_property(set: &ConfigSet, model: &str, path: &str, key: &str) -> Result<String> {
    let Some(config) = set.device_config(model) else {
        bail!("unknown model '{model}'");
    };
    Ok(config.property(path, key))
}

/// One line per resolved firmware entry, all fields as key=value pairs.
pub fn firmware_info_lines(set: &ConfigSet) -> Vec<String> {
    let mut lines = Vec::new();
    for config in set.device_configs() {
        for info in config.firmware_info().values() {
            lines.push(format!(
                "model={} shared_model={} key_id={} have_image={} \
                 bios_build_target={} ec_build_target={} \
                 main_image_uri={} main_rw_image_uri={} ec_image_uri={} pd_image_uri={} \
                 extra={} create_bios_rw_image={} tools={} sig_id={}",
                info.model,
                info.shared_model,
                info.key_id.as_deref().unwrap_or_default(),
                info.have_image,
                info.bios_build_target.as_deref().unwrap_or_default(),
                info.ec_build_target.as_deref().unwrap_or_default(),
                info.main_image_uri,
                info.main_rw_image_uri,
                info.ec_image_uri,
                info.pd_image_uri,
                info.extra.join(","),
                info.create_bios_rw_image,
                info.tools.join(","),
                info.sig_id.as_deref().unwrap_or_default(),
            ));
        }
    }
    lines
}

/// All distinct non-empty image URIs, in first-seen order.
pub fn firmware_uris(set: &ConfigSet) -> Vec<String> {
    let mut uris: Vec<String> = Vec::new();
    for config in set.device_configs() {
        for info in config.firmware_info().values() {
            for uri in [
                &info.main_image_uri,
                &info.main_rw_image_uri,
                &info.ec_image_uri,
                &info.pd_image_uri,
            ] {
                if !uri.is_empty() && !uris.iter().any(|u| u == uri) {
                    uris.push(uri.clone());
                }
            }
        }
    }
    uris
}

pub fn touch_file_lines(set: &ConfigSet) -> Vec<String> {
    set.device_configs()
        .iter()
        .flat_map(|c| c.touch_firmware_files())
        .map(|f| format!("{} {} {}", f.source, f.destination, f.symlink))
        .collect()
}

pub fn file_lines(set: &ConfigSet, kind: FileKind) -> Vec<String> {
    let files = |c: &DeviceConfig| match kind {
        FileKind::Arc => c.arc_files(),
        FileKind::Audio => c.audio_files(),
        FileKind::Thermal => c.thermal_files(),
    };
    set.device_configs()
        .iter()
        .flat_map(files)
        .map(|f| format!("{} {}", f.source, f.destination))
        .collect()
}

pub fn wallpaper_lines(set: &ConfigSet) -> Vec<String> {
    set.device_configs()
        .iter()
        .flat_map(|c| c.wallpaper_files())
        .collect()
}
