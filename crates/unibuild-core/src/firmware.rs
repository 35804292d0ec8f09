//! Firmware identity resolution across devices that share images
//!
//! Firmware images are frequently shared across hardware SKUs. Devices whose
//! `/firmware` subtrees render to the same canonical string form one group
//! under a single shared-model name; the signing configuration then tells the
//! variants apart, optionally deferring the signature id to provisioning time
//! via the customization-id indirection (whitelabeling).

use crate::device::DeviceConfig;
use crate::tree;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Sentinel signature id for devices whose real id is resolved at
/// provisioning time from the customization id.
pub const SIG_ID_IN_CUSTOMIZATION_ID: &str = "sig-id-in-customization-id";

/// Resolved firmware identity for one device, or one whitelabel variant of
/// it. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareInfo {
    /// Device (or whitelabel signature) this entry belongs to.
    pub model: String,
    /// Canonical name for the group of devices sharing this image.
    pub shared_model: String,
    /// Signing key id from `/firmware-signing`.
    pub key_id: Option<String>,
    /// Whether this entry carries its own image; false for whitelabel copies,
    /// which reuse the base device's image.
    pub have_image: bool,
    /// Coreboot build target from `/firmware/build-targets`.
    pub bios_build_target: Option<String>,
    /// EC build target from `/firmware/build-targets`.
    pub ec_build_target: Option<String>,
    pub main_image_uri: String,
    pub main_rw_image_uri: String,
    pub ec_image_uri: String,
    pub pd_image_uri: String,
    /// Extra artifacts bundled with the firmware updater.
    pub extra: Vec<String>,
    /// Never set on this path; other tooling may flip it downstream.
    pub create_bios_rw_image: bool,
    /// Host tools bundled with the firmware updater.
    pub tools: Vec<String>,
    /// Signature id, or the [`SIG_ID_IN_CUSTOMIZATION_ID`] sentinel when the
    /// id is resolved at provisioning time.
    pub sig_id: Option<String>,
}

/// Derive the firmware-info map for every device, in document order.
///
/// Pure single-pass computation: all state (`groups_by_descriptor`, the set
/// of processed identities) lives in this frame and is discarded when the
/// pass ends. Results are indexed parallel to `configs`; the caller assigns
/// them into the devices.
///
/// A device whose signer sets `sig-id-in-customization-id` whitelabels: every
/// device carrying the same name, itself included, receives a derived copy of
/// the base entry keyed and signed under its own `signature-id`, with
/// `have_image` cleared. The self-match is deliberate; it is how a device
/// picks up a second signature identity against its own image.
pub(crate) fn resolve(configs: &[DeviceConfig]) -> Vec<BTreeMap<String, FirmwareInfo>> {
    let mut results: Vec<BTreeMap<String, FirmwareInfo>> = vec![BTreeMap::new(); configs.len()];
    let mut groups_by_descriptor: HashMap<String, String> = HashMap::new();
    let mut processed: HashSet<String> = HashSet::new();

    for (idx, config) in configs.iter().enumerate() {
        let fw = config.firmware_config();
        if fw.is_empty() {
            continue;
        }
        let identity = tree::canonical(config.properties("/identity"));
        if processed.contains(&identity) {
            continue;
        }

        // Identical firmware subtrees (canonical rendering) share one image.
        // An explicit firmware name labels the group; otherwise the first
        // device carrying the descriptor does.
        let descriptor = tree::canonical(fw);
        let shared_model = groups_by_descriptor
            .entry(descriptor)
            .or_insert_with(|| {
                opt_string(tree::value(fw, "name")).unwrap_or_else(|| config.name().to_string())
            })
            .clone();

        let build_targets = config.properties("/firmware/build-targets");
        let bios_build_target = opt_string(tree::value(build_targets, "coreboot"));
        let ec_build_target = opt_string(tree::value(build_targets, "ec"));

        let signer = config.properties("/firmware-signing");
        let key_id = opt_string(tree::value(signer, "key-id"));
        let sig_in_customization_id =
            tree::value(signer, "sig-id-in-customization-id").is_some_and(tree::is_truthy);

        let sig_id = if sig_in_customization_id {
            // Leave the identity unprocessed: later devices re-derive from
            // this same base via the whitelabel scan below.
            Some(SIG_ID_IN_CUSTOMIZATION_ID.to_string())
        } else {
            processed.insert(identity);
            opt_string(tree::value(signer, "signature-id"))
        };

        let info = FirmwareInfo {
            model: config.name().to_string(),
            shared_model,
            key_id,
            have_image: true,
            bios_build_target,
            ec_build_target,
            main_image_uri: uri_or_empty(tree::value(fw, "main-image")),
            main_rw_image_uri: uri_or_empty(tree::value(fw, "main-rw-image")),
            ec_image_uri: uri_or_empty(tree::value(fw, "ec-image")),
            pd_image_uri: uri_or_empty(tree::value(fw, "pd-image")),
            extra: string_list(tree::value(fw, "extra")),
            create_bios_rw_image: false,
            tools: string_list(tree::value(fw, "tools")),
            sig_id,
        };
        debug!(
            model = %info.model,
            shared_model = %info.shared_model,
            whitelabel = sig_in_customization_id,
            "resolved firmware"
        );
        results[idx].insert(config.name().to_string(), info.clone());

        if sig_in_customization_id {
            for (wl_idx, wl_config) in configs.iter().enumerate() {
                if wl_config.name() != config.name() {
                    continue;
                }
                processed.insert(tree::canonical(wl_config.properties("/identity")));
                let wl_signer = wl_config.properties("/firmware-signing");
                let wl_key_id = opt_string(tree::value(wl_signer, "key-id"));
                let wl_sig_id = opt_string(tree::value(wl_signer, "signature-id"));
                let key = wl_sig_id.clone().unwrap_or_default();
                let mut wl_info = info.clone();
                wl_info.model = key.clone();
                wl_info.key_id = wl_key_id;
                wl_info.have_image = false;
                wl_info.sig_id = wl_sig_id;
                results[wl_idx].insert(key, wl_info);
            }
        }
    }

    results
}

fn opt_string(v: Option<&Value>) -> Option<String> {
    v.map(tree::render_scalar)
}

/// Image URIs collapse falsy values (absent, empty, `false`) to the empty
/// string.
fn uri_or_empty(v: Option<&Value>) -> String {
    match v {
        Some(v) if tree::is_truthy(v) => tree::render_scalar(v),
        _ => String::new(),
    }
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items.iter().map(tree::render_scalar).collect(),
        _ => Vec::new(),
    }
}
