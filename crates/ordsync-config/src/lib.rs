//! ordsync-config
//!
//! Layered YAML configuration for the status sync.
//!
//! - Documents merge in order: earlier docs are base, later docs override
//! - The merged document is canonicalized to JSON and hashed (SHA-256) so a
//!   run can be attributed to the exact configuration it used
//! - [`SyncConfig`] is the typed view the sync command consumes
//! - [`report_unused_keys`] flags leaves nothing reads (typos, stale keys)

mod consumption;
mod settings;

pub use consumption::{report_unused_keys, UnusedKeyPolicy, UnusedKeyReport, CONSUMED_POINTERS};
pub use settings::{SyncConfig, DEFAULT_REDRAW_FREQUENCY};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// Layered loading
// ---------------------------------------------------------------------------

/// Merged configuration plus its identity.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Lowercase hex SHA-256 of `canonical_json`.
    pub config_hash: String,
    /// Compact JSON with sorted object keys.
    pub canonical_json: String,
    pub config_json: Value,
}

/// Read and merge YAML files, first path lowest precedence.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| std::fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}")))
        .collect::<Result<Vec<String>>>()?;
    let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Map::new());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let layer: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        let layer = serde_json::to_value(layer).context("yaml->json conversion failed")?;
        overlay(&mut merged, layer);
    }

    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = hex::encode(Sha256::digest(canonical_json.as_bytes()));
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Objects merge key by key; any other upper value replaces the lower one.
fn overlay(base: &mut Value, upper: Value) {
    match (base, upper) {
        (Value::Object(base_map), Value::Object(upper_map)) => {
            for (k, v) in upper_map {
                match base_map.get_mut(&k) {
                    Some(slot) => overlay(slot, v),
                    None => {
                        base_map.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}
