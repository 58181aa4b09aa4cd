use anyhow::{bail, Result};
use serde_json::Value;

use crate::LoadedConfig;

/// Progress redraw interval (in lines) when the config does not set one.
pub const DEFAULT_REDRAW_FREQUENCY: u64 = 10;

/// Typed view of the keys the sync command reads.
///
/// ```yaml
/// source:
///   directory: /var/ordsync/import/
///   filename: order-status.csv
/// mapping: "3:2<br>5:6"
/// progress:
///   redraw_frequency: 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source_directory: String,
    pub source_filename: String,
    /// Raw `<external>:<storefront>` mapping text, parsed by the engine.
    pub mapping: String,
    pub redraw_frequency: u64,
}

impl SyncConfig {
    pub fn from_loaded(loaded: &LoadedConfig) -> Result<Self> {
        Self::from_json(&loaded.config_json)
    }

    pub fn from_json(v: &Value) -> Result<Self> {
        let redraw_frequency = match v.pointer("/progress/redraw_frequency") {
            None | Some(Value::Null) => DEFAULT_REDRAW_FREQUENCY,
            Some(n) => match n.as_u64() {
                Some(n) if n >= 1 => n,
                _ => bail!(
                    "CONFIG_INVALID_VALUE leaf=/progress/redraw_frequency: \
                     expected a positive integer, got {n}"
                ),
            },
        };

        Ok(Self {
            source_directory: required_str(v, "/source/directory")?,
            source_filename: required_str(v, "/source/filename")?,
            mapping: required_str(v, "/mapping")?,
            redraw_frequency,
        })
    }

    /// Directory (trailing `/` stripped) + `/` + filename.
    pub fn input_path(&self) -> String {
        format!(
            "{}/{}",
            self.source_directory.trim_end_matches('/'),
            self.source_filename
        )
    }
}

fn required_str(v: &Value, ptr: &str) -> Result<String> {
    match v.pointer(ptr) {
        Some(Value::String(s)) => Ok(s.clone()),
        // YAML lets a lone mapping entry like `mapping: 3` parse as a number.
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => bail!("CONFIG_INVALID_VALUE leaf={ptr}: expected a string, got {other}"),
        None => bail!("CONFIG_MISSING_KEY leaf={ptr}"),
    }
}
