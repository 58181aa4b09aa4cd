//! Command handler modules for ordsync-cli.
//!
//! Shared utilities used by multiple command paths live here.

pub mod progress;
pub mod sync;

use anyhow::{Context, Result};
use ordsync_config::{report_unused_keys, LoadedConfig, UnusedKeyPolicy};
use tokio::runtime::Runtime;
use tracing::warn;

/// Runtime for the database adapter.
///
/// Multi-threaded so `Handle::block_on` from the synchronous engine can make
/// progress on the pool's I/O.
pub fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to build tokio runtime")
}

/// Load layered config and run the unused-key guard.
pub fn load_config(config_paths: &[String], policy: UnusedKeyPolicy) -> Result<LoadedConfig> {
    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = ordsync_config::load_layered_yaml(&path_refs)?;

    let report = report_unused_keys(&loaded.config_json, policy)?;
    if !report.is_clean() {
        warn!(
            unused_leaf_keys = report.unused_leaf_pointers.len(),
            "CONFIG_UNUSED_KEYS"
        );
        for p in report.unused_leaf_pointers.iter().take(50) {
            warn!(unused = %p, "unused config key");
        }
    }

    Ok(loaded)
}
