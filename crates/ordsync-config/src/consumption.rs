//! Unused-key detection.
//!
//! A config leaf is "consumed" when some key the sync reads is equal to it or
//! is one of its ancestors. Anything else is most likely a typo or a key left
//! over from an older deployment.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON pointers read by [`crate::SyncConfig::from_json`].
pub const CONSUMED_POINTERS: &[&str] = &[
    "/mapping",
    "/progress/redraw_frequency",
    "/source/directory",
    "/source/filename",
];

/// How many unused pointers an error message lists before eliding the rest.
const ERROR_PREVIEW: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Pointers the sync reads, sorted.
    pub consumed_prefixes: Vec<String>,
    /// Leaves of the merged document no consumed pointer covers, sorted.
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Compare the merged config against [`CONSUMED_POINTERS`].
///
/// With [`UnusedKeyPolicy::Fail`] a non-clean report becomes a
/// `CONFIG_UNUSED_KEYS` error.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let mut consumed_prefixes: Vec<String> =
        CONSUMED_POINTERS.iter().map(|p| p.to_string()).collect();
    consumed_prefixes.sort();

    let mut unused_leaf_pointers = Vec::new();
    walk_leaves(config_json, &mut String::new(), &mut |leaf| {
        if !consumed_prefixes.iter().any(|c| covers(c, leaf)) {
            unused_leaf_pointers.push(leaf.to_string());
        }
    });
    unused_leaf_pointers.sort();

    let report = UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        let shown: Vec<&String> = report.unused_leaf_pointers.iter().take(ERROR_PREVIEW).collect();
        bail!(
            "CONFIG_UNUSED_KEYS: {} unused config leaf key(s): {:?}",
            report.unused_leaf_pointers.len(),
            shown
        );
    }

    Ok(report)
}

/// `/source` covers `/source` and `/source/filename`, never `/sourcefile`.
fn covers(consumed: &str, leaf: &str) -> bool {
    match leaf.strip_prefix(consumed) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Call `visit` with the JSON pointer of every scalar in `v`.
///
/// A scalar document root is reported as `/`. Empty objects and arrays have
/// no leaves.
fn walk_leaves(v: &Value, path: &mut String, visit: &mut dyn FnMut(&str)) {
    let children: Vec<(String, &Value)> = match v {
        Value::Object(map) => map
            .iter()
            .map(|(k, child)| (k.replace('~', "~0").replace('/', "~1"), child))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, child)| (i.to_string(), child))
            .collect(),
        _ => {
            visit(if path.is_empty() { "/" } else { path.as_str() });
            return;
        }
    };

    for (token, child) in children {
        let restore = path.len();
        path.push('/');
        path.push_str(&token);
        walk_leaves(child, path, visit);
        path.truncate(restore);
    }
}
