use std::collections::HashMap;

use crate::entries::split_entries;
use crate::lenient;
use crate::types::StatusCode;

/// External (fulfillment) status → storefront status.
///
/// Built once from the configured mapping text and immutable afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusMapper {
    table: HashMap<StatusCode, StatusCode>,
}

impl StatusMapper {
    /// Build the table from `<external>:<storefront>` entries.
    ///
    /// Entries that do not split into exactly two parts on `:` are skipped
    /// without error. Both parts go through [`lenient::parse_i64`], so a
    /// non-numeric token maps to or from status 0. On duplicate external
    /// codes the last entry wins.
    pub fn build(mapping_text: &str) -> Self {
        let mut table = HashMap::new();
        for entry in split_entries(mapping_text) {
            let parts: Vec<&str> = entry.split(':').collect();
            if parts.len() != 2 {
                continue;
            }
            table.insert(lenient::parse_i64(parts[0]), lenient::parse_i64(parts[1]));
        }
        Self { table }
    }

    pub fn lookup(&self, external: StatusCode) -> Option<StatusCode> {
        self.table.get(&external).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
