//! Storefront status transition policy.
//!
//! The table is domain policy, not deployment configuration: it is compiled
//! in and cannot be changed at runtime.
//!
//! ```text
//!   from | allowed to
//!   -----+------------------
//!     0  | 1 2 3 4 5 6 7 8
//!     1  | 2 3 4 5 6 7 8
//!     2  | (terminal)
//!     3  | 2 7 8
//!     4  | (terminal)
//!     5  | 2 3 6 7 8
//!     6  | 2 7 8
//!     7  | 2
//!     8  | (terminal)
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::types::StatusCode;

const STOREFRONT_POLICY: &[(StatusCode, &[StatusCode])] = &[
    (0, &[1, 2, 3, 4, 5, 6, 7, 8]),
    (1, &[2, 3, 4, 5, 6, 7, 8]),
    (2, &[]),
    (3, &[2, 7, 8]),
    (4, &[]),
    (5, &[2, 3, 6, 7, 8]),
    (6, &[2, 7, 8]),
    (7, &[2]),
    (8, &[]),
];

// ---------------------------------------------------------------------------
// TransitionCheck
// ---------------------------------------------------------------------------

/// Result of checking a single `from -> to` move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionCheck {
    Allowed,
    /// `from` has no outgoing transitions: unknown or terminal.
    InvalidSource,
    /// `from` is a live status but `to` is not one of its targets.
    NotReachable,
}

// ---------------------------------------------------------------------------
// TransitionGraph
// ---------------------------------------------------------------------------

/// Immutable adjacency table of permitted storefront status moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionGraph {
    edges: BTreeMap<StatusCode, BTreeSet<StatusCode>>,
}

impl Default for TransitionGraph {
    fn default() -> Self {
        Self::storefront_default()
    }
}

impl TransitionGraph {
    /// The storefront's fixed policy.
    pub fn storefront_default() -> Self {
        let edges = STOREFRONT_POLICY
            .iter()
            .map(|(from, to)| (*from, to.iter().copied().collect()))
            .collect();
        Self { edges }
    }

    /// `true` iff `to` is in the target set of `from`.
    pub fn is_allowed(&self, from: StatusCode, to: StatusCode) -> bool {
        self.check(from, to) == TransitionCheck::Allowed
    }

    pub fn check(&self, from: StatusCode, to: StatusCode) -> TransitionCheck {
        match self.edges.get(&from) {
            None => TransitionCheck::InvalidSource,
            Some(targets) if targets.is_empty() => TransitionCheck::InvalidSource,
            Some(targets) if targets.contains(&to) => TransitionCheck::Allowed,
            Some(_) => TransitionCheck::NotReachable,
        }
    }

    /// Known status with no way out.
    pub fn is_terminal(&self, status: StatusCode) -> bool {
        self.edges.get(&status).is_some_and(|t| t.is_empty())
    }

    pub fn contains(&self, status: StatusCode) -> bool {
        self.edges.contains_key(&status)
    }

    pub fn targets(&self, from: StatusCode) -> Option<&BTreeSet<StatusCode>> {
        self.edges.get(&from)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_policy_exactly() {
        let g = TransitionGraph::storefront_default();
        for from in -1..=9 {
            let expected: &[StatusCode] = STOREFRONT_POLICY
                .iter()
                .find(|(f, _)| *f == from)
                .map(|(_, t)| *t)
                .unwrap_or(&[]);
            for to in -1..=9 {
                assert_eq!(
                    g.is_allowed(from, to),
                    expected.contains(&to),
                    "from={from} to={to}"
                );
            }
        }
    }

    #[test]
    fn terminal_statuses() {
        let g = TransitionGraph::storefront_default();
        for s in [2, 4, 8] {
            assert!(g.is_terminal(s));
            assert_eq!(g.check(s, 7), TransitionCheck::InvalidSource);
        }
        assert!(!g.is_terminal(0));
        assert!(!g.is_terminal(42), "unknown is not terminal");
    }

    #[test]
    fn unknown_source_is_invalid() {
        let g = TransitionGraph::storefront_default();
        assert!(!g.contains(17));
        assert_eq!(g.check(17, 2), TransitionCheck::InvalidSource);
        assert!(!g.is_allowed(17, 2));
    }

    #[test]
    fn unreachable_target() {
        let g = TransitionGraph::storefront_default();
        assert_eq!(g.check(3, 9999), TransitionCheck::NotReachable);
        assert_eq!(g.check(7, 8), TransitionCheck::NotReachable);
        assert_eq!(g.check(3, 7), TransitionCheck::Allowed);
    }

    #[test]
    fn no_self_loops() {
        let g = TransitionGraph::storefront_default();
        for s in 0..=8 {
            assert!(!g.is_allowed(s, s), "status {s} must not loop to itself");
        }
    }
}
