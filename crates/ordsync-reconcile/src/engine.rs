use std::fmt;

use tracing::debug;

use crate::counters::{Outcome, OutcomeCounters};
use crate::mapping::StatusMapper;
use crate::store::{OrderStore, StoreError};
use crate::transitions::{TransitionCheck, TransitionGraph};
use crate::types::{OrderId, OrderNumber, ParsedLine, Record, StatusCode};

// ---------------------------------------------------------------------------
// ApplyError
// ---------------------------------------------------------------------------

/// A validated status change that the order store refused.
///
/// This is the only way a run ends early. Every other disqualifying
/// condition is a counted skip. `counters` holds the accounting up to and
/// excluding the failed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyError {
    pub order_number: OrderNumber,
    pub order_id: OrderId,
    pub target_status: StatusCode,
    pub counters: OutcomeCounters,
    pub source: StoreError,
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run aborted after {} line(s): order {} (id {}) -> status {}: {}",
            self.counters.lines,
            self.order_number,
            self.order_id,
            self.target_status,
            self.source
        )
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

// ---------------------------------------------------------------------------
// LineReport
// ---------------------------------------------------------------------------

/// Passed to the per-line hook once the line's outcome is decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineReport {
    /// 1-based position among processed lines.
    pub index: u64,
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// ReconciliationEngine
// ---------------------------------------------------------------------------

/// Applies an export to the order store, one line at a time.
///
/// Per line, first match wins:
///
/// 1. malformed line                         -> `invalid-lines`
/// 2. external status has no mapping         -> `status-not-found`
/// 3. order number unknown to the store      -> `not-found`
/// 4. order already at the mapped status     -> `same-status`
/// 5. current status has no way out          -> `invalid-pre-status`
/// 6. mapped status not reachable from it    -> `invalid-post-status`
/// 7. silent status write                    -> `changed`
pub struct ReconciliationEngine<S> {
    mapper: StatusMapper,
    transitions: TransitionGraph,
    store: S,
}

impl<S: OrderStore> ReconciliationEngine<S> {
    pub fn new(mapper: StatusMapper, transitions: TransitionGraph, store: S) -> Self {
        Self {
            mapper,
            transitions,
            store,
        }
    }

    /// Engine with the storefront's built-in transition policy.
    pub fn with_default_policy(mapper: StatusMapper, store: S) -> Self {
        Self::new(mapper, TransitionGraph::storefront_default(), store)
    }

    pub fn mapper(&self) -> &StatusMapper {
        &self.mapper
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Process every line, calling `on_processed` after each one.
    pub fn run<I, F>(
        &mut self,
        lines: I,
        mut on_processed: F,
    ) -> Result<OutcomeCounters, ApplyError>
    where
        I: IntoIterator<Item = ParsedLine>,
        F: FnMut(&LineReport),
    {
        let mut counters = OutcomeCounters::new();

        for line in lines {
            let outcome = match self.process(&line) {
                Ok(o) => o,
                Err(Failed {
                    record,
                    order_id,
                    target,
                    source,
                }) => {
                    return Err(ApplyError {
                        order_number: record.order_number,
                        order_id,
                        target_status: target,
                        counters,
                        source,
                    });
                }
            };

            counters.record(outcome);
            on_processed(&LineReport {
                index: counters.lines,
                outcome,
            });
        }

        debug_assert!(counters.is_balanced());
        Ok(counters)
    }

    /// [`ReconciliationEngine::run`] without a progress hook.
    pub fn run_silent<I>(&mut self, lines: I) -> Result<OutcomeCounters, ApplyError>
    where
        I: IntoIterator<Item = ParsedLine>,
    {
        self.run(lines, |_| {})
    }

    fn process(&mut self, line: &ParsedLine) -> Result<Outcome, Failed> {
        let record = match line {
            ParsedLine::Record(r) => *r,
            ParsedLine::Malformed { raw } => {
                debug!(line = %raw, "invalid line");
                return Ok(Outcome::InvalidLine);
            }
        };

        let Some(target) = self.mapper.lookup(record.external_status) else {
            debug!(
                order = record.order_number,
                external_status = record.external_status,
                "external status not mapped"
            );
            return Ok(Outcome::StatusNotFound);
        };

        let Some(order) = self.store.find_by_order_number(record.order_number) else {
            debug!(order = record.order_number, "order not found");
            return Ok(Outcome::NotFound);
        };

        if order.status == target {
            return Ok(Outcome::SameStatus);
        }

        match self.transitions.check(order.status, target) {
            TransitionCheck::InvalidSource => {
                debug!(
                    order = record.order_number,
                    from = order.status,
                    to = target,
                    "current status admits no transition"
                );
                return Ok(Outcome::InvalidPreStatus);
            }
            TransitionCheck::NotReachable => {
                debug!(
                    order = record.order_number,
                    from = order.status,
                    to = target,
                    "transition not permitted"
                );
                return Ok(Outcome::InvalidPostStatus);
            }
            TransitionCheck::Allowed => {}
        }

        self.store
            .set_status(order.id, target)
            .map_err(|source| Failed {
                record,
                order_id: order.id,
                target,
                source,
            })?;

        debug!(
            order = record.order_number,
            id = order.id,
            from = order.status,
            to = target,
            "order status changed"
        );
        Ok(Outcome::Changed)
    }
}

// Internal: a refused write, before the counters are attached.
struct Failed {
    record: Record,
    order_id: OrderId,
    target: StatusCode,
    source: StoreError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::RecordParser;
    use crate::store::InMemoryOrderStore;

    fn engine(
        mapping: &str,
        store: InMemoryOrderStore,
    ) -> ReconciliationEngine<InMemoryOrderStore> {
        ReconciliationEngine::with_default_policy(StatusMapper::build(mapping), store)
    }

    #[test]
    fn each_branch_counts_once() {
        let store = InMemoryOrderStore::new()
            .with_order(1, 10, 0) // 0 -> 2 allowed
            .with_order(2, 20, 2) // already at 2
            .with_order(3, 30, 4) // terminal
            .with_order(4, 40, 7) // 7 -> 6 not allowed
            .with_order(5, 50, 42); // unknown source
        let mut e = engine("3:2<br>5:6", store);

        let input = "1|3\n2|3\n3|3\n4|5\n5|3\n6|3\n7|9\nnope";
        let c = e.run_silent(RecordParser::new(input)).unwrap();

        assert_eq!(c.lines, 8);
        assert_eq!(c.changed, 1);
        assert_eq!(c.same_status, 1);
        assert_eq!(c.invalid_pre_status, 2);
        assert_eq!(c.invalid_post_status, 1);
        assert_eq!(c.not_found, 1);
        assert_eq!(c.status_not_found, 1);
        assert_eq!(c.invalid_lines, 1);
        assert!(c.is_balanced());
        assert_eq!(e.store().writes(), &[(10, 2)]);
    }

    #[test]
    fn hook_sees_every_line_in_order() {
        let mut e = engine("1:1", InMemoryOrderStore::new());
        let mut seen = Vec::new();
        e.run(RecordParser::new("x\n1|1\n2|2"), |r| seen.push(*r))
            .unwrap();
        assert_eq!(
            seen,
            vec![
                LineReport { index: 1, outcome: Outcome::InvalidLine },
                LineReport { index: 2, outcome: Outcome::NotFound },
                LineReport { index: 3, outcome: Outcome::StatusNotFound },
            ]
        );
    }

    #[test]
    fn refused_write_aborts_with_partial_counters() {
        let mut store = InMemoryOrderStore::new()
            .with_order(1, 10, 0)
            .with_order(2, 20, 0);
        store.fail_writes_for(20);
        let mut e = engine("3:2", store);

        let err = e
            .run_silent(RecordParser::new("1|3\n2|3\n1|3"))
            .unwrap_err();
        assert_eq!(err.order_number, 2);
        assert_eq!(err.order_id, 20);
        assert_eq!(err.target_status, 2);
        assert_eq!(err.counters.lines, 1);
        assert_eq!(err.counters.changed, 1);
        assert!(err.to_string().contains("order 2 (id 20)"));
    }
}
