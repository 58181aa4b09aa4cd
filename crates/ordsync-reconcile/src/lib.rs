//! ordsync-reconcile
//!
//! Order-status reconciliation between a fulfillment export and the
//! storefront order database.
//!
//! - Export lines are `<order number>|<external status>`
//! - External statuses map to storefront statuses through a configured table
//! - Storefront transitions follow a fixed, compiled-in policy
//! - Every line resolves to exactly one counted outcome; nothing per line is
//!   an error
//!
//! Deterministic logic only. The order store is reached through the
//! [`OrderStore`] trait; no database or file access happens here.

mod counters;
mod engine;
mod entries;
pub mod lenient;
mod mapping;
mod parser;
mod store;
mod transitions;
mod types;

pub use counters::{Outcome, OutcomeCounters, LINES};
pub use engine::{ApplyError, LineReport, ReconciliationEngine};
pub use entries::{split_entries, Entries};
pub use mapping::StatusMapper;
pub use parser::{parse_line, ParsedLines, RecordParser, FIELD_DELIMITER};
pub use store::{InMemoryOrderStore, OrderStore, StoreError};
pub use transitions::{TransitionCheck, TransitionGraph};
pub use types::*;
