use serde::{Deserialize, Serialize};

/// How a single export line was resolved. Exactly one per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
    InvalidLine,
    StatusNotFound,
    NotFound,
    Changed,
    SameStatus,
    InvalidPreStatus,
    InvalidPostStatus,
}

impl Outcome {
    pub const ALL: [Outcome; 7] = [
        Outcome::InvalidLine,
        Outcome::StatusNotFound,
        Outcome::NotFound,
        Outcome::Changed,
        Outcome::SameStatus,
        Outcome::InvalidPreStatus,
        Outcome::InvalidPostStatus,
    ];

    /// Stable report name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::InvalidLine => "invalid-lines",
            Outcome::StatusNotFound => "status-not-found",
            Outcome::NotFound => "not-found",
            Outcome::Changed => "changed",
            Outcome::SameStatus => "same-status",
            Outcome::InvalidPreStatus => "invalid-pre-status",
            Outcome::InvalidPostStatus => "invalid-post-status",
        }
    }
}

/// Name of the unconditional per-line total.
pub const LINES: &str = "lines";

/// Per-run accounting. Field order is the report order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutcomeCounters {
    pub lines: u64,
    pub invalid_lines: u64,
    pub status_not_found: u64,
    pub not_found: u64,
    pub changed: u64,
    pub same_status: u64,
    pub invalid_pre_status: u64,
    pub invalid_post_status: u64,
}

impl OutcomeCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account one processed line.
    pub fn record(&mut self, outcome: Outcome) {
        self.lines += 1;
        *self.slot_mut(outcome) += 1;
    }

    pub fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::InvalidLine => self.invalid_lines,
            Outcome::StatusNotFound => self.status_not_found,
            Outcome::NotFound => self.not_found,
            Outcome::Changed => self.changed,
            Outcome::SameStatus => self.same_status,
            Outcome::InvalidPreStatus => self.invalid_pre_status,
            Outcome::InvalidPostStatus => self.invalid_post_status,
        }
    }

    /// Look a counter up by its report name (`lines` included).
    pub fn by_name(&self, name: &str) -> Option<u64> {
        if name == LINES {
            return Some(self.lines);
        }
        Outcome::ALL
            .iter()
            .find(|o| o.as_str() == name)
            .map(|o| self.get(*o))
    }

    /// `(name, value)` pairs in report order.
    pub fn entries(&self) -> [(&'static str, u64); 8] {
        [
            (LINES, self.lines),
            (Outcome::InvalidLine.as_str(), self.invalid_lines),
            (Outcome::StatusNotFound.as_str(), self.status_not_found),
            (Outcome::NotFound.as_str(), self.not_found),
            (Outcome::Changed.as_str(), self.changed),
            (Outcome::SameStatus.as_str(), self.same_status),
            (Outcome::InvalidPreStatus.as_str(), self.invalid_pre_status),
            (Outcome::InvalidPostStatus.as_str(), self.invalid_post_status),
        ]
    }

    /// `lines` equals the sum of the seven outcome counters.
    pub fn is_balanced(&self) -> bool {
        let outcomes: u64 = Outcome::ALL.iter().map(|o| self.get(*o)).sum();
        outcomes == self.lines
    }

    fn slot_mut(&mut self, outcome: Outcome) -> &mut u64 {
        match outcome {
            Outcome::InvalidLine => &mut self.invalid_lines,
            Outcome::StatusNotFound => &mut self.status_not_found,
            Outcome::NotFound => &mut self.not_found,
            Outcome::Changed => &mut self.changed,
            Outcome::SameStatus => &mut self.same_status,
            Outcome::InvalidPreStatus => &mut self.invalid_pre_status,
            Outcome::InvalidPostStatus => &mut self.invalid_post_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_bumps_total_and_one_slot() {
        let mut c = OutcomeCounters::new();
        c.record(Outcome::Changed);
        c.record(Outcome::Changed);
        c.record(Outcome::NotFound);
        assert_eq!(c.lines, 3);
        assert_eq!(c.changed, 2);
        assert_eq!(c.not_found, 1);
        assert!(c.is_balanced());
    }

    #[test]
    fn report_order_and_names() {
        let names: Vec<&str> = OutcomeCounters::new()
            .entries()
            .iter()
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(
            names,
            vec![
                "lines",
                "invalid-lines",
                "status-not-found",
                "not-found",
                "changed",
                "same-status",
                "invalid-pre-status",
                "invalid-post-status",
            ]
        );
    }

    #[test]
    fn lookup_by_name() {
        let mut c = OutcomeCounters::new();
        c.record(Outcome::InvalidPostStatus);
        assert_eq!(c.by_name("invalid-post-status"), Some(1));
        assert_eq!(c.by_name("lines"), Some(1));
        assert_eq!(c.by_name("nope"), None);
    }

    #[test]
    fn serializes_with_report_names() {
        let mut c = OutcomeCounters::new();
        c.record(Outcome::SameStatus);
        let v = serde_json::to_value(c).unwrap();
        assert_eq!(v["same-status"], 1);
        assert_eq!(v["lines"], 1);
        assert_eq!(v["invalid-pre-status"], 0);
    }
}
