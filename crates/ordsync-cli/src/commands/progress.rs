use std::io::{self, Write};

use ordsync_reconcile::LineReport;

/// Single-line stderr progress indicator, redrawn every `every` lines.
pub struct Progress {
    total: u64,
    every: u64,
    done: u64,
    out: Box<dyn Write>,
}

impl Progress {
    pub fn new(total: usize, every: u64) -> Self {
        Self::with_writer(total, every, Box::new(io::stderr()))
    }

    pub fn with_writer(total: usize, every: u64, out: Box<dyn Write>) -> Self {
        Self {
            total: total as u64,
            every: every.max(1),
            done: 0,
            out,
        }
    }

    pub fn advance(&mut self, report: &LineReport) {
        self.done = report.index;
        if self.done % self.every == 0 {
            self.draw();
        }
    }

    pub fn finish(&mut self) {
        self.draw();
        // Progress output is best effort.
        let _ = writeln!(self.out);
    }

    fn draw(&mut self) {
        let pct = if self.total == 0 {
            100
        } else {
            self.done * 100 / self.total
        };
        let _ = write!(self.out, "\r{:>8}/{} [{:>3}%]", self.done, self.total, pct);
        let _ = self.out.flush();
    }
}
