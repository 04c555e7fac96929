// SPDX-License-Identifier: MIT
//! Human-readable pass/fail reporting.
//!
//! Assertion outcomes are printed to stdout the moment they happen —
//! `SUCCESS:` / `FAILURE:` lines are the product of a run, read by a human
//! operator, and are deliberately not routed through tracing. A mismatch
//! never aborts the run (collect-all policy); only the counters are retained,
//! for the closing summary line.

use chrono::Utc;
use std::time::Instant;

/// Collects pass/fail counts while emitting each outcome immediately.
pub struct Reporter {
    passed: usize,
    failed: usize,
    started: Instant,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            passed: 0,
            failed: 0,
            started: Instant::now(),
        }
    }

    /// Record and print a passing check.
    pub fn success(&mut self, msg: &str) {
        println!("{}", Self::success_line(msg));
        self.passed += 1;
    }

    /// Record and print a failing check. The caller includes the observed
    /// value in `msg`; execution continues to the next check.
    pub fn failure(&mut self, msg: &str) {
        println!("{}", Self::failure_line(msg));
        self.failed += 1;
    }

    /// Print an informational line (navigation progress, observed values).
    /// Not counted as a check.
    pub fn info(&self, line: impl std::fmt::Display) {
        println!("{line}");
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Print the closing summary line for a multi-scenario run.
    pub fn summary(&self) {
        let elapsed = self.started.elapsed().as_secs_f64();
        println!("{}", "─".repeat(60));
        println!(
            "{} — {} passed, {} failed ({elapsed:.1}s)",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            self.passed,
            self.failed,
        );
    }

    fn success_line(msg: &str) -> String {
        format!("SUCCESS: {msg}")
    }

    fn failure_line(msg: &str) -> String {
        format!("FAILURE: {msg}")
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
