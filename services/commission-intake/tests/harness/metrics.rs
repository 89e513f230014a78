// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for abuse simulations.

use axum::http::StatusCode;
use std::collections::HashMap;
use std::fmt;

/// Possible outcomes for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Submitted,
    RateLimited,
    Invalid,
    Failed,
}

impl From<StatusCode> for Outcome {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => Outcome::Submitted,
            StatusCode::TOO_MANY_REQUESTS => Outcome::RateLimited,
            StatusCode::BAD_REQUEST => Outcome::Invalid,
            _ => Outcome::Failed,
        }
    }
}

/// Counts request outcomes, overall and per source address.
#[derive(Debug, Default)]
pub struct Tally {
    outcomes: HashMap<Outcome, usize>,
    submitted_per_source: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request outcome.
    pub fn record(&mut self, source: &str, status: StatusCode) {
        let outcome = Outcome::from(status);
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        if outcome == Outcome::Submitted {
            *self
                .submitted_per_source
                .entry(source.to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Highest number of submissions accepted from any one source.
    pub fn max_submitted_per_source(&self) -> usize {
        self.submitted_per_source.values().copied().max().unwrap_or(0)
    }

    pub fn sources_with_submissions(&self) -> usize {
        self.submitted_per_source.len()
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} submitted={} rate_limited={} invalid={} failed={}",
            self.total(),
            self.count(Outcome::Submitted),
            self.count(Outcome::RateLimited),
            self.count(Outcome::Invalid),
            self.count(Outcome::Failed),
        )
    }
}
