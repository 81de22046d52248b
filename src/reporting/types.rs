// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::auth_classifier::{ClassificationResult, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Aggregate counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub allowed: usize,
    pub denied: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Allowed => self.allowed += 1,
            Verdict::Denied => self.denied += 1,
        }
        self.total += 1;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Allowed:      {}", self.allowed)?;
        writeln!(f, "  Unauthorized: {}", self.denied)?;
        write!(f, "  Total tested: {}", self.total)
    }
}

/// Result of testing one mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub mutation: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
}

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub endpoint: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Headers removed before the mutations were executed
    pub stripped_headers: Vec<String>,
    pub discovered: Vec<String>,
    pub outcomes: Vec<MutationOutcome>,
    pub summary: RunSummary,
}
