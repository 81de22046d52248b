// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use crate::reporting::types::RunReport;
use anyhow::{Context, Result};
use std::path::Path;

pub struct JsonReportGenerator;

impl JsonReportGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, report: &RunReport) -> Result<Vec<u8>> {
        let json = serde_json::to_string_pretty(report)?;
        Ok(json.into_bytes())
    }

    pub fn write_to<P: AsRef<Path>>(&self, report: &RunReport, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.generate(report)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write JSON report to {}", path.display()))
    }
}

impl Default for JsonReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth_classifier::{classify, ClassificationResult, Verdict};
    use crate::reporting::types::{MutationOutcome, RunSummary};
    use chrono::Utc;

    fn sample_report() -> RunReport {
        let now = Utc::now();
        RunReport {
            endpoint: "https://api.example.com/graphql".to_string(),
            started_at: now,
            finished_at: now,
            stripped_headers: vec!["Authorization".to_string()],
            discovered: vec!["createUser".to_string(), "deleteUser".to_string()],
            outcomes: vec![
                MutationOutcome {
                    mutation: "createUser".to_string(),
                    result: classify(200, r#"{"data":{"createUser":{"__typename":"User"}}}"#),
                },
                MutationOutcome {
                    mutation: "deleteUser".to_string(),
                    result: ClassificationResult::transport_failure("connection refused"),
                },
            ],
            summary: RunSummary { allowed: 1, denied: 1, total: 2 },
        }
    }

    #[test]
    fn test_report_shape() {
        let bytes = JsonReportGenerator::new().generate(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["endpoint"], "https://api.example.com/graphql");
        assert_eq!(value["strippedHeaders"][0], "Authorization");
        assert_eq!(value["outcomes"][0]["mutation"], "createUser");
        assert_eq!(value["outcomes"][0]["verdict"], "Allowed");
        assert_eq!(value["outcomes"][1]["evidence"]["signal"], "transport");
        assert_eq!(value["summary"]["total"], 2);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        JsonReportGenerator::default()
            .write_to(&sample_report(), &path)
            .unwrap();

        let written: RunReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.summary.denied, 1);
        assert_eq!(written.outcomes[1].mutation, "deleteUser");
        assert_eq!(written.outcomes[1].result.verdict, Verdict::Denied);
    }
}
