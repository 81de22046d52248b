// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Authorization classification of mutation responses
//!
//! Signals are evaluated in a fixed precedence, first match wins:
//! 1. HTTP 401 / 403
//! 2. a GraphQL error with a denial `extensions.code`
//! 3. a GraphQL error message containing denial vocabulary
//! 4. GraphQL errors with `data` null or absent
//! 5. denial vocabulary anywhere in the raw body
//!
//! Everything else is Allowed, including 400 validation errors that still carry
//! `data` and 5xx server errors. The classifier is total.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Structured error codes that signal an authorization failure
const DENIAL_CODES: &[&str] = &["UNAUTHENTICATED", "FORBIDDEN", "ACCESS_DENIED"];

static DENIAL_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)unauthorized|forbidden|access denied|restricted").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Allowed,
    Denied,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Allowed => write!(f, "allowed"),
            Verdict::Denied => write!(f, "denied"),
        }
    }
}

/// Signal that decided the verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Evidence {
    Status { status_code: u16 },
    ErrorCode { status_code: u16, code: String },
    ErrorMessage { status_code: u16, keyword: String },
    NullData { status_code: u16 },
    BodyKeyword { status_code: u16, keyword: String },
    /// Request never completed. Counted as Denied.
    Transport { reason: String },
    NoDenialSignal { status_code: u16 },
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::Status { status_code } => write!(f, "HTTP {}", status_code),
            Evidence::ErrorCode { status_code, code } => {
                write!(f, "HTTP {}, error code {}", status_code, code)
            }
            Evidence::ErrorMessage { status_code, keyword } => {
                write!(f, "HTTP {}, error message matched '{}'", status_code, keyword)
            }
            Evidence::NullData { status_code } => {
                write!(f, "HTTP {}, errors with null data", status_code)
            }
            Evidence::BodyKeyword { status_code, keyword } => {
                write!(f, "HTTP {}, body matched '{}'", status_code, keyword)
            }
            Evidence::Transport { reason } => write!(f, "transport failure: {}", reason),
            Evidence::NoDenialSignal { status_code } => {
                write!(f, "HTTP {}, no denial signal", status_code)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub verdict: Verdict,
    pub evidence: Evidence,
}

impl ClassificationResult {
    fn denied(evidence: Evidence) -> Self {
        Self { verdict: Verdict::Denied, evidence }
    }

    /// Unreachable target, folded into Denied
    pub fn transport_failure(reason: impl Into<String>) -> Self {
        Self::denied(Evidence::Transport { reason: reason.into() })
    }

    pub fn is_denied(&self) -> bool {
        self.verdict == Verdict::Denied
    }

    /// Denied because the server answered with a denial, not because it was unreachable
    pub fn denied_by_server(&self) -> bool {
        self.is_denied() && !matches!(self.evidence, Evidence::Transport { .. })
    }
}

/// Classify a completed response
pub fn classify(status_code: u16, body: &str) -> ClassificationResult {
    if status_code == 401 || status_code == 403 {
        return ClassificationResult::denied(Evidence::Status { status_code });
    }

    if let Ok(envelope) = serde_json::from_str::<Value>(body) {
        let errors = envelope
            .get("errors")
            .and_then(Value::as_array)
            .filter(|errors| !errors.is_empty());

        if let Some(errors) = errors {
            if let Some(code) = errors.iter().find_map(denial_code) {
                return ClassificationResult::denied(Evidence::ErrorCode { status_code, code });
            }

            if let Some(keyword) = errors.iter().find_map(denial_message) {
                return ClassificationResult::denied(Evidence::ErrorMessage {
                    status_code,
                    keyword,
                });
            }

            if envelope.get("data").map_or(true, Value::is_null) {
                return ClassificationResult::denied(Evidence::NullData { status_code });
            }
        }
    }

    // Non-standard error envelopes
    if let Some(found) = DENIAL_KEYWORDS.find(body) {
        return ClassificationResult::denied(Evidence::BodyKeyword {
            status_code,
            keyword: found.as_str().to_lowercase(),
        });
    }

    ClassificationResult {
        verdict: Verdict::Allowed,
        evidence: Evidence::NoDenialSignal { status_code },
    }
}

fn denial_code(error: &Value) -> Option<String> {
    let code = error.get("extensions")?.get("code")?.as_str()?;
    DENIAL_CODES
        .iter()
        .find(|denial| denial.eq_ignore_ascii_case(code))
        .map(|denial| denial.to_string())
}

fn denial_message(error: &Value) -> Option<String> {
    let message = error.get("message")?.as_str()?;
    DENIAL_KEYWORDS
        .find(message)
        .map(|found| found.as_str().to_lowercase())
}
