// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Captured HTTP request parsing
//!
//! Reads a raw request as exported from an intercepting proxy and extracts the
//! endpoint, the header set and the body.

use std::path::Path;
use tracing::debug;

use crate::credentials::CredentialSet;
use crate::errors::{ProbeError, ProbeResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    pub method: String,
    /// Fully qualified endpoint URL
    pub endpoint: String,
    /// Headers in capture order, names as captured
    pub headers: CredentialSet,
    pub body: String,
}

impl CapturedRequest {
    pub fn from_file<P: AsRef<Path>>(path: P, use_ssl: bool) -> ProbeResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ProbeError::config(format!("Failed to read request file {}: {}", path.display(), e))
        })?;

        Self::parse(&raw, use_ssl)
    }

    /// Parse a raw HTTP/1.x request. A relative request target is resolved
    /// against the Host header with `https` unless `use_ssl` is false.
    pub fn parse(raw: &str, use_ssl: bool) -> ProbeResult<Self> {
        let mut lines = raw.lines().map(|line| line.trim_end_matches('\r'));

        let request_line = lines
            .by_ref()
            .find(|line| !line.trim().is_empty())
            .ok_or_else(|| ProbeError::config("Request file is empty"))?;

        let mut parts = request_line.split_whitespace();
        let (method, target) = match (parts.next(), parts.next()) {
            (Some(method), Some(target)) => (method.to_string(), target.to_string()),
            _ => {
                return Err(ProbeError::config(format!(
                    "No endpoint path found in request line: {}",
                    request_line
                )))
            }
        };

        let mut headers = CredentialSet::new();
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers = headers.with_header(name.trim(), value.trim());
            }
        }

        let body = lines.collect::<Vec<_>>().join("\n");

        let endpoint = if target.starts_with("http://") || target.starts_with("https://") {
            target
        } else {
            let host = host_header(&headers)
                .ok_or_else(|| ProbeError::config("No Host header found, can't determine endpoint"))?;
            let scheme = if use_ssl { "https" } else { "http" };
            format!("{}://{}{}", scheme, host, target)
        };

        url::Url::parse(&endpoint)
            .map_err(|e| ProbeError::config(format!("Invalid endpoint {}: {}", endpoint, e)))?;

        debug!(
            "[Request] {} {} with {} headers, {} byte body",
            method,
            endpoint,
            headers.len(),
            body.len()
        );

        Ok(Self {
            method,
            endpoint,
            headers,
            body,
        })
    }
}

fn host_header(headers: &CredentialSet) -> Option<&str> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("host"))
        .map(|(_, value)| value)
}
