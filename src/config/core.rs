// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Proxy used when `--proxy` is given without a value
pub const DEFAULT_PROXY: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProbeConfig {
    /// Pause between consecutive mutations
    pub delay_secs: u64,

    /// Scheme for relative request targets
    pub use_ssl: bool,

    /// Header names removed before mutations are executed
    pub unauth_headers: Vec<String>,

    pub proxy: Option<String>,

    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_secs: u64,

    pub accept_invalid_certs: bool,

    pub cache_input_types: bool,

    #[validate(range(min = 1, max = 64))]
    pub max_input_depth: usize,

    pub log_responses: bool,

    #[validate(nested)]
    pub output: OutputConfig,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            delay_secs: 1,
            use_ssl: true,
            unauth_headers: Vec::new(),
            proxy: None,
            request_timeout_secs: default_timeout(),
            accept_invalid_certs: false,
            cache_input_types: false,
            max_input_depth: default_max_input_depth(),
            log_responses: false,
            output: OutputConfig::default(),
        }
    }
}

impl ProbeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,

    #[validate(length(min = 1))]
    pub all_mutations: String,

    #[validate(length(min = 1))]
    pub allowed_mutations: String,

    #[validate(length(min = 1))]
    pub unallowed_mutations: String,

    /// Optional machine-readable run report
    pub json_report: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            all_mutations: "allMutations.txt".to_string(),
            allowed_mutations: "allowedMutations.txt".to_string(),
            unallowed_mutations: "unallowedMutations.txt".to_string(),
            json_report: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_input_depth() -> usize {
    crate::payloads::DEFAULT_MAX_INPUT_DEPTH
}
