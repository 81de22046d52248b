// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Mutation Authorization Tester
//!
//! Drives a complete run against one GraphQL endpoint:
//! - discovers the mutation catalog with the captured (authenticated) headers
//! - optionally strips the configured headers for the unauthenticated phase
//! - synthesizes, executes and classifies every mutation in schema order
//! - records each verdict to the result sinks as soon as it is known
//!
//! Execution is strictly sequential with a fixed pause after every mutation.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::auth_classifier::{classify, ClassificationResult, Verdict};
use crate::credentials::CredentialSet;
use crate::errors::{ProbeError, ProbeResult};
use crate::graphql_introspection::SchemaIntrospector;
use crate::http_client::RequestExecutor;
use crate::payloads::{PayloadSynthesizer, DEFAULT_MAX_INPUT_DEPTH};
use crate::reporting::{MutationOutcome, ResultSinks, RunReport, RunSummary};

// ============================================================================
// Confirmation
// ============================================================================

/// Decides whether a run may continue when some unauth headers are absent
/// from the captured request.
pub trait Confirm: Send + Sync {
    fn confirm_missing_headers(&self, missing: &[&str]) -> ProbeResult<bool>;
}

/// Always proceeds
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm_missing_headers(&self, missing: &[&str]) -> ProbeResult<bool> {
        warn!(
            "[Tester] Headers not present in request, continuing: {}",
            missing.join(", ")
        );
        Ok(true)
    }
}

// ============================================================================
// Tester
// ============================================================================

#[derive(Debug, Clone)]
pub struct TesterConfig {
    /// Pause after each classified mutation
    pub delay: Duration,
    /// Header names removed before mutations are executed
    pub unauth_headers: Vec<String>,
    pub cache_input_types: bool,
    pub max_input_depth: usize,
    /// Log every raw mutation response body
    pub log_responses: bool,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            unauth_headers: Vec::new(),
            cache_input_types: false,
            max_input_depth: DEFAULT_MAX_INPUT_DEPTH,
            log_responses: false,
        }
    }
}

pub struct MutationAuthTester {
    executor: Arc<dyn RequestExecutor>,
    endpoint: String,
    config: TesterConfig,
    confirm: Box<dyn Confirm>,
}

impl MutationAuthTester {
    pub fn new(
        executor: Arc<dyn RequestExecutor>,
        endpoint: impl Into<String>,
        config: TesterConfig,
    ) -> Self {
        Self {
            executor,
            endpoint: endpoint.into(),
            config,
            confirm: Box::new(AutoConfirm),
        }
    }

    pub fn with_confirm(mut self, confirm: Box<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Run the full discovery and test cycle.
    ///
    /// Fails before any request if the confirmation is declined, and fails
    /// without testing anything if the schema cannot be fetched. Per-mutation
    /// transport failures are recorded as Denied and do not stop the run.
    pub async fn run(
        &self,
        credentials: CredentialSet,
        sinks: &mut ResultSinks,
    ) -> ProbeResult<RunReport> {
        self.preflight(&credentials)?;
        self.execute(credentials, sinks).await
    }

    /// Confirm unauth headers that are absent from the captured request
    pub fn preflight(&self, credentials: &CredentialSet) -> ProbeResult<()> {
        let missing = credentials.missing(&self.config.unauth_headers);
        if !missing.is_empty() && !self.confirm.confirm_missing_headers(&missing)? {
            return Err(ProbeError::Aborted {
                reason: format!("headers not present in request: {}", missing.join(", ")),
            });
        }
        Ok(())
    }

    /// Discovery and testing without the preflight check
    pub async fn execute(
        &self,
        credentials: CredentialSet,
        sinks: &mut ResultSinks,
    ) -> ProbeResult<RunReport> {
        let started_at = Utc::now();

        let introspector = SchemaIntrospector::new(Arc::clone(&self.executor));
        let mutations = introspector
            .fetch_mutations(&self.endpoint, &credentials)
            .await?;

        for mutation in &mutations {
            sinks.discovered.append(&mutation.name)?;
        }

        let stripped_headers: Vec<String> = self
            .config
            .unauth_headers
            .iter()
            .filter(|name| credentials.contains(name))
            .cloned()
            .collect();

        // One-way transition: stripped headers are never restored
        let credentials = if self.config.unauth_headers.is_empty() {
            credentials
        } else {
            info!(
                "[Tester] Testing without headers: {}",
                self.config.unauth_headers.join(", ")
            );
            credentials.without(&self.config.unauth_headers)
        };

        let mut synthesizer = PayloadSynthesizer::new(introspector)
            .with_cache(self.config.cache_input_types)
            .with_max_depth(self.config.max_input_depth);

        let mut summary = RunSummary::default();
        let mut outcomes = Vec::with_capacity(mutations.len());

        for (index, mutation) in mutations.iter().enumerate() {
            info!(
                "[Tester] [{}/{}] Testing {}",
                index + 1,
                mutations.len(),
                mutation.name
            );

            let document = synthesizer
                .synthesize(mutation, &self.endpoint, &credentials)
                .await;

            let result = match self
                .executor
                .send(&self.endpoint, &credentials, &document.to_bytes())
                .await
            {
                Ok(response) => {
                    if self.config.log_responses {
                        info!(
                            "[Tester] {} response (HTTP {}): {}",
                            mutation.name, response.status_code, response.body
                        );
                    }
                    classify(response.status_code, &response.body)
                }
                Err(e) => {
                    warn!("[Tester] {} request failed: {}", mutation.name, e);
                    ClassificationResult::transport_failure(e.to_string())
                }
            };

            debug!("[Tester] {} -> {} ({})", mutation.name, result.verdict, result.evidence);

            match result.verdict {
                Verdict::Allowed => sinks.allowed.append(&mutation.name)?,
                Verdict::Denied => sinks.denied.append(&mutation.name)?,
            }
            summary.record(result.verdict);
            outcomes.push(MutationOutcome {
                mutation: mutation.name.clone(),
                result,
            });

            if !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        info!(
            "[Tester] Completed: {} allowed, {} unauthorized, {} total",
            summary.allowed, summary.denied, summary.total
        );

        Ok(RunReport {
            endpoint: self.endpoint.clone(),
            started_at,
            finished_at: Utc::now(),
            stripped_headers,
            discovered: mutations.into_iter().map(|m| m.name).collect(),
            outcomes,
            summary,
        })
    }
}
