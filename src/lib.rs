// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - GraphQL Mutation Authorization Tester
 * Discovers every mutation a GraphQL endpoint exposes, replays each one with
 * stripped credentials and classifies whether the server enforced authorization
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

pub mod auth_classifier;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod graphql_introspection;
pub mod http_client;
pub mod orchestrator;
pub mod payloads;
pub mod reporting;
pub mod request_file;
pub mod type_ref;

pub use auth_classifier::{classify, ClassificationResult, Evidence, Verdict};
pub use credentials::CredentialSet;
pub use errors::{NetworkError, ProbeError, ProbeResult};
pub use http_client::{HttpClient, HttpClientConfig, HttpResponse, RequestExecutor};
pub use orchestrator::{AutoConfirm, Confirm, MutationAuthTester, TesterConfig};
