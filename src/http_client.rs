// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::credentials::CredentialSet;
use crate::errors::{NetworkError, ProbeError, ProbeResult};

/// Responses are read up to this many bytes (10MB), the rest is discarded unread
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Captured headers that describe the original message framing, not the caller.
/// reqwest derives these itself from the new payload.
const SKIPPED_HEADERS: &[&str] = &[
    "host",
    "content-length",
    "transfer-encoding",
    "connection",
    "accept-encoding",
];

/// Sends one GraphQL payload and returns the fully buffered response
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn send(
        &self,
        endpoint: &str,
        credentials: &CredentialSet,
        payload: &[u8],
    ) -> ProbeResult<HttpResponse>;
}

/// Transport settings for [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout_secs: u64,
    pub proxy: Option<String>,
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            proxy: None,
            accept_invalid_certs: false,
        }
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
    max_body_size: usize,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> ProbeResult<Self> {
        Self::with_config(&HttpClientConfig {
            timeout_secs,
            ..HttpClientConfig::default()
        })
    }

    pub fn with_config(config: &HttpClientConfig) -> ProbeResult<Self> {
        // Intercepting proxies (Burp, ZAP) re-sign TLS with their own CA
        if config.accept_invalid_certs {
            warn!("[Executor] Certificate validation is DISABLED for this run");
        }

        let mut client_builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(|e| {
                ProbeError::Network(NetworkError::ProxyError {
                    reason: format!("Invalid proxy URL {}: {}", proxy_url, e),
                })
            })?;
            client_builder = client_builder.proxy(proxy);
            debug!("[Executor] Routing requests through proxy {}", proxy_url);
        } else {
            client_builder = client_builder.no_proxy();
        }

        let client = client_builder
            .build()
            .map_err(|e| ProbeError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            max_body_size: MAX_BODY_SIZE,
        })
    }

    /// Timeouts carry the configured limit, everything else goes through `From`
    fn transport_error(&self, err: reqwest::Error) -> ProbeError {
        if err.is_timeout() {
            ProbeError::Network(NetworkError::ConnectionTimeout {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                timeout: self.timeout,
            })
        } else {
            err.into()
        }
    }

    /// Default JSON headers overlaid with the credential set
    fn build_headers(&self, credentials: &CredentialSet) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(credentials.len() + 1);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in credentials.iter() {
            if SKIPPED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                continue;
            }

            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(header_name), Ok(header_value)) => {
                    headers.insert(header_name, header_value);
                }
                _ => warn!("[Executor] Skipping malformed header: {}", name),
            }
        }

        headers
    }
}

#[async_trait]
impl RequestExecutor for HttpClient {
    async fn send(
        &self,
        endpoint: &str,
        credentials: &CredentialSet,
        payload: &[u8],
    ) -> ProbeResult<HttpResponse> {
        let started = Instant::now();

        let mut response = self
            .client
            .post(endpoint)
            .headers(self.build_headers(credentials))
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status_code = response.status().as_u16();

        let mut body_bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.transport_error(e))? {
            let remaining = self.max_body_size - body_bytes.len();
            if chunk.len() > remaining {
                body_bytes.extend_from_slice(&chunk[..remaining]);
                warn!(
                    "[Executor] Response from {} exceeds {} bytes, truncated",
                    endpoint, self.max_body_size
                );
                break;
            }
            body_bytes.extend_from_slice(&chunk);
        }
        let body = String::from_utf8_lossy(&body_bytes).into_owned();

        debug!(
            "[Executor] POST {} -> {} ({} bytes, {}ms)",
            endpoint,
            status_code,
            body.len(),
            started.elapsed().as_millis()
        );

        Ok(HttpResponse { status_code, body })
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn contains(&self, pattern: &str) -> bool {
        self.body.contains(pattern)
    }
}
