// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use validator::Validate;

use super::core::ProbeConfig;

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &ProbeConfig) -> Result<()> {
        config
            .validate()
            .context("Configuration validation failed")?;

        Self::validate_proxy(config)?;
        Self::validate_unauth_headers(config)?;

        Ok(())
    }

    fn validate_proxy(config: &ProbeConfig) -> Result<()> {
        let Some(proxy) = config.proxy.as_deref() else {
            return Ok(());
        };

        let url = url::Url::parse(proxy).with_context(|| format!("Invalid proxy URL: {}", proxy))?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(anyhow::anyhow!("Unsupported proxy scheme: {}", scheme)),
        }
    }

    fn validate_unauth_headers(config: &ProbeConfig) -> Result<()> {
        if let Some(name) = config
            .unauth_headers
            .iter()
            .find(|name| name.trim().is_empty() || name.contains(':'))
        {
            return Err(anyhow::anyhow!("Invalid header name in unauth list: {:?}", name));
        }

        Ok(())
    }

    /// Non-fatal observations about a valid configuration
    pub fn warnings(config: &ProbeConfig) -> Vec<String> {
        let mut warnings = Vec::new();

        if config.accept_invalid_certs && config.proxy.is_none() {
            warnings.push("TLS certificate validation is disabled".to_string());
        }

        if config.unauth_headers.is_empty() {
            warnings.push(
                "No unauth headers configured, mutations run with the captured credentials"
                    .to_string(),
            );
        }

        warnings
    }
}
