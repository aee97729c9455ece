//! HTTP prober for the coreference-resolution endpoint
//!
//! Walks the candidate host list in order, POSTing a fixed sample sentence to
//! each, and stops at the first host that answers 200 with a JSON body.
//! Request failures are logged and skipped; there are no per-host retries.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::ResolverSettings;
use crate::error::{Error, Result};

/// A live resolver endpoint found during a scan
#[derive(Debug, Clone)]
pub struct ResolverHit {
    /// Host that answered
    pub host: String,

    /// The JSON body it returned
    pub body: serde_json::Value,
}

/// Sequential prober for the resolver endpoint
pub struct ResolverProber {
    client: reqwest::Client,
    settings: ResolverSettings,
}

impl ResolverProber {
    /// Create a prober with the configured per-request timeout
    pub fn new(settings: &ResolverSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            settings: settings.clone(),
        })
    }

    /// Probe hosts in order, stopping at the first live endpoint.
    ///
    /// Returns `None` when every host failed; the caller reports that as an
    /// explicit not-found result rather than an error.
    pub async fn scan(&self, hosts: &[String]) -> Option<ResolverHit> {
        let targets: Vec<(String, String)> = hosts
            .iter()
            .map(|h| (h.clone(), format!("{}:{}", h, self.settings.port)))
            .collect();
        self.scan_targets(&targets).await
    }

    /// Probe explicit `(host, authority)` pairs in order.
    ///
    /// Split out from [`scan`](Self::scan) so the stop-on-first-hit behavior
    /// is exercisable against loopback listeners.
    pub(crate) async fn scan_targets(&self, targets: &[(String, String)]) -> Option<ResolverHit> {
        for (host, authority) in targets {
            debug!(host = %host, "Probing resolver endpoint");
            match self.probe(authority).await {
                Ok(Some(body)) => {
                    info!(host = %host, "Resolver endpoint is live");
                    return Some(ResolverHit {
                        host: host.clone(),
                        body,
                    });
                }
                Ok(None) => {
                    // Non-200 answer was already logged; move on
                }
                Err(e) => {
                    warn!(host = %host, error = %e.format_for_log(), "Resolver probe failed");
                }
            }
        }
        None
    }

    /// Issue one POST against one authority.
    ///
    /// `Ok(Some(body))` means HTTP 200 with a JSON body; `Ok(None)` means the
    /// endpoint answered with another status; `Err` covers transport and
    /// decode failures.
    async fn probe(&self, authority: &str) -> Result<Option<serde_json::Value>> {
        let url = format!("http://{}{}", authority, self.settings.path);
        let payload = json!({ "text": self.settings.sample_text });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::connection_timeout(authority, self.settings.timeout_secs)
                } else {
                    Error::connection_failed(authority, e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(authority = %authority, status = %status, "Resolver answered non-200");
            return Ok(None);
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| Error::decode(format!("resolver body from {}: {}", authority, e)))?;

        Ok(Some(body))
    }
}
