//! Shared HTTP client construction policy and the liveness probe.
//!
//! This module centralizes validator networking defaults so all archive
//! validators stay consistent on timeout, user-agent, compression, and
//! redirect behavior.

use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED, SERVER};
use reqwest::{Client, redirect};
use tracing::debug;

use crate::user_agent::{default_api_user_agent, default_probe_user_agent};

use super::error::ValidatorError;
use super::result::HttpValidationResult;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Default per-probe deadline.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
/// Default per-metadata-fetch deadline (shorter; the fetch is best-effort).
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for liveness probes.
///
/// Redirects are not followed: 3xx already proves the record endpoint is
/// live, and following it would report the mirror's status instead.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    client: Client,
}

impl ProbeClient {
    /// Creates a probe client with shared project policy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::ClientConstruction`] when the underlying
    /// client cannot be built.
    pub fn new(validator_name: &str) -> Result<Self, ValidatorError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .user_agent(default_probe_user_agent())
            .redirect(redirect::Policy::none())
            .gzip(true)
            .build()
            .map_err(|e| ValidatorError::client_construction(validator_name, &e.to_string()))?;
        Ok(Self { client })
    }

    /// Issues a HEAD request against `url`, bounded by `timeout`.
    ///
    /// Never fails: network errors, timeouts, and non-2xx/3xx statuses all
    /// degrade into an inaccessible [`HttpValidationResult`].
    #[tracing::instrument(skip(self), fields(url = %url))]
    pub async fn probe(&self, url: &str, timeout: Duration) -> HttpValidationResult {
        let started = Instant::now();
        let send = self.client.head(url).send();

        let response = match tokio::time::timeout(timeout, send).await {
            Err(_) => {
                debug!(timeout_ms = timeout.as_millis(), "liveness probe timed out");
                return HttpValidationResult::unreachable(
                    format!("liveness probe timed out after {}ms", timeout.as_millis()),
                    elapsed_ms(started),
                );
            }
            Ok(Err(e)) => {
                debug!(error = %e, "liveness probe transport failure");
                return HttpValidationResult::unreachable(
                    format!("liveness probe failed: {e}"),
                    elapsed_ms(started),
                );
            }
            Ok(Ok(response)) => response,
        };

        let status = response.status();
        let accessible = status.is_success() || status.is_redirection();
        let headers = response.headers();

        let header_str =
            |name| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);

        // Surface Last-Modified only when it parses as a real HTTP-date.
        let last_modified = header_str(LAST_MODIFIED)
            .filter(|value| httpdate::parse_http_date(value).is_ok());

        let mut selected = std::collections::HashMap::new();
        if let Some(server) = header_str(SERVER) {
            selected.insert("server".to_string(), server);
        }
        if let Some(etag) = header_str(ETAG) {
            selected.insert("etag".to_string(), etag);
        }

        debug!(status = status.as_u16(), accessible, "liveness probe completed");

        HttpValidationResult {
            accessible,
            status_code: Some(status.as_u16()),
            content_type: header_str(CONTENT_TYPE),
            content_length: header_str(CONTENT_LENGTH).and_then(|v| v.parse().ok()),
            last_modified,
            headers: selected,
            error: None,
            elapsed_ms: elapsed_ms(started),
        }
    }
}

/// Builds a metadata API client (follows redirects, shared UA/timeouts).
///
/// # Errors
///
/// Returns [`ValidatorError::ClientConstruction`] when the underlying
/// client cannot be built.
pub fn build_api_client(validator_name: &str) -> Result<Client, ValidatorError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .user_agent(default_api_user_agent())
        .gzip(true)
        .build()
        .map_err(|e| ValidatorError::client_construction(validator_name, &e.to_string()))
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
