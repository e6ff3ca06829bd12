//! GEO validator for Gene Expression Omnibus accessions.
//!
//! Every GEO record kind resolves through the `acc.cgi` endpoint; FTP
//! alternates use GEO's stub-directory layout (last three digits replaced
//! with `nnn`). Metadata comes from the same endpoint's SOFT text format.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::accession::{AccessionPattern, AccessionType, match_in, patterns_for_archives};

use super::cache::MetadataCache;
use super::engine::{self, ScoreSignals, UrlSet};
use super::error::ValidatorError;
use super::http::{ProbeClient, build_api_client};
use super::{DomainValidator, ValidationContext, ValidationPolicy};

const DEFAULT_NCBI_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov";
const GEO_FTP_BASE: &str = "ftp://ftp.ncbi.nlm.nih.gov/geo";

/// SOFT attribute suffixes worth surfacing in result metadata.
const SOFT_FIELDS: &[&str] = &["title", "type", "organism", "platform_id", "sample_id_count"];

/// Specialized validator for the Gene Expression Omnibus.
pub struct GeoValidator {
    patterns: Vec<&'static AccessionPattern>,
    probe: ProbeClient,
    api: Client,
    cache: MetadataCache,
    base_url: String,
    host: String,
}

impl GeoValidator {
    /// Creates a validator with the production NCBI endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] when HTTP client construction fails.
    pub fn new() -> Result<Self, ValidatorError> {
        Self::with_base_url(DEFAULT_NCBI_BASE_URL)
    }

    /// Creates a validator with a custom endpoint for tests.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] when HTTP client construction fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ValidatorError> {
        let base_url = base_url.into();
        Ok(Self {
            patterns: patterns_for_archives(&["GEO"]),
            probe: ProbeClient::new("geo")?,
            api: build_api_client("geo")?,
            cache: MetadataCache::with_default_ttl(),
            host: Url::parse(&base_url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
                .unwrap_or_else(|| base_url.trim().to_ascii_lowercase()),
            base_url,
        })
    }

    fn acc_cgi(&self, accession: &str) -> String {
        format!(
            "{}/geo/query/acc.cgi?acc={accession}",
            self.base_url.trim_end_matches('/')
        )
    }

    async fn fetch_soft_brief(
        &self,
        accession: &str,
        ctx: &ValidationContext,
    ) -> Option<HashMap<String, String>> {
        let url = format!("{}&targ=self&form=text&view=brief", self.acc_cgi(accession));
        let send = self.api.get(&url).send();
        let response = match tokio::time::timeout(ctx.metadata_timeout, send).await {
            Err(_) => {
                debug!(accession = %accession, "GEO SOFT fetch timed out");
                return None;
            }
            Ok(Err(e)) => {
                debug!(accession = %accession, error = %e, "GEO SOFT fetch failed");
                return None;
            }
            Ok(Ok(response)) => response,
        };

        if !response.status().is_success() {
            debug!(
                accession = %accession,
                status = response.status().as_u16(),
                "GEO SOFT fetch returned non-success status"
            );
            return None;
        }

        let body = response.text().await.ok()?;
        let fields = parse_soft_brief(&body);
        if fields.is_empty() { None } else { Some(fields) }
    }
}

impl std::fmt::Debug for GeoValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoValidator")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DomainValidator for GeoValidator {
    fn name(&self) -> &str {
        "geo"
    }

    fn priority(&self) -> i32 {
        95
    }

    fn patterns(&self) -> &[&'static AccessionPattern] {
        &self.patterns
    }

    fn probe_client(&self) -> &ProbeClient {
        &self.probe
    }

    fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            base_confidence: 0.85,
            reputation_bonus: 0.05,
            treat_unreachable_as_invalid: true,
        }
    }

    fn can_validate(&self, input: &str) -> bool {
        if engine::extract_candidate(input).is_some_and(|c| match_in(&self.patterns, &c).is_some())
        {
            return true;
        }

        let Ok(url) = Url::parse(input.trim()) else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.trim_start_matches("www.").to_ascii_lowercase();
        let base = self.host.trim_start_matches("www.");
        let path = url.path().to_ascii_lowercase();

        (host == base || host.ends_with(&format!(".{base}")))
            && (path.contains("/geo") || path.contains("/gds"))
    }

    fn synthesize_urls(&self, pattern: &AccessionPattern, accession: &str) -> UrlSet {
        let base = self.base_url.trim_end_matches('/');
        let mut alternates = vec![format!("{base}/gds/?term={accession}")];
        if let Some(ftp) = geo_ftp_path(pattern.accession_type, accession) {
            alternates.push(ftp);
        }
        UrlSet::with_alternates(self.acc_cgi(accession), alternates)
    }

    fn score(&self, signals: &ScoreSignals<'_>) -> f64 {
        let confidence = engine::score_confidence(&self.policy(), signals)
            + engine::metadata_bonus(signals.metadata_fields);
        confidence.min(1.0)
    }

    async fn fetch_metadata(
        &self,
        accession: &str,
        _pattern: &AccessionPattern,
        ctx: &ValidationContext,
    ) -> Option<HashMap<String, String>> {
        if let Some(cached) = self.cache.get(accession) {
            return Some(cached);
        }

        let fields = self.fetch_soft_brief(accession, ctx).await?;
        self.cache.insert(accession, fields.clone());
        Some(fields)
    }
}

/// GEO FTP stub directory for an accession (last three digits → `nnn`).
fn geo_ftp_stub(accession: &str) -> String {
    let digits_start = accession
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(accession.len());
    let (prefix, digits) = accession.split_at(digits_start);
    if digits.len() <= 3 {
        format!("{prefix}nnn")
    } else {
        format!("{prefix}{}nnn", &digits[..digits.len() - 3])
    }
}

/// FTP directory for a GEO record, per record-kind layout.
fn geo_ftp_path(accession_type: AccessionType, accession: &str) -> Option<String> {
    let kind = match accession_type {
        AccessionType::GeoSeries => "series",
        AccessionType::GeoSample => "samples",
        AccessionType::GeoPlatform => "platforms",
        AccessionType::GeoDataset => "datasets",
        _ => return None,
    };
    Some(format!(
        "{GEO_FTP_BASE}/{kind}/{}/{accession}/",
        geo_ftp_stub(accession)
    ))
}

/// Parses a SOFT brief response (`!Series_title = ...` lines) into the
/// metadata fields listed in [`SOFT_FIELDS`]. First occurrence wins.
fn parse_soft_brief(body: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for line in body.lines() {
        let Some(rest) = line.strip_prefix('!') else {
            continue;
        };
        let Some((raw_key, value)) = rest.split_once(" = ") else {
            continue;
        };
        // "Series_title" → "title"; record-kind prefix is already in the
        // result's subtype.
        let Some((_, key)) = raw_key.split_once('_') else {
            continue;
        };
        let key = key.to_ascii_lowercase();
        let value = value.trim();
        if SOFT_FIELDS.contains(&key.as_str()) && !value.is_empty() {
            fields
                .entry(key)
                .or_insert_with(|| value.to_string());
        }
    }
    fields
}
