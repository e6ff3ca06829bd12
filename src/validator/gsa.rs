//! GSA family validator for NGDC Genome Sequence Archive accessions.
//!
//! International reachability of the NGDC hosts is known to be flaky, so
//! this family deliberately keeps a well-formed accession valid when the
//! primary URL does not answer and only reduces confidence. Do not align
//! this with the INSDC/GEO invalidation policy.

use async_trait::async_trait;
use url::Url;

use crate::accession::{AccessionPattern, AccessionType, match_in, patterns_for_archives};

use super::engine::{self, ScoreSignals, UrlSet};
use super::error::ValidatorError;
use super::http::ProbeClient;
use super::{DomainValidator, ValidationPolicy};

const DEFAULT_NGDC_BASE_URL: &str = "https://ngdc.cncb.ac.cn";
const GSA_FTP_BASE: &str = "ftp://download.big.ac.cn/gsa";

/// Legacy NGDC host still common in published links.
const LEGACY_NGDC_HOST: &str = "bigd.big.ac.cn";

/// Specialized validator for the NGDC Genome Sequence Archive.
pub struct GsaValidator {
    patterns: Vec<&'static AccessionPattern>,
    probe: ProbeClient,
    base_url: String,
    host: String,
}

impl GsaValidator {
    /// Creates a validator with the production NGDC endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] when HTTP client construction fails.
    pub fn new() -> Result<Self, ValidatorError> {
        Self::with_base_url(DEFAULT_NGDC_BASE_URL)
    }

    /// Creates a validator with a custom endpoint for tests.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] when HTTP client construction fails.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ValidatorError> {
        let base_url = base_url.into();
        Ok(Self {
            patterns: patterns_for_archives(&["GSA"]),
            probe: ProbeClient::new("gsa")?,
            host: Url::parse(&base_url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
                .unwrap_or_else(|| base_url.trim().to_ascii_lowercase()),
            base_url,
        })
    }
}

impl std::fmt::Debug for GsaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GsaValidator")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DomainValidator for GsaValidator {
    fn name(&self) -> &str {
        "gsa"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn patterns(&self) -> &[&'static AccessionPattern] {
        &self.patterns
    }

    fn probe_client(&self) -> &ProbeClient {
        &self.probe
    }

    fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            base_confidence: 0.80,
            reputation_bonus: 0.03,
            // Flaky international reachability must not invalidate a
            // well-formed accession.
            treat_unreachable_as_invalid: false,
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
        let host = host.to_ascii_lowercase();
        let path = url.path().to_ascii_lowercase();

        (host == self.host || host == LEGACY_NGDC_HOST)
            && (path.contains("/gsa") || path.contains("/bioproject") || path.contains("/biosample") || path.contains("/search"))
    }

    fn synthesize_urls(&self, pattern: &AccessionPattern, accession: &str) -> UrlSet {
        let base = self.base_url.trim_end_matches('/');
        match pattern.accession_type {
            AccessionType::GsaStudy => UrlSet::with_alternates(
                format!("{base}/gsa/browse/{accession}"),
                vec![
                    // Archive-level accessions are the only ones whose FTP
                    // directory is addressable without the parent context.
                    format!("{GSA_FTP_BASE}/{accession}/"),
                    format!("{base}/gsa/search?searchTerm={accession}"),
                ],
            ),
            AccessionType::GsaProject => UrlSet::with_alternates(
                format!("{base}/bioproject/browse/{accession}"),
                vec![format!("{base}/search/all?q={accession}")],
            ),
            AccessionType::GsaSample => UrlSet::with_alternates(
                format!("{base}/biosample/browse/{accession}"),
                vec![format!("{base}/search/all?q={accession}")],
            ),
            _ => UrlSet::with_alternates(
                format!("{base}/gsa/search?searchTerm={accession}"),
                vec![format!("{base}/search/all?q={accession}")],
            ),
        }
    }

    fn score(&self, signals: &ScoreSignals<'_>) -> f64 {
        let mut confidence = engine::score_confidence(&self.policy(), signals);
        if signals.run_level {
            confidence += engine::RUN_LEVEL_BONUS;
        }
        confidence.min(1.0)
    }
}
