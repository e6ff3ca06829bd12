//! Shared pieces of the base validation pipeline: candidate extraction
//! from raw strings/URLs/free text, and the confidence-scoring formula.

use url::Url;

use crate::accession::{
    AccessionPattern, archive_info, extract_accessions_from_text, match_accession,
    normalize_accession,
};

use super::ValidationPolicy;
use super::result::HttpValidationResult;

/// Query parameter names commonly carrying an accession in archive URLs.
const QUERY_PARAM_KEYS: &[&str] = &["acc", "accession", "id", "term", "query", "searchterm"];

/// Extracts a normalized accession candidate from raw input.
///
/// Tried in order: direct match of the whole (trimmed, upper-cased)
/// input against the catalog; extraction from URL query parameters and
/// path segments; free-text scan for any embedded accession.
#[must_use]
pub fn extract_candidate(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let direct = normalize_accession(trimmed);
    if match_accession(&direct).is_some() {
        return Some(direct);
    }

    if looks_like_url(trimmed)
        && let Ok(url) = Url::parse(trimmed)
        && let Some(candidate) = extract_from_url(&url)
    {
        return Some(candidate);
    }

    extract_accessions_from_text(trimmed).into_iter().next()
}

fn looks_like_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://") || input.starts_with("ftp://")
}

/// Extracts an accession from a URL's query parameters or path segments.
fn extract_from_url(url: &Url) -> Option<String> {
    for (key, value) in url.query_pairs() {
        if !QUERY_PARAM_KEYS.contains(&key.to_ascii_lowercase().as_str()) {
            continue;
        }
        let candidate = normalize_accession(&value);
        if match_accession(&candidate).is_some() {
            return Some(candidate);
        }
        // Parameter values sometimes carry surrounding text ("term=runs+SRR123456")
        if let Some(embedded) = extract_accessions_from_text(&value).into_iter().next() {
            return Some(embedded);
        }
    }

    if let Some(segments) = url.path_segments() {
        for segment in segments {
            let candidate = normalize_accession(segment);
            if match_accession(&candidate).is_some() {
                return Some(candidate);
            }
        }
    }

    // Double-encoded query strings defeat query_pairs; decode once more
    // and scan the raw text.
    if let Some(raw_query) = url.query() {
        let decoded = urlencoding::decode(raw_query)
            .map(std::borrow::Cow::into_owned)
            .unwrap_or_else(|_| raw_query.to_string());
        if let Some(embedded) = extract_accessions_from_text(&decoded).into_iter().next() {
            return Some(embedded);
        }
    }

    None
}

/// Primary URL plus alternate mirrors/APIs for one accession.
#[derive(Debug, Clone)]
pub struct UrlSet {
    /// Canonical URL; the only one whose liveness is probed
    pub primary: String,
    /// Mirror, API, and FTP alternates (liveness not guaranteed)
    pub alternates: Vec<String>,
}

impl UrlSet {
    /// Creates a URL set with no alternates.
    #[must_use]
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            alternates: Vec::new(),
        }
    }

    /// Creates a URL set with alternates.
    #[must_use]
    pub fn with_alternates(primary: impl Into<String>, alternates: Vec<String>) -> Self {
        Self {
            primary: primary.into(),
            alternates,
        }
    }
}

/// Generic URL-synthesis fallback: canonical archive URL with the
/// accession as a trailing path segment.
///
/// Every registered family currently overrides synthesis; this keeps a
/// future archive family usable before it supplies its own rules.
#[must_use]
pub fn generic_urls(pattern: &AccessionPattern, accession: &str) -> UrlSet {
    let base = archive_info(pattern.archive)
        .map_or("https://www.ncbi.nlm.nih.gov", |info| info.canonical_url);
    UrlSet::new(format!("{}/{accession}", base.trim_end_matches('/')))
}

// ==================== Confidence Scoring ====================

/// Bonus applied when the primary URL answered 2xx/3xx.
pub const ACCESSIBILITY_BONUS: f64 = 0.25;
/// Bonus applied when the matched type references downloadable data.
pub const DATA_LEVEL_BONUS: f64 = 0.10;
/// Specialized-validator bonus for the most specific (run) accessions.
pub const RUN_LEVEL_BONUS: f64 = 0.05;
/// Multiplier applied when the primary URL was probed and unreachable
/// (archives whose policy keeps such results valid).
pub const UNREACHABLE_PENALTY: f64 = 0.5;
/// Per-field bonus for remote metadata completeness.
pub const METADATA_FIELD_BONUS: f64 = 0.01;
/// Cap on the total metadata completeness bonus.
pub const METADATA_BONUS_CAP: f64 = 0.05;

/// Additive signals feeding the confidence formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreSignals<'a> {
    /// Liveness probe outcome, when a probe ran
    pub probe: Option<&'a HttpValidationResult>,
    /// The matched type is data-bearing
    pub data_level: bool,
    /// The matched type is run-level (most specific)
    pub run_level: bool,
    /// Number of fields obtained from the remote metadata fetch
    pub metadata_fields: usize,
}

/// Content-type increment for accessible endpoints: structured API
/// responses (JSON/XML) rate slightly above HTML record pages.
#[must_use]
pub fn content_type_bonus(content_type: &str) -> f64 {
    let mime = content_type
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_ascii_lowercase();
    if mime.contains("json") || mime.contains("xml") {
        0.03
    } else if mime.contains("html") {
        0.02
    } else {
        0.0
    }
}

/// Metadata completeness bonus, capped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn metadata_bonus(fields: usize) -> f64 {
    (fields as f64 * METADATA_FIELD_BONUS).min(METADATA_BONUS_CAP)
}

/// Base confidence formula shared by all validators.
///
/// Strictly additive over the signals (monotonic: enabling any signal can
/// only raise the score), then penalized multiplicatively when a probe
/// ran and the primary URL was unreachable, and clamped to 1.0.
#[must_use]
pub fn score_confidence(policy: &ValidationPolicy, signals: &ScoreSignals<'_>) -> f64 {
    let mut confidence = policy.base_confidence + policy.reputation_bonus;

    match signals.probe {
        Some(probe) if probe.accessible => {
            confidence += ACCESSIBILITY_BONUS;
            if let Some(content_type) = &probe.content_type {
                confidence += content_type_bonus(content_type);
            }
        }
        _ => {}
    }

    if signals.data_level {
        confidence += DATA_LEVEL_BONUS;
    }

    if let Some(probe) = signals.probe
        && !probe.accessible
    {
        confidence *= UNREACHABLE_PENALTY;
    }

    confidence.min(1.0)
}
