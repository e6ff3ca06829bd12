//! Domain validation pipeline for sequence-archive accessions.
//!
//! This module provides an extensible validator system that classifies
//! candidate strings (bare accessions, URLs, free-text snippets) against
//! archive-specific rules and probes whether the referenced record is
//! live, through a priority-ordered registry.
//!
//! # Architecture
//!
//! - [`DomainValidator`] - async trait whose default methods implement the
//!   shared base pipeline; archive families override the hooks
//! - [`ValidatorRegistry`] - name/domain/priority views with best/all dispatch
//! - [`InsdcValidator`] - SRA/ENA/DDBJ alliance accessions
//! - [`GsaValidator`] - NGDC Genome Sequence Archive accessions
//! - [`GeoValidator`] - Gene Expression Omnibus accessions
//!
//! # Example
//!
//! ```no_run
//! use seqref_core::validator::{ValidationContext, build_default_registry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = build_default_registry();
//! let ctx = ValidationContext::default();
//! let result = registry.validate_with_best("SRR1972739", &ctx).await?;
//! println!("{} -> valid={}", result.input, result.valid);
//! # Ok(())
//! # }
//! ```

mod cache;
pub mod engine;
mod error;
mod geo;
mod gsa;
mod http;
mod registry;
mod result;
mod sra;

pub use cache::{DEFAULT_METADATA_TTL, MetadataCache};
pub use engine::{ScoreSignals, UrlSet};
pub use error::ValidatorError;
pub use geo::GeoValidator;
pub use gsa::GsaValidator;
pub use http::{DEFAULT_METADATA_TIMEOUT, DEFAULT_PROBE_TIMEOUT, ProbeClient};
pub use registry::ValidatorRegistry;
pub use result::{DomainValidationResult, HttpValidationResult};
pub use sra::InsdcValidator;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::warn;

use crate::accession::{
    AccessionPattern, archive_info, match_in, normalize_accession, validate_accession_format,
};

/// Scientific domain shared by the built-in archive validators.
pub const GENOMICS_DOMAIN: &str = "genomics";

/// Terminal error when stage 1 finds no accession in the input.
pub const NO_ACCESSION_ERROR: &str = "no recognizable accession in input";
/// Terminal error when stage 2 finds the accession is not owned by this
/// validator. Distinct from [`NO_ACCESSION_ERROR`] so callers can tell
/// "nothing found" from "found but wrong archive".
pub const NOT_OWNED_ERROR: &str = "accession format not recognized by this validator";

/// Per-validator scoring and invalidation policy.
#[derive(Debug, Clone, Copy)]
pub struct ValidationPolicy {
    /// Confidence floor for a well-formed, owned accession
    pub base_confidence: f64,
    /// Additive bonus for well-established archives
    pub reputation_bonus: f64,
    /// When true, an unreachable primary URL invalidates the result
    /// (confidence forced to 0); when false it only reduces confidence.
    /// Intentionally asymmetric across archive families.
    pub treat_unreachable_as_invalid: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            base_confidence: 0.6,
            reputation_bonus: 0.0,
            treat_unreachable_as_invalid: false,
        }
    }
}

/// Context passed to validators during validation.
///
/// Network deadlines degrade gracefully: an expired probe or metadata
/// fetch lands in the "inaccessible"/"no metadata" branch and syntactic
/// validation still succeeds.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Deadline for the liveness probe
    pub probe_timeout: Duration,
    /// Deadline for the optional metadata fetch
    pub metadata_timeout: Duration,
    /// Skip all network operations (probe and metadata fetch)
    pub offline: bool,
}

impl ValidationContext {
    /// Creates a context with default timeouts and networking enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
            offline: false,
        }
    }

    /// Creates a context that skips every network operation.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait that all archive-family validators implement.
///
/// The provided methods are the base validation engine: extraction,
/// owned-pattern matching, classification/tagging, URL synthesis,
/// liveness probing, and confidence scoring. A family overrides the
/// hooks it specializes (`can_validate`, `synthesize_urls`, `score`,
/// `fetch_metadata`, `policy`) and inherits the rest.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn DomainValidator>`. Rust 2024 native async traits are not
/// object-safe, so `async_trait` is required for the registry pattern.
#[async_trait]
pub trait DomainValidator: Send + Sync {
    /// Returns the validator's name (e.g. "sra", "gsa", "geo").
    fn name(&self) -> &str;

    /// Returns the validator's scientific domain.
    fn domain(&self) -> &str {
        GENOMICS_DOMAIN
    }

    /// Returns the validator's dispatch priority (higher runs first).
    fn priority(&self) -> i32;

    /// Returns the catalog subset this validator owns.
    fn patterns(&self) -> &[&'static AccessionPattern];

    /// Returns the liveness probe client.
    fn probe_client(&self) -> &ProbeClient;

    /// Returns the scoring/invalidation policy for this family.
    fn policy(&self) -> ValidationPolicy {
        ValidationPolicy::default()
    }

    /// Cheap, side-effect-free probe: can this validator handle the input?
    ///
    /// The default recognizes any input from which an owned accession can
    /// be extracted; families additionally recognize their archive hosts.
    fn can_validate(&self, input: &str) -> bool {
        engine::extract_candidate(input).is_some_and(|c| match_in(self.patterns(), &c).is_some())
    }

    /// Synthesizes the primary and alternate URLs for an owned accession.
    fn synthesize_urls(&self, pattern: &AccessionPattern, accession: &str) -> UrlSet {
        engine::generic_urls(pattern, accession)
    }

    /// Computes confidence from the collected signals.
    fn score(&self, signals: &ScoreSignals<'_>) -> f64 {
        engine::score_confidence(&self.policy(), signals)
    }

    /// Best-effort remote metadata fetch. `None` means no metadata; fetch
    /// failures are fully silent by contract.
    async fn fetch_metadata(
        &self,
        _accession: &str,
        _pattern: &AccessionPattern,
        _ctx: &ValidationContext,
    ) -> Option<HashMap<String, String>> {
        None
    }

    /// Runs the full validation pipeline for one input.
    ///
    /// Extraction and ownership failures return an invalid result, not an
    /// error; network failures degrade into warnings and reduced (or, per
    /// policy, zeroed) confidence.
    ///
    /// # Errors
    ///
    /// The base pipeline itself is infallible once the validator is
    /// constructed; the `Result` is part of the registry contract so
    /// implementations with fallible infrastructure can surface it.
    async fn validate(
        &self,
        input: &str,
        ctx: &ValidationContext,
    ) -> Result<DomainValidationResult, ValidatorError> {
        let started = Instant::now();
        let mut result = DomainValidationResult::new(input, self.name(), self.domain());

        // Stage 1: extract a candidate accession from the raw input.
        let Some(candidate) = engine::extract_candidate(input) else {
            result.error = Some(NO_ACCESSION_ERROR.to_string());
            result.elapsed_ms = elapsed_ms(started);
            return Ok(result);
        };

        // Stage 2: match against this validator's owned pattern subset.
        let Some(pattern) = match_in(self.patterns(), &candidate) else {
            result.error = Some(NOT_OWNED_ERROR.to_string());
            result.elapsed_ms = elapsed_ms(started);
            return Ok(result);
        };

        // Format deviations are warnings, not failures: normalization has
        // already succeeded. Only meaningful when the input itself was the
        // accession, not a URL or text snippet containing one.
        if normalize_accession(input) == candidate {
            result.warnings = validate_accession_format(input.trim());
        }

        // Stage 3: classify and tag.
        let accession_type = pattern.accession_type;
        result.normalized_id = Some(candidate.clone());
        result.dataset_type = Some(accession_type.dataset_type().to_string());
        result.subtype = Some(accession_type.subtype().to_string());
        result.push_tag(pattern.archive.to_ascii_lowercase());
        if let Some(info) = archive_info(pattern.archive) {
            result.push_tag(info.institution);
            result
                .metadata
                .insert("archive_full_name".to_string(), info.full_name.to_string());
            result
                .metadata
                .insert("archive_url".to_string(), info.canonical_url.to_string());
            result
                .metadata
                .insert("archive_region".to_string(), info.region.to_string());
        }
        for level in accession_type.hierarchy() {
            result.push_tag(level.tag());
        }
        if accession_type.is_data_level() {
            result.push_tag("data_level");
        }

        // Stage 4: synthesize URLs.
        let urls = self.synthesize_urls(pattern, &candidate);
        result.primary_url = Some(urls.primary.clone());
        result.alternate_urls = urls.alternates;

        // Best-effort metadata enrichment; silence on failure.
        let mut metadata_fields = 0usize;
        if !ctx.offline
            && let Some(fields) = self.fetch_metadata(&candidate, pattern, ctx).await
        {
            metadata_fields = fields.len();
            for (key, value) in fields {
                result.metadata.entry(key).or_insert(value);
            }
            if metadata_fields > 0 {
                result.push_tag("remote_metadata");
            }
        }

        // Stage 5: probe liveness of the primary URL only.
        let mut unreachable_detail = None;
        let probe = if ctx.offline {
            None
        } else {
            let probe = self
                .probe_client()
                .probe(&urls.primary, ctx.probe_timeout)
                .await;
            if !probe.accessible {
                let detail = probe.status_code.map_or_else(
                    || {
                        probe
                            .error
                            .clone()
                            .unwrap_or_else(|| "no response".to_string())
                    },
                    |code| format!("HTTP {code}"),
                );
                result
                    .warnings
                    .push(format!("primary URL not reachable: {detail}"));
                unreachable_detail = Some(detail);
            }
            Some(probe)
        };

        // Stage 6: score and finalize.
        result.valid = true;
        let signals = ScoreSignals {
            probe: probe.as_ref(),
            data_level: accession_type.is_data_level(),
            run_level: accession_type.level() == crate::accession::HierarchyLevel::Run,
            metadata_fields,
        };
        let mut confidence = self.score(&signals);

        if let Some(detail) = unreachable_detail
            && self.policy().treat_unreachable_as_invalid
        {
            result.valid = false;
            confidence = 0.0;
            result.error = Some(format!("primary URL is not reachable ({detail})"));
        }

        result.confidence = confidence;
        result.likelihood = confidence;
        result.http = probe;
        result.elapsed_ms = elapsed_ms(started);
        Ok(result)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

/// Builds the default validator registry used by CLI execution flows.
///
/// Construction failures are logged and skipped so one unavailable
/// validator cannot take down the others.
#[must_use]
pub fn build_default_registry() -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new();

    match InsdcValidator::new() {
        Ok(validator) => register_or_warn(&mut registry, Arc::new(validator)),
        Err(error) => warn!(
            error = %error,
            "INSDC validator unavailable; continuing with remaining validators"
        ),
    }

    match GeoValidator::new() {
        Ok(validator) => register_or_warn(&mut registry, Arc::new(validator)),
        Err(error) => warn!(
            error = %error,
            "GEO validator unavailable; continuing with remaining validators"
        ),
    }

    match GsaValidator::new() {
        Ok(validator) => register_or_warn(&mut registry, Arc::new(validator)),
        Err(error) => warn!(
            error = %error,
            "GSA validator unavailable; continuing with remaining validators"
        ),
    }

    registry
}

fn register_or_warn(registry: &mut ValidatorRegistry, validator: Arc<dyn DomainValidator>) {
    let name = validator.name().to_string();
    if let Err(error) = registry.register(validator) {
        warn!(validator = %name, error = %error, "validator registration failed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Minimal validator relying entirely on the trait's default pipeline.
    struct BareValidator {
        patterns: Vec<&'static AccessionPattern>,
        client: ProbeClient,
    }

    impl BareValidator {
        fn sra_family() -> Self {
            Self {
                patterns: crate::accession::patterns_for_archives(&["SRA", "ENA", "DDBJ"]),
                client: ProbeClient::new("bare").unwrap(),
            }
        }
    }

    #[async_trait]
    impl DomainValidator for BareValidator {
        fn name(&self) -> &str {
            "bare"
        }

        fn priority(&self) -> i32 {
            1
        }

        fn patterns(&self) -> &[&'static AccessionPattern] {
            &self.patterns
        }

        fn probe_client(&self) -> &ProbeClient {
            &self.client
        }
    }

    #[tokio::test]
    async fn test_default_pipeline_offline_valid_run() {
        let validator = BareValidator::sra_family();
        let ctx = ValidationContext::offline();
        let result = validator.validate("SRR123456", &ctx).await.unwrap();

        assert!(result.valid);
        assert_eq!(result.normalized_id.as_deref(), Some("SRR123456"));
        assert_eq!(result.dataset_type.as_deref(), Some("sequence_data"));
        assert_eq!(result.subtype.as_deref(), Some("run"));
        assert!(result.has_tag("run_level"));
        assert!(result.has_tag("sra"));
        assert!(result.has_tag("data_level"));
        assert!(result.primary_url.unwrap().contains("SRR123456"));
        assert!(result.confidence > 0.0 && result.confidence <= 1.0);
        assert!(result.error.is_none());
        assert!(result.http.is_none(), "offline mode must skip the probe");
    }

    #[tokio::test]
    async fn test_default_pipeline_no_accession_terminal() {
        let validator = BareValidator::sra_family();
        let ctx = ValidationContext::offline();
        let result = validator.validate("plain prose here", &ctx).await.unwrap();

        assert!(!result.valid);
        assert_eq!(result.error.as_deref(), Some(NO_ACCESSION_ERROR));
        assert!(result.normalized_id.is_none());
        assert!(result.primary_url.is_none());
        assert!(result.alternate_urls.is_empty());
    }

    #[tokio::test]
    async fn test_default_pipeline_unowned_accession_distinct_error() {
        let validator = BareValidator::sra_family();
        let ctx = ValidationContext::offline();
        // GSE is owned by GEO, not the SRA family subset.
        let result = validator.validate("GSE185917", &ctx).await.unwrap();

        assert!(!result.valid);
        assert_eq!(result.error.as_deref(), Some(NOT_OWNED_ERROR));
    }

    #[tokio::test]
    async fn test_default_pipeline_lowercase_warns_but_validates() {
        let validator = BareValidator::sra_family();
        let ctx = ValidationContext::offline();
        let result = validator.validate("srr123456", &ctx).await.unwrap();

        assert!(result.valid);
        assert_eq!(result.normalized_id.as_deref(), Some("SRR123456"));
        assert!(
            result.warnings.iter().any(|w| w.contains("upper-case")),
            "lowercase input must surface a format warning"
        );
    }

    #[test]
    fn test_default_can_validate_respects_ownership() {
        let validator = BareValidator::sra_family();
        assert!(validator.can_validate("SRR123456"));
        assert!(validator.can_validate("text with ERR1700893 inside"));
        assert!(!validator.can_validate("GSE185917"));
        assert!(!validator.can_validate("INVALID123"));
    }

    #[test]
    fn test_build_default_registry_registers_three_families() {
        let registry = build_default_registry();
        assert_eq!(registry.len(), 3);
        let names: Vec<String> = registry
            .get_all()
            .iter()
            .map(|v| v.name().to_string())
            .collect();
        assert_eq!(names, vec!["sra", "geo", "gsa"]);
    }
}
