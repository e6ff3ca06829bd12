//! Output records produced by the validation pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Outcome of a single liveness probe against a candidate URL.
///
/// Ephemeral: produced and consumed within one validation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpValidationResult {
    /// True for 2xx/3xx responses
    pub accessible: bool,
    /// HTTP status code, when a response was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Content-Type header value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Content-Length header value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    /// Last-Modified header, surfaced only when it parses as an HTTP-date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    /// Selected response headers (server, etag)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Transport or timeout error, when no response was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Probe duration in milliseconds
    pub elapsed_ms: f64,
}

impl HttpValidationResult {
    /// Creates an inaccessible result carrying a probe error.
    #[must_use]
    pub fn unreachable(error: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            accessible: false,
            status_code: None,
            content_type: None,
            content_length: None,
            last_modified: None,
            headers: HashMap::new(),
            error: Some(error.into()),
            elapsed_ms,
        }
    }
}

/// The validation pipeline's output record, created fresh per call and
/// owned exclusively by the caller after return.
///
/// Serializes to a flat JSON object; empty collections and absent optional
/// fields are omitted. `error` is populated only when `valid` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainValidationResult {
    /// Whether the input names a well-formed, owned accession
    pub valid: bool,
    /// The original input string
    pub input: String,
    /// Name of the validator that produced this result
    pub validator_name: String,
    /// Scientific domain of the validator
    pub domain: String,
    /// Upper-cased, trimmed accession extracted from the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_id: Option<String>,
    /// Canonical URL for the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_url: Option<String>,
    /// Mirror and API URLs; liveness is only guaranteed for `primary_url`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_urls: Vec<String>,
    /// Dataset classification (e.g. "sequence_data")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<String>,
    /// Hierarchy-level subtype (e.g. "run", "series")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Validation-step reliability score in [0,1]
    pub confidence: f64,
    /// Dataset-worthiness score in [0,1]
    pub likelihood: f64,
    /// Free-form metadata (archive info, remote fields)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    /// Classification tags (archive, institution, hierarchy level)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Terminal failure reason; present only when `valid` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Non-fatal findings (format deviations, unreachable URLs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Embedded liveness probe outcome, when a probe ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpValidationResult>,
    /// Total validation duration in milliseconds
    pub elapsed_ms: f64,
}

impl DomainValidationResult {
    /// Creates an empty, not-yet-valid result for the given input.
    #[must_use]
    pub fn new(input: &str, validator_name: &str, domain: &str) -> Self {
        Self {
            valid: false,
            input: input.to_string(),
            validator_name: validator_name.to_string(),
            domain: domain.to_string(),
            normalized_id: None,
            primary_url: None,
            alternate_urls: Vec::new(),
            dataset_type: None,
            subtype: None,
            confidence: 0.0,
            likelihood: 0.0,
            metadata: HashMap::new(),
            tags: Vec::new(),
            error: None,
            warnings: Vec::new(),
            http: None,
            elapsed_ms: 0.0,
        }
    }

    /// Creates a terminal invalid result with an error message and no
    /// partial fields populated beyond the input.
    #[must_use]
    pub fn invalid(input: &str, validator_name: &str, domain: &str, error: &str) -> Self {
        let mut result = Self::new(input, validator_name, domain);
        result.error = Some(error.to_string());
        result
    }

    /// Adds a tag unless it is already present.
    pub fn push_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// True when the tag set contains `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_result_carries_error_only() {
        let result = DomainValidationResult::invalid("x", "sra", "genomics", "no accession");
        assert!(!result.valid);
        assert_eq!(result.error.as_deref(), Some("no accession"));
        assert!(result.normalized_id.is_none());
        assert!(result.alternate_urls.is_empty());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_push_tag_deduplicates() {
        let mut result = DomainValidationResult::new("x", "sra", "genomics");
        result.push_tag("run_level");
        result.push_tag("run_level");
        result.push_tag("sra");
        assert_eq!(result.tags, vec!["run_level", "sra"]);
        assert!(result.has_tag("sra"));
        assert!(!result.has_tag("geo"));
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let result = DomainValidationResult::new("SRR123456", "sra", "genomics");
        let json = serde_json::to_value(&result).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("metadata"));
        assert!(!obj.contains_key("tags"));
        assert!(!obj.contains_key("alternate_urls"));
        assert!(!obj.contains_key("warnings"));
        assert!(!obj.contains_key("error"));
        assert!(!obj.contains_key("http"));
        assert!(obj.contains_key("valid"));
        assert!(obj.contains_key("confidence"));
    }

    #[test]
    fn test_serialization_includes_error_when_invalid() {
        let result = DomainValidationResult::invalid("x", "sra", "genomics", "boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["valid"], false);
    }

    #[test]
    fn test_http_result_roundtrips_through_json() {
        let probe = HttpValidationResult::unreachable("connect timeout", 12.5);
        let json = serde_json::to_string(&probe).unwrap();
        let back: HttpValidationResult = serde_json::from_str(&json).unwrap();
        assert!(!back.accessible);
        assert_eq!(back.error.as_deref(), Some("connect timeout"));
        assert!(back.status_code.is_none());
    }
}
