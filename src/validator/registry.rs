//! Validator registry with priority-ordered dispatch.
//!
//! The [`ValidatorRegistry`] keeps three views over one set of registered
//! validators (by name, by domain, priority-ordered) and orchestrates
//! best/all validation dispatch. The views are rebuilt on every
//! membership change and are always mutually consistent after
//! `register`/`unregister` returns.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{DomainValidator, ValidationContext};
use super::error::ValidatorError;
use super::result::DomainValidationResult;

/// A registry of validators with deterministic priority ordering.
///
/// Sort discipline: priority descending, name ascending, so repeated
/// calls with the same registration set always produce the same candidate
/// order. Registration is expected to finish before concurrent validation
/// traffic begins (single-writer-then-many-readers).
pub struct ValidatorRegistry {
    by_name: HashMap<String, Arc<dyn DomainValidator>>,
    by_domain: HashMap<String, Vec<Arc<dyn DomainValidator>>>,
    ordered: Vec<Arc<dyn DomainValidator>>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            by_domain: HashMap::new(),
            ordered: Vec::new(),
        }
    }

    /// Registers a validator under its name and domain.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::DuplicateValidator`] if a validator with
    /// the same name is already registered.
    #[tracing::instrument(skip(self, validator), fields(validator_name))]
    pub fn register(&mut self, validator: Arc<dyn DomainValidator>) -> Result<(), ValidatorError> {
        let name = validator.name().to_string();
        tracing::Span::current().record("validator_name", name.as_str());

        if self.by_name.contains_key(&name) {
            return Err(ValidatorError::duplicate(&name));
        }

        debug!(
            name = %name,
            domain = validator.domain(),
            priority = validator.priority(),
            "Registering validator"
        );

        self.by_domain
            .entry(validator.domain().to_string())
            .or_default()
            .push(Arc::clone(&validator));
        self.by_name.insert(name, Arc::clone(&validator));
        self.ordered.push(validator);
        self.resort();
        Ok(())
    }

    /// Removes a validator from all three views, pruning an empty domain
    /// bucket.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::ValidatorNotFound`] if no validator with
    /// that name is registered.
    pub fn unregister(&mut self, name: &str) -> Result<(), ValidatorError> {
        let Some(validator) = self.by_name.remove(name) else {
            return Err(ValidatorError::not_found(name));
        };

        let domain = validator.domain().to_string();
        if let Some(bucket) = self.by_domain.get_mut(&domain) {
            bucket.retain(|v| v.name() != name);
            if bucket.is_empty() {
                self.by_domain.remove(&domain);
            }
        }
        self.ordered.retain(|v| v.name() != name);
        debug!(name = %name, "Unregistered validator");
        Ok(())
    }

    /// Returns the validator registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn DomainValidator>> {
        self.by_name.get(name).cloned()
    }

    /// Returns all validators in priority order.
    #[must_use]
    pub fn get_all(&self) -> &[Arc<dyn DomainValidator>] {
        &self.ordered
    }

    /// Returns the validators registered under `domain`, priority-ordered.
    #[must_use]
    pub fn get_by_domain(&self, domain: &str) -> &[Arc<dyn DomainValidator>] {
        self.by_domain.get(domain).map_or(&[], Vec::as_slice)
    }

    /// Returns the registered domains, sorted for determinism.
    #[must_use]
    pub fn list_domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.by_domain.keys().cloned().collect();
        domains.sort();
        domains
    }

    /// Number of registered validators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// True when no validators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Returns every validator whose `can_validate` accepts the input,
    /// in priority order. Cheap and side-effect-free.
    #[must_use]
    #[tracing::instrument(skip(self))]
    pub fn find_validators(&self, input: &str) -> Vec<Arc<dyn DomainValidator>> {
        self.ordered
            .iter()
            .filter(|v| v.can_validate(input))
            .cloned()
            .collect()
    }

    /// Validates with the single highest-priority candidate only.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::NoValidator`] when no registered
    /// validator recognizes the input, or the candidate's own error.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn validate_with_best(
        &self,
        input: &str,
        ctx: &ValidationContext,
    ) -> Result<DomainValidationResult, ValidatorError> {
        let candidates = self.find_validators(input);
        let Some(best) = candidates.first() else {
            return Err(ValidatorError::no_validator(input));
        };
        debug!(
            validator = best.name(),
            candidate_count = candidates.len(),
            "Dispatching to best validator"
        );
        best.validate(input, ctx).await
    }

    /// Validates with every candidate validator.
    ///
    /// A failing validator is converted into an invalid result entry with
    /// its error text preserved, so one failure cannot suppress results
    /// from the others.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError::NoValidator`] only when zero candidates
    /// recognize the input.
    #[tracing::instrument(skip(self, ctx))]
    pub async fn validate_with_all(
        &self,
        input: &str,
        ctx: &ValidationContext,
    ) -> Result<Vec<DomainValidationResult>, ValidatorError> {
        let candidates = self.find_validators(input);
        if candidates.is_empty() {
            return Err(ValidatorError::no_validator(input));
        }

        let mut results = Vec::with_capacity(candidates.len());
        for validator in candidates {
            match validator.validate(input, ctx).await {
                Ok(result) => results.push(result),
                Err(error) => {
                    warn!(
                        validator = validator.name(),
                        error = %error,
                        "Validator failed; recording invalid result"
                    );
                    results.push(DomainValidationResult::invalid(
                        input,
                        validator.name(),
                        validator.domain(),
                        &error.to_string(),
                    ));
                }
            }
        }
        Ok(results)
    }

    /// Rebuilds the deterministic priority order: priority descending,
    /// name ascending. Domain buckets follow the same discipline.
    fn resort(&mut self) {
        let sort_key =
            |v: &Arc<dyn DomainValidator>| (std::cmp::Reverse(v.priority()), v.name().to_string());
        self.ordered.sort_by_key(sort_key);
        for bucket in self.by_domain.values_mut() {
            bucket.sort_by_key(sort_key);
        }
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.ordered.iter().map(|v| v.name()).collect();
        f.debug_struct("ValidatorRegistry")
            .field("validator_count", &self.ordered.len())
            .field("validators", &names)
            .finish()
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::accession::{AccessionPattern, patterns_for_archives};
    use crate::validator::{ProbeClient, ValidationPolicy};
    use async_trait::async_trait;

    // ==================== MockValidator for Testing ====================

    struct MockValidator {
        mock_name: &'static str,
        mock_domain: &'static str,
        mock_priority: i32,
        patterns: Vec<&'static AccessionPattern>,
        client: ProbeClient,
        fail: bool,
    }

    impl MockValidator {
        fn new(name: &'static str, priority: i32, archives: &[&str]) -> Self {
            Self {
                mock_name: name,
                mock_domain: "genomics",
                mock_priority: priority,
                patterns: patterns_for_archives(archives),
                client: ProbeClient::new(name).unwrap(),
                fail: false,
            }
        }

        fn failing(name: &'static str, priority: i32, archives: &[&str]) -> Self {
            Self {
                fail: true,
                ..Self::new(name, priority, archives)
            }
        }

        fn with_domain(mut self, domain: &'static str) -> Self {
            self.mock_domain = domain;
            self
        }
    }

    #[async_trait]
    impl DomainValidator for MockValidator {
        fn name(&self) -> &str {
            self.mock_name
        }

        fn domain(&self) -> &str {
            self.mock_domain
        }

        fn priority(&self) -> i32 {
            self.mock_priority
        }

        fn patterns(&self) -> &[&'static AccessionPattern] {
            &self.patterns
        }

        fn probe_client(&self) -> &ProbeClient {
            &self.client
        }

        fn policy(&self) -> ValidationPolicy {
            ValidationPolicy::default()
        }

        async fn validate(
            &self,
            input: &str,
            ctx: &ValidationContext,
        ) -> Result<DomainValidationResult, ValidatorError> {
            if self.fail {
                return Err(ValidatorError::client_construction(
                    self.mock_name,
                    "mock failure",
                ));
            }
            let mut result = DomainValidationResult::new(input, self.mock_name, self.mock_domain);
            result.valid = true;
            result.confidence = 0.9;
            result.likelihood = 0.9;
            let _ = ctx;
            Ok(result)
        }
    }

    fn registry_with(validators: Vec<MockValidator>) -> ValidatorRegistry {
        let mut registry = ValidatorRegistry::new();
        for v in validators {
            registry.register(Arc::new(v)).unwrap();
        }
        registry
    }

    // ==================== Registration Tests ====================

    #[test]
    fn test_registry_new_is_empty() {
        let registry = ValidatorRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.list_domains().is_empty());
    }

    #[test]
    fn test_register_duplicate_name_rejected() {
        let mut registry = registry_with(vec![MockValidator::new("sra", 100, &["SRA"])]);
        let err = registry
            .register(Arc::new(MockValidator::new("sra", 50, &["SRA"])))
            .unwrap_err();
        assert!(matches!(err, ValidatorError::DuplicateValidator { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_missing_name_rejected() {
        let mut registry = ValidatorRegistry::new();
        let err = registry.unregister("geo").unwrap_err();
        assert!(matches!(err, ValidatorError::ValidatorNotFound { .. }));
    }

    #[test]
    fn test_unregister_removes_from_all_views_and_prunes_domain() {
        let mut registry = registry_with(vec![
            MockValidator::new("sra", 100, &["SRA", "ENA", "DDBJ"]),
            MockValidator::new("geo", 95, &["GEO"]).with_domain("transcriptomics"),
        ]);
        registry.unregister("geo").unwrap();

        assert!(registry.get("geo").is_none());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list_domains(), vec!["genomics"]);
        assert!(registry.get_by_domain("transcriptomics").is_empty());
    }

    #[test]
    fn test_registry_views_stay_consistent() {
        let mut registry = registry_with(vec![
            MockValidator::new("sra", 100, &["SRA"]),
            MockValidator::new("geo", 95, &["GEO"]).with_domain("transcriptomics"),
            MockValidator::new("gsa", 90, &["GSA"]),
        ]);
        registry.unregister("sra").unwrap();
        registry
            .register(Arc::new(MockValidator::new("sra2", 99, &["SRA"])))
            .unwrap();

        let by_domain_total: usize = registry
            .list_domains()
            .iter()
            .map(|d| registry.get_by_domain(d).len())
            .sum();
        assert_eq!(registry.get_all().len(), by_domain_total);
        assert_eq!(registry.len(), 3);
    }

    // ==================== Ordering Tests ====================

    #[test]
    fn test_priority_order_descending_with_name_tiebreak() {
        let registry = registry_with(vec![
            MockValidator::new("zeta", 90, &["GSA"]),
            MockValidator::new("alpha", 90, &["GEO"]),
            MockValidator::new("top", 100, &["SRA"]),
        ]);
        let names: Vec<&str> = registry.get_all().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["top", "alpha", "zeta"]);
    }

    // ==================== Dispatch Tests ====================

    #[tokio::test]
    async fn test_find_validators_filters_by_ownership() {
        let registry = registry_with(vec![
            MockValidator::new("sra", 100, &["SRA", "ENA", "DDBJ"]),
            MockValidator::new("geo", 95, &["GEO"]),
        ]);
        let found = registry.find_validators("SRR123456");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "sra");
        assert!(registry.find_validators("INVALID123").is_empty());
    }

    #[tokio::test]
    async fn test_validate_with_best_uses_first_candidate() {
        let registry = registry_with(vec![
            MockValidator::new("low", 10, &["SRA"]),
            MockValidator::new("high", 100, &["SRA"]),
        ]);
        let ctx = ValidationContext::offline();
        let result = registry.validate_with_best("SRR123456", &ctx).await.unwrap();
        assert_eq!(result.validator_name, "high");
        assert_eq!(
            registry.find_validators("SRR123456")[0].name(),
            result.validator_name
        );
    }

    #[tokio::test]
    async fn test_validate_with_best_no_candidate_errors() {
        let registry = registry_with(vec![MockValidator::new("geo", 95, &["GEO"])]);
        let ctx = ValidationContext::offline();
        let err = registry
            .validate_with_best("INVALID123", &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::NoValidator { .. }));
    }

    #[tokio::test]
    async fn test_validate_with_all_converts_errors_to_invalid_results() {
        let registry = registry_with(vec![
            MockValidator::failing("broken", 100, &["SRA"]),
            MockValidator::new("ok", 50, &["SRA"]),
        ]);
        let ctx = ValidationContext::offline();
        let results = registry.validate_with_all("SRR123456", &ctx).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].validator_name, "broken");
        assert!(!results[0].valid);
        assert!(results[0].error.as_deref().unwrap().contains("mock failure"));
        assert_eq!(results[1].validator_name, "ok");
        assert!(results[1].valid);
    }

    #[tokio::test]
    async fn test_validate_with_all_empty_candidates_errors() {
        let registry = ValidatorRegistry::new();
        let ctx = ValidationContext::offline();
        let err = registry
            .validate_with_all("SRR123456", &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ValidatorError::NoValidator { .. }));
    }

    #[test]
    fn test_registry_debug_shows_validators() {
        let registry = registry_with(vec![MockValidator::new("sra", 100, &["SRA"])]);
        let debug_str = format!("{registry:?}");
        assert!(debug_str.contains("sra"));
        assert!(debug_str.contains("validator_count: 1"));
    }
}
