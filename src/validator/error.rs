//! Error types for validator and registry operations.
//!
//! Pipeline-internal failures (no accession found, unreachable URL,
//! missing metadata) are reported inside `DomainValidationResult`, never
//! as errors; this module covers the genuine caller-side failures:
//! registry misuse and validator infrastructure breakage.

use thiserror::Error;

/// Errors returned by the validator registry and validator constructors.
#[derive(Debug, Clone, Error)]
pub enum ValidatorError {
    /// A validator with this name is already registered
    #[error(
        "validator '{name}' is already registered\n  Suggestion: Unregister the existing validator first or pick a distinct name"
    )]
    DuplicateValidator {
        /// Name of the conflicting validator
        name: String,
    },

    /// No validator with this name is registered
    #[error(
        "validator '{name}' is not registered\n  Suggestion: Check the name against the registered validator list"
    )]
    ValidatorNotFound {
        /// The missing validator name
        name: String,
    },

    /// No registered validator recognizes the input
    #[error(
        "no validator can handle input '{input}'\n  Suggestion: Check the input for a supported accession or register an appropriate validator"
    )]
    NoValidator {
        /// The unrecognized input
        input: String,
    },

    /// HTTP client construction failed while building a validator
    #[error(
        "validator '{validator}' could not construct its HTTP client: {reason}\n  Suggestion: Check proxy and TLS configuration"
    )]
    ClientConstruction {
        /// The validator being constructed
        validator: String,
        /// Underlying build failure
        reason: String,
    },
}

impl ValidatorError {
    /// Creates a `DuplicateValidator` error.
    #[must_use]
    pub fn duplicate(name: &str) -> Self {
        Self::DuplicateValidator {
            name: name.to_string(),
        }
    }

    /// Creates a `ValidatorNotFound` error.
    #[must_use]
    pub fn not_found(name: &str) -> Self {
        Self::ValidatorNotFound {
            name: name.to_string(),
        }
    }

    /// Creates a `NoValidator` error.
    #[must_use]
    pub fn no_validator(input: &str) -> Self {
        Self::NoValidator {
            input: input.to_string(),
        }
    }

    /// Creates a `ClientConstruction` error.
    #[must_use]
    pub fn client_construction(validator: &str, reason: &str) -> Self {
        Self::ClientConstruction {
            validator: validator.to_string(),
            reason: reason.to_string(),
        }
    }
}
