//! Accession pattern catalog and archive metadata.
//!
//! This module owns the static, priority-ordered table of accession
//! patterns for the supported sequence archives, plus the read-only
//! archive metadata table. Both are process-wide constants initialized
//! once and never mutated.
//!
//! - [`AccessionType`] / [`HierarchyLevel`] - compile-time classification
//! - [`AccessionPattern`] / [`CATALOG`] - the pattern table
//! - [`ArchiveInfo`] / [`ARCHIVES`] - archive metadata
//! - [`match_accession`] / [`extract_accessions_from_text`] - matching API

mod archive;
pub(crate) mod catalog;
mod types;

pub use archive::{ARCHIVES, ArchiveInfo, archive_info};
pub use catalog::{
    AccessionPattern, CATALOG, MAX_ACCESSION_LEN, MIN_ACCESSION_LEN, extract_accessions_from_text,
    match_accession, match_all_accessions, match_in, normalize_accession, patterns_for_archives,
    validate_accession_format,
};
pub use types::{AccessionType, HierarchyLevel};
