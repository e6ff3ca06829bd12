//! Priority-ordered accession pattern catalog with matching, format
//! validation, and free-text extraction.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::types::AccessionType;

/// Minimum accession length accepted by format validation and tokenization.
pub const MIN_ACCESSION_LEN: usize = 6;
/// Maximum accession length accepted by format validation and tokenization.
pub const MAX_ACCESSION_LEN: usize = 20;

/// Compiles a regex at static init; panics on invalid pattern.
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// A single catalog entry mapping an anchored regular expression to an
/// accession type and its owning archive.
#[derive(Debug)]
pub struct AccessionPattern {
    /// The type this pattern recognizes
    pub accession_type: AccessionType,
    /// Anchored (`^...$`) matcher; patterns are mutually exclusive by prefix
    pub matcher: Regex,
    /// Human-readable description of the record kind
    pub description: &'static str,
    /// Known-good example accessions (each must match `matcher`)
    pub examples: &'static [&'static str],
    /// Owning archive short name (key into the archive table)
    pub archive: &'static str,
    /// Match priority; higher values are tried first
    pub priority: i32,
}

fn entry(
    accession_type: AccessionType,
    pattern: &'static str,
    description: &'static str,
    examples: &'static [&'static str],
    archive: &'static str,
    priority: i32,
) -> AccessionPattern {
    AccessionPattern {
        accession_type,
        matcher: compile_static_regex(pattern),
        description,
        examples,
        archive,
        priority,
    }
}

/// The process-wide pattern catalog, sorted once at initialization
/// (priority descending, archive name ascending) and immutable afterward.
///
/// Patterns are anchored and mutually exclusive by prefix, so ordering can
/// never change which pattern wins; the catalog is pre-sorted anyway so
/// longer project prefixes are always tried before shorter run prefixes.
pub static CATALOG: LazyLock<Vec<AccessionPattern>> = LazyLock::new(|| {
    use AccessionType as T;
    let mut entries = vec![
        entry(T::BioProject, r"^PRJNA\d+$", "NCBI BioProject", &["PRJNA257197"], "SRA", 100),
        entry(T::BioProject, r"^PRJEB\d+$", "EBI BioProject", &["PRJEB4337"], "ENA", 100),
        entry(T::BioProject, r"^PRJDB\d+$", "DDBJ BioProject", &["PRJDB4176"], "DDBJ", 100),
        entry(T::GsaProject, r"^PRJCA\d+$", "NGDC BioProject", &["PRJCA000613"], "GSA", 100),
        entry(T::BioSample, r"^SAMN\d+$", "NCBI BioSample", &["SAMN02953603"], "SRA", 95),
        entry(T::BioSample, r"^SAMEA\d+$", "EBI BioSample", &["SAMEA3138326"], "ENA", 95),
        entry(T::BioSample, r"^SAMD\d+$", "DDBJ BioSample", &["SAMD00000344"], "DDBJ", 95),
        entry(T::GsaSample, r"^SAMC\d+$", "NGDC BioSample", &["SAMC017083"], "GSA", 95),
        entry(T::SraStudy, r"^SRP\d{5,}$", "SRA study", &["SRP045416"], "SRA", 85),
        entry(T::SraStudy, r"^ERP\d{5,}$", "ENA study", &["ERP006132"], "ENA", 85),
        entry(T::SraStudy, r"^DRP\d{5,}$", "DDBJ study", &["DRP002835"], "DDBJ", 85),
        entry(T::GsaStudy, r"^CRA\d{6,}$", "GSA archive (study level)", &["CRA000111"], "GSA", 85),
        entry(T::SraSample, r"^SRS\d{5,}$", "SRA sample", &["SRS711891"], "SRA", 80),
        entry(T::SraSample, r"^ERS\d{5,}$", "ENA sample", &["ERS1023458"], "ENA", 80),
        entry(T::SraSample, r"^DRS\d{5,}$", "DDBJ sample", &["DRS018166"], "DDBJ", 80),
        entry(T::SraExperiment, r"^SRX\d{5,}$", "SRA experiment", &["SRX1561930"], "SRA", 75),
        entry(T::SraExperiment, r"^ERX\d{5,}$", "ENA experiment", &["ERX1772488"], "ENA", 75),
        entry(T::SraExperiment, r"^DRX\d{5,}$", "DDBJ experiment", &["DRX015191"], "DDBJ", 75),
        entry(T::GsaExperiment, r"^CRX\d{6,}$", "GSA experiment", &["CRX020312"], "GSA", 75),
        entry(T::SraRun, r"^SRR\d{5,}$", "SRA sequencing run", &["SRR123456", "SRR1972739"], "SRA", 70),
        entry(T::SraRun, r"^ERR\d{5,}$", "ENA sequencing run", &["ERR1700893"], "ENA", 70),
        entry(T::SraRun, r"^DRR\d{5,}$", "DDBJ sequencing run", &["DRR016938"], "DDBJ", 70),
        entry(T::GsaRun, r"^CRR\d{6,}$", "GSA sequencing run", &["CRR034521"], "GSA", 70),
        entry(T::GeoSeries, r"^GSE\d{3,}$", "GEO series", &["GSE185917"], "GEO", 65),
        entry(T::GeoDataset, r"^GDS\d{3,}$", "GEO curated dataset", &["GDS5093"], "GEO", 64),
        entry(T::GeoSample, r"^GSM\d{3,}$", "GEO sample", &["GSM1641335"], "GEO", 63),
        entry(T::GeoPlatform, r"^GPL\d{3,}$", "GEO platform", &["GPL16791"], "GEO", 62),
    ];
    entries.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.archive.cmp(b.archive))
    });
    entries
});

/// Word-boundary tokens that could be accessions: letter-initial
/// alphanumeric runs of 6-20 characters.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"\b[A-Za-z][A-Za-z0-9]{5,19}\b"));

/// Trims and upper-cases an accession candidate.
#[must_use]
pub fn normalize_accession(input: &str) -> String {
    input.trim().to_ascii_uppercase()
}

/// Returns the first catalog pattern (in priority order) matching the
/// upper-cased, trimmed input.
#[must_use]
pub fn match_accession(input: &str) -> Option<&'static AccessionPattern> {
    let normalized = normalize_accession(input);
    CATALOG.iter().find(|p| p.matcher.is_match(&normalized))
}

/// Returns every catalog pattern matching the input, preserving priority
/// order. More than one entry indicates a genuinely ambiguous input.
#[must_use]
pub fn match_all_accessions(input: &str) -> Vec<&'static AccessionPattern> {
    let normalized = normalize_accession(input);
    CATALOG
        .iter()
        .filter(|p| p.matcher.is_match(&normalized))
        .collect()
}

/// Returns the first pattern from `patterns` matching the upper-cased,
/// trimmed input. Used by validators configured with a catalog subset.
#[must_use]
pub fn match_in<'a>(
    patterns: &[&'a AccessionPattern],
    input: &str,
) -> Option<&'a AccessionPattern> {
    let normalized = normalize_accession(input);
    patterns
        .iter()
        .find(|p| p.matcher.is_match(&normalized))
        .copied()
}

/// Returns the catalog subset owned by the given archives, preserving
/// catalog (priority) order.
#[must_use]
pub fn patterns_for_archives(archives: &[&str]) -> Vec<&'static AccessionPattern> {
    CATALOG
        .iter()
        .filter(|p| archives.contains(&p.archive))
        .collect()
}

/// Syntax-only format checks independent of the catalog. Returns every
/// violated rule, not just the first; an empty vector means well-formed.
#[must_use]
pub fn validate_accession_format(input: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if input.is_empty() {
        violations.push("accession is empty".to_string());
        return violations;
    }

    if input.chars().any(char::is_whitespace) {
        violations.push("accession contains embedded whitespace".to_string());
    }

    let len = input.chars().count();
    if !(MIN_ACCESSION_LEN..=MAX_ACCESSION_LEN).contains(&len) {
        violations.push(format!(
            "accession length {len} is outside {MIN_ACCESSION_LEN}-{MAX_ACCESSION_LEN}"
        ));
    }

    if input.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push("accession is not upper-case".to_string());
    }

    let upper = input.to_ascii_uppercase();
    if upper
        .chars()
        .any(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')))
    {
        violations.push("accession contains characters outside [A-Z0-9._-]".to_string());
    }

    violations
}

/// Scans free text for embedded accessions.
///
/// Tokenizes on word boundaries, tests each normalized token against the
/// catalog, and returns matches in first-seen order with duplicates
/// removed by exact string equality.
#[must_use]
pub fn extract_accessions_from_text(text: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut found = Vec::new();

    for m in TOKEN_RE.find_iter(text) {
        let token = m.as_str().to_ascii_uppercase();
        if !seen.insert(token.clone()) {
            continue;
        }
        if match_accession(&token).is_some() {
            trace!(token = %token, "accession token found in text");
            found.push(token);
        }
    }

    found
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ==================== Catalog Invariant Tests ====================

    #[test]
    fn test_catalog_sorted_by_priority_desc_then_archive() {
        let pairs: Vec<(i32, &str)> = CATALOG.iter().map(|p| (p.priority, p.archive)).collect();
        let mut sorted = pairs.clone();
        sorted.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        assert_eq!(pairs, sorted, "catalog must be pre-sorted");
    }

    #[test]
    fn test_catalog_examples_match_own_pattern_exactly() {
        for pattern in CATALOG.iter() {
            for example in pattern.examples {
                let matched = match_accession(example).unwrap();
                assert_eq!(
                    matched.accession_type, pattern.accession_type,
                    "example {example} must resolve to its own pattern"
                );
                assert_eq!(matched.archive, pattern.archive);
            }
        }
    }

    #[test]
    fn test_catalog_examples_are_unambiguous() {
        for pattern in CATALOG.iter() {
            for example in pattern.examples {
                assert_eq!(
                    match_all_accessions(example).len(),
                    1,
                    "example {example} must match exactly one pattern"
                );
            }
        }
    }

    // ==================== match_accession Tests ====================

    #[test]
    fn test_match_accession_case_insensitive_and_idempotent() {
        let lower = match_accession("srr123456").unwrap();
        let upper = match_accession("SRR123456").unwrap();
        assert_eq!(lower.accession_type, upper.accession_type);
        assert_eq!(lower.archive, upper.archive);
    }

    #[test]
    fn test_match_accession_trims_whitespace() {
        assert!(match_accession("  SRR123456  ").is_some());
    }

    #[test]
    fn test_match_accession_project_before_run_prefix() {
        let matched = match_accession("PRJNA257197").unwrap();
        assert_eq!(matched.accession_type, AccessionType::BioProject);
    }

    #[test]
    fn test_match_accession_rejects_unknown() {
        assert!(match_accession("INVALID123").is_none());
        assert!(match_accession("").is_none());
        assert!(match_accession("SRR").is_none());
    }

    #[test]
    fn test_match_accession_srr_is_run_level() {
        let matched = match_accession("SRR123456").unwrap();
        assert_eq!(matched.accession_type, AccessionType::SraRun);
        assert!(matched.accession_type.is_data_level());
    }

    // ==================== Subset Matching Tests ====================

    #[test]
    fn test_patterns_for_archives_filters_and_preserves_order() {
        let geo = patterns_for_archives(&["GEO"]);
        assert_eq!(geo.len(), 4);
        assert!(geo.iter().all(|p| p.archive == "GEO"));
        let priorities: Vec<i32> = geo.iter().map(|p| p.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn test_match_in_respects_subset() {
        let geo = patterns_for_archives(&["GEO"]);
        assert!(match_in(&geo, "GSE185917").is_some());
        assert!(match_in(&geo, "SRR123456").is_none());
    }

    // ==================== Format Validation Tests ====================

    #[test]
    fn test_validate_format_well_formed_has_no_violations() {
        assert!(validate_accession_format("SRR123456").is_empty());
        assert!(validate_accession_format("GSE185917").is_empty());
    }

    #[test]
    fn test_validate_format_lowercase_flagged() {
        let violations = validate_accession_format("srr123456");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("upper-case"));
    }

    #[test]
    fn test_validate_format_returns_all_violations() {
        // lowercase + embedded whitespace + bad character
        let violations = validate_accession_format("srr 123!456");
        assert!(violations.iter().any(|v| v.contains("whitespace")));
        assert!(violations.iter().any(|v| v.contains("upper-case")));
        assert!(violations.iter().any(|v| v.contains("[A-Z0-9._-]")));
    }

    #[test]
    fn test_validate_format_length_bounds() {
        assert!(
            validate_accession_format("SRR12")
                .iter()
                .any(|v| v.contains("length"))
        );
        let long = format!("SRR{}", "1".repeat(20));
        assert!(
            validate_accession_format(&long)
                .iter()
                .any(|v| v.contains("length"))
        );
    }

    #[test]
    fn test_validate_format_empty_short_circuits() {
        let violations = validate_accession_format("");
        assert_eq!(violations, vec!["accession is empty".to_string()]);
    }

    // ==================== Text Extraction Tests ====================

    #[test]
    fn test_extract_from_text_finds_accessions_in_order() {
        let text = "Reads are in SRR1972739 (project PRJNA257197, sample SAMN02953603).";
        let found = extract_accessions_from_text(text);
        assert_eq!(found, vec!["SRR1972739", "PRJNA257197", "SAMN02953603"]);
    }

    #[test]
    fn test_extract_from_text_deduplicates() {
        let text = "SRR1972739 was reanalyzed; see SRR1972739 for raw reads.";
        let found = extract_accessions_from_text(text);
        assert_eq!(found, vec!["SRR1972739"]);
    }

    #[test]
    fn test_extract_from_text_lowercase_tokens_normalized() {
        let found = extract_accessions_from_text("data at srr1972739 online");
        assert_eq!(found, vec!["SRR1972739"]);
    }

    #[test]
    fn test_extract_from_text_ignores_non_accessions() {
        let found = extract_accessions_from_text("nothing here but prose and the number 123456");
        assert!(found.is_empty());
    }

    #[test]
    fn test_extract_from_text_ignores_overlong_runs() {
        // 25-character alphanumeric run has no word boundary inside it
        let found = extract_accessions_from_text("SRR1234567890123456789012");
        assert!(found.is_empty());
    }
}
