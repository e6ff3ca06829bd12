//! INSDC family validator for SRA/ENA/DDBJ accessions.
//!
//! The three-nation sequence-read-archive alliance mirrors records, so
//! one validator owns all its prefixes and routes URLs by prefix origin:
//! `SRR…` to NCBI, `ERR…` to EMBL-EBI, `DRR…` to DDBJ. The ENA browser is
//! always offered as a mirror, and run accessions additionally get the
//! ENA filereport API and the ENA FASTQ FTP path.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::accession::{AccessionPattern, AccessionType, patterns_for_archives};

use super::cache::MetadataCache;
use super::engine::{self, ScoreSignals, UrlSet};
use super::error::ValidatorError;
use super::http::{ProbeClient, build_api_client};
use super::{DomainValidator, ValidationContext, ValidationPolicy};

const DEFAULT_NCBI_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov";
const DEFAULT_ENA_BASE_URL: &str = "https://www.ebi.ac.uk";
const DEFAULT_DDBJ_BASE_URL: &str = "https://ddbj.nig.ac.jp";
const ENA_FASTQ_FTP_BASE: &str = "ftp://ftp.sra.ebi.ac.uk/vol1/fastq";

/// Fields requested from the ENA filereport API.
const ENA_FILEREPORT_FIELDS: &str =
    "run_accession,study_accession,sample_accession,experiment_accession,scientific_name,instrument_platform,base_count";

// ==================== ENA API Response Types ====================

/// One row of an ENA filereport `read_run` response.
#[derive(Debug, Deserialize)]
struct EnaRunReport {
    run_accession: Option<String>,
    study_accession: Option<String>,
    sample_accession: Option<String>,
    experiment_accession: Option<String>,
    scientific_name: Option<String>,
    instrument_platform: Option<String>,
    base_count: Option<String>,
}

/// Specialized validator for the SRA/ENA/DDBJ archive family.
pub struct InsdcValidator {
    patterns: Vec<&'static AccessionPattern>,
    probe: ProbeClient,
    api: Client,
    cache: MetadataCache,
    ncbi_base_url: String,
    ena_base_url: String,
    ddbj_base_url: String,
    ncbi_host: String,
    ena_host: String,
    ddbj_host: String,
}

impl InsdcValidator {
    /// Creates a validator with the production NCBI/EBI/DDBJ endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] when HTTP client construction fails.
    pub fn new() -> Result<Self, ValidatorError> {
        Self::with_base_urls(
            DEFAULT_NCBI_BASE_URL,
            DEFAULT_ENA_BASE_URL,
            DEFAULT_DDBJ_BASE_URL,
        )
    }

    /// Creates a validator with custom endpoints for tests.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] when HTTP client construction fails.
    pub fn with_base_urls(
        ncbi_base_url: impl Into<String>,
        ena_base_url: impl Into<String>,
        ddbj_base_url: impl Into<String>,
    ) -> Result<Self, ValidatorError> {
        let ncbi_base_url = ncbi_base_url.into();
        let ena_base_url = ena_base_url.into();
        let ddbj_base_url = ddbj_base_url.into();

        Ok(Self {
            patterns: patterns_for_archives(&["SRA", "ENA", "DDBJ"]),
            probe: ProbeClient::new("sra")?,
            api: build_api_client("sra")?,
            cache: MetadataCache::with_default_ttl(),
            ncbi_host: host_of(&ncbi_base_url),
            ena_host: host_of(&ena_base_url),
            ddbj_host: host_of(&ddbj_base_url),
            ncbi_base_url,
            ena_base_url,
            ddbj_base_url,
        })
    }

    fn base_for_archive(&self, archive: &str) -> &str {
        match archive {
            "ENA" => &self.ena_base_url,
            "DDBJ" => &self.ddbj_base_url,
            _ => &self.ncbi_base_url,
        }
    }

    fn ena_browser_view(&self, accession: &str) -> String {
        format!(
            "{}/ena/browser/view/{accession}",
            self.ena_base_url.trim_end_matches('/')
        )
    }

    fn ena_filereport_url(&self, accession: &str) -> String {
        format!(
            "{}/ena/portal/api/filereport?accession={accession}&result=read_run&format=json&fields={ENA_FILEREPORT_FIELDS}",
            self.ena_base_url.trim_end_matches('/')
        )
    }

    async fn fetch_run_report(
        &self,
        accession: &str,
        ctx: &ValidationContext,
    ) -> Option<HashMap<String, String>> {
        let url = self.ena_filereport_url(accession);
        let send = self.api.get(&url).send();
        let response = match tokio::time::timeout(ctx.metadata_timeout, send).await {
            Err(_) => {
                debug!(accession = %accession, "ENA filereport fetch timed out");
                return None;
            }
            Ok(Err(e)) => {
                debug!(accession = %accession, error = %e, "ENA filereport fetch failed");
                return None;
            }
            Ok(Ok(response)) => response,
        };

        if !response.status().is_success() {
            debug!(
                accession = %accession,
                status = response.status().as_u16(),
                "ENA filereport returned non-success status"
            );
            return None;
        }

        let rows = match response.json::<Vec<EnaRunReport>>().await {
            Ok(rows) => rows,
            Err(e) => {
                debug!(accession = %accession, error = %e, "ENA filereport response not parseable");
                return None;
            }
        };

        let row = rows.into_iter().next()?;
        let mut fields = HashMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                fields.insert(key.to_string(), value);
            }
        };
        put("run_accession", row.run_accession);
        put("study_accession", row.study_accession);
        put("sample_accession", row.sample_accession);
        put("experiment_accession", row.experiment_accession);
        put("organism", row.scientific_name);
        put("platform", row.instrument_platform);
        put("base_count", row.base_count);

        if fields.is_empty() { None } else { Some(fields) }
    }
}

impl std::fmt::Debug for InsdcValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsdcValidator")
            .field("ncbi_base_url", &self.ncbi_base_url)
            .field("ena_base_url", &self.ena_base_url)
            .field("ddbj_base_url", &self.ddbj_base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DomainValidator for InsdcValidator {
    fn name(&self) -> &str {
        "sra"
    }

    fn priority(&self) -> i32 {
        100
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
        if engine::extract_candidate(input)
            .is_some_and(|c| crate::accession::match_in(&self.patterns, &c).is_some())
        {
            return true;
        }

        // Archive URLs without an embedded accession still route here.
        let Ok(url) = Url::parse(input.trim()) else {
            return false;
        };
        let Some(host) = url.host_str() else {
            return false;
        };
        let path = url.path().to_ascii_lowercase();

        if hosts_related(host, &self.ncbi_host) {
            return path.contains("/sra")
                || path.contains("/bioproject")
                || path.contains("/biosample")
                || path.contains("/traces");
        }
        if hosts_related(host, &self.ena_host) {
            return path.contains("/ena");
        }
        hosts_related(host, &self.ddbj_host)
    }

    fn synthesize_urls(&self, pattern: &AccessionPattern, accession: &str) -> UrlSet {
        let archive = pattern.archive;
        let base = self.base_for_archive(archive).trim_end_matches('/');

        let primary = match (archive, pattern.accession_type) {
            ("ENA", _) => self.ena_browser_view(accession),
            ("DDBJ", accession_type) => {
                format!("{base}/resource/{}/{accession}", ddbj_resource(accession_type))
            }
            (_, AccessionType::BioProject) => format!("{base}/bioproject/{accession}"),
            (_, AccessionType::BioSample) => format!("{base}/biosample/{accession}"),
            _ => format!("{base}/sra/?term={accession}"),
        };

        let mut alternates = Vec::new();
        if archive != "ENA" {
            alternates.push(self.ena_browser_view(accession));
        }
        if pattern.accession_type == AccessionType::SraRun {
            alternates.push(self.ena_filereport_url(accession));
            if let Some(ftp) = ena_fastq_ftp_path(accession) {
                alternates.push(ftp);
            }
        }

        UrlSet::with_alternates(primary, alternates)
    }

    fn score(&self, signals: &ScoreSignals<'_>) -> f64 {
        let mut confidence = engine::score_confidence(&self.policy(), signals);
        if signals.run_level {
            confidence += engine::RUN_LEVEL_BONUS;
        }
        confidence += engine::metadata_bonus(signals.metadata_fields);
        confidence.min(1.0)
    }

    async fn fetch_metadata(
        &self,
        accession: &str,
        pattern: &AccessionPattern,
        ctx: &ValidationContext,
    ) -> Option<HashMap<String, String>> {
        // The filereport read_run result only answers for run accessions.
        if pattern.accession_type != AccessionType::SraRun {
            return None;
        }

        if let Some(cached) = self.cache.get(accession) {
            return Some(cached);
        }

        let fields = self.fetch_run_report(accession, ctx).await?;
        self.cache.insert(accession, fields.clone());
        Some(fields)
    }
}

/// DDBJ search resource segment per hierarchy level.
fn ddbj_resource(accession_type: AccessionType) -> &'static str {
    match accession_type {
        AccessionType::SraExperiment => "sra-experiment",
        AccessionType::SraSample => "sra-sample",
        AccessionType::SraStudy => "sra-study",
        AccessionType::BioProject => "bioproject",
        AccessionType::BioSample => "biosample",
        _ => "sra-run",
    }
}

/// ENA FASTQ FTP directory for a run accession.
///
/// Layout: `<base>/<first 6 chars>/<run>/` for 9-character accessions;
/// longer accessions insert a zero-padded subdirectory built from the
/// digits past position 9 (e.g. `SRR1234567` → `.../SRR123/007/SRR1234567/`).
fn ena_fastq_ftp_path(accession: &str) -> Option<String> {
    if accession.len() < 9 {
        return None;
    }
    let prefix = &accession[..6];
    if accession.len() == 9 {
        Some(format!("{ENA_FASTQ_FTP_BASE}/{prefix}/{accession}/"))
    } else {
        let subdir = format!("{:0>3}", &accession[9..]);
        Some(format!("{ENA_FASTQ_FTP_BASE}/{prefix}/{subdir}/{accession}/"))
    }
}

fn host_of(base_url: &str) -> String {
    Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .unwrap_or_else(|| base_url.trim().to_ascii_lowercase())
}

/// True when `host` equals or is a subdomain of `base_host`.
fn hosts_related(host: &str, base_host: &str) -> bool {
    let host = host.trim_start_matches("www.").to_ascii_lowercase();
    let base = base_host.trim_start_matches("www.");
    host == base || host.ends_with(&format!(".{base}"))
}
