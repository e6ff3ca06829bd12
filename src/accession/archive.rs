//! Static metadata for the supported sequence archives.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Read-only metadata about one archive.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveInfo {
    /// Short name used as the catalog key (e.g. "SRA")
    pub short_name: &'static str,
    /// Full archive name
    pub full_name: &'static str,
    /// Canonical entry-point URL
    pub canonical_url: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Geographic region the archive operates from
    pub region: &'static str,
    /// Hosting institution tag (lowercase, used in result tags)
    pub institution: &'static str,
}

/// Archive lookup table keyed by short name. Initialized once, read-only.
pub static ARCHIVES: LazyLock<HashMap<&'static str, ArchiveInfo>> = LazyLock::new(|| {
    let entries = [
        ArchiveInfo {
            short_name: "SRA",
            full_name: "NCBI Sequence Read Archive",
            canonical_url: "https://www.ncbi.nlm.nih.gov/sra",
            description: "Raw sequencing reads and alignments from the NCBI arm of INSDC",
            region: "United States",
            institution: "ncbi",
        },
        ArchiveInfo {
            short_name: "ENA",
            full_name: "European Nucleotide Archive",
            canonical_url: "https://www.ebi.ac.uk/ena",
            description: "EMBL-EBI nucleotide archive mirroring the INSDC alliance",
            region: "Europe",
            institution: "ebi",
        },
        ArchiveInfo {
            short_name: "DDBJ",
            full_name: "DNA Data Bank of Japan",
            canonical_url: "https://www.ddbj.nig.ac.jp",
            description: "Japanese arm of the INSDC sequence archive alliance",
            region: "Japan",
            institution: "ddbj",
        },
        ArchiveInfo {
            short_name: "GSA",
            full_name: "Genome Sequence Archive",
            canonical_url: "https://ngdc.cncb.ac.cn/gsa",
            description: "NGDC/CNCB raw sequence archive",
            region: "China",
            institution: "cncb",
        },
        ArchiveInfo {
            short_name: "GEO",
            full_name: "Gene Expression Omnibus",
            canonical_url: "https://www.ncbi.nlm.nih.gov/geo",
            description: "NCBI functional genomics and expression data repository",
            region: "United States",
            institution: "ncbi",
        },
    ];
    entries.into_iter().map(|a| (a.short_name, a)).collect()
});

/// Looks up archive metadata by short name.
#[must_use]
pub fn archive_info(short_name: &str) -> Option<&'static ArchiveInfo> {
    ARCHIVES.get(short_name)
}
