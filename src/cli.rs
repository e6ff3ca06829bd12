//! CLI argument definitions using clap derive macros.

use clap::Parser;

/// Identify and validate sequence-archive accessions in scientific text.
///
/// Seqref classifies candidate strings (accessions, URLs, text snippets)
/// against the supported archives and checks whether the referenced
/// records are live.
#[derive(Parser, Debug)]
#[command(name = "seqref")]
#[command(author, version, about)]
pub struct Args {
    /// Candidate inputs (accessions, URLs, or text); reads stdin lines when omitted
    pub inputs: Vec<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Emit one JSON object per input instead of human-readable lines
    #[arg(long)]
    pub json: bool,

    /// Validate with every candidate validator and report the best result
    #[arg(long)]
    pub all: bool,

    /// Skip network operations (no liveness probe, no metadata fetch)
    #[arg(long)]
    pub offline: bool,

    /// Liveness probe timeout in seconds (1-120)
    #[arg(short = 't', long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..=120))]
    pub timeout: u64,

    /// Maximum concurrent validations (1-32)
    #[arg(short = 'c', long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=32))]
    pub concurrency: u8,
}
