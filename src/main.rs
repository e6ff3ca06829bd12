//! CLI entry point for the seqref tool.

use std::io::{self, IsTerminal, Read};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use futures_util::StreamExt;
use seqref_core::checker::select_best;
use seqref_core::validator::{ValidationContext, ValidatorError, build_default_registry};
use seqref_core::{DomainValidationResult, ValidatorRegistry};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

/// Per-input validation outcome carried to the output stage.
struct Outcome {
    input: String,
    result: Result<DomainValidationResult, ValidatorError>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    // Read input: from positional args or stdin lines
    let inputs: Vec<String> = if args.inputs.is_empty() {
        if io::stdin().is_terminal() {
            info!("No input provided. Pipe candidates via stdin or pass as arguments.");
            info!("Example: echo 'SRR1972739' | seqref");
            return Ok(());
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        args.inputs.clone()
    };

    if inputs.is_empty() {
        info!("No candidates found in input");
        return Ok(());
    }

    let registry = build_default_registry();
    if registry.is_empty() {
        anyhow::bail!("no validators available");
    }
    debug!(?registry, "Validator registry ready");

    let ctx = ValidationContext {
        probe_timeout: Duration::from_secs(args.timeout),
        offline: args.offline,
        ..ValidationContext::new()
    };

    let outcomes: Vec<Outcome> = futures_util::stream::iter(inputs)
        .map(|input| {
            let registry = &registry;
            let ctx = &ctx;
            let use_all = args.all;
            async move {
                let result = validate_one(registry, ctx, &input, use_all).await;
                Outcome { input, result }
            }
        })
        .buffered(usize::from(args.concurrency))
        .collect()
        .await;

    let mut valid_count = 0usize;
    for outcome in &outcomes {
        if matches!(&outcome.result, Ok(result) if result.valid) {
            valid_count += 1;
        }
        if args.json {
            println!("{}", render_json(outcome)?);
        } else {
            println!("{}", render_line(outcome));
        }
    }

    info!(
        total = outcomes.len(),
        valid = valid_count,
        "Validation complete"
    );

    if valid_count == 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Validates one input, either with the best candidate or across every
/// candidate with checker selection.
async fn validate_one(
    registry: &ValidatorRegistry,
    ctx: &ValidationContext,
    input: &str,
    use_all: bool,
) -> Result<DomainValidationResult, ValidatorError> {
    if !use_all {
        return registry.validate_with_best(input, ctx).await;
    }

    let results = registry.validate_with_all(input, ctx).await?;
    debug!(input = %input, candidates = results.len(), "Selecting best result");
    select_best(&results)
        .cloned()
        .ok_or_else(|| ValidatorError::no_validator(input))
}

fn render_json(outcome: &Outcome) -> Result<String> {
    let value = match &outcome.result {
        Ok(result) => serde_json::to_value(result)?,
        Err(error) => serde_json::json!({
            "valid": false,
            "input": outcome.input,
            "error": error.to_string(),
        }),
    };
    Ok(value.to_string())
}

fn render_line(outcome: &Outcome) -> String {
    match &outcome.result {
        Ok(result) if result.valid => format!(
            "ok   {} [{}/{}] {} confidence={:.2} {}",
            result.normalized_id.as_deref().unwrap_or(&result.input),
            result.dataset_type.as_deref().unwrap_or("unknown"),
            result.subtype.as_deref().unwrap_or("unknown"),
            result.validator_name,
            result.confidence,
            result.primary_url.as_deref().unwrap_or("-"),
        ),
        Ok(result) => {
            warn!(input = %result.input, "Validation rejected input");
            format!(
                "fail {} ({}): {}",
                result.input,
                result.validator_name,
                result.error.as_deref().unwrap_or("invalid"),
            )
        }
        Err(error) => format!(
            "fail {}: {}",
            outcome.input,
            error.to_string().lines().next().unwrap_or("error"),
        ),
    }
}
