pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use std::io;

use anyhow::Context;

use crate::config::VerifyConfig;
use crate::processor::verify::{RunReport, trailing_index, verify_files};

/// Load the map, discover the screen files and check every one of them.
///
/// Fatal problems (map structure, screen size, chunk data, no files) come
/// back as `Err`; per-file problems are recorded in the report.
pub fn verify(config: &VerifyConfig) -> error::Result<RunReport> {
    // 1. ── Parse ──────────────────────────────────────────────────────
    let map = parser::load_map(&config.map_file)?;

    // 2. ── Process ────────────────────────────────────────────────────
    let prepared = processor::prepare(&map)?;
    let files = parser::discover(&config.bin_pattern)?;

    // 3. ── Verify ─────────────────────────────────────────────────────
    Ok(verify_files(
        &files,
        &prepared.geometry,
        &prepared.tiles,
        &trailing_index,
        config.strict_names,
    ))
}

/// Returns whether every checked file passed.
pub fn run(args: &cli::Cli) -> anyhow::Result<bool> {
    let config = args.resolve_config().with_context(|| "Loading configuration")?;

    let report = verify(&config).with_context(|| {
        format!(
            "Verifying `{}` against {}",
            config.bin_pattern,
            config.map_file.display()
        )
    })?;

    let stdout = io::stdout().lock();
    if args.json {
        writer::report::write_json(&report, stdout).with_context(|| "Writing JSON report")?;
    } else {
        writer::report::write_console(&report, stdout).with_context(|| "Writing report")?;
    }

    Ok(report.success)
}
