use std::time::Instant;

use cli::Cli;
use located_error::prelude::*;
use log::info;
use variant_io::{LogWriter, ScoreWriter};

/// Run a full analysis from parsed command line arguments: score segments, then write the
/// `.score` and `.log` output files next to `--out`.
///
/// # Errors
/// Propagates any configuration, I/O, parsing, or estimator failure encountered along the way.
pub fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();
    let command_line = cli.serialize();

    let summary = sprime_core::run(cli).with_loc(|| "While running the segment detection engine")?;

    info!("Writing {} scored variants across {} segments", summary.records.len(), summary.n_segments);
    let mut score_writer = ScoreWriter::create(&cli.score_path()).with_loc(|| "While opening .score output")?;
    for record in &summary.records {
        score_writer.write_record(record)?;
    }
    score_writer.flush()?;

    let mut log_writer = LogWriter::create(&cli.log_path()).with_loc(|| "While opening .log output")?;
    log_writer.write_summary(
        env!("CARGO_PKG_VERSION"),
        &command_line,
        summary.n_outgroup,
        summary.n_target,
        summary.n_variants,
        summary.n_segments,
        start.elapsed(),
    )?;

    Ok(())
}
