use std::collections::HashSet;

use cli::{ChromFilter, Cli};
use genome::{ChrIdx, GeneticMap};
use indicatif::{ProgressBar, ProgressStyle};
use located_error::prelude::*;
use log::{info, warn};
use variant_io::{read_id_list, VariantTableReader};

use crate::aggregator::OutputAggregator;
use crate::dose::{build_dose_recs, DoseRec, SampleRole};
use crate::error::EngineError;
use crate::position_index::PositionIndex;
use crate::segment_finder::SegmentFinder;

/// Outcome of a full run: sample counts for the log file, plus the sorted `.score` rows.
pub struct RunSummary {
    pub n_outgroup: usize,
    pub n_target: usize,
    pub n_variants: usize,
    pub n_segments: usize,
    pub records: Vec<variant_io::ScoreRecord>,
}

fn resolve_roles(samples: &[String], outgroup: &HashSet<String>, excluded: &HashSet<String>) -> Vec<SampleRole> {
    samples
        .iter()
        .map(|s| {
            if excluded.contains(s) {
                SampleRole::Excluded
            } else if outgroup.contains(s) {
                SampleRole::Outgroup
            } else {
                SampleRole::Target
            }
        })
        .collect()
}

fn passes_filters(marker: &genome::Marker, excluded_markers: &HashSet<String>, chrom_filter: Option<&ChromFilter>) -> bool {
    if excluded_markers.contains(&marker.id) {
        return false;
    }
    if let Some(filter) = chrom_filter {
        return filter.contains(marker.chromosome().into_inner(), marker.position().into());
    }
    true
}

/// Run the full analysis described by `cli`: two streaming passes over the variant table (the
/// first builds the global position table, the second buffers per-chromosome DoseRec arrays and
/// drives the segment finder), followed by a stable sort of the accumulated output.
///
/// # Errors
/// Propagates any I/O, parsing, or estimator failure encountered along the way.
pub fn run(cli: &Cli) -> Result<RunSummary> {
    cli.validate().with_loc(|| "While validating command line arguments")?;

    let outgroup_ids = read_id_list(&cli.outgroup).with_loc(|| "While reading --outgroup")?;
    let excluded_samples = match &cli.excludesamples {
        Some(path) => read_id_list(path).with_loc(|| "While reading --excludesamples")?,
        None => HashSet::new(),
    };
    let excluded_markers = match &cli.excludemarkers {
        Some(path) => read_id_list(path).with_loc(|| "While reading --excludemarkers")?,
        None => HashSet::new(),
    };
    let map = GeneticMap::from_file(&cli.map).with_loc(|| "While reading --map")?;
    let chrom_filter = cli.chrom_filter().with_loc(|| "While parsing --chrom")?;

    info!("Indexing global variant density...");
    let mut first_pass = VariantTableReader::new(&cli.gt).with_loc(|| "While opening --gt")?;
    let samples = first_pass.samples().to_vec();
    let roles = resolve_roles(&samples, &outgroup_ids, &excluded_samples);
    let n_outgroup = roles.iter().filter(|r| **r == SampleRole::Outgroup).count();
    let n_target = roles.iter().filter(|r| **r == SampleRole::Target).count();
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let max_cnt = (cli.maxfreq * n_outgroup as f64).floor() as u32;

    let mut position_entries = Vec::new();
    let mut n_selected = 0usize;
    let mut seen_chromosomes = HashSet::new();
    while let Some(record) = first_pass.next_record().with_loc(|| "While streaming --gt (pass 1)")? {
        seen_chromosomes.insert(record.marker.chromosome());
        if !passes_filters(&record.marker, &excluded_markers, chrom_filter.as_ref()) {
            continue;
        }
        n_selected += 1;
        // One position-table entry per non-reference allele, independent of the outgroup
        // frequency ceiling: `build_dose_recs` drops alleles above `max_cnt`, but density is
        // defined over every non-reference allele observed in the record.
        for _ in 1..record.n_alleles() {
            position_entries.push((record.marker.chromosome(), record.marker.position().into()));
        }
    }
    if n_selected == 0 {
        return loc!(EngineError::EmptySelection);
    }
    if seen_chromosomes.len() == 1 {
        warn!("Variant table only carries a single chromosome; the global density denominator will be narrow");
    }

    let positions = PositionIndex::build(position_entries);
    let global_density = positions.global_density()?;

    info!("Scoring segments, chromosome by chromosome...");
    let progress = ProgressBar::new(n_selected as u64);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}") {
        progress.set_style(style);
    }
    progress.set_message("Scoring variants");
    let progress = logger::Logger::multi().add(progress);

    let mut second_pass = VariantTableReader::new(&cli.gt).with_loc(|| "While re-opening --gt")?;
    let mut aggregator = OutputAggregator::new();
    let mut current_chrom: Option<ChrIdx> = None;
    let mut buffer: Vec<DoseRec> = Vec::new();
    let mut next_segment_index = 0usize;

    while let Some(record) = second_pass.next_record().with_loc(|| "While streaming --gt (pass 2)")? {
        if !passes_filters(&record.marker, &excluded_markers, chrom_filter.as_ref()) {
            continue;
        }
        progress.inc(1);
        if record.calls.iter().any(variant_io::SampleCall::is_missing) {
            return loc!(EngineError::MissingAlleleCall(record.marker.chromosome(), record.marker.position().into()));
        }

        let chrom = record.marker.chromosome();
        if current_chrom != Some(chrom) {
            if let Some(prev_chrom) = current_chrom {
                process_chromosome(&mut buffer, prev_chrom, &positions, global_density, &map, cli.mu, cli.minscore, &mut next_segment_index, &mut aggregator)?;
            }
            current_chrom = Some(chrom);
        }
        buffer.extend(build_dose_recs(&record, &roles, max_cnt)?);
    }
    if let Some(prev_chrom) = current_chrom {
        process_chromosome(&mut buffer, prev_chrom, &positions, global_density, &map, cli.mu, cli.minscore, &mut next_segment_index, &mut aggregator)?;
    }
    progress.finish_and_clear();

    let n_segments = next_segment_index;
    let records = aggregator.into_sorted();
    Ok(RunSummary{n_outgroup, n_target, n_variants: n_selected, n_segments, records})
}

#[allow(clippy::too_many_arguments)]
fn process_chromosome(
    buffer: &mut Vec<DoseRec>,
    chrom: ChrIdx,
    positions: &PositionIndex,
    global_density: f64,
    map: &GeneticMap,
    mu: f64,
    minscore: f64,
    next_segment_index: &mut usize,
    aggregator: &mut OutputAggregator,
) -> Result<()> {
    if buffer.is_empty() {
        return Ok(());
    }
    buffer.sort_by(|a, b| a.marker.cmp(&b.marker));

    let mut finder = SegmentFinder::new(&buffer[..], positions, chrom, global_density, map, mu).with_loc(|| format!("While scoring chromosome {chrom}"))?;
    let segments = finder.extract_segments(minscore).with_loc(|| format!("While extracting segments on chromosome {chrom}"))?;

    for segment in segments {
        let segment_index = *next_segment_index;
        *next_segment_index += 1;
        for idx in segment.members {
            let dr = &buffer[idx];
            aggregator.push(dr.marker.clone(), segment_index, dr.allele, segment.score);
        }
    }
    buffer.clear();
    Ok(())
}
