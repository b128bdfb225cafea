use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Once;

use cli::Cli;

static INIT_LOGGER: Once = Once::new();

fn init_logger() {
    INIT_LOGGER.call_once(|| logger::Logger::init(0));
}

fn write_file(path: &PathBuf, contents: &str) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
}

/// Eight tightly clustered variants, all carried identically (homozygous) by two target
/// samples and absent from the outgroup, should chain into a single segment.
#[test]
fn single_tight_cluster_emits_one_segment() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();

    let gt_path = dir.path().join("fixture.vt");
    let mut table = String::from("CHROM\tPOS\tID\tREF\tALT\tS0\tS1\tS2\tS3\n");
    for i in 0..8u32 {
        let pos = 1000 + i * 1000;
        table.push_str(&format!("1\t{pos}\trs{i}\tA\tT\t1|1\t1|1\t0|0\t0|0\n"));
    }
    write_file(&gt_path, &table);

    let outgroup_path = dir.path().join("outgroup.txt");
    write_file(&outgroup_path, "S2\nS3\n");

    let map_path = dir.path().join("map.txt");
    write_file(&map_path, "chr\tid\tcm\tpos\n1\ta\t0.0\t0\n1\tb\t10.0\t2000000\n");

    let out_prefix = dir.path().join("out");

    let cli = Cli{
        gt: gt_path,
        outgroup: outgroup_path,
        map: map_path,
        out: out_prefix.clone(),
        excludesamples: None,
        excludemarkers: None,
        chrom: None,
        maxfreq: 0.01,
        minscore: 0.0,
        mu: 1.2e-8,
        verbose: 0,
        quiet: true,
    };

    sprime_rs::run(&cli).expect("run should succeed on a well-formed fixture");

    let score_contents = fs::read_to_string(cli.score_path()).unwrap();
    let mut lines = score_contents.lines();
    assert_eq!(lines.next().unwrap(), "CHROM\tPOS\tID\tREF\tALT\tSEGMENT\tALLELE\tSCORE");
    let body: Vec<&str> = lines.collect();
    assert_eq!(body.len(), 8, "all 8 variants should be emitted: {body:?}");
    for line in &body {
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[5], "0", "every variant should belong to the single segment");
        assert_eq!(fields[6], "1", "the scored allele should be the alternate allele");
        let score: f64 = fields[7].parse().unwrap();
        assert!(score > 0.0, "segment score should be positive: {line}");
    }

    let log_contents = fs::read_to_string(cli.log_path()).unwrap();
    assert!(log_contents.contains("outgroup samples: 2"));
    assert!(log_contents.contains("target samples: 2"));
    assert!(log_contents.contains("segments: 1"));
}

/// Eight target samples, each the sole carrier of one record's alternate allele: every pair
/// has maximal haplotype distance, so no chain ever clears a positive `minscore`.
#[test]
fn disjoint_carriers_yield_no_segments() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();

    let gt_path = dir.path().join("fixture.vt");
    let mut table = String::from("CHROM\tPOS\tID\tREF\tALT\tS0\tS1\tS2\tS3\tS4\tS5\tS6\tS7\tO0\tO1\n");
    for i in 0..8usize {
        let pos = 1000 + (i as u32) * 1000;
        let calls: Vec<&str> = (0..8).map(|s| if s == i { "1|1" } else { "0|0" }).collect();
        table.push_str(&format!("1\t{pos}\trs{i}\tA\tT\t{}\t0|0\t0|0\n", calls.join("\t")));
    }
    write_file(&gt_path, &table);

    let outgroup_path = dir.path().join("outgroup.txt");
    write_file(&outgroup_path, "O0\nO1\n");

    let map_path = dir.path().join("map.txt");
    write_file(&map_path, "chr\tid\tcm\tpos\n1\ta\t0.0\t0\n1\tb\t10.0\t2000000\n");

    let out_prefix = dir.path().join("out");

    let cli = Cli{
        gt: gt_path,
        outgroup: outgroup_path,
        map: map_path,
        out: out_prefix,
        excludesamples: None,
        excludemarkers: None,
        chrom: None,
        maxfreq: 0.01,
        minscore: 1.0,
        mu: 1.2e-8,
        verbose: 0,
        quiet: true,
    };

    sprime_rs::run(&cli).expect("run should succeed even when no chain clears minscore");
    let score_contents = fs::read_to_string(cli.score_path()).unwrap();
    assert_eq!(score_contents.lines().count(), 1, "only the header line should be present");

    let log_contents = fs::read_to_string(cli.log_path()).unwrap();
    assert!(log_contents.contains("segments: 0"));
}
