//! Benchmark for log parsing and deck reconstruction

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ptcg_log::{parse_log, parser::PatternLibrary, reconstruct_decks};
use std::fs;
use std::path::PathBuf;

fn load_sample_logs() -> Vec<(String, String)> {
    let log_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_logs");

    let mut logs = Vec::new();
    let Ok(entries) = fs::read_dir(&log_dir) else {
        eprintln!("Warning: {} not found", log_dir.display());
        return logs;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("log") {
            if let Ok(contents) = fs::read_to_string(&path) {
                let filename = path.file_name().unwrap().to_string_lossy().to_string();
                logs.push((filename, contents));
            }
        }
    }
    logs.sort();
    logs
}

fn bench_parse(c: &mut Criterion) {
    let logs = load_sample_logs();
    let mut group = c.benchmark_group("parse_log");

    for (filename, contents) in &logs {
        group.throughput(Throughput::Bytes(contents.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(filename), contents, |b, contents| {
            b.iter(|| black_box(parse_log(black_box(contents))))
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let logs = load_sample_logs();
    let patterns = PatternLibrary::global();
    let lines: Vec<&str> = logs.iter().flat_map(|(_, contents)| contents.lines()).collect();

    c.bench_function("classify_lines", |b| {
        b.iter(|| {
            lines
                .iter()
                .filter(|line| patterns.classify(black_box(line)).is_some())
                .count()
        })
    });
}

fn bench_reconstruct(c: &mut Criterion) {
    let logs = load_sample_logs();
    let mut group = c.benchmark_group("reconstruct_decks");

    for (filename, contents) in &logs {
        let Ok(data) = parse_log(contents) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(filename), &data, |b, data| {
            b.iter(|| black_box(reconstruct_decks(black_box(data))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_classify, bench_reconstruct);
criterion_main!(benches);
