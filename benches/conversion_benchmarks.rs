#![allow(missing_docs)]
//! Benchmarks for MARCXML crosswalks.
//!
//! Uses the map fixture from the test data directory, replicated into a
//! collection for the batch benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marc_crosswalk::batch::{convert_records, BatchConfig, Target};
use marc_crosswalk::edm::{EdmBuilder, EdmConfig, EdmGraph};
use marc_crosswalk::{DublinCore, Record, SchemaOrg};

fn load_fixture() -> String {
    let path = "tests/data/chisoc_map.xml";
    std::fs::read_to_string(path).unwrap_or_else(|_| panic!("Failed to load fixture: {path}"))
}

fn benchmark_parse(c: &mut Criterion) {
    let xml = load_fixture();
    c.bench_function("parse_marcxml", |b| {
        b.iter(|| Record::from_marcxml(black_box(&xml)).unwrap());
    });
}

fn benchmark_emitters(c: &mut Criterion) {
    let record = Record::from_marcxml(&load_fixture()).unwrap();

    c.bench_function("dublin_core_xml", |b| {
        b.iter(|| DublinCore::from_record(black_box(&record)).unwrap().to_xml());
    });

    c.bench_function("schema_org_json", |b| {
        b.iter(|| {
            SchemaOrg::from_record(black_box(&record))
                .unwrap()
                .to_json_string()
                .unwrap()
        });
    });

    let dc = DublinCore::from_record(&record).unwrap();
    c.bench_function("edm_turtle", |b| {
        b.iter(|| {
            let mut graph = EdmGraph::new();
            EdmBuilder::new(black_box(&dc), EdmConfig::default())
                .build_into(&mut graph)
                .unwrap();
            graph.to_turtle().unwrap()
        });
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let record = Record::from_marcxml(&load_fixture()).unwrap();
    let records = vec![record; 1_000];

    let mut group = c.benchmark_group("batch_1k");
    for parallel in [false, true] {
        let config = BatchConfig::new(Target::SchemaOrg).with_parallel(parallel);
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| convert_records(black_box(&records), &config).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_parse, benchmark_emitters, benchmark_batch);
criterion_main!(benches);
