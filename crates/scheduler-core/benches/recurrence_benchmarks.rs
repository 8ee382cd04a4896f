use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scheduler_core::grammar;
use scheduler_core::recurrence::RecurrenceEngine;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for input in ["d 7", "y", "w 1,2,3,4,5", "m 1,15,-1 1,4,7,10"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| grammar::parse(black_box(input)).unwrap())
        });
    }
    group.finish();
}

fn bench_next_occurrence(c: &mut Criterion) {
    let engine = RecurrenceEngine::default();
    let base = date(2020, 1, 31);
    let not_before = date(2024, 3, 15);

    let mut group = c.benchmark_group("next_occurrence");
    for input in ["d 3", "y", "w 7", "m -1", "m 29 2"] {
        let rule = grammar::parse(input).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(input), &rule, |b, rule| {
            b.iter(|| {
                engine
                    .next_occurrence(black_box(base), black_box(rule), black_box(not_before))
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_next_occurrence);
criterion_main!(benches);
