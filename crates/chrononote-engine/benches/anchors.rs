use chrononote_engine::editing::{Delta, TimestampIndex, nearest_within};
use criterion::{Criterion, criterion_group, criterion_main};

fn populated_index(anchors: usize) -> TimestampIndex {
    (0..anchors).map(|line| (line * 3, line as u64 * 1000)).collect()
}

fn bench_anchor_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("anchors");

    let index = populated_index(10_000);

    group.bench_function("renumber_insert", |b| {
        b.iter(|| {
            let mut idx = index.clone();
            idx.apply(std::hint::black_box(&Delta::insert(5_000)));
            std::hint::black_box(&idx);
        });
    });

    group.bench_function("renumber_remove", |b| {
        b.iter(|| {
            let mut idx = index.clone();
            idx.apply(std::hint::black_box(&Delta::remove(5_000)));
            std::hint::black_box(&idx);
        });
    });

    group.bench_function("nearest_within", |b| {
        let anchors: Vec<(usize, u64)> = index.iter().collect();
        b.iter(|| {
            let found = nearest_within(
                anchors.iter().copied(),
                std::hint::black_box(14_999),
                std::hint::black_box(20),
            );
            std::hint::black_box(found);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_anchor_operations);
criterion_main!(benches);
