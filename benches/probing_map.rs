#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use probing_map::ProbingMap;
use proptest::{
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn hash_map_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items = proptest::collection::vec(any::<(String, String)>(), ITEMS_AMOUNT)
        .new_tree(&mut runner)
        .unwrap()
        .current();

    let mut group = c.benchmark_group("Hash map comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    let mut probing_map = ProbingMap::new(16, 0.5);
    let mut rust_map = HashMap::new();
    group.bench_function("probing map put", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                probing_map.put(key, value);
            }
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                rust_map.insert(key, value);
            }
        });
    });
    group.bench_function("probing map get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = probing_map.get(key.as_str());
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = rust_map.get(key);
            }
        });
    });
    group.bench_function("probing map put/remove churn", |b| {
        b.iter(|| {
            let mut map = ProbingMap::new(16, 0.5);
            for (key, value) in items.clone() {
                map.put(key.clone(), value);
                map.remove(key.as_str());
            }
            map.capacity()
        });
    });
    group.finish();
}

criterion_group!(benches, hash_map_benches);

criterion_main!(benches);
