//! Benchmark for TreeMultiMap vs a `BTreeMap<K, Vec<V>>` multimap.
//!
//! Keys are scattered with a multiplicative hash so the unbalanced tree is
//! measured on a typical shape rather than a sorted chain.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use multitree::multimap::TreeMultiMap;
use std::collections::BTreeMap;
use std::hint::black_box;

const SIZES: [u64; 3] = [100, 1000, 10000];

/// Spreads `index` over a key space a quarter of `size`, so every key
/// repeats a few times.
fn scattered_key(index: u64, size: u64) -> u64 {
    index.wrapping_mul(0x9E37_79B9_7F4A_7C15) % (size / 4).max(1)
}

fn build_multimap(size: u64) -> TreeMultiMap<u64, u64> {
    (0..size)
        .map(|index| (scattered_key(index, size), index))
        .collect()
}

fn build_btree(size: u64) -> BTreeMap<u64, Vec<u64>> {
    let mut map: BTreeMap<u64, Vec<u64>> = BTreeMap::new();
    for index in 0..size {
        map.entry(scattered_key(index, size)).or_default().push(index);
    }
    map
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in SIZES {
        group.bench_with_input(
            BenchmarkId::new("TreeMultiMap", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map = TreeMultiMap::new();
                    for index in 0..size {
                        map.insert(black_box(scattered_key(index, size)), black_box(index));
                    }
                    black_box(map)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap<Vec>", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut map: BTreeMap<u64, Vec<u64>> = BTreeMap::new();
                    for index in 0..size {
                        map.entry(black_box(scattered_key(index, size)))
                            .or_default()
                            .push(black_box(index));
                    }
                    black_box(map)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// find Benchmark
// =============================================================================

fn benchmark_find(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("find");

    for size in SIZES {
        let multimap = build_multimap(size);
        let btree = build_btree(size);
        let key_space = (size / 4).max(1);

        group.bench_with_input(
            BenchmarkId::new("TreeMultiMap", size),
            &key_space,
            |bencher, &key_space| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..key_space {
                        if let Some(&value) = multimap.get(&black_box(key)) {
                            sum += value;
                        }
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap<Vec>", size),
            &key_space,
            |bencher, &key_space| {
                bencher.iter(|| {
                    let mut sum = 0;
                    for key in 0..key_space {
                        if let Some(values) = btree.get(&black_box(key)) {
                            sum += values[0];
                        }
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// iterate Benchmark
// =============================================================================

fn benchmark_iterate(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iterate");

    for size in SIZES {
        let multimap = build_multimap(size);
        let btree = build_btree(size);

        group.bench_with_input(BenchmarkId::new("TreeMultiMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: u64 = multimap.values().sum();
                black_box(sum)
            });
        });

        group.bench_with_input(
            BenchmarkId::new("TreeMultiMap cursor", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let mut sum = 0;
                    let mut cursor = multimap.begin();
                    while let Some(value) = cursor.value() {
                        sum += value;
                        cursor.move_next();
                    }
                    black_box(sum)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap<Vec>", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    let sum: u64 = btree.values().flatten().sum();
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// erase Benchmark
// =============================================================================

fn benchmark_erase(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("erase");

    for size in SIZES {
        let multimap = build_multimap(size);
        let btree = build_btree(size);
        let key_space = (size / 4).max(1);

        group.bench_with_input(
            BenchmarkId::new("TreeMultiMap", size),
            &key_space,
            |bencher, &key_space| {
                bencher.iter_batched(
                    || multimap.clone(),
                    |mut map| {
                        for key in 0..key_space {
                            black_box(map.erase(&black_box(key)));
                        }
                        map
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );

        group.bench_with_input(
            BenchmarkId::new("BTreeMap<Vec>", size),
            &key_space,
            |bencher, &key_space| {
                bencher.iter_batched(
                    || btree.clone(),
                    |mut map| {
                        for key in 0..key_space {
                            black_box(map.remove(&black_box(key)));
                        }
                        map
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_find,
    benchmark_iterate,
    benchmark_erase
);
criterion_main!(benches);
