use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;
use strtab::{Fast, Good, StrHash, StrTable, TableConfig};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled<H: StrHash>(hasher: H, seed: u64, n: usize) -> (StrTable<u64, H>, Vec<String>) {
    let mut t = StrTable::create(TableConfig::default(), hasher).unwrap();
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().enumerate() {
        t.put(k, i as u64).unwrap();
    }
    (t, keys)
}

fn bench_put(c: &mut Criterion) {
    c.bench_function("strtab::put_fresh_100k_fast", |b| {
        let keys: Vec<String> = lcg(1).take(100_000).map(key).collect();
        b.iter_batched(
            StrTable::<u64>::new,
            |mut t| {
                for (i, k) in keys.iter().enumerate() {
                    t.put(k, i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("strtab::put_presized_100k_fast", |b| {
        let keys: Vec<String> = lcg(1).take(100_000).map(key).collect();
        b.iter_batched(
            || {
                StrTable::<u64>::create(TableConfig::default().with_initsize(200_000), Fast)
                    .unwrap()
            },
            |mut t| {
                for (i, k) in keys.iter().enumerate() {
                    t.put(k, i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });

    c.bench_function("strtab::put_short_keys_100k_good", |b| {
        // keys short enough for the inline form
        let keys: Vec<String> = (0..100_000u32).map(|i| format!("{i:x}")).collect();
        b.iter_batched(
            || StrTable::<u64, Good>::with_hasher(Good),
            |mut t| {
                for (i, k) in keys.iter().enumerate() {
                    t.put(k, i as u64).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get(c: &mut Criterion) {
    c.bench_function("strtab::get_hit_10k_on_100k", |b| {
        let (t, keys) = filled(Fast, 7, 100_000);
        let n = keys.len();
        let mut s = 0x9e3779b97f4a7c15u64;
        let queries: Vec<&str> = (0..10_000)
            .map(|_| {
                s = s.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
                keys[(s as usize) % n].as_str()
            })
            .collect();
        b.iter(|| {
            for k in &queries {
                black_box(t.get(k));
            }
        })
    });

    c.bench_function("strtab::get_miss_10k_on_100k", |b| {
        let (t, _) = filled(Fast, 11, 100_000);
        let misses: Vec<String> = lcg(0xdead_beef).take(10_000).map(key).collect();
        b.iter(|| {
            for k in &misses {
                black_box(t.get(k));
            }
        })
    });
}

fn bench_remove(c: &mut Criterion) {
    c.bench_function("strtab::remove_all_100k", |b| {
        b.iter_batched(
            || filled(Fast, 5, 100_000),
            |(mut t, keys)| {
                for k in &keys {
                    black_box(t.remove(k));
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_iter(c: &mut Criterion) {
    c.bench_function("strtab::iter_all_100k", |b| {
        let (t, _) = filled(Fast, 999, 100_000);
        b.iter(|| {
            let mut sum = 0u64;
            for (_k, v) in &t {
                sum = sum.wrapping_add(*v);
            }
            black_box(sum)
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_put, bench_get, bench_remove, bench_iter
}
criterion_main!(benches);
