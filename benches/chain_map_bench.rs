use chain_table::{ChainMap, ChainSet, StdHash, TableConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (ChainMap<String, u64>, Vec<String>) {
    let mut m = ChainMap::new();
    let keys: Vec<_> = lcg(seed).take(n).map(key).collect();
    for (i, k) in keys.iter().cloned().enumerate() {
        m.insert(k, i as u64);
    }
    (m, keys)
}

fn bench_insert(c: &mut Criterion) {
    c.bench_function("chain_map_insert_10k", |b| {
        b.iter_batched(
            ChainMap::<String, u64>::new,
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_presized(c: &mut Criterion) {
    c.bench_function("chain_map_insert_10k_presized", |b| {
        b.iter_batched(
            || {
                ChainMap::<String, u64, StdHash>::with_config(
                    TableConfig::new().initial_bins(16_384),
                )
                .unwrap()
            },
            |mut m| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    m.insert(key(x), i as u64);
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("chain_map_get_hit", |b| {
        let (m, keys) = filled(7, 20_000);
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            black_box(m.get(k).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("chain_map_get_miss", |b| {
        let (m, _) = filled(11, 10_000);
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // generate keys unlikely in map
            let k = key(miss.next().unwrap());
            black_box(m.get(&k).is_err());
        })
    });
}

fn bench_cursor_erase_half(c: &mut Criterion) {
    c.bench_function("chain_map_cursor_erase_half_10k", |b| {
        b.iter_batched(
            || filled(13, 10_000).0,
            |mut m| {
                let mut cur = m.begin();
                let mut odd = false;
                while !cur.is_end() {
                    if odd {
                        cur.erase(&mut m).unwrap();
                    }
                    odd = !odd;
                    cur.advance(&m).unwrap();
                }
                black_box(m)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_set_subset(c: &mut Criterion) {
    c.bench_function("chain_set_is_subset_10k", |b| {
        let small: ChainSet<u64> = lcg(3).take(5_000).collect();
        let big: ChainSet<u64> = lcg(3).take(10_000).collect();
        b.iter(|| black_box(small.is_subset(&big)))
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert, bench_insert_presized, bench_get_hit, bench_get_miss,
        bench_cursor_erase_half, bench_set_subset
}
criterion_main!(benches);
