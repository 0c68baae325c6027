use criterion::{Criterion, black_box, criterion_group, criterion_main};
use bijection_map::{BijectionMap, HashBijectionMap, SerialBijectionMap};
use std::collections::BTreeMap;

fn bench_insert(c: &mut Criterion) {
    let n = 1_000u32;
    let mut group = c.benchmark_group("Insert 1000 pairs");

    group.bench_function("BTreeMap x2 (plain)", |b| {
        b.iter(|| {
            let mut fwd = BTreeMap::new();
            let mut rev = BTreeMap::new();
            for i in 0..n {
                fwd.insert(black_box(i), black_box(i ^ 0x5a5a));
                rev.insert(black_box(i ^ 0x5a5a), black_box(i));
            }
            (fwd, rev)
        })
    });

    group.bench_function("BijectionMap<u32, u32>", |b| {
        b.iter(|| {
            let mut m = BijectionMap::with_capacity(n as usize);
            for i in 0..n {
                m.insert(black_box(i), black_box(i ^ 0x5a5a));
            }
            m
        })
    });

    group.bench_function("HashBijectionMap<u32, u32>", |b| {
        b.iter(|| {
            let mut m: HashBijectionMap<u32, u32> = HashBijectionMap::default();
            m.reserve(n as usize);
            for i in 0..n {
                m.insert(black_box(i), black_box(i ^ 0x5a5a));
            }
            m
        })
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let n = 1_000u32;
    let map: BijectionMap<u32, u32> = (0..n).map(|i| (i, i ^ 0x5a5a)).collect();

    let mut group = c.benchmark_group("Lookup 1000");
    group.bench_function("find_key", |b| {
        b.iter(|| {
            for i in 0..n {
                black_box(map.find_key(&black_box(i)));
            }
        })
    });
    group.bench_function("find_value", |b| {
        b.iter(|| {
            for i in 0..n {
                black_box(map.find_value(&black_box(i ^ 0x5a5a)));
            }
        })
    });
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("Erase/reinsert churn");
    group.bench_function("SerialBijectionMap<u64>", |b| {
        let mut ids: SerialBijectionMap<u64> = (0..256).collect();
        let mut next = 256u64;
        b.iter(|| {
            let victim = next % 256;
            ids.erase_id(black_box(victim as usize));
            black_box(ids.intern(next));
            next += 1;
        })
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_churn);
criterion_main!(benches);
