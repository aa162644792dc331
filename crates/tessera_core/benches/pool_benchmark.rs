//! # Pool & Id Benchmark
//!
//! A frame touches every live container once through `LruPool::get`, so the
//! linear scan has to stay cheap at realistic pool sizes.
//!
//! Run with: `cargo bench --package tessera_core`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tessera_core::{Id, IdStack, LruPool, SlotArena};

fn bench_id_hashing(c: &mut Criterion) {
    let mut stack = IdStack::new();
    stack.push_data(b"Inspector");
    stack.push_data(b"Transform");

    c.bench_function("id_hash_label", |b| {
        b.iter(|| black_box(stack.id(black_box(b"position.x"))));
    });
}

fn bench_pool_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_lookup");

    for capacity in [16_u32, 48, 256] {
        let mut pool = LruPool::new(capacity as usize);
        for i in 0..capacity {
            pool.init(Id(i), u64::from(i) + 1);
        }

        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &cap| {
            b.iter(|| {
                let mut frame = u64::from(cap) + 1;
                for i in 0..cap {
                    if let Some(index) = pool.get(Id(i)) {
                        pool.update(index, frame);
                    }
                    frame += 1;
                }
                black_box(frame)
            });
        });
    }

    group.finish();
}

fn bench_pool_churn(c: &mut Criterion) {
    c.bench_function("pool_init_evict_48", |b| {
        let mut pool = LruPool::new(48);
        let mut frame = 1_u64;
        b.iter(|| {
            frame += 1;
            #[allow(clippy::cast_possible_truncation)]
            black_box(pool.init(Id(frame as u32), frame))
        });
    });
}

fn bench_arena_churn(c: &mut Criterion) {
    c.bench_function("arena_insert_remove", |b| {
        let mut arena = SlotArena::with_capacity(64);
        b.iter(|| {
            let handle = arena.insert(black_box(42_u32));
            black_box(arena.remove(handle))
        });
    });
}

criterion_group!(
    benches,
    bench_id_hashing,
    bench_pool_lookup,
    bench_pool_churn,
    bench_arena_churn
);
criterion_main!(benches);
