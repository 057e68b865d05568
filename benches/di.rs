use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keystone_di::*;
use std::sync::Arc;

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let token = Token::<u64>::new("answer");
    let container = Container::new();
    container
        .register_singleton_as(&token, Implementation::factory([], |_| Ok(Arc::new(42u64))))
        .unwrap();

    // Prime the singleton
    let _ = container.resolve(&token).unwrap();

    c.bench_function("singleton_hit_u64", |b| {
        b.iter(|| {
            let v = container.resolve(&token).unwrap();
            black_box(v);
        })
    });
}

fn bench_singleton_cold(c: &mut Criterion) {
    struct ExpensiveToCreate {
        data: Vec<u64>,
    }

    impl Injectable for ExpensiveToCreate {
        fn construct(_: &mut Dependencies) -> DiResult<Self> {
            Ok(ExpensiveToCreate {
                data: (0..1000).collect(),
            })
        }
    }

    c.bench_function("singleton_cold_expensive", |b| {
        b.iter_batched(
            || {
                let container = Container::new();
                container.register_singleton::<ExpensiveToCreate>().unwrap();
                container
            },
            |container| {
                let v = container.get::<ExpensiveToCreate>().unwrap();
                black_box(v.data.len());
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_singleton_vs_transient(c: &mut Criterion) {
    struct Service {
        data: [u8; 64],
    }

    impl Injectable for Service {
        fn construct(_: &mut Dependencies) -> DiResult<Self> {
            Ok(Service { data: [0; 64] })
        }
    }

    let mut group = c.benchmark_group("singleton_vs_transient");

    let singleton = Container::new();
    singleton.register_singleton::<Service>().unwrap();
    let _ = singleton.get::<Service>().unwrap();

    group.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = singleton.get::<Service>().unwrap();
            black_box(&v.data);
        })
    });

    let transient = Container::new();
    transient.register_transient::<Service>().unwrap();

    group.bench_function("transient", |b| {
        b.iter(|| {
            let v = transient.get::<Service>().unwrap();
            black_box(&v.data);
        })
    });

    group.finish();
}

fn bench_concrete_vs_trait(c: &mut Criterion) {
    trait MyTrait: Send + Sync {
        fn value(&self) -> u64;
    }

    struct ConcreteImpl {
        val: u64,
    }

    impl MyTrait for ConcreteImpl {
        fn value(&self) -> u64 {
            self.val
        }
    }

    impl Injectable for ConcreteImpl {
        fn construct(_: &mut Dependencies) -> DiResult<Self> {
            Ok(ConcreteImpl { val: 42 })
        }
    }

    let mut group = c.benchmark_group("concrete_vs_trait");

    let container = Container::new();
    container.register_singleton::<ConcreteImpl>().unwrap();
    let trait_token = Token::<dyn MyTrait>::new("my-trait");
    container
        .register_singleton_as(
            &trait_token,
            Implementation::injectable_as::<ConcreteImpl>(|concrete| concrete as Arc<dyn MyTrait>),
        )
        .unwrap();

    group.bench_function("concrete", |b| {
        b.iter(|| {
            let v = container.get::<ConcreteImpl>().unwrap();
            black_box(v.val);
        })
    });

    group.bench_function("trait_object", |b| {
        b.iter(|| {
            let v = container.resolve(&trait_token).unwrap();
            black_box(v.value());
        })
    });

    group.finish();
}

fn bench_transient_chain_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("transient_chain");

    for &depth in &[1usize, 8, 32, 128] {
        let container = Container::new();
        let tokens: Vec<Token<u64>> = (0..depth).map(|i| Token::new(format!("link{i}"))).collect();
        for (i, token) in tokens.iter().enumerate() {
            let deps: Vec<Key> = tokens.get(i + 1).map(Key::from).into_iter().collect();
            container
                .register_transient_as(
                    token,
                    Implementation::factory(deps, |deps| {
                        let below = if deps.is_empty() { 0 } else { *deps.next::<u64>()? };
                        Ok(Arc::new(below + 1))
                    }),
                )
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("resolve", depth), &depth, |b, _| {
            b.iter(|| {
                let v = container.resolve(&tokens[0]).unwrap();
                black_box(v);
            })
        });
    }

    group.finish();
}

fn bench_cycle_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_detection");

    for &len in &[2usize, 16, 64] {
        let container = Container::new();
        let tokens: Vec<Token<u8>> = (0..len).map(|i| Token::new(format!("ring{i}"))).collect();
        for (i, token) in tokens.iter().enumerate() {
            let next = Key::from(&tokens[(i + 1) % len]);
            container
                .register_transient_as(token, Implementation::factory([next], |_| Ok(Arc::new(0u8))))
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("ring", len), &len, |b, _| {
            b.iter(|| {
                let err = container.resolve(&tokens[0]).unwrap_err();
                black_box(err);
            })
        });
    }

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    let token = Token::<u64>::new("shared");
    let container = Container::new();
    container
        .register_singleton_as(&token, Implementation::factory([], |_| Ok(Arc::new(42u64))))
        .unwrap();
    let _ = container.resolve(&token).unwrap();

    for &threads in &[1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("singleton_hit", threads), &threads, |b, &threads| {
            b.iter_custom(|iters| {
                let start = std::time::Instant::now();
                crossbeam_utils::thread::scope(|s| {
                    for _ in 0..threads {
                        let container = &container;
                        let token = &token;
                        s.spawn(move |_| {
                            for _ in 0..iters / threads as u64 {
                                let v = container.resolve(token).unwrap();
                                black_box(v);
                            }
                        });
                    }
                })
                .unwrap();
                start.elapsed()
            })
        });
    }

    group.finish();
}

// ===== Macro Benchmarks =====

fn bench_large_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("large_registry");

    for &binding_count in &[10usize, 100, 1000] {
        let container = Container::new();
        let target = Token::<u64>::new("target");
        container
            .register_singleton_as(&target, Implementation::factory([], |_| Ok(Arc::new(42u64))))
            .unwrap();

        for i in 0..binding_count {
            let filler = Token::<usize>::new(format!("filler{i}"));
            container
                .register_singleton_as(&filler, Implementation::factory([], move |_| Ok(Arc::new(i))))
                .unwrap();
        }

        group.bench_with_input(
            BenchmarkId::new("resolve_from_large_registry", binding_count),
            &binding_count,
            |b, _| {
                b.iter(|| {
                    let v = container.resolve(&target).unwrap();
                    black_box(v);
                })
            },
        );
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let container = Container::new();
    let tokens: Vec<Token<u8>> = (0..200).map(|i| Token::new(format!("node{i}"))).collect();
    for (i, token) in tokens.iter().enumerate() {
        let deps: Vec<Key> = tokens.iter().skip(i + 1).take(3).map(Key::from).collect();
        container
            .register_transient_as(token, Implementation::factory(deps, |_| Ok(Arc::new(0u8))))
            .unwrap();
    }

    c.bench_function("validate_200_bindings", |b| {
        b.iter(|| {
            let report = container.validate();
            black_box(report.is_valid());
        })
    });
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_singleton_cold,
    bench_singleton_vs_transient,
    bench_concrete_vs_trait,
    bench_transient_chain_depth,
    bench_cycle_detection,
    bench_contention
);

criterion_group!(macro_benches, bench_large_registry, bench_validate);

criterion_main!(micro_benches, macro_benches);
