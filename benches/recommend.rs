use criterion::{black_box, criterion_group, criterion_main, Criterion};
use portion_engine::PortionEngine;

fn recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend and validate");
    let engine = PortionEngine::default();

    let foods = black_box(vec![
        "Kingfisher Beer",
        "masala chai",
        "chicken biryani",
        "plain dosa",
        "apple",
        "chicken soup",
        "unknown-xyz-food",
    ]);

    group.bench_function("recommend-portion", |b| {
        b.iter(|| {
            for food in &foods {
                let _ = engine.recommend_portion(food);
            }
        })
    });

    group.bench_function("validate", |b| {
        b.iter(|| {
            for food in &foods {
                let _ = engine.validate(food, 250.0, 100.0);
            }
        })
    });

    group.bench_function("build-bundled-engine", |b| b.iter(PortionEngine::bundled));
}

criterion_group!(benches, recommend);
criterion_main!(benches);
