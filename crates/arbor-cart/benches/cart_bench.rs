//! Criterion benchmarks for arbor-cart: split search, training, and prediction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arbor_cart::{Predicate, TreeConfig, find_best_split};

fn make_classification(
    n_samples: usize,
    n_features: usize,
    n_classes: usize,
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % n_classes;
        labels.push(class);
        let row: Vec<f64> = (0..n_features)
            .map(|f| {
                let base = if f < 3 { class as f64 * 3.0 } else { 0.0 };
                base + rng.r#gen::<f64>() * 0.5
            })
            .collect();
        rows.push(row);
    }
    (rows, labels)
}

fn bench_find_best_split(c: &mut Criterion) {
    let (rows, labels) = make_classification(200, 10, 3, 42);

    c.bench_function("find_best_split_200x10_3class", |b| {
        b.iter(|| find_best_split(&rows, &labels, Predicate::Threshold).unwrap());
    });
}

fn bench_train(c: &mut Criterion) {
    let (rows, labels) = make_classification(200, 10, 3, 42);
    let cfg = TreeConfig::new(8).unwrap().with_min_leaf_size(1);

    c.bench_function("train_200x10_3class_depth8", |b| {
        b.iter(|| cfg.fit(&rows, &labels).unwrap());
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let (rows, labels) = make_classification(200, 10, 3, 42);
    let tree = TreeConfig::new(8).unwrap().fit(&rows, &labels).unwrap();

    c.bench_function("predict_batch_200x10_depth8", |b| {
        b.iter(|| tree.predict_batch(&rows).unwrap());
    });
}

criterion_group!(benches, bench_find_best_split, bench_train, bench_predict_batch);
criterion_main!(benches);
