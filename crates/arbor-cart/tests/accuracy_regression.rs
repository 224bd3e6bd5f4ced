//! Accuracy regression tests for arbor-cart.
//!
//! These tests verify that algorithmic changes do not degrade decision tree
//! classification accuracy on a deterministic synthetic dataset.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arbor_cart::{Predicate, TreeConfig};

// ---------------------------------------------------------------------------
// Helper: deterministic synthetic classification dataset
// ---------------------------------------------------------------------------

/// Generate an `n_samples`-row, 6-feature, 3-class classification dataset.
///
/// Features 0-1 are informative (class * 3.0 + noise in [0, 0.5]).
/// Features 2-5 are pure noise in [0, 0.5].
/// Samples are assigned round-robin across classes.
fn make_classification(n_samples: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let n_features = 6;
    let n_classes = 3;

    let mut rows = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let class = i % n_classes;
        labels.push(class);
        let row: Vec<f64> = (0..n_features)
            .map(|f| {
                let base = if f < 2 { class as f64 * 3.0 } else { 0.0 };
                base + rng.r#gen::<f64>() * 0.5
            })
            .collect();
        rows.push(row);
    }
    (rows, labels)
}

// ---------------------------------------------------------------------------
// a) training_set_is_memorized
// ---------------------------------------------------------------------------

/// With no leaf-size floor and a generous depth, every training row lands in a
/// pure leaf carrying its own label.
#[test]
fn training_set_is_memorized() {
    let (rows, labels) = make_classification(150, 42);
    let tree = TreeConfig::new(64)
        .unwrap()
        .with_min_leaf_size(0)
        .fit(&rows, &labels)
        .unwrap();

    let accuracy = tree.accuracy(&rows, &labels).unwrap();
    assert!(
        (accuracy - 1.0).abs() < f64::EPSILON,
        "training accuracy {accuracy} != 1.0"
    );
}

// ---------------------------------------------------------------------------
// b) held_out_accuracy_above_threshold
// ---------------------------------------------------------------------------

/// Held-out accuracy on an independently drawn dataset must exceed 0.90.
#[test]
fn held_out_accuracy_above_threshold() {
    let (train_rows, train_labels) = make_classification(150, 42);
    let (test_rows, test_labels) = make_classification(90, 7);
    let tree = TreeConfig::new(4)
        .unwrap()
        .with_min_leaf_size(2)
        .fit(&train_rows, &train_labels)
        .unwrap();

    let accuracy = tree.accuracy(&test_rows, &test_labels).unwrap();
    assert!(accuracy > 0.90, "held-out accuracy {accuracy} <= 0.90");
}

// ---------------------------------------------------------------------------
// c) deterministic_trees
// ---------------------------------------------------------------------------

/// Two fits on identical input must produce identical trees.
#[test]
fn deterministic_trees() {
    let (rows, labels) = make_classification(120, 3);
    let config = TreeConfig::new(6).unwrap().with_min_leaf_size(1);

    let tree1 = config.fit(&rows, &labels).unwrap();
    let tree2 = config.fit(&rows, &labels).unwrap();

    assert_eq!(tree1, tree2, "trees differ across runs on identical input");
    assert_eq!(tree1.render(), tree2.render());
}

// ---------------------------------------------------------------------------
// d) depth_limit_is_respected
// ---------------------------------------------------------------------------

/// No root-to-leaf path may hold more internal nodes than `max_depth`.
#[test]
fn depth_limit_is_respected() {
    let (rows, labels) = make_classification(150, 11);
    for max_depth in 1..=5 {
        let tree = TreeConfig::new(max_depth)
            .unwrap()
            .with_min_leaf_size(0)
            .fit(&rows, &labels)
            .unwrap();
        assert!(
            tree.depth() <= max_depth,
            "depth {} exceeds max_depth {max_depth}",
            tree.depth()
        );
    }
}

// ---------------------------------------------------------------------------
// e) single_split_shape
// ---------------------------------------------------------------------------

/// `max_depth = 1` always yields one internal node and two leaves.
#[test]
fn single_split_shape() {
    let (rows, labels) = make_classification(60, 5);
    for predicate in [Predicate::Threshold, Predicate::Equality] {
        let tree = TreeConfig::new(1)
            .unwrap()
            .with_predicate(predicate)
            .fit(&rows, &labels)
            .unwrap();
        assert_eq!(tree.n_nodes(), 3);
        assert_eq!(tree.n_leaves(), 2);
    }
}
