// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use confcut_criteria::PurityCriterion;
use confcut_fit::{ConfidenceCutter, CutterConfig};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;

fn toy_rows(n: usize) -> (Vec<[f64; 2]>, Vec<u8>) {
    let mut rows = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let spread = (i.wrapping_mul(2_654_435_761) % 1_000) as f64 / 1_000.0;
        let label = (i % 2) as u8;
        let conf = if label == 1 {
            0.3 + 0.7 * spread
        } else {
            0.7 * spread
        };
        rows.push([conf, -1.0 + 2.0 * i as f64 / (n - 1) as f64]);
        labels.push(label);
    }
    (rows, labels)
}

fn bench_fit(c: &mut Criterion) {
    let (rows, labels) = toy_rows(2_000);
    let config = CutterConfig {
        n_steps: 20,
        window_width: 0.4,
        n_bootstraps: 2,
        min_examples: 8,
        seed: 5,
        ..CutterConfig::default()
    };
    let criterion = PurityCriterion::with_constant_target(0.9).expect("valid target");

    c.bench_function("fit_toy_curve", |b| {
        b.iter(|| {
            let mut cutter = ConfidenceCutter::new(config.clone(), Arc::new(criterion.clone()))
                .expect("config should be valid");
            cutter
                .fit(black_box(&rows), black_box(&labels), None)
                .expect("fit should succeed")
        })
    });
}

fn bench_predict(c: &mut Criterion) {
    let (rows, labels) = toy_rows(2_000);
    let config = CutterConfig {
        n_steps: 20,
        window_width: 0.4,
        n_bootstraps: 2,
        min_examples: 8,
        seed: 5,
        ..CutterConfig::default()
    };
    let criterion = PurityCriterion::with_constant_target(0.9).expect("valid target");
    let mut cutter = ConfidenceCutter::new(config, Arc::new(criterion)).expect("valid config");
    cutter.fit(&rows, &labels, None).expect("fit should succeed");

    c.bench_function("predict_toy_curve", |b| {
        b.iter(|| cutter.predict(black_box(&rows)).expect("predict should succeed"))
    });
}

criterion_group!(benches, bench_fit, bench_predict);
criterion_main!(benches);
