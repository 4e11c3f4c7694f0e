// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use confcut_core::{CutError, SampleView};
use confcut_criteria::Criterion;

/// Candidate grid size for the narrowing search.
pub const SEARCH_POINTS: usize = 5;

/// Finds the confidence threshold minimizing the criterion deviation within
/// one window `[lower, upper)` evaluated at `position`.
///
/// Returns NaN when the window holds fewer than `min_examples` distinct
/// confidence values; the caller interpolates such windows later.
///
/// The search narrows a candidate grid over the sorted unique confidence
/// values: up to `n_points` evenly spaced candidates (both ends always
/// included) are scored, then the range shrinks to the span between the best
/// candidate's grid neighbors and the grid is re-laid, until the remaining
/// range is smaller than the grid and every value is scored directly. The
/// objective need not be convex, so the result is locally convergent rather
/// than globally optimal; ties go to the smaller threshold.
pub fn find_best_cut(
    sample: &SampleView<'_>,
    lower: f64,
    upper: f64,
    position: f64,
    criterion: &dyn Criterion,
    min_examples: usize,
    n_points: usize,
) -> Result<f64, CutError> {
    if n_points < 3 {
        return Err(CutError::invalid_input(format!(
            "candidate grid needs at least 3 points; got {n_points}"
        )));
    }

    let mut confidence = Vec::new();
    let mut labels = Vec::new();
    let mut weights = sample.weights.map(|_| Vec::new());
    for idx in 0..sample.len() {
        let observable = sample.observable[idx];
        if observable >= lower && observable < upper {
            confidence.push(sample.confidence[idx]);
            labels.push(sample.labels[idx]);
            if let (Some(selected), Some(all)) = (weights.as_mut(), sample.weights) {
                selected.push(all[idx]);
            }
        }
    }

    let mut unique = confidence.clone();
    unique.sort_by(f64::total_cmp);
    unique.dedup();
    if unique.len() < min_examples {
        return Ok(f64::NAN);
    }

    let weights_slice = weights.as_deref();
    let mut predicted = vec![0_u8; confidence.len()];
    let mut evaluate = |cut: f64| -> Result<f64, CutError> {
        for (slot, &value) in predicted.iter_mut().zip(&confidence) {
            *slot = u8::from(value >= cut);
        }
        let deviation = criterion.deviation(&labels, &predicted, position, weights_slice)?;
        if !deviation.is_finite() || deviation < 0.0 {
            return Err(CutError::numerical_issue(format!(
                "criterion deviation must be finite and >= 0; \
                 got {deviation} for cut {cut} at position {position}"
            )));
        }
        Ok(deviation)
    };

    narrow_to_best_cut(&mut evaluate, &unique, n_points)
}

/// Iterative form of the narrowing search over a sorted unique-value slice.
fn narrow_to_best_cut(
    evaluate: &mut dyn FnMut(f64) -> Result<f64, CutError>,
    unique: &[f64],
    n_points: usize,
) -> Result<f64, CutError> {
    let mut range = unique;
    loop {
        let n_values = range.len();
        if n_values == 0 {
            return Ok(f64::NAN);
        }

        let step = n_values / (n_points - 1);
        if step == 0 {
            // Too few values to lay a grid: score every remaining value.
            let mut best_cut = f64::NAN;
            let mut best_deviation = f64::INFINITY;
            for &cut in range {
                let deviation = evaluate(cut)?;
                if deviation < best_deviation {
                    best_deviation = deviation;
                    best_cut = cut;
                }
            }
            return Ok(best_cut);
        }

        let mut grid: Vec<usize> = (0..n_points).map(|point| point * step).collect();
        grid[n_points - 1] = n_values - 1;

        let mut best = 0;
        let mut best_deviation = f64::INFINITY;
        for (slot, &idx) in grid.iter().enumerate() {
            let deviation = evaluate(range[idx])?;
            if deviation < best_deviation {
                best_deviation = deviation;
                best = slot;
            }
        }

        range = if best == 0 {
            &range[..grid[1]]
        } else if best == n_points - 1 {
            &range[grid[n_points - 2]..]
        } else {
            &range[grid[best - 1]..grid[best + 1]]
        };
    }
}

#[cfg(test)]
mod tests {
    use super::{SEARCH_POINTS, find_best_cut};
    use confcut_core::{CutError, SampleView};
    use confcut_criteria::{Criterion, PurityCriterion};

    fn separable_sample(n: usize, boundary: f64) -> (Vec<f64>, Vec<f64>, Vec<u8>) {
        let confidence: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
        let observable = vec![0.0; n];
        let labels = confidence
            .iter()
            .map(|&c| u8::from(c >= boundary))
            .collect();
        (confidence, observable, labels)
    }

    #[test]
    fn finds_the_separating_threshold_on_clean_data() {
        let (confidence, observable, labels) = separable_sample(12, 0.5);
        let sample =
            SampleView::new(&confidence, &observable, &labels, None).expect("sample valid");
        let criterion = PurityCriterion::with_constant_target(1.0).expect("valid target");

        let cut = find_best_cut(&sample, -1.0, 1.0, 0.0, &criterion, 3, SEARCH_POINTS)
            .expect("search should succeed");
        // Every cut >= 0.5 reaches purity 1; the tie-break keeps the first
        // zero-deviation candidate the narrowing grid settles on.
        assert_eq!(cut, 0.5);
    }

    #[test]
    fn returns_nan_below_the_distinct_value_floor() {
        let confidence = [0.2, 0.2, 0.8, 0.8];
        let observable = [0.0; 4];
        let labels = [0_u8, 0, 1, 1];
        let sample =
            SampleView::new(&confidence, &observable, &labels, None).expect("sample valid");
        let criterion = PurityCriterion::default();

        let cut = find_best_cut(&sample, -1.0, 1.0, 0.0, &criterion, 3, SEARCH_POINTS)
            .expect("search should succeed");
        assert!(cut.is_nan());
    }

    #[test]
    fn window_membership_is_half_open() {
        // Records at observable 1.0 sit outside [0.0, 1.0).
        let confidence = [0.1, 0.2, 0.3, 0.4, 0.9];
        let observable = [0.0, 0.5, 0.5, 0.9, 1.0];
        let labels = [0_u8, 0, 1, 1, 1];
        let sample =
            SampleView::new(&confidence, &observable, &labels, None).expect("sample valid");
        let criterion = PurityCriterion::with_constant_target(1.0).expect("valid target");

        // Only four records remain; min_examples 5 makes the window undefined,
        // proving the record at the upper edge was excluded.
        let cut = find_best_cut(&sample, 0.0, 1.0, 0.5, &criterion, 5, SEARCH_POINTS)
            .expect("search should succeed");
        assert!(cut.is_nan());
    }

    #[test]
    fn returned_cut_is_always_an_observed_confidence() {
        let confidence = [0.11, 0.23, 0.37, 0.41, 0.53, 0.67, 0.71, 0.83];
        let observable = [0.0; 8];
        let labels = [0_u8, 0, 1, 0, 1, 1, 1, 1];
        let sample =
            SampleView::new(&confidence, &observable, &labels, None).expect("sample valid");
        let criterion = PurityCriterion::with_constant_target(0.9).expect("valid target");

        let cut = find_best_cut(&sample, -1.0, 1.0, 0.0, &criterion, 3, SEARCH_POINTS)
            .expect("search should succeed");
        assert!(confidence.contains(&cut), "cut {cut} not an observed value");
    }

    #[test]
    fn rejects_degenerate_grids() {
        let (confidence, observable, labels) = separable_sample(8, 0.5);
        let sample =
            SampleView::new(&confidence, &observable, &labels, None).expect("sample valid");
        let criterion = PurityCriterion::default();

        let err = find_best_cut(&sample, -1.0, 1.0, 0.0, &criterion, 3, 2)
            .expect_err("grid with fewer than 3 points must fail");
        assert!(err.to_string().contains("at least 3 points"));
    }

    #[test]
    fn criterion_failures_propagate() {
        struct FailingCriterion;
        impl Criterion for FailingCriterion {
            fn name(&self) -> &'static str {
                "failing"
            }
            fn deviation(
                &self,
                _labels: &[u8],
                _predicted: &[u8],
                _position: f64,
                _weights: Option<&[f64]>,
            ) -> Result<f64, CutError> {
                Ok(f64::NAN)
            }
        }

        let (confidence, observable, labels) = separable_sample(8, 0.5);
        let sample =
            SampleView::new(&confidence, &observable, &labels, None).expect("sample valid");
        let err = find_best_cut(&sample, -1.0, 1.0, 0.0, &FailingCriterion, 3, SEARCH_POINTS)
            .expect_err("NaN deviation must fail");
        assert!(err.to_string().contains("finite and >= 0"));
    }
}
