// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use confcut_core::CutError;

/// Scores how far a candidate threshold's induced classification sits from a
/// target quality level at a given window position.
///
/// The deviation is non-negative and smaller is better. The threshold search
/// *minimizes* it; the target is not a hard constraint, so a window where no
/// threshold can reach the target yields the closest achievable quality.
pub trait Criterion: Send + Sync {
    fn name(&self) -> &'static str;

    /// Deviation of `predicted` from the target quality at `position`.
    ///
    /// `labels` and `predicted` are parallel binary vectors; `weights`, when
    /// present, matches their length.
    fn deviation(
        &self,
        labels: &[u8],
        predicted: &[u8],
        position: f64,
        weights: Option<&[f64]>,
    ) -> Result<f64, CutError>;
}

/// Weighted confusion-matrix counts for one induced classification.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConfusionCounts {
    pub true_positive: f64,
    pub false_positive: f64,
    pub true_negative: f64,
    pub false_negative: f64,
}

impl ConfusionCounts {
    /// Accumulates counts from parallel label/prediction vectors. Without
    /// weights every record counts 1.0.
    pub fn from_predictions(
        labels: &[u8],
        predicted: &[u8],
        weights: Option<&[f64]>,
    ) -> Result<Self, CutError> {
        if predicted.len() != labels.len() {
            return Err(CutError::invalid_input(format!(
                "prediction length mismatch: got {}, expected {}",
                predicted.len(),
                labels.len()
            )));
        }
        if let Some(w) = weights
            && w.len() != labels.len()
        {
            return Err(CutError::invalid_input(format!(
                "weights length mismatch: got {}, expected {}",
                w.len(),
                labels.len()
            )));
        }

        let mut counts = Self::default();
        for idx in 0..labels.len() {
            let weight = weights.map_or(1.0, |w| w[idx]);
            match (labels[idx] != 0, predicted[idx] != 0) {
                (true, true) => counts.true_positive += weight,
                (false, true) => counts.false_positive += weight,
                (false, false) => counts.true_negative += weight,
                (true, false) => counts.false_negative += weight,
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::ConfusionCounts;

    #[test]
    fn unweighted_counts_cover_all_four_cells() {
        let labels = [1_u8, 1, 0, 0];
        let predicted = [1_u8, 0, 1, 0];
        let counts = ConfusionCounts::from_predictions(&labels, &predicted, None)
            .expect("counts should accumulate");
        assert_eq!(counts.true_positive, 1.0);
        assert_eq!(counts.false_negative, 1.0);
        assert_eq!(counts.false_positive, 1.0);
        assert_eq!(counts.true_negative, 1.0);
    }

    #[test]
    fn weights_scale_each_cell() {
        let labels = [1_u8, 0, 1];
        let predicted = [1_u8, 1, 0];
        let weights = [2.0, 0.5, 3.0];
        let counts = ConfusionCounts::from_predictions(&labels, &predicted, Some(&weights))
            .expect("weighted counts should accumulate");
        assert_eq!(counts.true_positive, 2.0);
        assert_eq!(counts.false_positive, 0.5);
        assert_eq!(counts.false_negative, 3.0);
        assert_eq!(counts.true_negative, 0.0);
    }

    #[test]
    fn rejects_length_mismatches() {
        let err = ConfusionCounts::from_predictions(&[1, 0], &[1], None)
            .expect_err("prediction length mismatch must fail");
        assert!(err.to_string().contains("prediction length mismatch"));

        let err = ConfusionCounts::from_predictions(&[1, 0], &[1, 0], Some(&[1.0]))
            .expect_err("weights length mismatch must fail");
        assert!(err.to_string().contains("weights length mismatch"));
    }
}
