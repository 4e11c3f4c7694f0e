// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::model::{ConfusionCounts, Criterion};
use crate::target::TargetSpec;
use confcut_core::CutError;

const DEFAULT_PURITY_TARGET: f64 = 0.99;

/// Purity (precision) criterion: deviation of `TP / (TP + FP)` from the
/// target.
///
/// A window where nothing is predicted positive has purity 0, not an
/// undefined value, so the zero denominator never propagates.
#[derive(Clone, Debug)]
pub struct PurityCriterion {
    target: TargetSpec,
}

impl PurityCriterion {
    pub fn new(target: TargetSpec) -> Self {
        Self { target }
    }

    pub fn with_constant_target(value: f64) -> Result<Self, CutError> {
        Ok(Self::new(TargetSpec::constant(value)?))
    }

    pub fn target(&self) -> &TargetSpec {
        &self.target
    }
}

impl Default for PurityCriterion {
    fn default() -> Self {
        Self {
            target: TargetSpec::Constant(DEFAULT_PURITY_TARGET),
        }
    }
}

impl Criterion for PurityCriterion {
    fn name(&self) -> &'static str {
        "purity"
    }

    fn deviation(
        &self,
        labels: &[u8],
        predicted: &[u8],
        position: f64,
        weights: Option<&[f64]>,
    ) -> Result<f64, CutError> {
        let target = self.target.resolve(position)?;
        let counts = ConfusionCounts::from_predictions(labels, predicted, weights)?;
        let selected = counts.true_positive + counts.false_positive;
        let purity = if selected == 0.0 {
            0.0
        } else {
            counts.true_positive / selected
        };
        Ok((purity - target).abs())
    }
}
