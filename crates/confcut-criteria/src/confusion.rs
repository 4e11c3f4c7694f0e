// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::model::{ConfusionCounts, Criterion};
use crate::target::TargetSpec;
use confcut_core::CutError;

/// One cell of the binary confusion matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfusionTerm {
    TruePositive,
    FalsePositive,
    TrueNegative,
    FalseNegative,
}

impl ConfusionTerm {
    fn extract(self, counts: &ConfusionCounts) -> f64 {
        match self {
            Self::TruePositive => counts.true_positive,
            Self::FalsePositive => counts.false_positive,
            Self::TrueNegative => counts.true_negative,
            Self::FalseNegative => counts.false_negative,
        }
    }
}

/// Generalized confusion-matrix ratio criterion.
///
/// Scores `sum(numerator terms) / sum(denominator terms)` against the target;
/// purity is the special case numerator `{TP}`, denominator `{TP, FP}`, and
/// efficiency (recall) is numerator `{TP}`, denominator `{TP, FN}`. A zero
/// denominator resolves to ratio 0.
#[derive(Clone, Debug)]
pub struct ConfusionRatioCriterion {
    numerator: Vec<ConfusionTerm>,
    denominator: Vec<ConfusionTerm>,
    target: TargetSpec,
}

impl ConfusionRatioCriterion {
    pub fn new(
        numerator: &[ConfusionTerm],
        denominator: &[ConfusionTerm],
        target: TargetSpec,
    ) -> Result<Self, CutError> {
        validate_terms(numerator, "numerator")?;
        validate_terms(denominator, "denominator")?;
        Ok(Self {
            numerator: numerator.to_vec(),
            denominator: denominator.to_vec(),
            target,
        })
    }
}

fn validate_terms(terms: &[ConfusionTerm], side: &str) -> Result<(), CutError> {
    if terms.is_empty() {
        return Err(CutError::invalid_input(format!(
            "confusion ratio {side} must name at least one term"
        )));
    }
    for (idx, term) in terms.iter().enumerate() {
        if terms[..idx].contains(term) {
            return Err(CutError::invalid_input(format!(
                "confusion ratio {side} lists {term:?} more than once"
            )));
        }
    }
    Ok(())
}

impl Criterion for ConfusionRatioCriterion {
    fn name(&self) -> &'static str {
        "confusion_ratio"
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
        let numerator: f64 = self
            .numerator
            .iter()
            .map(|term| term.extract(&counts))
            .sum();
        let denominator: f64 = self
            .denominator
            .iter()
            .map(|term| term.extract(&counts))
            .sum();
        let ratio = if denominator == 0.0 {
            0.0
        } else {
            numerator / denominator
        };
        Ok((ratio - target).abs())
    }
}
