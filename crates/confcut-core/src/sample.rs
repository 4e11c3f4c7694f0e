// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::CutError;

/// Borrowed, validated view over one labeled sample.
///
/// All slices are parallel: record `i` has confidence `confidence[i]`,
/// conditioning observable `observable[i]`, binary label `labels[i]`, and
/// weight `weights[i]` (1.0 for every record when `weights` is `None`).
#[derive(Clone, Copy, Debug)]
pub struct SampleView<'a> {
    pub confidence: &'a [f64],
    pub observable: &'a [f64],
    pub labels: &'a [u8],
    pub weights: Option<&'a [f64]>,
}

impl<'a> SampleView<'a> {
    /// Constructs a validated `SampleView`.
    pub fn new(
        confidence: &'a [f64],
        observable: &'a [f64],
        labels: &'a [u8],
        weights: Option<&'a [f64]>,
    ) -> Result<Self, CutError> {
        let n = confidence.len();
        if n == 0 {
            return Err(CutError::invalid_input("sample must hold at least one record"));
        }
        if observable.len() != n {
            return Err(CutError::invalid_input(format!(
                "observable length mismatch: got {}, expected {n}",
                observable.len()
            )));
        }
        if labels.len() != n {
            return Err(CutError::invalid_input(format!(
                "labels length mismatch: got {}, expected {n}",
                labels.len()
            )));
        }
        if let Some(w) = weights
            && w.len() != n
        {
            return Err(CutError::invalid_input(format!(
                "weights length mismatch: got {}, expected {n}",
                w.len()
            )));
        }

        for (idx, &value) in confidence.iter().enumerate() {
            if !value.is_finite() {
                return Err(CutError::invalid_input(format!(
                    "confidence values must be finite; got {value} at index {idx}"
                )));
            }
        }
        for (idx, &value) in observable.iter().enumerate() {
            if !value.is_finite() {
                return Err(CutError::invalid_input(format!(
                    "observable values must be finite; got {value} at index {idx}"
                )));
            }
        }
        for (idx, &label) in labels.iter().enumerate() {
            if label > 1 {
                return Err(CutError::invalid_input(format!(
                    "labels must be binary 0/1; got {label} at index {idx}"
                )));
            }
        }
        if let Some(w) = weights {
            for (idx, &value) in w.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(CutError::invalid_input(format!(
                        "weights must be finite and non-negative; got {value} at index {idx}"
                    )));
                }
            }
        }

        Ok(Self {
            confidence,
            observable,
            labels,
            weights,
        })
    }

    pub fn len(&self) -> usize {
        self.confidence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confidence.is_empty()
    }

    /// Number of distinct confidence values in the sample.
    pub fn distinct_confidence_count(&self) -> usize {
        let mut sorted = self.confidence.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        sorted.len()
    }

    /// Materializes the records selected by `indices` (repeats allowed) into
    /// an owned sample. Used for bootstrap resampling.
    pub fn gather(&self, indices: &[usize]) -> Result<Sample, CutError> {
        let n = self.len();
        if indices.is_empty() {
            return Err(CutError::invalid_input(
                "gather requires at least one index",
            ));
        }
        if let Some(&bad) = indices.iter().find(|&&idx| idx >= n) {
            return Err(CutError::invalid_input(format!(
                "gather index out of bounds: {bad} >= {n}"
            )));
        }

        let confidence = indices.iter().map(|&i| self.confidence[i]).collect();
        let observable = indices.iter().map(|&i| self.observable[i]).collect();
        let labels = indices.iter().map(|&i| self.labels[i]).collect();
        let weights = self
            .weights
            .map(|w| indices.iter().map(|&i| w[i]).collect());

        Ok(Sample {
            confidence,
            observable,
            labels,
            weights,
        })
    }
}

/// Owned counterpart of [`SampleView`], produced by resampling.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    confidence: Vec<f64>,
    observable: Vec<f64>,
    labels: Vec<u8>,
    weights: Option<Vec<f64>>,
}

impl Sample {
    pub fn view(&self) -> SampleView<'_> {
        SampleView {
            confidence: &self.confidence,
            observable: &self.observable,
            labels: &self.labels,
            weights: self.weights.as_deref(),
        }
    }

    pub fn len(&self) -> usize {
        self.confidence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confidence.is_empty()
    }
}
