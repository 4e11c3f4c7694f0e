// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::CutError;

/// Policy for resolving query points covered by more than one window when a
/// curve is built from (possibly overlapping) window edges.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CombinationMode {
    /// Average the threshold of every window covering the point.
    #[default]
    Overlapping,
    /// Assign each point to the single window whose position is nearest,
    /// partitioning the axis into non-overlapping spans.
    NonOverlapping,
}

/// Right-hand side of a curve combination.
#[derive(Clone, Copy, Debug)]
pub enum CurveOperand<'a> {
    Curve(&'a Curve),
    Scalar(f64),
}

#[derive(Clone, Copy, Debug)]
enum CurveOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl CurveOp {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Subtract => left - right,
            Self::Multiply => left * right,
            Self::Divide => left / right,
        }
    }
}

/// Piecewise-linear threshold curve over the observable axis.
///
/// Knots are strictly increasing in `x`; evaluation interpolates linearly
/// between neighboring knots and extrapolates flatly with the boundary value
/// outside the knot range.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Curve {
    /// Constructs a validated curve from parallel knot vectors.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, CutError> {
        if x.is_empty() {
            return Err(CutError::invalid_input("curve needs at least one knot"));
        }
        if x.len() != y.len() {
            return Err(CutError::invalid_input(format!(
                "knot length mismatch: x has {}, y has {}",
                x.len(),
                y.len()
            )));
        }
        for (idx, &value) in x.iter().enumerate() {
            if !value.is_finite() {
                return Err(CutError::invalid_input(format!(
                    "knot positions must be finite; got {value} at index {idx}"
                )));
            }
        }
        for (idx, &value) in y.iter().enumerate() {
            if !value.is_finite() {
                return Err(CutError::invalid_input(format!(
                    "knot values must be finite; got {value} at index {idx}"
                )));
            }
        }
        if let Some(idx) = x.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(CutError::invalid_input(format!(
                "knot positions must be strictly increasing; got {} then {} at index {idx}",
                x[idx],
                x[idx + 1]
            )));
        }

        Ok(Self { x, y })
    }

    /// Builds a curve from per-window edges and threshold values.
    ///
    /// The edge set is cut into elementary intervals; each interval midpoint
    /// becomes a knot whose value is resolved from the windows covering it
    /// (`lower <= mid < upper`) according to `mode`. Spans no window covers
    /// contribute no knot and are bridged by interpolation.
    pub fn from_sliding_windows(
        edges: &[[f64; 2]],
        values: &[f64],
        mode: CombinationMode,
    ) -> Result<Self, CutError> {
        if edges.is_empty() {
            return Err(CutError::invalid_input(
                "sliding curve needs at least one window",
            ));
        }
        if edges.len() != values.len() {
            return Err(CutError::invalid_input(format!(
                "window count mismatch: {} edge pairs, {} values",
                edges.len(),
                values.len()
            )));
        }
        for (idx, edge) in edges.iter().enumerate() {
            let [lower, upper] = *edge;
            if !lower.is_finite() || !upper.is_finite() || lower >= upper {
                return Err(CutError::invalid_input(format!(
                    "window edges must be finite with lower < upper; got [{lower}, {upper}) at index {idx}"
                )));
            }
        }
        for (idx, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(CutError::numerical_issue(format!(
                    "window threshold must be finite; got {value} at window {idx}"
                )));
            }
        }

        let mut boundaries: Vec<f64> = Vec::with_capacity(edges.len() * 2);
        for edge in edges {
            boundaries.push(edge[0]);
            boundaries.push(edge[1]);
        }
        boundaries.sort_by(f64::total_cmp);
        boundaries.dedup();

        let mut x = Vec::with_capacity(boundaries.len().saturating_sub(1));
        let mut y = Vec::with_capacity(x.capacity());
        for span in boundaries.windows(2) {
            let mid = 0.5 * (span[0] + span[1]);
            let Some(value) = resolve_covering(edges, values, mid, mode) else {
                continue;
            };
            x.push(mid);
            y.push(value);
        }

        if x.is_empty() {
            return Err(CutError::insufficient_data(
                "no window covers any span of the observable axis",
            ));
        }
        Self::new(x, y)
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }

    /// Threshold at `query`: linear interpolation between the bracketing
    /// knots, flat beyond the knot range. A NaN query yields NaN.
    pub fn evaluate(&self, query: f64) -> f64 {
        if query.is_nan() {
            return f64::NAN;
        }

        let last = self.x.len() - 1;
        if query <= self.x[0] {
            return self.y[0];
        }
        if query >= self.x[last] {
            return self.y[last];
        }

        let hi = self.x.partition_point(|&knot| knot < query);
        if self.x[hi] == query {
            return self.y[hi];
        }
        let lo = hi - 1;
        let t = (query - self.x[lo]) / (self.x[hi] - self.x[lo]);
        self.y[lo] + t * (self.y[hi] - self.y[lo])
    }

    pub fn evaluate_many(&self, queries: &[f64]) -> Vec<f64> {
        queries.iter().map(|&q| self.evaluate(q)).collect()
    }

    pub fn add(&self, operand: CurveOperand<'_>) -> Result<Self, CutError> {
        self.combine(CurveOp::Add, operand)
    }

    pub fn subtract(&self, operand: CurveOperand<'_>) -> Result<Self, CutError> {
        self.combine(CurveOp::Subtract, operand)
    }

    pub fn multiply(&self, operand: CurveOperand<'_>) -> Result<Self, CutError> {
        self.combine(CurveOp::Multiply, operand)
    }

    pub fn divide(&self, operand: CurveOperand<'_>) -> Result<Self, CutError> {
        self.combine(CurveOp::Divide, operand)
    }

    fn combine(&self, op: CurveOp, operand: CurveOperand<'_>) -> Result<Self, CutError> {
        let rhs: Vec<f64> = match operand {
            CurveOperand::Curve(other) => {
                if other.x.len() != self.x.len() {
                    return Err(CutError::invalid_input(format!(
                        "accepted operands are a curve on the same x grid or a finite scalar; \
                         got a curve with {} knots against {}",
                        other.x.len(),
                        self.x.len()
                    )));
                }
                if let Some(idx) = (0..self.x.len()).find(|&i| self.x[i] != other.x[i]) {
                    return Err(CutError::invalid_input(format!(
                        "accepted operands are a curve on the same x grid or a finite scalar; \
                         x grids differ at knot {idx}: {} vs {}",
                        self.x[idx], other.x[idx]
                    )));
                }
                other.y.clone()
            }
            CurveOperand::Scalar(value) => {
                if !value.is_finite() {
                    return Err(CutError::invalid_input(format!(
                        "accepted operands are a curve on the same x grid or a finite scalar; \
                         got scalar {value}"
                    )));
                }
                vec![value; self.x.len()]
            }
        };

        let mut y = Vec::with_capacity(self.y.len());
        for (idx, (&left, &right)) in self.y.iter().zip(&rhs).enumerate() {
            let combined = op.apply(left, right);
            if !combined.is_finite() {
                return Err(CutError::numerical_issue(format!(
                    "non-finite result at knot {idx} (x={}): {left} {} {right} = {combined}",
                    self.x[idx],
                    op.symbol()
                )));
            }
            y.push(combined);
        }

        Ok(Self {
            x: self.x.clone(),
            y,
        })
    }
}

fn resolve_covering(
    edges: &[[f64; 2]],
    values: &[f64],
    mid: f64,
    mode: CombinationMode,
) -> Option<f64> {
    match mode {
        CombinationMode::Overlapping => {
            let mut sum = 0.0;
            let mut count = 0usize;
            for (edge, &value) in edges.iter().zip(values) {
                if edge[0] <= mid && mid < edge[1] {
                    sum += value;
                    count += 1;
                }
            }
            (count > 0).then(|| sum / count as f64)
        }
        CombinationMode::NonOverlapping => {
            let mut best: Option<(f64, f64)> = None;
            for (edge, &value) in edges.iter().zip(values) {
                if edge[0] <= mid && mid < edge[1] {
                    let distance = (0.5 * (edge[0] + edge[1]) - mid).abs();
                    let closer = best.is_none_or(|(best_distance, _)| distance < best_distance);
                    if closer {
                        best = Some((distance, value));
                    }
                }
            }
            best.map(|(_, value)| value)
        }
    }
}
