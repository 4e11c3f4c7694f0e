// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use confcut_core::CutError;

/// Sliding-window partition of the observable axis.
///
/// Each window is the half-open interval `[position - width/2,
/// position + width/2)`; windows overlap whenever the width exceeds the
/// spacing between consecutive positions, which is intentional smoothing and
/// resolved at curve construction, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowPartition {
    positions: Vec<f64>,
    edges: Vec<[f64; 2]>,
}

impl WindowPartition {
    /// Builds windows directly from explicitly supplied positions.
    pub fn from_positions(positions: &[f64], width: f64) -> Result<Self, CutError> {
        validate_width(width)?;
        if positions.is_empty() {
            return Err(CutError::invalid_input(
                "at least one window position is required",
            ));
        }
        for (idx, &position) in positions.iter().enumerate() {
            if !position.is_finite() {
                return Err(CutError::invalid_input(format!(
                    "window positions must be finite; got {position} at index {idx}"
                )));
            }
        }
        if let Some(idx) = positions.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(CutError::invalid_input(format!(
                "window positions must be strictly increasing; got {} then {} at index {idx}",
                positions[idx],
                positions[idx + 1]
            )));
        }

        Ok(Self::from_validated_positions(positions.to_vec(), width))
    }

    /// Derives `n_steps` evenly spaced windows spanning the observable data,
    /// keeping every window's edges within `[min(o), max(o)]`.
    pub fn spanning(observable: &[f64], n_steps: usize, width: f64) -> Result<Self, CutError> {
        validate_width(width)?;
        if n_steps == 0 {
            return Err(CutError::invalid_input("n_steps must be >= 1; got 0"));
        }
        if observable.is_empty() {
            return Err(CutError::invalid_input(
                "observable data is required to derive window positions",
            ));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &value in observable {
            min = min.min(value);
            max = max.max(value);
        }
        let half_width = width / 2.0;
        let first = min + half_width;
        let last = max - half_width;
        if first > last {
            return Err(CutError::invalid_input(format!(
                "window width {width} exceeds the observable range [{min}, {max}]"
            )));
        }
        if n_steps > 1 && first == last {
            return Err(CutError::invalid_input(format!(
                "window width {width} equals the observable range [{min}, {max}]; \
                 only one window fits"
            )));
        }

        let mut positions = Vec::with_capacity(n_steps);
        if n_steps == 1 {
            positions.push(first);
        } else {
            let step = (last - first) / (n_steps - 1) as f64;
            for idx in 0..n_steps {
                positions.push(first + idx as f64 * step);
            }
            positions[n_steps - 1] = last;
        }

        Ok(Self::from_validated_positions(positions, width))
    }

    fn from_validated_positions(positions: Vec<f64>, width: f64) -> Self {
        let half_width = width / 2.0;
        let edges = positions
            .iter()
            .map(|&position| [position - half_width, position + half_width])
            .collect();
        Self { positions, edges }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn edges(&self) -> &[[f64; 2]] {
        &self.edges
    }

    /// Iterates `(edges, position)` pairs in window order.
    pub fn iter(&self) -> impl Iterator<Item = ([f64; 2], f64)> + '_ {
        self.edges.iter().copied().zip(self.positions.iter().copied())
    }
}

fn validate_width(width: f64) -> Result<(), CutError> {
    if !width.is_finite() || width <= 0.0 {
        return Err(CutError::invalid_input(format!(
            "window width must be finite and > 0; got {width}"
        )));
    }
    Ok(())
}
