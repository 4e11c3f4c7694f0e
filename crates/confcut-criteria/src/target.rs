// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use confcut_core::CutError;
use std::fmt;
use std::sync::Arc;

/// Target quality level for a criterion, either constant across the
/// observable axis or resolved per window position.
///
/// Targets must resolve to a finite value `<= 1`; anything else is a
/// configuration error.
#[derive(Clone)]
pub enum TargetSpec {
    Constant(f64),
    ByPosition(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl fmt::Debug for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::ByPosition(_) => f.write_str("ByPosition(..)"),
        }
    }
}

impl TargetSpec {
    /// Constant target, validated at construction.
    pub fn constant(value: f64) -> Result<Self, CutError> {
        if !value.is_finite() || value > 1.0 {
            return Err(CutError::invalid_input(format!(
                "constant target must be finite and <= 1; got {value}"
            )));
        }
        Ok(Self::Constant(value))
    }

    /// Position-dependent target; its returned values are validated at each
    /// resolution.
    pub fn by_position(target: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::ByPosition(Arc::new(target))
    }

    /// Target value at `position`.
    pub fn resolve(&self, position: f64) -> Result<f64, CutError> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::ByPosition(target) => {
                let value = target(position);
                if !value.is_finite() || value > 1.0 {
                    return Err(CutError::invalid_input(format!(
                        "position-dependent target must return a finite value <= 1; \
                         got {value} at position {position}"
                    )));
                }
                Ok(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TargetSpec;

    #[test]
    fn constant_target_validates_at_construction() {
        let target = TargetSpec::constant(0.99).expect("0.99 is a valid target");
        assert_eq!(target.resolve(-3.0).expect("resolve succeeds"), 0.99);
        assert_eq!(target.resolve(3.0).expect("resolve succeeds"), 0.99);

        let err = TargetSpec::constant(1.5).expect_err("targets above 1 must fail");
        assert!(err.to_string().contains("must be finite and <= 1"));

        let err = TargetSpec::constant(f64::NAN).expect_err("NaN target must fail");
        assert!(err.to_string().contains("must be finite and <= 1"));
    }

    #[test]
    fn position_dependent_target_resolves_per_window() {
        let target = TargetSpec::by_position(|position: f64| 0.9 - 0.1 * position.abs());
        assert_eq!(target.resolve(0.0).expect("resolve succeeds"), 0.9);
        assert!((target.resolve(1.0).expect("resolve succeeds") - 0.8).abs() < 1e-12);
    }

    #[test]
    fn position_dependent_target_rejects_bad_values_at_resolution() {
        let above_one = TargetSpec::by_position(|_| 1.2);
        let err = above_one
            .resolve(0.0)
            .expect_err("target above 1 must fail at resolution");
        assert!(err.to_string().contains("finite value <= 1"));

        let non_finite = TargetSpec::by_position(|_| f64::NAN);
        let err = non_finite
            .resolve(0.0)
            .expect_err("NaN target must fail at resolution");
        assert!(err.to_string().contains("finite value <= 1"));
    }

    #[test]
    fn debug_formatting_is_stable() {
        let constant = TargetSpec::constant(0.5).expect("valid target");
        assert_eq!(format!("{constant:?}"), "Constant(0.5)");
        let by_position = TargetSpec::by_position(|p| p);
        assert_eq!(format!("{by_position:?}"), "ByPosition(..)");
    }
}
