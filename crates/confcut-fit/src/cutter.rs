// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::bootstrap::aggregate_cut_values;
use crate::persist;
use crate::windows::WindowPartition;
use confcut_core::{
    CombinationMode, Curve, CurveOperand, CutError, FitContext, FitDiagnostics, SampleView,
};
use confcut_criteria::{Criterion, PurityCriterion};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Curve fitting is meaningless on a near-constant score.
const MIN_DISTINCT_CONFIDENCE: usize = 5;

const DEFAULT_N_STEPS: usize = 1000;
const DEFAULT_WINDOW_WIDTH: f64 = 0.1;
const DEFAULT_N_BOOTSTRAPS: usize = 3;
const DEFAULT_MIN_EXAMPLES: usize = 10;

/// Which of the two input columns holds the classifier confidence; the other
/// column is the conditioning observable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfidenceColumn {
    #[default]
    First,
    Second,
}

impl ConfidenceColumn {
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }

    pub fn observable_index(self) -> usize {
        1 - self.index()
    }

    pub fn from_index(index: usize) -> Result<Self, CutError> {
        match index {
            0 => Ok(Self::First),
            1 => Ok(Self::Second),
            other => Err(CutError::invalid_input(format!(
                "confidence column index must be 0 or 1; got {other}"
            ))),
        }
    }
}

/// Configuration for [`ConfidenceCutter`].
#[derive(Clone, Debug, PartialEq)]
pub struct CutterConfig {
    /// Number of sliding windows when no explicit positions are supplied.
    pub n_steps: usize,
    /// Width of each window on the observable axis.
    pub window_width: f64,
    /// Bootstrap resamples to average over; zero fits the full sample once.
    pub n_bootstraps: usize,
    /// Explicit window positions; overrides `n_steps` when present.
    pub positions: Option<Vec<f64>>,
    pub confidence_column: ConfidenceColumn,
    /// Worker bound for the bootstrap loop; values <= 1 run sequentially.
    pub n_workers: usize,
    pub combination_mode: CombinationMode,
    /// Minimum distinct confidence values a window needs to be searched.
    pub min_examples: usize,
    /// Seed for the bootstrap resampling generator.
    pub seed: u64,
}

impl Default for CutterConfig {
    fn default() -> Self {
        Self {
            n_steps: DEFAULT_N_STEPS,
            window_width: DEFAULT_WINDOW_WIDTH,
            n_bootstraps: DEFAULT_N_BOOTSTRAPS,
            positions: None,
            confidence_column: ConfidenceColumn::First,
            n_workers: 0,
            combination_mode: CombinationMode::Overlapping,
            min_examples: DEFAULT_MIN_EXAMPLES,
            seed: 0,
        }
    }
}

impl CutterConfig {
    fn validate(&self) -> Result<(), CutError> {
        if !self.window_width.is_finite() || self.window_width <= 0.0 {
            return Err(CutError::invalid_input(format!(
                "CutterConfig.window_width must be finite and > 0; got {}",
                self.window_width
            )));
        }
        if self.positions.is_none() && self.n_steps == 0 {
            return Err(CutError::invalid_input(
                "CutterConfig.n_steps must be >= 1 when no positions are supplied; got 0",
            ));
        }
        if self.min_examples == 0 {
            return Err(CutError::invalid_input(
                "CutterConfig.min_examples must be >= 1; got 0",
            ));
        }
        Ok(())
    }
}

/// Right-hand side of a cutter combination.
#[derive(Clone, Copy, Debug)]
pub enum CutterOperand<'a> {
    Cutter(&'a ConfidenceCutter),
    Curve(&'a Curve),
    Scalar(f64),
}

const ACCEPTED_OPERANDS: &str = "accepted operands are a fitted cutter, a curve, or a finite scalar";

/// Fits and applies an observable-dependent confidence cut curve.
///
/// `fit` slides overlapping windows over the observable axis, searches each
/// window for the threshold closest to the target criterion, averages over
/// bootstrap resamples, interpolates undefined windows, and stores the
/// resulting curve. `predict` classifies by `confidence >= curve(observable)`.
#[derive(Clone)]
pub struct ConfidenceCutter {
    config: CutterConfig,
    criterion: Arc<dyn Criterion>,
    curve: Option<Curve>,
}

impl std::fmt::Debug for ConfidenceCutter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfidenceCutter")
            .field("config", &self.config)
            .field("criterion", &self.criterion.name())
            .field("curve", &self.curve)
            .finish()
    }
}

impl ConfidenceCutter {
    pub fn new(config: CutterConfig, criterion: Arc<dyn Criterion>) -> Result<Self, CutError> {
        config.validate()?;
        Ok(Self {
            config,
            criterion,
            curve: None,
        })
    }

    /// Cutter with the default purity criterion.
    pub fn with_default_criterion(config: CutterConfig) -> Result<Self, CutError> {
        Self::new(config, Arc::new(PurityCriterion::default()))
    }

    pub fn config(&self) -> &CutterConfig {
        &self.config
    }

    pub fn criterion(&self) -> &dyn Criterion {
        self.criterion.as_ref()
    }

    pub fn curve(&self) -> Option<&Curve> {
        self.curve.as_ref()
    }

    /// Fits the cut curve with default (no-op) observability hooks.
    pub fn fit(
        &mut self,
        x: &[[f64; 2]],
        labels: &[u8],
        weights: Option<&[f64]>,
    ) -> Result<FitDiagnostics, CutError> {
        self.fit_with(x, labels, weights, &FitContext::new())
    }

    /// Fits the cut curve, replacing any previously stored curve.
    pub fn fit_with(
        &mut self,
        x: &[[f64; 2]],
        labels: &[u8],
        weights: Option<&[f64]>,
        ctx: &FitContext<'_>,
    ) -> Result<FitDiagnostics, CutError> {
        self.config.validate()?;
        let started_at = Instant::now();

        let (confidence, observable) = split_columns(x, self.config.confidence_column);
        let sample = SampleView::new(&confidence, &observable, labels, weights)?;

        let distinct = sample.distinct_confidence_count();
        if distinct < MIN_DISTINCT_CONFIDENCE {
            return Err(CutError::invalid_input(format!(
                "at least {MIN_DISTINCT_CONFIDENCE} distinct confidence values are required; \
                 got {distinct}"
            )));
        }

        let partition = match &self.config.positions {
            Some(positions) => WindowPartition::from_positions(positions, self.config.window_width)?,
            None => WindowPartition::spanning(
                &observable,
                self.config.n_steps,
                self.config.window_width,
            )?,
        };

        let outcome = aggregate_cut_values(
            &sample,
            &partition,
            self.criterion.as_ref(),
            self.config.min_examples,
            self.config.n_bootstraps,
            self.config.n_workers,
            self.config.seed,
        )?;

        let curve = Curve::from_sliding_windows(
            partition.edges(),
            &outcome.values,
            self.config.combination_mode,
        )?;
        self.curve = Some(curve);

        let runtime_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        ctx.record_scalar("fit.windows", partition.len() as f64);
        ctx.record_scalar("fit.undefined_windows", outcome.undefined_windows as f64);
        ctx.record_scalar("fit.runtime_ms", runtime_ms as f64);
        ctx.report_progress(1.0);

        let mut notes = vec![
            format!(
                "windows={}, width={}",
                partition.len(),
                self.config.window_width
            ),
            format!(
                "bootstraps={}, workers={}, parallel={}",
                self.config.n_bootstraps, self.config.n_workers, outcome.used_parallel
            ),
        ];
        notes.push(format!("distinct_confidence_values={distinct}"));

        let mut warnings = vec![];
        if outcome.undefined_windows > 0 {
            warnings.push(format!(
                "{} of {} windows returned no threshold and were interpolated",
                outcome.undefined_windows,
                partition.len()
            ));
        }

        Ok(FitDiagnostics {
            n: sample.len(),
            n_windows: partition.len(),
            n_bootstraps: self.config.n_bootstraps,
            runtime_ms: Some(runtime_ms),
            seed: (self.config.n_bootstraps > 0).then_some(self.config.seed),
            criterion: Cow::Borrowed(self.criterion.name()),
            undefined_windows: outcome.undefined_windows,
            notes,
            warnings,
            ..FitDiagnostics::default()
        })
    }

    /// Binary prediction `confidence >= curve(observable)` per row.
    pub fn predict(&self, x: &[[f64; 2]]) -> Result<Vec<u8>, CutError> {
        let curve = self.require_curve("predict")?;
        let conf_idx = self.config.confidence_column.index();
        let obs_idx = self.config.confidence_column.observable_index();
        Ok(x.iter()
            .map(|row| u8::from(row[conf_idx] >= curve.evaluate(row[obs_idx])))
            .collect())
    }

    /// Confidence threshold the stored curve assigns to `observable`.
    pub fn decision_threshold(&self, observable: f64) -> Result<f64, CutError> {
        Ok(self.require_curve("decision_threshold")?.evaluate(observable))
    }

    /// Installs an explicit curve, bypassing `fit`.
    pub fn init_curve(
        &mut self,
        x: Vec<f64>,
        y: Vec<f64>,
        confidence_column: ConfidenceColumn,
    ) -> Result<(), CutError> {
        self.curve = Some(Curve::new(x, y)?);
        self.config.confidence_column = confidence_column;
        Ok(())
    }

    /// Persists the stored curve; returns the path actually written (the
    /// canonical extension is appended when missing).
    pub fn save_curve(&self, path: impl AsRef<Path>) -> Result<PathBuf, CutError> {
        let curve = self.require_curve("save_curve")?;
        persist::save_curve(curve, self.config.confidence_column, path.as_ref())
    }

    /// Restores a curve (and the confidence column it was fitted with) from
    /// disk, replacing any stored curve.
    pub fn load_curve(&mut self, path: impl AsRef<Path>) -> Result<(), CutError> {
        let (curve, confidence_column) = persist::load_curve(path.as_ref())?;
        self.curve = Some(curve);
        self.config.confidence_column = confidence_column;
        Ok(())
    }

    pub fn add(&self, operand: CutterOperand<'_>) -> Result<Self, CutError> {
        self.combined(operand, Curve::add)
    }

    pub fn subtract(&self, operand: CutterOperand<'_>) -> Result<Self, CutError> {
        self.combined(operand, Curve::subtract)
    }

    pub fn multiply(&self, operand: CutterOperand<'_>) -> Result<Self, CutError> {
        self.combined(operand, Curve::multiply)
    }

    pub fn divide(&self, operand: CutterOperand<'_>) -> Result<Self, CutError> {
        self.combined(operand, Curve::divide)
    }

    /// Combines the stored curve with the operand into a new cutter. A cutter
    /// without a curve adopts the operand's curve instead of combining
    /// numerically; a bare scalar cannot initialize a curve.
    fn combined<F>(&self, operand: CutterOperand<'_>, combine: F) -> Result<Self, CutError>
    where
        F: for<'c> Fn(&Curve, CurveOperand<'c>) -> Result<Curve, CutError>,
    {
        let mut out = self.clone();
        out.curve = match (&self.curve, operand) {
            (Some(mine), CutterOperand::Cutter(other)) => match &other.curve {
                Some(theirs) => Some(combine(mine, CurveOperand::Curve(theirs))?),
                None => {
                    return Err(CutError::invalid_input(format!(
                        "operand cutter has no curve; {ACCEPTED_OPERANDS}"
                    )));
                }
            },
            (Some(mine), CutterOperand::Curve(theirs)) => {
                Some(combine(mine, CurveOperand::Curve(theirs))?)
            }
            (Some(mine), CutterOperand::Scalar(value)) => {
                Some(combine(mine, CurveOperand::Scalar(value))?)
            }
            (None, CutterOperand::Cutter(other)) => other.curve.clone(),
            (None, CutterOperand::Curve(theirs)) => Some(theirs.clone()),
            (None, CutterOperand::Scalar(value)) => {
                return Err(CutError::invalid_input(format!(
                    "cannot combine an unfitted cutter with scalar {value}; {ACCEPTED_OPERANDS}"
                )));
            }
        };
        Ok(out)
    }

    fn require_curve(&self, operation: &str) -> Result<&Curve, CutError> {
        self.curve.as_ref().ok_or_else(|| {
            CutError::invalid_input(format!("{operation} requires a fitted or loaded curve"))
        })
    }
}

fn split_columns(x: &[[f64; 2]], confidence_column: ConfidenceColumn) -> (Vec<f64>, Vec<f64>) {
    let conf_idx = confidence_column.index();
    let obs_idx = confidence_column.observable_index();
    let confidence = x.iter().map(|row| row[conf_idx]).collect();
    let observable = x.iter().map(|row| row[obs_idx]).collect();
    (confidence, observable)
}
