// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::gaps::fill_gaps;
use crate::search::{SEARCH_POINTS, find_best_cut};
use crate::windows::WindowPartition;
use confcut_core::{CutError, SampleView};
use confcut_criteria::Criterion;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[derive(Clone, Copy, Debug)]
struct StableRng {
    state: u64,
}

impl StableRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9e3779b97f4a7c15),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    fn gen_range(&mut self, upper_exclusive: usize) -> Result<usize, CutError> {
        if upper_exclusive == 0 {
            return Err(CutError::invalid_input(
                "StableRng.gen_range requires upper_exclusive >= 1; got 0",
            ));
        }

        let value = self.next_u64();
        let modulus = u64::try_from(upper_exclusive)
            .map_err(|_| CutError::invalid_input("rng upper_exclusive conversion overflow"))?;
        let sampled = value % modulus;
        usize::try_from(sampled)
            .map_err(|_| CutError::invalid_input("rng sampled index conversion overflow"))
    }
}

/// Draws `n_bootstraps` resample-with-replacement index sets of size `n`,
/// each sorted ascending for reproducible downstream ordering.
pub fn draw_bootstrap_indices(
    seed: u64,
    n: usize,
    n_bootstraps: usize,
) -> Result<Vec<Vec<usize>>, CutError> {
    let mut rng = StableRng::new(seed);
    let mut sets = Vec::with_capacity(n_bootstraps);
    for _ in 0..n_bootstraps {
        let mut indices = Vec::with_capacity(n);
        for _ in 0..n {
            indices.push(rng.gen_range(n)?);
        }
        indices.sort_unstable();
        sets.push(indices);
    }
    Ok(sets)
}

/// One threshold per window for `sample`, with undefined windows already
/// interpolated. Also reports how many windows came back undefined.
pub(crate) fn resolved_cut_values(
    sample: &SampleView<'_>,
    partition: &WindowPartition,
    criterion: &dyn Criterion,
    min_examples: usize,
) -> Result<(Vec<f64>, usize), CutError> {
    let mut raw = Vec::with_capacity(partition.len());
    for ([lower, upper], position) in partition.iter() {
        raw.push(find_best_cut(
            sample,
            lower,
            upper,
            position,
            criterion,
            min_examples,
            SEARCH_POINTS,
        )?);
    }
    let undefined = raw.iter().filter(|value| !value.is_finite()).count();
    let filled = fill_gaps(raw)?;
    Ok((filled, undefined))
}

/// Outcome of the bootstrap loop.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AggregateOutcome {
    pub values: Vec<f64>,
    /// Largest per-resample count of undefined windows.
    pub undefined_windows: usize,
    pub used_parallel: bool,
}

/// Runs the per-window search once per bootstrap resample (or once on the
/// full sample when `n_bootstraps` is zero) and column-averages the
/// per-resample threshold vectors.
///
/// Resample index sets are drawn from the seed before any task runs; results
/// are assembled by resample index, so worker scheduling never affects the
/// outcome. Any failing task aborts the whole aggregation.
pub(crate) fn aggregate_cut_values(
    sample: &SampleView<'_>,
    partition: &WindowPartition,
    criterion: &dyn Criterion,
    min_examples: usize,
    n_bootstraps: usize,
    n_workers: usize,
    seed: u64,
) -> Result<AggregateOutcome, CutError> {
    if n_bootstraps == 0 {
        let (values, undefined_windows) =
            resolved_cut_values(sample, partition, criterion, min_examples)?;
        return Ok(AggregateOutcome {
            values,
            undefined_windows,
            used_parallel: false,
        });
    }

    let index_sets = draw_bootstrap_indices(seed, sample.len(), n_bootstraps)?;

    let run_resample = |indices: &Vec<usize>| -> Result<(Vec<f64>, usize), CutError> {
        let resample = sample.gather(indices)?;
        resolved_cut_values(&resample.view(), partition, criterion, min_examples)
    };

    #[cfg(feature = "rayon")]
    if n_workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_workers.min(n_bootstraps))
            .build()
            .map_err(|err| {
                CutError::worker_failure(format!("failed to build bootstrap worker pool: {err}"))
            })?;
        let rows: Vec<(Vec<f64>, usize)> = pool.install(|| {
            index_sets
                .par_iter()
                .map(run_resample)
                .collect::<Result<Vec<_>, CutError>>()
        })?;
        return Ok(assemble(rows, partition.len(), true));
    }

    #[cfg(not(feature = "rayon"))]
    let _ = n_workers;

    let mut rows = Vec::with_capacity(n_bootstraps);
    for indices in &index_sets {
        rows.push(run_resample(indices)?);
    }
    Ok(assemble(rows, partition.len(), false))
}

fn assemble(rows: Vec<(Vec<f64>, usize)>, n_windows: usize, used_parallel: bool) -> AggregateOutcome {
    let n_rows = rows.len();
    let mut values = vec![0.0; n_windows];
    let mut undefined_windows = 0;
    for (row, undefined) in &rows {
        for (slot, value) in values.iter_mut().zip(row) {
            *slot += value;
        }
        undefined_windows = undefined_windows.max(*undefined);
    }
    for slot in &mut values {
        *slot /= n_rows as f64;
    }
    AggregateOutcome {
        values,
        undefined_windows,
        used_parallel,
    }
}
