// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use confcut_core::CutError;

/// Resolves undefined (NaN) per-window thresholds into a complete vector.
///
/// Boundary runs are extended flatly from the nearest defined value before
/// interior runs are detected; each interior run of length L between defined
/// values `before` and `after` is filled with equally spaced steps
/// `before + (k + 1) * (after - before) / (L + 1)`. A vector with no defined
/// entry at all is a fatal mismatch between the windows and the data.
pub fn fill_gaps(mut values: Vec<f64>) -> Result<Vec<f64>, CutError> {
    let Some(first) = values.iter().position(|value| value.is_finite()) else {
        return Err(CutError::insufficient_data(
            "no window produced a defined threshold; \
             window positions do not overlap the data's observable support",
        ));
    };
    let last = values
        .iter()
        .rposition(|value| value.is_finite())
        .unwrap_or(first);

    let first_value = values[first];
    for slot in &mut values[..first] {
        *slot = first_value;
    }
    let last_value = values[last];
    for slot in &mut values[last + 1..] {
        *slot = last_value;
    }

    let mut idx = first;
    while idx <= last {
        if values[idx].is_finite() {
            idx += 1;
            continue;
        }
        let run_start = idx;
        let mut run_end = idx;
        while !values[run_end].is_finite() {
            run_end += 1;
        }
        let before = values[run_start - 1];
        let after = values[run_end];
        let run_len = run_end - run_start;
        let step = (after - before) / (run_len + 1) as f64;
        for (offset, slot) in values[run_start..run_end].iter_mut().enumerate() {
            *slot = before + (offset + 1) as f64 * step;
        }
        idx = run_end + 1;
    }

    Ok(values)
}
