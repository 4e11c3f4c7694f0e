// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod bootstrap;
pub mod cutter;
pub mod gaps;
pub mod persist;
pub mod search;
pub mod windows;

pub use bootstrap::draw_bootstrap_indices;
pub use cutter::{ConfidenceColumn, ConfidenceCutter, CutterConfig, CutterOperand};
pub use gaps::fill_gaps;
pub use persist::{CURVE_FILE_SUFFIX, CURVE_SCHEMA_VERSION, CurveWire, load_curve, save_curve};
pub use search::{SEARCH_POINTS, find_best_cut};
pub use windows::WindowPartition;
