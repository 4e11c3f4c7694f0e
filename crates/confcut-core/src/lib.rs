// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod curve;
pub mod diagnostics;
pub mod error;
pub mod observability;
pub mod sample;

pub use curve::{CombinationMode, Curve, CurveOperand};
pub use diagnostics::{DIAGNOSTICS_SCHEMA_VERSION, FitDiagnostics};
pub use error::CutError;
pub use observability::{FitContext, ProgressSink, TelemetrySink};
pub use sample::{Sample, SampleView};
