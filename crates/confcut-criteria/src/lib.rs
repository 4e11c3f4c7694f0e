// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod confusion;
pub mod model;
pub mod purity;
pub mod target;

pub use confusion::{ConfusionRatioCriterion, ConfusionTerm};
pub use model::{ConfusionCounts, Criterion};
pub use purity::PurityCriterion;
pub use target::TargetSpec;
