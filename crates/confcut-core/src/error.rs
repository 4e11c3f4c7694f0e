// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use thiserror::Error;

/// Error taxonomy shared across the confcut workspace.
#[derive(Debug, Error)]
pub enum CutError {
    /// Malformed configuration or input shape, caught before any work starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The data cannot support the requested fit (e.g. every window undefined).
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    /// A computation produced a non-finite or otherwise unusable value.
    #[error("numerical issue: {0}")]
    NumericalIssue(String),
    /// Recognized but unsupported behavior was requested.
    #[error("not supported: {0}")]
    NotSupported(String),
    /// Saving or loading a curve failed.
    #[error("persistence failure: {0}")]
    Persistence(String),
    /// A bootstrap worker failed; the whole fit is aborted.
    #[error("worker failure: {0}")]
    WorkerFailure(String),
}

impl CutError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }

    pub fn numerical_issue(message: impl Into<String>) -> Self {
        Self::NumericalIssue(message.into())
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported(message.into())
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    pub fn worker_failure(message: impl Into<String>) -> Self {
        Self::WorkerFailure(message.into())
    }
}
