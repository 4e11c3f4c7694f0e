// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::borrow::Cow;

/// Diagnostics schema version for fit run metadata.
pub const DIAGNOSTICS_SCHEMA_VERSION: u32 = 1;

/// Structured diagnostics captured from one curve fit.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct FitDiagnostics {
    pub n: usize,
    pub n_windows: usize,
    pub n_bootstraps: usize,
    pub schema_version: u32,
    pub engine_version: Option<String>,
    pub runtime_ms: Option<u64>,
    pub seed: Option<u64>,
    pub criterion: Cow<'static, str>,
    /// Largest per-resample count of windows that produced no threshold and
    /// were filled by interpolation.
    pub undefined_windows: usize,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for FitDiagnostics {
    fn default() -> Self {
        Self {
            n: 0,
            n_windows: 0,
            n_bootstraps: 0,
            schema_version: DIAGNOSTICS_SCHEMA_VERSION,
            engine_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            runtime_ms: None,
            seed: None,
            criterion: Cow::Borrowed(""),
            undefined_windows: 0,
            notes: vec![],
            warnings: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DIAGNOSTICS_SCHEMA_VERSION, FitDiagnostics};
    use std::borrow::Cow;

    #[test]
    fn default_sets_schema_and_engine_version() {
        let diagnostics = FitDiagnostics::default();
        assert_eq!(diagnostics.schema_version, DIAGNOSTICS_SCHEMA_VERSION);
        assert_eq!(
            diagnostics.engine_version,
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn default_leaves_counters_empty() {
        let diagnostics = FitDiagnostics::default();
        assert_eq!(diagnostics.n, 0);
        assert_eq!(diagnostics.n_windows, 0);
        assert_eq!(diagnostics.n_bootstraps, 0);
        assert_eq!(diagnostics.undefined_windows, 0);
        assert_eq!(diagnostics.criterion, Cow::Borrowed(""));
        assert!(diagnostics.runtime_ms.is_none());
        assert!(diagnostics.seed.is_none());
        assert!(diagnostics.notes.is_empty());
        assert!(diagnostics.warnings.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip_preserves_all_fields() {
        let diagnostics = FitDiagnostics {
            n: 2_048,
            n_windows: 100,
            n_bootstraps: 3,
            schema_version: DIAGNOSTICS_SCHEMA_VERSION,
            engine_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            runtime_ms: Some(41),
            seed: Some(7),
            criterion: Cow::Owned("purity".to_string()),
            undefined_windows: 4,
            notes: vec!["windows=100, width=0.1".to_string()],
            warnings: vec!["4 windows interpolated".to_string()],
        };

        let encoded = serde_json::to_string(&diagnostics).expect("diagnostics should serialize");
        let decoded: FitDiagnostics =
            serde_json::from_str(&encoded).expect("diagnostics should deserialize");
        assert_eq!(decoded, diagnostics);
    }
}
