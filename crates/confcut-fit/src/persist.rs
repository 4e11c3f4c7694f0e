// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::cutter::ConfidenceColumn;
use confcut_core::{Curve, CutError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Wire schema version for persisted curves.
pub const CURVE_SCHEMA_VERSION: u32 = 1;

/// Canonical suffix for persisted curve files; appended when missing.
pub const CURVE_FILE_SUFFIX: &str = ".curve.zst";

/// Wire format for a persisted curve: only the knots and the confidence
/// column index survive a save/load round trip, nothing else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveWire {
    pub schema_version: u32,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub conf_index: u8,
}

impl CurveWire {
    pub fn from_runtime(curve: &Curve, confidence_column: ConfidenceColumn) -> Self {
        Self {
            schema_version: CURVE_SCHEMA_VERSION,
            x: curve.x().to_vec(),
            y: curve.y().to_vec(),
            conf_index: confidence_column.index() as u8,
        }
    }

    pub fn into_runtime(self) -> Result<(Curve, ConfidenceColumn), CutError> {
        if self.schema_version != CURVE_SCHEMA_VERSION {
            return Err(CutError::persistence(format!(
                "unsupported curve schema version {}; current is {CURVE_SCHEMA_VERSION}",
                self.schema_version
            )));
        }
        let confidence_column = ConfidenceColumn::from_index(usize::from(self.conf_index))?;
        let curve = Curve::new(self.x, self.y)?;
        Ok((curve, confidence_column))
    }
}

/// Appends the canonical suffix unless the path already carries it.
pub(crate) fn resolve_curve_path(path: &Path) -> PathBuf {
    if path
        .to_str()
        .is_some_and(|raw| raw.ends_with(CURVE_FILE_SUFFIX))
    {
        return path.to_path_buf();
    }
    let mut raw = path.as_os_str().to_os_string();
    raw.push(CURVE_FILE_SUFFIX);
    PathBuf::from(raw)
}

/// Writes the curve as a zstd-compressed JSON document; returns the path
/// actually written.
pub fn save_curve(
    curve: &Curve,
    confidence_column: ConfidenceColumn,
    path: &Path,
) -> Result<PathBuf, CutError> {
    let resolved = resolve_curve_path(path);
    let wire = CurveWire::from_runtime(curve, confidence_column);
    let encoded = serde_json::to_vec(&wire)
        .map_err(|err| CutError::persistence(format!("failed to encode curve: {err}")))?;
    let compressed = zstd::stream::encode_all(encoded.as_slice(), 0)
        .map_err(|err| CutError::persistence(format!("failed to compress curve: {err}")))?;
    std::fs::write(&resolved, compressed).map_err(|err| {
        CutError::persistence(format!("failed to write {}: {err}", resolved.display()))
    })?;
    Ok(resolved)
}

/// Reads a curve written by [`save_curve`]; the suffix may be omitted.
pub fn load_curve(path: &Path) -> Result<(Curve, ConfidenceColumn), CutError> {
    let resolved = resolve_curve_path(path);
    let compressed = std::fs::read(&resolved).map_err(|err| {
        CutError::persistence(format!("failed to read {}: {err}", resolved.display()))
    })?;
    let encoded = zstd::stream::decode_all(compressed.as_slice()).map_err(|err| {
        CutError::persistence(format!("failed to decompress {}: {err}", resolved.display()))
    })?;
    let wire: CurveWire = serde_json::from_slice(&encoded).map_err(|err| {
        CutError::persistence(format!("failed to decode {}: {err}", resolved.display()))
    })?;
    wire.into_runtime()
}

#[cfg(test)]
mod tests {
    use super::{CURVE_FILE_SUFFIX, CURVE_SCHEMA_VERSION, CurveWire, resolve_curve_path};
    use crate::cutter::ConfidenceColumn;
    use confcut_core::Curve;
    use std::path::Path;

    #[test]
    fn wire_roundtrip_preserves_knots_and_column() {
        let curve = Curve::new(vec![-1.0, 0.0, 1.0], vec![0.3, 0.5, 0.7]).expect("valid curve");
        let wire = CurveWire::from_runtime(&curve, ConfidenceColumn::Second);
        assert_eq!(wire.schema_version, CURVE_SCHEMA_VERSION);
        assert_eq!(wire.conf_index, 1);

        let (restored, column) = wire.into_runtime().expect("wire should restore");
        assert_eq!(restored, curve);
        assert_eq!(column, ConfidenceColumn::Second);
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let wire = CurveWire {
            schema_version: CURVE_SCHEMA_VERSION + 1,
            x: vec![0.0],
            y: vec![0.5],
            conf_index: 0,
        };
        let err = wire.into_runtime().expect_err("future schema must fail");
        assert!(err.to_string().contains("unsupported curve schema version"));
    }

    #[test]
    fn malformed_wire_payloads_are_rejected() {
        let wire = CurveWire {
            schema_version: CURVE_SCHEMA_VERSION,
            x: vec![0.0, 1.0],
            y: vec![0.5],
            conf_index: 0,
        };
        let err = wire.into_runtime().expect_err("length mismatch must fail");
        assert!(err.to_string().contains("knot length mismatch"));

        let wire = CurveWire {
            schema_version: CURVE_SCHEMA_VERSION,
            x: vec![0.0],
            y: vec![0.5],
            conf_index: 2,
        };
        let err = wire.into_runtime().expect_err("bad column index must fail");
        assert!(err.to_string().contains("must be 0 or 1"));
    }

    #[test]
    fn suffix_is_appended_only_when_missing() {
        let bare = resolve_curve_path(Path::new("/tmp/example"));
        assert_eq!(bare, Path::new("/tmp/example.curve.zst"));

        let already = format!("/tmp/example{CURVE_FILE_SUFFIX}");
        let resolved = resolve_curve_path(Path::new(&already));
        assert_eq!(resolved, Path::new(&already));
    }
}
