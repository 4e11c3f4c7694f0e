// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Receives coarse progress updates in `[0, 1]` during a fit.
pub trait ProgressSink: Sync {
    fn on_progress(&self, fraction: f32);
}

/// Receives scalar telemetry values keyed by a static name.
pub trait TelemetrySink: Sync {
    fn record_scalar(&self, key: &'static str, value: f64);
}

/// Optional observability hooks threaded through a fit call.
#[derive(Clone, Copy, Default)]
pub struct FitContext<'a> {
    pub progress: Option<&'a dyn ProgressSink>,
    pub telemetry: Option<&'a dyn TelemetrySink>,
}

impl<'a> FitContext<'a> {
    /// Creates a context with no hooks attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an optional progress sink.
    pub fn with_progress_sink(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Sets an optional telemetry sink.
    pub fn with_telemetry_sink(mut self, telemetry: &'a dyn TelemetrySink) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Emits clamped progress to the sink, if configured.
    pub fn report_progress(&self, fraction: f32) {
        if !fraction.is_finite() {
            return;
        }
        if let Some(sink) = self.progress {
            sink.on_progress(fraction.clamp(0.0, 1.0));
        }
    }

    /// Emits a scalar telemetry value to the sink, if configured.
    pub fn record_scalar(&self, key: &'static str, value: f64) {
        if let Some(sink) = self.telemetry {
            sink.record_scalar(key, value);
        }
    }
}
