use crate::drivers::calibration::CalibrationProfile;
use crate::drivers::error::ScopeError;
use crate::drivers::fft::{SpectrumBuilder, SpectrumMethod};
use crate::drivers::frequency::estimate_frequency;
use crate::drivers::metrics::SignalStatistics;
use crate::drivers::scale::AxisScaleState;
use crate::drivers::source::{Capture, SampleSource};
/// Acquisition front half of the scope: capture, calibrate, analyse.
pub struct SignalPipeline<S: SampleSource> {
    source: S,
    profile: CalibrationProfile,
    sample_count: usize,
    spectrum: SpectrumBuilder,
}
impl<S: SampleSource> SignalPipeline<S> {
    pub fn new(
        source: S,
        profile: CalibrationProfile,
        sample_count: usize,
        method: SpectrumMethod,
    ) -> Self {
        Self {
            source,
            profile,
            sample_count,
            spectrum: SpectrumBuilder::with_method(method),
        }
    }
    /// Take a fresh capture covering the full screen at the current time base.
    pub fn acquire(&mut self, scale: AxisScaleState) -> Result<Capture, ScopeError> {
        let raw = self
            .source
            .capture_samples(self.sample_count, scale.capture_window_ms())?;
        if raw.len() != self.sample_count {
            return Err(ScopeError::SampleCountMismatch {
                expected: self.sample_count,
                actual: raw.len(),
            });
        }
        let capture = Capture::new(raw, scale.sample_rate_hz(self.sample_count), self.profile);
        capture.validate()?;
        log::debug!(
            "captured {} samples at {:.1} Hz",
            capture.len(),
            capture.sample_rate_hz
        );
        Ok(capture)
    }
    pub fn statistics(&self, capture: &Capture) -> Result<SignalStatistics, ScopeError> {
        SignalStatistics::compute(&capture.volts)
    }
    pub fn frequency(&self, capture: &Capture) -> Result<f64, ScopeError> {
        estimate_frequency(&capture.volts, capture.sample_rate_hz)
    }
    pub fn spectrum(&self, capture: &Capture) -> Result<Vec<f64>, ScopeError> {
        self.spectrum.compute(&capture.volts)
    }
}
