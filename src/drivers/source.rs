use std::collections::VecDeque;
use std::f64::consts::PI;
use std::io::{Read, Write};
use std::time::Duration;
use rand::{rngs::StdRng, Rng, SeedableRng};
use crate::drivers::calibration::{calibrate, CalibrationProfile, ADC_MAX_CODE};
use crate::drivers::ScopeError;
/// One acquisition: the raw ADC codes and their calibrated voltages.
#[derive(Clone, Debug)]
pub struct Capture {
    pub sample_rate_hz: f64,
    pub raw: Vec<u16>,
    pub volts: Vec<f64>,
}
impl Capture {
    pub fn new(raw: Vec<u16>, sample_rate_hz: f64, profile: CalibrationProfile) -> Self {
        let volts = calibrate(&raw, profile);
        Self {
            sample_rate_hz,
            raw,
            volts,
        }
    }
    pub fn validate(&self) -> Result<(), ScopeError> {
        if self.sample_rate_hz <= 0.0 {
            return Err(ScopeError::InvalidSampleRate);
        }
        if self.volts.is_empty() {
            return Err(ScopeError::EmptySeries);
        }
        Ok(())
    }
    pub fn len(&self) -> usize {
        self.volts.len()
    }
    pub fn sample_period_secs(&self) -> f64 {
        1.0 / self.sample_rate_hz
    }
}
/// Anything that can fill a sample buffer with ADC codes on request.
pub trait SampleSource {
    /// Take `count` samples spread evenly over `duration_ms`.
    fn capture_samples(&mut self, count: usize, duration_ms: u32) -> Result<Vec<u16>, ScopeError>;
}
impl<T: SampleSource + ?Sized> SampleSource for Box<T> {
    fn capture_samples(&mut self, count: usize, duration_ms: u32) -> Result<Vec<u16>, ScopeError> {
        (**self).capture_samples(count, duration_ms)
    }
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<Vec<u16>>,
}
impl ManualSource {
    pub fn new(captures: impl IntoIterator<Item = Vec<u16>>) -> Self {
        Self {
            queue: captures.into_iter().collect(),
        }
    }
}
impl SampleSource for ManualSource {
    fn capture_samples(&mut self, _count: usize, _duration_ms: u32) -> Result<Vec<u16>, ScopeError> {
        self.queue
            .pop_front()
            .ok_or_else(|| ScopeError::Capture("manual source exhausted".into()))
    }
}
/// Generates a noisy sine as seen through the given front-end calibration.
pub struct SimulatedSource {
    frequency_hz: f64,
    amplitude_v: f64,
    offset_v: f64,
    noise_v: f64,
    profile: CalibrationProfile,
    rng: StdRng,
}
impl SimulatedSource {
    pub fn new(
        frequency_hz: f64,
        amplitude_v: f64,
        offset_v: f64,
        noise_v: f64,
        profile: CalibrationProfile,
    ) -> Self {
        Self {
            frequency_hz,
            amplitude_v,
            offset_v,
            noise_v,
            profile,
            rng: StdRng::from_entropy(),
        }
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}
impl SampleSource for SimulatedSource {
    fn capture_samples(&mut self, count: usize, duration_ms: u32) -> Result<Vec<u16>, ScopeError> {
        if duration_ms == 0 {
            return Err(ScopeError::InvalidSampleRate);
        }
        let dt = f64::from(duration_ms) / 1000.0 / count.max(1) as f64;
        let phase = self.rng.gen_range(0.0..2.0 * PI);
        let codes = (0..count)
            .map(|n| {
                let noise = if self.noise_v > 0.0 {
                    self.rng.gen_range(-self.noise_v..self.noise_v)
                } else {
                    0.0
                };
                let t = n as f64 * dt;
                let volts = self.offset_v
                    + self.amplitude_v * (2.0 * PI * self.frequency_hz * t + phase).sin()
                    + noise;
                self.profile.to_code(volts)
            })
            .collect();
        Ok(codes)
    }
}
/// ADC front-end streaming little-endian 16-bit codes over a serial link.
///
/// A capture is requested with an ASCII line `CAPTURE <count> <duration_ms>`
/// and answered with exactly `count` codes.
pub struct SerialSource {
    port: Box<dyn serialport::SerialPort>,
}
impl SerialSource {
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, ScopeError> {
        let port = serialport::new(path, baud_rate)
            .timeout(Duration::from_secs(2))
            .open()?;
        log::info!("opened ADC front-end on {path} at {baud_rate} baud");
        Ok(Self { port })
    }
}
impl SampleSource for SerialSource {
    fn capture_samples(&mut self, count: usize, duration_ms: u32) -> Result<Vec<u16>, ScopeError> {
        writeln!(self.port, "CAPTURE {count} {duration_ms}")?;
        self.port.flush()?;
        let mut bytes = vec![0u8; count * 2];
        self.port.read_exact(&mut bytes)?;
        Ok(bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]).min(ADC_MAX_CODE))
            .collect())
    }
}
