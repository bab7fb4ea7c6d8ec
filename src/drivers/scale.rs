/// Horizontal grid divisions.
pub const X_DIVISIONS: u32 = 10;
/// Vertical grid divisions.
pub const Y_DIVISIONS: u32 = 6;
/// Selectable time bases (ms per division).
pub const TIME_SCALES_MS: [u32; 4] = [5, 10, 20, 50];
/// Selectable amplitude scales (volts per division).
pub const AMPLITUDE_SCALES_V: [u32; 4] = [1, 2, 5, 10];
/// Current selection in the time-base and amplitude tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisScaleState {
    time_index: usize,
    amplitude_index: usize,
}
impl Default for AxisScaleState {
    fn default() -> Self {
        // Power-on selection: 5 ms/div, 2 V/div.
        Self {
            time_index: 0,
            amplitude_index: 1,
        }
    }
}
impl AxisScaleState {
    pub fn new(time_index: usize, amplitude_index: usize) -> Self {
        Self {
            time_index: time_index % TIME_SCALES_MS.len(),
            amplitude_index: amplitude_index % AMPLITUDE_SCALES_V.len(),
        }
    }
    pub fn next_time_scale(self) -> Self {
        Self::new(self.time_index + 1, self.amplitude_index)
    }
    pub fn next_amplitude_scale(self) -> Self {
        Self::new(self.time_index, self.amplitude_index + 1)
    }
    pub fn time_scale_ms(&self) -> u32 {
        TIME_SCALES_MS[self.time_index]
    }
    pub fn volts_per_division(&self) -> u32 {
        AMPLITUDE_SCALES_V[self.amplitude_index]
    }
    /// Length of one capture covering the whole screen.
    pub fn capture_window_ms(&self) -> u32 {
        self.time_scale_ms() * X_DIVISIONS
    }
    pub fn sample_rate_hz(&self, sample_count: usize) -> f64 {
        sample_count as f64 * 1000.0 / f64::from(self.capture_window_ms())
    }
    /// Frequency-view label value, Hz per division.
    pub fn hertz_per_division(&self) -> u32 {
        (1200.0 / f64::from(self.time_scale_ms())).round() as u32
    }
    /// Largest magnitude that still fits above or below the center line.
    pub fn half_range_volts(&self) -> f64 {
        f64::from(self.volts_per_division() * Y_DIVISIONS) / 2.0
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotMode {
    /// Zero volts on the center line (time view).
    Centered,
    /// Zero on the bottom row (frequency view).
    Baseline,
}
/// Convert values to display rows for the current amplitude scale.
pub fn map_to_pixels(
    values: &[f64],
    scale: AxisScaleState,
    plot_height: u32,
    mode: PlotMode,
) -> Vec<i32> {
    let height = f64::from(plot_height);
    let full_scale = f64::from(scale.volts_per_division() * Y_DIVISIONS);
    let (origin, divisor) = match mode {
        PlotMode::Centered => (height / 2.0, full_scale / height),
        PlotMode::Baseline => (0.0, full_scale / (2.0 * height)),
    };
    values
        .iter()
        .map(|value| (origin + value / divisor).clamp(0.0, height).round_ties_even() as i32)
        .collect()
}
