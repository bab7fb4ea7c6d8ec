use serde::{Deserialize, Serialize};
/// Linear ADC-code to volts mapping, picked once when the scope is configured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationProfile {
    /// Front-end of the physical board (IoT 0003.03).
    Device,
    /// Simulated front-end used on the desktop.
    #[default]
    Simulator,
}
impl CalibrationProfile {
    pub fn gain(self) -> f64 {
        match self {
            CalibrationProfile::Device => 0.012049,
            CalibrationProfile::Simulator => 0.0129,
        }
    }
    pub fn offset(self) -> f64 {
        match self {
            CalibrationProfile::Device => -24.059,
            CalibrationProfile::Simulator => -26.62,
        }
    }
    pub fn to_volts(self, code: u16) -> f64 {
        self.gain() * f64::from(code) + self.offset()
    }
    /// Inverse mapping, rounded and clamped to the 12-bit code range.
    pub fn to_code(self, volts: f64) -> u16 {
        let code = ((volts - self.offset()) / self.gain()).round();
        code.clamp(0.0, f64::from(ADC_MAX_CODE)) as u16
    }
}
/// Largest code a 12-bit converter produces.
pub const ADC_MAX_CODE: u16 = 4095;
/// Convert a captured series of ADC codes into volts.
pub fn calibrate(raw: &[u16], profile: CalibrationProfile) -> Vec<f64> {
    raw.iter().map(|&code| profile.to_volts(code)).collect()
}
