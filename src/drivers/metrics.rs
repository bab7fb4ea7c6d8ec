use crate::drivers::ScopeError;
/// Summary statistics of one calibrated capture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalStatistics {
    pub max: f64,
    pub min: f64,
    pub average: f64,
    pub rms: f64,
}
impl SignalStatistics {
    pub fn compute(volts: &[f64]) -> Result<Self, ScopeError> {
        if volts.is_empty() {
            return Err(ScopeError::EmptySeries);
        }
        let len = volts.len() as f64;
        let max = volts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = volts.iter().copied().fold(f64::INFINITY, f64::min);
        let average = volts.iter().sum::<f64>() / len;
        let rms = (volts.iter().map(|v| v * v).sum::<f64>() / len).sqrt();
        Ok(Self {
            max,
            min,
            average,
            rms,
        })
    }
}
/// Largest absolute value in the series, 0 for an empty one.
pub fn peak_magnitude(values: &[f64]) -> f64 {
    values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
}
