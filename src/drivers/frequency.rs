//! Zero-crossing frequency estimation.
//!
//! Works well for long, low-noise periodic signals (sine, square, triangle).
//! Both rising and falling crossings are counted, so one period spans two
//! crossing gaps.
use crate::drivers::ScopeError;
/// Estimate the fundamental frequency of `volts` sampled at `sample_rate_hz`.
///
/// Returns `Ok(0.0)` when there are not enough crossings to bound a period.
pub fn estimate_frequency(volts: &[f64], sample_rate_hz: f64) -> Result<f64, ScopeError> {
    if volts.is_empty() {
        return Err(ScopeError::EmptySeries);
    }
    let mean = volts.iter().sum::<f64>() / volts.len() as f64;
    let centered: Vec<f64> = volts.iter().map(|v| v - mean).collect();
    let crossings: Vec<usize> = (1..centered.len())
        .filter(|&i| {
            let (prev, cur) = (centered[i - 1], centered[i]);
            (cur >= 0.0 && prev < 0.0) || (cur <= 0.0 && prev > 0.0)
        })
        .collect();
    if crossings.len() < 2 {
        log::debug!("only {} zero crossings, no frequency", crossings.len());
        return Ok(0.0);
    }
    // The last crossing is left out of the interpolated positions.
    let positions: Vec<f64> = crossings[..crossings.len() - 1]
        .iter()
        .map(|&i| {
            let (prev, cur) = (centered[i - 1], centered[i]);
            i as f64 - cur / (cur - prev)
        })
        .collect();
    let gaps: Vec<f64> = positions.windows(2).map(|w| w[1] - w[0]).collect();
    if gaps.is_empty() {
        return Ok(0.0);
    }
    let mean_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
    Ok(sample_rate_hz / (2.0 * mean_gap))
}
