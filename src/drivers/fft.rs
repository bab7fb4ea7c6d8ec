use std::f64::consts::PI;
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};
use crate::drivers::ScopeError;
/// Which transform feeds the frequency view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectrumMethod {
    /// Direct O(N^2) evaluation.
    Dft,
    /// Chirp Z-transform on top of the radix-2 FFT.
    #[default]
    Czt,
}
/// Helper that turns one calibrated capture into display magnitudes.
pub struct SpectrumBuilder {
    method: SpectrumMethod,
}
impl SpectrumBuilder {
    pub fn with_method(method: SpectrumMethod) -> Self {
        Self { method }
    }
    pub fn compute(&self, volts: &[f64]) -> Result<Vec<f64>, ScopeError> {
        let magnitudes = match self.method {
            SpectrumMethod::Dft => dft_magnitudes(volts)?,
            SpectrumMethod::Czt => czt_magnitudes(volts)?,
        };
        log::debug!(
            "{:?} spectrum: {} samples -> {} bins",
            self.method,
            volts.len(),
            magnitudes.len()
        );
        Ok(magnitudes)
    }
}
/// Single-sided magnitude spectrum by direct evaluation of the DFT sum.
///
/// Bin `k` is written to both slots `2k` and `2k + 1` so that each bin spans two
/// display columns; bins from `N/2 - 1` upward are left at zero.
pub fn dft_magnitudes(volts: &[f64]) -> Result<Vec<f64>, ScopeError> {
    let n = volts.len();
    if n == 0 {
        return Err(ScopeError::EmptySeries);
    }
    let mut magnitudes = vec![0.0; n];
    for k in 0..(n / 2).saturating_sub(1) {
        let (mut real, mut imag) = (0.0, 0.0);
        for (i, &v) in volts.iter().enumerate() {
            let theta = -(k as f64) * 2.0 * PI * (i as f64 / n as f64);
            real += v * theta.cos();
            imag += v * theta.sin();
        }
        let mut magnitude = Complex64::new(real, imag).norm() / n as f64;
        if k != 0 {
            magnitude *= 2.0;
        }
        magnitudes[2 * k] = magnitude;
        magnitudes[2 * k + 1] = magnitude;
    }
    Ok(magnitudes)
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}
impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        }
    }
}
/// Radix-2 forward FFT. The input length must be a power of two.
pub fn fft(input: &[Complex64]) -> Result<Vec<Complex64>, ScopeError> {
    radix2(input, Direction::Forward)
}
/// Radix-2 inverse FFT without the 1/N normalization.
pub fn ifft(input: &[Complex64]) -> Result<Vec<Complex64>, ScopeError> {
    radix2(input, Direction::Inverse)
}
fn radix2(input: &[Complex64], direction: Direction) -> Result<Vec<Complex64>, ScopeError> {
    if !input.len().is_power_of_two() {
        return Err(ScopeError::InvalidLength {
            len: input.len(),
            reason: "radix-2 FFT needs a power-of-two length",
        });
    }
    let mut output = vec![Complex64::default(); input.len()];
    decimate(input, 0, 1, &mut output, direction);
    Ok(output)
}
/// Decimation in time over the view `input[start], input[start + stride], ...`
/// whose length is `output.len()`.
fn decimate(
    input: &[Complex64],
    start: usize,
    stride: usize,
    output: &mut [Complex64],
    direction: Direction,
) {
    let n = output.len();
    if n == 1 {
        output[0] = input[start];
        return;
    }
    let half = n / 2;
    {
        let (even, odd) = output.split_at_mut(half);
        decimate(input, start, stride * 2, even, direction);
        decimate(input, start + stride, stride * 2, odd, direction);
    }
    for k in 0..half {
        let twiddle = Complex64::from_polar(1.0, direction.sign() * 2.0 * PI * k as f64 / n as f64);
        let even = output[k];
        let odd = twiddle * output[k + half];
        output[k] = even + odd;
        output[k + half] = even - odd;
    }
}
/// Single-sided magnitude spectrum through the chirp Z-transform, usable for
/// any length of at least two samples.
///
/// The contour is the unit circle sampled at `n` points starting at z = 1, so
/// the result matches the DFT; the convolution runs on power-of-two FFTs.
pub fn czt_magnitudes(volts: &[f64]) -> Result<Vec<f64>, ScopeError> {
    let n = volts.len();
    if n < 2 {
        return Err(ScopeError::InvalidLength {
            len: n,
            reason: "chirp Z-transform needs at least two samples",
        });
    }
    let m = n;
    let w = Complex64::from_polar(1.0, -2.0 * PI / m as f64);
    let a = Complex64::new(1.0, 0.0);
    // chirp[j + n - 1] = w^(j^2 / 2) for j in [1 - n, max(n, m))
    let chirp: Vec<Complex64> = (1 - n as i64..n.max(m) as i64)
        .map(|j| w.powf((j * j) as f64 / 2.0))
        .collect();
    let padded_len = (m + n - 1).next_power_of_two();
    let spectrum = {
        let mut xp: Vec<Complex64> = volts
            .iter()
            .enumerate()
            .map(|(i, &x)| x * a.powi(-(i as i32)) * chirp[n - 1 + i])
            .collect();
        xp.resize(padded_len, Complex64::default());
        let mut ichirp: Vec<Complex64> = chirp[..m + n - 1].iter().map(|c| c.inv()).collect();
        ichirp.resize(padded_len, Complex64::default());
        let fft_xp = fft(&xp)?;
        let fft_ichirp = fft(&ichirp)?;
        let product: Vec<Complex64> = fft_xp.iter().zip(&fft_ichirp).map(|(x, c)| x * c).collect();
        ifft(&product)?
    };
    let scale = padded_len as f64;
    // Real input: the upper half mirrors the lower one.
    let kept: Vec<Complex64> = spectrum[n - 1..m + n - 1]
        .iter()
        .zip(&chirp[n - 1..m + n - 1])
        .take(m / 2)
        .map(|(r, c)| (*r / scale) * *c)
        .collect();
    let len = 2 * kept.len();
    let magnitudes = kept
        .iter()
        .flat_map(|value| [*value, *value])
        .enumerate()
        .map(|(i, value)| {
            let magnitude = value.norm() / len as f64;
            if i > 1 {
                magnitude * 2.0
            } else {
                magnitude
            }
        })
        .collect();
    Ok(magnitudes)
}
