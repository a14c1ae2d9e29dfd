use crate::error::AnalysisError;

use super::SmoothingMethod;

/// Kernel half-width in standard deviations.
const TRUNCATE_SIGMAS: f64 = 4.0;

/// Normalised, symmetric 1D Gaussian taps (left-to-right).
#[derive(Clone, Debug)]
pub struct GaussianKernel {
    taps: Vec<f64>,
}

impl GaussianKernel {
    pub fn new(sigma: f64) -> Result<Self, AnalysisError> {
        SmoothingMethod::Gaussian { sigma }.validate()?;
        let radius = (TRUNCATE_SIGMAS * sigma + 0.5) as usize;
        let inv = 1.0 / (sigma * sigma);
        let mut taps: Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-0.5 * x * x * inv).exp()
            })
            .collect();
        let sum: f64 = taps.iter().sum();
        for t in taps.iter_mut() {
            *t /= sum;
        }
        Ok(Self { taps })
    }

    #[inline]
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.taps.len() / 2
    }
}

/// Gaussian smoothing with reflected boundaries (`d c b a | a b c d`).
pub fn gaussian_filter(signal: &[f64], sigma: f64) -> Result<Vec<f64>, AnalysisError> {
    let kernel = GaussianKernel::new(sigma)?;
    let required = SmoothingMethod::Gaussian { sigma }.min_samples();
    if signal.len() < required {
        return Err(AnalysisError::insufficient(
            "gaussian smoothing",
            required,
            signal.len(),
        ));
    }
    let n = signal.len() as isize;
    let radius = kernel.radius() as isize;
    let out = (0..n)
        .map(|i| {
            kernel
                .taps()
                .iter()
                .enumerate()
                .map(|(k, w)| w * signal[reflect(i + k as isize - radius, n)])
                .sum()
        })
        .collect();
    Ok(out)
}

#[inline]
fn reflect(index: isize, n: isize) -> usize {
    let period = 2 * n;
    let m = index.rem_euclid(period);
    (if m < n { m } else { period - 1 - m }) as usize
}
