//! Savitzky–Golay smoothing.
//!
//! The filter weights are the rows of the least-squares hat matrix
//! `A · pinv(A)` where `A` is the Vandermonde design matrix of the window
//! offsets. Row `window/2` is the classic centre kernel; the other rows
//! evaluate the same fitted polynomial at off-centre positions and are used
//! for the first and last `window/2` samples, so the output is defined for
//! every input sample.
use crate::error::AnalysisError;
use nalgebra::DMatrix;

use super::SmoothingMethod;

const PINV_EPS: f64 = 1e-12;

/// Smooth `signal` with a polynomial of degree `order` over `window` samples.
pub fn savgol_filter(signal: &[f64], window: usize, order: usize) -> Result<Vec<f64>, AnalysisError> {
    let method = SmoothingMethod::SavitzkyGolay { window, order };
    method.validate()?;
    let required = method.min_samples();
    if signal.len() < required {
        return Err(AnalysisError::insufficient(
            "savitzky-golay smoothing",
            required,
            signal.len(),
        ));
    }

    let weights = hat_rows(window, order)?;
    let n = signal.len();
    let half = window / 2;
    let mut out = vec![0.0; n];

    let centre = &weights[half];
    for i in half..n - half {
        out[i] = dot(centre, &signal[i - half..=i + half]);
    }

    let head = &signal[..window];
    for (i, slot) in out.iter_mut().enumerate().take(half) {
        *slot = dot(&weights[i], head);
    }
    let tail_start = n - window;
    let tail = &signal[tail_start..];
    for i in n - half..n {
        out[i] = dot(&weights[i - tail_start], tail);
    }

    Ok(out)
}

/// Rows of the hat matrix, one per position inside the window.
fn hat_rows(window: usize, order: usize) -> Result<Vec<Vec<f64>>, AnalysisError> {
    let half = (window / 2) as f64;
    // Offsets are scaled into [-1, 1] to keep the Vandermonde matrix well conditioned.
    let scale = if half > 0.0 { half } else { 1.0 };
    let design = DMatrix::from_fn(window, order + 1, |r, c| {
        let x = (r as f64 - half) / scale;
        x.powi(c as i32)
    });
    let pinv = design
        .clone()
        .pseudo_inverse(PINV_EPS)
        .map_err(|e| AnalysisError::invalid_parameter("smoothing.order", e.to_string()))?;
    let hat = design * pinv;
    Ok((0..window)
        .map(|r| hat.row(r).iter().copied().collect())
        .collect())
}

#[inline]
fn dot(weights: &[f64], values: &[f64]) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}
