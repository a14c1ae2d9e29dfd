//! Synthetic peel-test logs sampled at 100 Hz.
//!
//! Each layer cycle, relative to its force peak `p` (sample index):
//! - stage lifts at 0.02 mm/sample from `p - 50` to `p + 100` (3 mm),
//! - holds at the top until `p + 130`,
//! - retracts at 0.03 mm/sample back to 0 by `p + 230`.
//!
//! Force sits on `baseline`, rises linearly from lift start to
//! `baseline + height` at `p`, and decays linearly back to `baseline` by
//! `p + 50` (0.5 s propagation).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DT: f64 = 0.01;

pub struct SyntheticLog {
    pub times: Vec<f64>,
    pub positions: Vec<f64>,
    pub forces: Vec<f64>,
}

fn times(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64 * DT).collect()
}

/// Stage position of one lift/hold/retract cycle whose force peak is at `p`.
fn cycle_position(i: usize, p: usize) -> Option<f64> {
    let lift_start = p - 50;
    if i < lift_start || i >= p + 230 {
        return None;
    }
    Some(match i {
        _ if i <= p + 100 => 0.02 * (i - lift_start) as f64,
        _ if i < p + 130 => 3.0,
        _ => 3.0 - 0.03 * (i - (p + 130)) as f64,
    })
}

fn cycle_force(i: usize, p: usize, height: f64) -> Option<f64> {
    let lift_start = p - 50;
    if i >= lift_start && i <= p {
        Some(height * (i - lift_start) as f64 / 50.0)
    } else if i > p && i < p + 50 {
        Some(height * (1.0 - (i - p) as f64 / 50.0))
    } else {
        None
    }
}

/// Log with one peel cycle per entry of `peaks` (each at least 50).
pub fn peel_log(peaks: &[usize], len: usize, height: f64, baseline: f64) -> SyntheticLog {
    assert!(peaks.iter().all(|&p| p >= 50), "peaks need 50 samples of lift");
    let positions = (0..len)
        .map(|i| {
            peaks
                .iter()
                .find_map(|&p| cycle_position(i, p))
                .unwrap_or(0.0)
        })
        .collect();
    let forces = (0..len)
        .map(|i| baseline + peaks.iter().find_map(|&p| cycle_force(i, p, height)).unwrap_or(0.0))
        .collect();
    SyntheticLog {
        times: times(len),
        positions,
        forces,
    }
}

/// Three layers peaking at 2 s, 6 s and 10 s, 0.2 N above a 0.01 N baseline.
pub fn three_layer_log() -> SyntheticLog {
    peel_log(&[200, 600, 1000], 1300, 0.2, 0.01)
}

/// One layer preceded by a 0.2 mm contact dip (samples 150..190) in which the
/// part is pressed down with -0.05 N. The lift starts from the bottom of the
/// dip, crosses the reference level at sample 200 and peaks in force at 250.
pub fn sandwich_log() -> SyntheticLog {
    let len = 600;
    let positions = (0..len)
        .map(|i| match i {
            0..=149 => 0.0,
            150..=169 => -0.01 * (i - 149) as f64,
            170..=189 => -0.2,
            190..=350 => -0.2 + 0.02 * (i - 190) as f64,
            351..=379 => 3.0,
            380..=479 => 3.0 - 0.03 * (i - 380) as f64,
            _ => 0.0,
        })
        .collect();
    let forces = (0..len)
        .map(|i| match i {
            150..=189 => -0.05,
            200..=250 => 0.01 + 0.2 * (i - 200) as f64 / 50.0,
            251..=299 => 0.21 - 0.2 * (i - 250) as f64 / 50.0,
            _ => 0.01,
        })
        .collect();
    SyntheticLog {
        times: times(len),
        positions,
        forces,
    }
}

/// Stage at rest with a constant force.
pub fn flat_log(len: usize, force: f64) -> SyntheticLog {
    SyntheticLog {
        times: times(len),
        positions: vec![0.0; len],
        forces: vec![force; len],
    }
}

impl SyntheticLog {
    /// Add uniform force noise in `[-amplitude, amplitude]` N.
    pub fn with_force_noise(mut self, amplitude: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        for f in self.forces.iter_mut() {
            *f += rng.gen_range(-amplitude..=amplitude);
        }
        self
    }

    /// Shift each timestamp by up to `amplitude` s while keeping them increasing.
    pub fn with_time_jitter(mut self, amplitude: f64) -> Self {
        assert!(amplitude < DT / 2.0, "jitter must keep timestamps ordered");
        for (i, t) in self.times.iter_mut().enumerate() {
            *t += amplitude * (i as f64 * 0.7).sin();
        }
        self
    }
}
