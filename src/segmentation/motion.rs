//! Per-sample motion state from windowed position means.
//!
//! `drift(i) = mean(pos[i..i+w]) - mean(pos[i-w..i])`, windows clamped at the
//! data edges. Prefix sums make every query O(1), so a full segmentation pass
//! stays linear in the sample count.
use crate::types::TravelDirection;

use super::LiftDirection;

/// Motion of the stage relative to the lift direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MotionState {
    Stable,
    Lifting,
    Retracting,
}

pub(crate) struct MotionProfile {
    drift: Vec<f64>,
    threshold: f64,
    window: usize,
}

impl MotionProfile {
    pub(crate) fn new(positions: &[f64], window: usize, threshold: f64) -> Self {
        let n = positions.len();
        let w = window.max(1);
        let mut prefix = Vec::with_capacity(n + 1);
        prefix.push(0.0f64);
        let mut acc = 0.0f64;
        for &p in positions {
            acc += p;
            prefix.push(acc);
        }
        let mean = |a: usize, b: usize| (prefix[b] - prefix[a]) / (b - a) as f64;

        let drift = (0..n)
            .map(|i| {
                let lo = i.saturating_sub(w);
                let hi = (i + w).min(n);
                if lo == i || hi == i {
                    0.0
                } else {
                    mean(i, hi) - mean(lo, i)
                }
            })
            .collect();

        Self {
            drift,
            threshold,
            window: w,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.drift.len()
    }

    pub(crate) fn window(&self) -> usize {
        self.window
    }

    pub(crate) fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub(crate) fn state(&self, index: usize, direction: TravelDirection) -> MotionState {
        let d = self.drift[index];
        if d.abs() < self.threshold {
            MotionState::Stable
        } else if d * direction.sign() > 0.0 {
            MotionState::Lifting
        } else {
            MotionState::Retracting
        }
    }

    /// Lift direction to use for the layer containing `peak`.
    pub(crate) fn resolve_direction(
        &self,
        choice: LiftDirection,
        positions: &[f64],
        peak: usize,
    ) -> TravelDirection {
        match choice {
            LiftDirection::Increasing => TravelDirection::Increasing,
            LiftDirection::Decreasing => TravelDirection::Decreasing,
            LiftDirection::Auto => {
                let d = self.drift[peak];
                let delta = if d.abs() >= self.threshold {
                    d
                } else {
                    let before = positions[peak.saturating_sub(self.window)];
                    let after = positions[(peak + self.window).min(positions.len() - 1)];
                    after - before
                };
                if delta >= 0.0 {
                    TravelDirection::Increasing
                } else {
                    TravelDirection::Decreasing
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_profile() -> Vec<f64> {
        // 30 samples at rest, 40 samples rising 0.05 mm/sample, 30 at rest.
        (0..100)
            .map(|i| match i {
                0..=29 => 0.0,
                30..=69 => 0.05 * (i - 29) as f64,
                _ => 2.0,
            })
            .collect()
    }

    #[test]
    fn classifies_rest_and_motion() {
        let pos = ramp_profile();
        let profile = MotionProfile::new(&pos, 10, 0.02);
        assert_eq!(profile.len(), 100);
        let up = TravelDirection::Increasing;
        assert_eq!(profile.state(10, up), MotionState::Stable);
        assert_eq!(profile.state(50, up), MotionState::Lifting);
        assert_eq!(profile.state(95, up), MotionState::Stable);
        assert_eq!(
            profile.state(50, TravelDirection::Decreasing),
            MotionState::Retracting
        );
    }

    #[test]
    fn auto_direction_follows_motion_sign() {
        let pos: Vec<f64> = ramp_profile().iter().map(|p| -p).collect();
        let profile = MotionProfile::new(&pos, 10, 0.02);
        assert_eq!(
            profile.resolve_direction(LiftDirection::Auto, &pos, 50),
            TravelDirection::Decreasing
        );
        assert_eq!(
            profile.resolve_direction(LiftDirection::Increasing, &pos, 50),
            TravelDirection::Increasing
        );
    }
}
