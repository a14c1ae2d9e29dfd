//! Pre-lift contact dip ("sandwich") detection.
//!
//! Walking backwards from the lift start the expected shape is
//! `stable reference → descent → (contact hold) → (return + hold) → lift`.
//! The descent and the reference hold are mandatory; the holds and the
//! separate return run are optional.
use log::{debug, warn};

use crate::types::{IndexRange, TravelDirection};

use super::motion::{MotionProfile, MotionState};
use super::SegmentationOptions;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SandwichDip {
    pub range: IndexRange,
    /// Lift start after the dip, always past `range.end - 1`.
    pub lift_start: usize,
    pub depth_mm: f64,
}

pub(crate) fn detect_sandwich(
    profile: &MotionProfile,
    positions: &[f64],
    lift_start: usize,
    peak: usize,
    floor: usize,
    direction: TravelDirection,
    options: &SegmentationOptions,
) -> Option<SandwichDip> {
    let state = |i: usize| profile.state(i, direction);
    let travel = |i: usize| positions[i] * direction.sign();
    let limit = floor.max(lift_start.saturating_sub(options.sandwich_max_samples));

    let mut i = lift_start;
    while i > limit && state(i - 1) == MotionState::Stable {
        i -= 1;
    }
    let mut returned = false;
    if i > limit && state(i - 1) == MotionState::Lifting {
        returned = true;
        while i > limit && state(i - 1) == MotionState::Lifting {
            i -= 1;
        }
        while i > limit && state(i - 1) == MotionState::Stable {
            i -= 1;
        }
    }

    let descent_end = i;
    while i > limit && state(i - 1) == MotionState::Retracting {
        i -= 1;
    }
    if i == descent_end {
        return None;
    }
    let dip_start = i;
    if dip_start <= limit || state(dip_start - 1) != MotionState::Stable {
        debug!("sandwich candidate at {dip_start} has no reference hold");
        return None;
    }

    let ref_from = dip_start.saturating_sub(profile.window()).max(floor);
    let reference = (ref_from..dip_start).map(travel).sum::<f64>() / (dip_start - ref_from) as f64;

    let (bottom, lowest) = (dip_start..lift_start)
        .map(|j| (j, travel(j)))
        .fold((dip_start, f64::INFINITY), |best, cur| {
            if cur.1 < best.1 {
                cur
            } else {
                best
            }
        });
    let depth = reference - lowest;
    if depth <= profile.threshold() || depth > options.sandwich_max_depth_mm {
        warn!(
            "sandwich candidate at {dip_start} rejected: depth {depth:.4} mm outside ({:.4}, {:.4}]",
            profile.threshold(),
            options.sandwich_max_depth_mm
        );
        return None;
    }

    let level = reference - 0.5 * profile.threshold();
    let Some(dip_end) = (bottom + 1..peak).find(|&j| travel(j) >= level) else {
        debug!("sandwich candidate at {dip_start} never returns to the reference level");
        return None;
    };

    let new_start = if returned && dip_end < lift_start {
        lift_start
    } else {
        (dip_end + 1).max(lift_start)
    };
    if new_start > peak {
        return None;
    }
    Some(SandwichDip {
        range: IndexRange::new(dip_start, dip_end),
        lift_start: new_start,
        depth_mm: depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rest at 0, dip to -0.2 over 150..170, hold to 190, lift at 0.02 mm/sample.
    fn dip_then_lift() -> Vec<f64> {
        (0..400)
            .map(|i| match i {
                0..=149 => 0.0,
                150..=169 => -0.01 * (i - 149) as f64,
                170..=189 => -0.2,
                _ => -0.2 + 0.02 * (i - 190) as f64,
            })
            .collect()
    }

    fn lift_start_of(profile: &MotionProfile, peak: usize) -> usize {
        let mut s = peak;
        while s > 0 && profile.state(s - 1, TravelDirection::Increasing) == MotionState::Lifting {
            s -= 1;
        }
        s
    }

    #[test]
    fn direct_lift_after_dip_is_split_off() {
        let pos = dip_then_lift();
        let profile = MotionProfile::new(&pos, 10, 0.02);
        let start = lift_start_of(&profile, 250);
        let dip = detect_sandwich(
            &profile,
            &pos,
            start,
            250,
            0,
            TravelDirection::Increasing,
            &SegmentationOptions::default(),
        )
        .expect("dip should be detected");
        assert!((dip.depth_mm - 0.2).abs() < 1e-9, "depth={}", dip.depth_mm);
        assert!(dip.range.start < 150 && dip.range.start > 140, "{:?}", dip.range);
        assert_eq!(dip.range.end, 200);
        assert_eq!(dip.lift_start, 201);
    }

    #[test]
    fn too_deep_dip_is_not_a_sandwich() {
        let pos = dip_then_lift();
        let profile = MotionProfile::new(&pos, 10, 0.02);
        let start = lift_start_of(&profile, 250);
        let options = SegmentationOptions {
            sandwich_max_depth_mm: 0.1,
            ..SegmentationOptions::default()
        };
        let dip = detect_sandwich(
            &profile,
            &pos,
            start,
            250,
            0,
            TravelDirection::Increasing,
            &options,
        );
        assert!(dip.is_none());
    }

    #[test]
    fn rest_before_lift_is_not_a_sandwich() {
        let pos: Vec<f64> = (0..300)
            .map(|i| if i < 100 { 0.0 } else { 0.02 * (i - 100) as f64 })
            .collect();
        let profile = MotionProfile::new(&pos, 10, 0.02);
        let start = lift_start_of(&profile, 150);
        let dip = detect_sandwich(
            &profile,
            &pos,
            start,
            150,
            0,
            TravelDirection::Increasing,
            &SegmentationOptions::default(),
        );
        assert!(dip.is_none());
    }
}
