//! Ring lookup.

use glam::DVec2;

use crate::config::Ring;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// `ring` is the index into the ring table, 0 = bullseye.
    Hit { ring: usize, points: u32 },
    Miss,
}

impl Outcome {
    pub fn points(&self) -> u32 {
        match *self {
            Outcome::Hit { points, .. } => points,
            Outcome::Miss => 0,
        }
    }
}

/// First ring (innermost outward) whose radius reaches `distance`.
pub fn score_distance(rings: &[Ring], distance: f64) -> Outcome {
    rings
        .iter()
        .position(|r| distance <= r.radius)
        .map(|ring| Outcome::Hit { ring, points: rings[ring].points })
        .unwrap_or(Outcome::Miss)
}

pub fn score_landing(rings: &[Ring], landing: DVec2, target_center: DVec2) -> Outcome {
    score_distance(rings, landing.distance(target_center))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RINGS;

    #[test]
    fn ring_boundaries_are_inclusive() {
        assert_eq!(score_distance(&DEFAULT_RINGS, 0.0), Outcome::Hit { ring: 0, points: 10 });
        assert_eq!(score_distance(&DEFAULT_RINGS, 28.0), Outcome::Hit { ring: 0, points: 10 });
        assert_eq!(score_distance(&DEFAULT_RINGS, 28.5), Outcome::Hit { ring: 1, points: 8 });
        assert_eq!(score_distance(&DEFAULT_RINGS, 56.0), Outcome::Hit { ring: 1, points: 8 });
        assert_eq!(score_distance(&DEFAULT_RINGS, 140.0), Outcome::Hit { ring: 4, points: 2 });
        assert_eq!(score_distance(&DEFAULT_RINGS, 141.0), Outcome::Miss);
    }

    #[test]
    fn points_never_increase_with_distance() {
        let mut last = u32::MAX;
        for step in 0..400 {
            let pts = score_distance(&DEFAULT_RINGS, step as f64 * 0.5).points();
            assert!(pts <= last, "points rose at distance {}", step as f64 * 0.5);
            last = pts;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn landing_uses_euclidean_distance() {
        let center = DVec2::new(500.0, 250.0);
        // 3-4-5 triangle scaled to 50
        let out = score_landing(&DEFAULT_RINGS, DVec2::new(530.0, 290.0), center);
        assert_eq!(out, Outcome::Hit { ring: 1, points: 8 });
    }
}
