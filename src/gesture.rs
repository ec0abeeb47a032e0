//! Drag gesture on the bow.
//!
//! The player grabs the bow and pulls *away* from where they want to shoot, so
//! the pull vector is `origin - current`: dragging left aims right.

use glam::DVec2;

/// An in-progress draw. Exists only between pointer-down and release.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gesture {
    pub origin: DVec2,
    pub current: DVec2,
}

impl Gesture {
    pub fn begin(origin: DVec2) -> Self {
        Self { origin, current: origin }
    }

    pub fn track(&mut self, point: DVec2) {
        self.current = point;
    }

    pub fn pull(&self) -> DVec2 {
        self.origin - self.current
    }

    /// Pull length capped at `max_stretch`.
    pub fn clamped_distance(&self, max_stretch: f64) -> f64 {
        self.pull().length().min(max_stretch)
    }

    pub fn power(&self, max_stretch: f64) -> f64 {
        power_ratio(self.pull(), max_stretch)
    }

    /// Direction of the pull in radians (screen space, y down).
    pub fn angle(&self) -> f64 {
        launch_angle(self.pull())
    }
}

/// `min(|pull|, max_stretch) / max_stretch`, always within [0, 1].
pub fn power_ratio(pull: DVec2, max_stretch: f64) -> f64 {
    (pull.length() / max_stretch).min(1.0)
}

pub fn launch_angle(pull: DVec2) -> f64 {
    pull.y.atan2(pull.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_points_away_from_drag() {
        let mut g = Gesture::begin(DVec2::new(100.0, 100.0));
        g.track(DVec2::new(40.0, 100.0));
        assert_eq!(g.pull(), DVec2::new(60.0, 0.0));
        assert!(g.angle().abs() < 1e-12);
    }

    #[test]
    fn power_is_clamped_to_max_stretch() {
        let mut g = Gesture::begin(DVec2::ZERO);
        g.track(DVec2::new(-300.0, -400.0));
        assert_eq!(g.clamped_distance(150.0), 150.0);
        assert_eq!(g.power(150.0), 1.0);

        g.track(DVec2::new(-45.0, 0.0));
        assert!((g.power(150.0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn fresh_gesture_has_no_power() {
        let g = Gesture::begin(DVec2::new(12.0, 34.0));
        assert_eq!(g.power(150.0), 0.0);
    }
}
