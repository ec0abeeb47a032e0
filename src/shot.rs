//! Turning a released draw into a flight.

use glam::DVec2;

use crate::gesture::{launch_angle, power_ratio};

/// Base flight time of a full-power arrow, in ms.
pub const FLIGHT_BASE_MS: f64 = 800.0;
/// Extra flight time added as power drops towards zero.
pub const FLIGHT_SLACK_MS: f64 = 400.0;
/// Pause between touchdown and revealing the result.
pub const RESOLVE_DELAY_MS: f64 = 100.0;

/// A fired arrow. Everything here is fixed at release time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    pub launch: DVec2,
    pub landing: DVec2,
    pub angle: f64,
    pub power: f64,
}

impl Shot {
    /// Build the shot for a pull vector, or `None` when the draw is too weak.
    pub fn from_pull(
        pull: DVec2,
        launch: DVec2,
        max_stretch: f64,
        min_power: f64,
        distance_scale: f64,
    ) -> Option<Self> {
        let power = power_ratio(pull, max_stretch);
        if power <= min_power {
            return None;
        }
        let angle = launch_angle(pull);
        Some(Self {
            launch,
            landing: landing_point(launch, angle, power, distance_scale),
            angle,
            power,
        })
    }

    pub fn flight_ms(&self) -> f64 {
        flight_duration_ms(self.power)
    }
}

pub fn landing_point(launch: DVec2, angle: f64, power: f64, distance_scale: f64) -> DVec2 {
    launch + DVec2::new(angle.cos(), angle.sin()) * (distance_scale * power)
}

/// Harder shots fly faster: 800 ms at full power up to 1200 ms at zero.
pub fn flight_duration_ms(power: f64) -> f64 {
    FLIGHT_BASE_MS + (1.0 - power.clamp(0.0, 1.0)) * FLIGHT_SLACK_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_draw_is_discarded() {
        let shot = Shot::from_pull(DVec2::new(7.5, 0.0), DVec2::ZERO, 150.0, 0.1, 400.0);
        assert!(shot.is_none());
        // exactly on the threshold is still too weak
        let shot = Shot::from_pull(DVec2::new(15.0, 0.0), DVec2::ZERO, 150.0, 0.1, 400.0);
        assert!(shot.is_none());
    }

    #[test]
    fn full_draw_travels_full_distance() {
        let launch = DVec2::new(120.0, 250.0);
        let shot = Shot::from_pull(DVec2::new(0.0, 300.0), launch, 150.0, 0.1, 400.0).unwrap();
        assert_eq!(shot.power, 1.0);
        assert!((shot.landing - DVec2::new(120.0, 650.0)).length() < 1e-9);
        assert_eq!(shot.flight_ms(), 800.0);
    }

    #[test]
    fn flight_time_shrinks_with_power() {
        assert_eq!(flight_duration_ms(0.5), 1000.0);
        assert!(flight_duration_ms(0.9) < flight_duration_ms(0.2));
    }
}
