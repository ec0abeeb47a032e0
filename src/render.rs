//! Render events: what the session tells the presentation layer.
//!
//! Nothing in here feeds back into game logic. A front end may drop any of
//! these and the score would still be correct.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::gesture::Gesture;
use crate::scoring::Outcome;

/// Fraction of the pull the bow itself follows while drawn.
const BOW_FOLLOW: f64 = 0.3;

/// Visual state of a bow being drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PullFeedback {
    pub power: f64,
    /// Pull length after clamping, used as the stretch line length.
    pub stretch: f64,
    pub angle: f64,
    /// Offset of the bow from its rest position.
    pub bow_offset: DVec2,
    pub bow_scale: f64,
}

impl PullFeedback {
    pub fn from_gesture(gesture: &Gesture, max_stretch: f64) -> Self {
        let power = gesture.power(max_stretch);
        Self {
            power,
            stretch: gesture.clamped_distance(max_stretch),
            angle: gesture.angle(),
            bow_offset: -gesture.pull() * BOW_FOLLOW * power,
            bow_scale: 1.2 - power * 0.2,
        }
    }

    /// Bow sprite rotation; the glyph is drawn pointing 45° off.
    pub fn bow_rotation(&self) -> f64 {
        self.angle + std::f64::consts::FRAC_PI_4
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RenderEvent {
    GestureStarted,
    PullChanged(PullFeedback),
    /// Stretch line, power indicator and bow pose back to rest.
    GestureCleared,
    ShotFired {
        launch: DVec2,
        landing: DVec2,
        angle: f64,
        power: f64,
        flight_ms: f64,
    },
    /// Result of the arrow most recently fired. Presentation should hold it
    /// back until the flight animation has landed.
    Resolved(Outcome),
    Scoreboard { score: u32, shots: u32 },
    GameOver { final_score: u32 },
    GameReset,
}

/// Power as the whole percentage shown on the indicator.
pub fn power_percent(power: f64) -> u32 {
    (power.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Indicator colour band: red when weak, yellow mid, green near full.
pub fn power_color(percent: u32) -> &'static str {
    if percent < 30 {
        "#ff6b6b"
    } else if percent < 70 {
        "#ffd93d"
    } else {
        "#6bcf7f"
    }
}

/// Ease-out cubic bezier (0.25, 0.46, 0.45, 0.94) approximated by solving for
/// the curve parameter with a few Newton steps.
pub fn flight_ease(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let (x1, y1, x2, y2) = (0.25, 0.46, 0.45, 0.94);
    let bez = |a: f64, b: f64, s: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };
    let bez_d = |a: f64, b: f64, s: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * a + 6.0 * inv * s * (b - a) + 3.0 * s * s * (1.0 - b)
    };
    let mut s = t;
    for _ in 0..6 {
        let d = bez_d(x1, x2, s);
        if d.abs() < 1e-9 {
            break;
        }
        s = (s - (bez(x1, x2, s) - t) / d).clamp(0.0, 1.0);
    }
    bez(y1, y2, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_bands() {
        assert_eq!(power_color(power_percent(0.05)), "#ff6b6b");
        assert_eq!(power_color(power_percent(0.5)), "#ffd93d");
        assert_eq!(power_color(power_percent(0.75)), "#6bcf7f");
        assert_eq!(power_percent(1.7), 100);
    }

    #[test]
    fn bow_follows_a_fraction_of_the_pull() {
        let mut g = Gesture::begin(DVec2::new(200.0, 100.0));
        g.track(DVec2::new(50.0, 100.0));
        let fb = PullFeedback::from_gesture(&g, 150.0);
        assert_eq!(fb.stretch, 150.0);
        assert!(fb.angle.abs() < 1e-12);
        assert_eq!(fb.power, 1.0);
        assert!((fb.bow_offset - DVec2::new(-45.0, 0.0)).length() < 1e-9);
        assert!((fb.bow_scale - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ease_hits_its_endpoints() {
        assert!(flight_ease(0.0).abs() < 1e-9);
        assert!((flight_ease(1.0) - 1.0).abs() < 1e-9);
        // ease-out: ahead of linear at the midpoint
        assert!(flight_ease(0.5) > 0.5);
    }
}
