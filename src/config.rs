//! Tunable game constants.
//!
//! `GameConfig::default()` reproduces the classic range: a 150 px bow stretch,
//! shots under 10% power discarded, a 400 px maximum flight and ten arrows per
//! round scored against five rings.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One concentric ring of the target. `radius` is measured from the target
/// center; a landing point at exactly `radius` still counts as inside.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ring {
    pub radius: f64,
    pub points: u32,
}

/// Innermost ring first. Radii strictly increasing.
pub const DEFAULT_RINGS: [Ring; 5] = [
    Ring { radius: 28.0, points: 10 },
    Ring { radius: 56.0, points: 8 },
    Ring { radius: 84.0, points: 6 },
    Ring { radius: 112.0, points: 4 },
    Ring { radius: 140.0, points: 2 },
];

pub const MAX_STRETCH: f64 = 150.0;
pub const MIN_POWER: f64 = 0.1;
pub const DISTANCE_SCALE: f64 = 400.0;
pub const SHOTS_PER_GAME: u32 = 10;
// Pointer-down must land this close to the bow center to start a draw.
pub const BOW_HIT_RADIUS: f64 = 48.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub max_stretch: f64,
    /// Shots at or below this power ratio are dropped silently.
    pub min_power: f64,
    /// Flight distance of a full-power shot.
    pub distance_scale: f64,
    pub shots_per_game: u32,
    pub rings: Vec<Ring>,
    /// Accept `Reset` while a round is still running (otherwise only once ended).
    pub reset_anytime: bool,
    pub bow_hit_radius: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_stretch: MAX_STRETCH,
            min_power: MIN_POWER,
            distance_scale: DISTANCE_SCALE,
            shots_per_game: SHOTS_PER_GAME,
            rings: DEFAULT_RINGS.to_vec(),
            reset_anytime: false,
            bow_hit_radius: BOW_HIT_RADIUS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    NonPositive(&'static str),
    MinPowerOutOfRange(f64),
    NoShots,
    NoRings,
    /// Ring at this index does not grow past its predecessor.
    RingOrder(usize),
    #[cfg(feature = "serde_json")]
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive(field) => write!(f, "{field} must be positive"),
            ConfigError::MinPowerOutOfRange(p) => {
                write!(f, "min_power {p} outside of [0, 1)")
            }
            ConfigError::NoShots => write!(f, "shots_per_game must be at least 1"),
            ConfigError::NoRings => write!(f, "ring table is empty"),
            ConfigError::RingOrder(idx) => {
                write!(f, "ring {idx} radius is not larger than the ring inside it")
            }
            #[cfg(feature = "serde_json")]
            ConfigError::Json(msg) => write!(f, "invalid config json: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GameConfig {
    /// Consume the config, returning it unchanged if every field is usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        // `!(x > 0.0)` so NaN is rejected as well.
        if !(self.max_stretch > 0.0) {
            return Err(ConfigError::NonPositive("max_stretch"));
        }
        if !(self.distance_scale > 0.0) {
            return Err(ConfigError::NonPositive("distance_scale"));
        }
        if !(self.bow_hit_radius > 0.0) {
            return Err(ConfigError::NonPositive("bow_hit_radius"));
        }
        if !(0.0..1.0).contains(&self.min_power) {
            return Err(ConfigError::MinPowerOutOfRange(self.min_power));
        }
        if self.shots_per_game == 0 {
            return Err(ConfigError::NoShots);
        }
        let first = self.rings.first().ok_or(ConfigError::NoRings)?;
        if !(first.radius > 0.0) {
            return Err(ConfigError::RingOrder(0));
        }
        for (idx, pair) in self.rings.windows(2).enumerate() {
            if !(pair[1].radius > pair[0].radius) {
                return Err(ConfigError::RingOrder(idx + 1));
            }
        }
        Ok(self)
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()
    }

    /// Radius of the outermost ring (the edge of the target face).
    pub fn target_radius(&self) -> f64 {
        self.rings.last().map(|r| r.radius).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = GameConfig::default().validate().unwrap();
        assert_eq!(cfg.shots_per_game, 10);
        assert_eq!(cfg.rings.len(), 5);
        assert_eq!(cfg.target_radius(), 140.0);
    }

    #[test]
    fn rejects_unordered_rings() {
        let mut cfg = GameConfig::default();
        cfg.rings.swap(1, 2);
        assert_eq!(cfg.validate(), Err(ConfigError::RingOrder(2)));
    }

    #[test]
    fn rejects_degenerate_values() {
        let cfg = GameConfig { max_stretch: 0.0, ..GameConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositive("max_stretch")));

        let cfg = GameConfig { min_power: 1.0, ..GameConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::MinPowerOutOfRange(1.0)));

        let cfg = GameConfig { shots_per_game: 0, ..GameConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::NoShots));

        let cfg = GameConfig { rings: Vec::new(), ..GameConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::NoRings));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = GameConfig::from_json(r#"{ "shots_per_game": 3 }"#).unwrap();
        assert_eq!(cfg.shots_per_game, 3);
        assert_eq!(cfg.max_stretch, MAX_STRETCH);
        assert!(GameConfig::from_json(r#"{ "rings": [] }"#).is_err());
    }
}
