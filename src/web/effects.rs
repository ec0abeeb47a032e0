//! Presentation-side state built from render events.
//!
//! Every transient visual is a timestamped record that the frame loop expires,
//! so nothing is ever scheduled against an element that may already be gone.
//! Shot results arrive from the session at release time and are held back
//! here until the arrow has landed.

use glam::DVec2;

use crate::render::{PullFeedback, RenderEvent, flight_ease};
use crate::scoring::Outcome;
use crate::shot::RESOLVE_DELAY_MS;

/// Gap between release and the arrow leaving the bow.
pub const LAUNCH_DELAY_MS: f64 = 50.0;
pub const RING_FLASH_MS: f64 = 500.0;
pub const POINTS_TEXT_MS: f64 = 1500.0;
pub const MISS_BANNER_MS: f64 = 1500.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlyingArrow {
    pub launch: DVec2,
    pub landing: DVec2,
    pub angle: f64,
    pub depart_ms: f64,
    pub flight_ms: f64,
    /// Removed from the screen once the result is shown.
    pub resolve_ms: f64,
}

impl FlyingArrow {
    pub fn position(&self, now: f64) -> DVec2 {
        let t = ((now - self.depart_ms) / self.flight_ms).clamp(0.0, 1.0);
        self.launch.lerp(self.landing, flight_ease(t))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitMark {
    pub ring: usize,
    pub points: u32,
    pub at_ms: f64,
}

#[derive(Debug, Default)]
pub struct Effects {
    drawing: bool,
    pull: Option<PullFeedback>,
    arrows: Vec<FlyingArrow>,
    hits: Vec<HitMark>,
    misses: Vec<f64>,
    // Points still in the air: (landing time, points).
    pending_points: Vec<(f64, u32)>,
    score: u32,
    shots: u32,
    game_over: Option<(f64, u32)>,
    // When the most recently fired arrow's result becomes visible.
    reveal_ms: f64,
}

impl Effects {
    pub fn new(score: u32, shots: u32) -> Self {
        Self { score, shots, ..Self::default() }
    }

    pub fn apply(&mut self, event: &RenderEvent, now: f64) {
        match *event {
            RenderEvent::GestureStarted => {
                self.drawing = true;
                self.pull = None;
            }
            RenderEvent::PullChanged(fb) => self.pull = Some(fb),
            RenderEvent::GestureCleared => {
                self.drawing = false;
                self.pull = None;
            }
            RenderEvent::ShotFired { launch, landing, angle, flight_ms, .. } => {
                self.reveal_ms = now + flight_ms + RESOLVE_DELAY_MS;
                self.arrows.push(FlyingArrow {
                    launch,
                    landing,
                    angle,
                    depart_ms: now + LAUNCH_DELAY_MS,
                    flight_ms,
                    resolve_ms: self.reveal_ms,
                });
            }
            RenderEvent::Resolved(Outcome::Hit { ring, points }) => {
                self.hits.push(HitMark { ring, points, at_ms: self.reveal_ms });
                self.pending_points.push((self.reveal_ms, points));
            }
            RenderEvent::Resolved(Outcome::Miss) => self.misses.push(self.reveal_ms),
            RenderEvent::Scoreboard { shots, .. } => {
                // shot count drops on release; score grows per hit as arrows land
                self.shots = shots;
            }
            RenderEvent::GameOver { final_score } => {
                let last_landing = self
                    .arrows
                    .iter()
                    .map(|a| a.resolve_ms)
                    .fold(now, f64::max);
                self.game_over = Some((last_landing, final_score));
            }
            RenderEvent::GameReset => *self = Self::new(0, self.shots),
        }
    }

    /// Credit landed hits and drop finished effects.
    pub fn tick(&mut self, now: f64) {
        let score = &mut self.score;
        self.pending_points.retain(|&(at, points)| {
            if at <= now {
                *score += points;
                false
            } else {
                true
            }
        });
        self.arrows.retain(|a| now < a.resolve_ms);
        self.hits.retain(|h| now < h.at_ms + POINTS_TEXT_MS);
        self.misses.retain(|&at| now < at + MISS_BANNER_MS);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub fn drawing(&self) -> bool {
        self.drawing
    }

    pub fn pull(&self) -> Option<&PullFeedback> {
        self.pull.as_ref()
    }

    pub fn arrows(&self) -> &[FlyingArrow] {
        &self.arrows
    }

    /// Ring currently highlighted by a fresh hit, if any.
    pub fn ring_flash(&self, now: f64) -> Option<usize> {
        self.hits
            .iter()
            .rev()
            .find(|h| h.at_ms <= now && now < h.at_ms + RING_FLASH_MS)
            .map(|h| h.ring)
    }

    /// Visible "+N" labels with their animation progress in [0, 1).
    pub fn points_texts(&self, now: f64) -> impl Iterator<Item = (&HitMark, f64)> + '_ {
        self.hits
            .iter()
            .filter(move |h| h.at_ms <= now)
            .map(move |h| (h, (now - h.at_ms) / POINTS_TEXT_MS))
    }

    pub fn miss_banners(&self, now: f64) -> impl Iterator<Item = f64> + '_ {
        self.misses
            .iter()
            .filter(move |&&at| at <= now)
            .map(move |&at| (now - at) / MISS_BANNER_MS)
    }

    /// Final score once the last arrow has landed.
    pub fn game_over(&self, now: f64) -> Option<u32> {
        self.game_over.filter(|&(at, _)| at <= now).map(|(_, s)| s)
    }

    /// "Play again" is live only while the game-over panel is showing.
    pub fn replay_offered(&self, now: f64) -> bool {
        self.game_over(now).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fired(flight_ms: f64) -> RenderEvent {
        RenderEvent::ShotFired {
            launch: DVec2::ZERO,
            landing: DVec2::new(300.0, 0.0),
            angle: 0.0,
            power: 0.75,
            flight_ms,
        }
    }

    #[test]
    fn score_waits_for_the_arrow() {
        let mut fx = Effects::new(0, 10);
        fx.apply(&fired(900.0), 1000.0);
        fx.apply(&RenderEvent::Resolved(Outcome::Hit { ring: 0, points: 10 }), 1000.0);
        fx.apply(&RenderEvent::Scoreboard { score: 10, shots: 9 }, 1000.0);
        fx.tick(1500.0);
        assert_eq!(fx.shots(), 9);
        assert_eq!(fx.score(), 0);
        assert_eq!(fx.ring_flash(1500.0), None);

        fx.tick(2000.0);
        assert_eq!(fx.score(), 10);
        assert_eq!(fx.ring_flash(2000.0), Some(0));
        assert!(fx.arrows().is_empty());
        assert_eq!(fx.ring_flash(2600.0), None);
    }

    fn fired_at(flight_ms: f64, outcome: Outcome, shots: u32) -> [RenderEvent; 3] {
        [
            fired(flight_ms),
            RenderEvent::Resolved(outcome),
            RenderEvent::Scoreboard { score: 0, shots },
        ]
    }

    #[test]
    fn slow_miss_landing_after_fast_hit_keeps_the_score() {
        let mut fx = Effects::new(0, 2);
        // weak miss at t=0 lands at 1240, strong bullseye at t=200 lands at 1100
        for e in fired_at(1140.0, Outcome::Miss, 1) {
            fx.apply(&e, 0.0);
        }
        for e in fired_at(800.0, Outcome::Hit { ring: 0, points: 10 }, 0) {
            fx.apply(&e, 200.0);
        }
        fx.apply(&RenderEvent::GameOver { final_score: 10 }, 200.0);

        fx.tick(1150.0);
        assert_eq!(fx.score(), 10);
        assert_eq!(fx.arrows().len(), 1);
        // panel waits for the slower arrow
        assert_eq!(fx.game_over(1150.0), None);

        fx.tick(1300.0);
        assert_eq!(fx.score(), 10);
        assert_eq!(fx.game_over(1300.0), Some(10));
    }

    #[test]
    fn replay_waits_for_the_last_arrow() {
        let mut fx = Effects::new(0, 1);
        for e in fired_at(900.0, Outcome::Miss, 0) {
            fx.apply(&e, 0.0);
        }
        fx.apply(&RenderEvent::GameOver { final_score: 0 }, 0.0);
        assert!(!fx.replay_offered(0.0));
        assert!(!fx.replay_offered(999.0));
        assert!(fx.replay_offered(1000.0));

        fx.apply(&RenderEvent::GameReset, 1200.0);
        assert!(!fx.replay_offered(1200.0));
    }

    #[test]
    fn arrow_eases_along_its_path() {
        let mut fx = Effects::new(0, 10);
        fx.apply(&fired(1000.0), 0.0);
        let arrow = fx.arrows()[0];
        assert_eq!(arrow.position(0.0), DVec2::ZERO);
        assert!((arrow.position(1050.0) - DVec2::new(300.0, 0.0)).length() < 1e-6);
        let mid = arrow.position(550.0);
        assert!(mid.x > 150.0 && mid.x < 300.0);
    }

    #[test]
    fn reset_drops_pending_effects() {
        let mut fx = Effects::new(0, 1);
        fx.apply(&fired(800.0), 0.0);
        fx.apply(&RenderEvent::Resolved(Outcome::Miss), 0.0);
        fx.apply(&RenderEvent::Scoreboard { score: 0, shots: 0 }, 0.0);
        fx.apply(&RenderEvent::GameOver { final_score: 0 }, 0.0);
        assert_eq!(fx.game_over(100.0), None);

        fx.apply(&RenderEvent::GameReset, 100.0);
        fx.apply(&RenderEvent::Scoreboard { score: 0, shots: 10 }, 100.0);
        fx.tick(2000.0);
        assert_eq!(fx.game_over(2000.0), None);
        assert_eq!(fx.miss_banners(2000.0).count(), 0);
        assert_eq!(fx.shots(), 10);
    }
}
