//! Game session: owns the round state and applies input events.
//!
//! A session is a plain value. The browser front end keeps one in a
//! thread-local, tests construct their own. Every transition runs to
//! completion and returns the render events it produced; scoring is decided
//! at release time, the flight animation only delays when it is shown.

use std::collections::VecDeque;

use glam::DVec2;
use log::{debug, info};

use crate::config::GameConfig;
use crate::gesture::Gesture;
use crate::render::{PullFeedback, RenderEvent};
use crate::scoring::{Outcome, score_landing};
use crate::shot::Shot;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    GestureStart(DVec2),
    GestureMove(DVec2),
    /// Release. Touch end events carry no coordinates, hence the `Option`.
    GestureEnd(Option<DVec2>),
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Dragging,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    pub score: u32,
    pub shots_remaining: u32,
    pub active: bool,
}

impl GameState {
    fn fresh(shots: u32) -> Self {
        Self { score: 0, shots_remaining: shots, active: true }
    }
}

/// Where the bow and target sit, in the same coordinate space as input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub bow_center: DVec2,
    pub target_center: DVec2,
}

/// Everything known about one fired arrow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotRecord {
    pub shot: Shot,
    pub outcome: Outcome,
}

pub struct GameSession {
    config: GameConfig,
    layout: Layout,
    state: GameState,
    gesture: Option<Gesture>,
    history: Vec<ShotRecord>,
    inbox: VecDeque<InputEvent>,
}

impl GameSession {
    pub fn new(config: GameConfig, layout: Layout) -> Self {
        let state = GameState::fresh(config.shots_per_game);
        Self {
            config,
            layout,
            state,
            gesture: None,
            history: Vec::new(),
            inbox: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Arrows fired this round, oldest first.
    pub fn history(&self) -> &[ShotRecord] {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        if !self.state.active {
            Phase::Ended
        } else if self.gesture.is_some() {
            Phase::Dragging
        } else {
            Phase::Ready
        }
    }

    /// True when `point` is close enough to the bow to start a draw.
    pub fn grabs_bow(&self, point: DVec2) -> bool {
        point.distance(self.layout.bow_center) <= self.config.bow_hit_radius
    }

    /// Queue an event for the next `drain`.
    pub fn push(&mut self, event: InputEvent) {
        self.inbox.push_back(event);
    }

    /// Apply every queued event in arrival order.
    pub fn drain(&mut self) -> Vec<RenderEvent> {
        let mut out = Vec::new();
        while let Some(event) = self.inbox.pop_front() {
            self.apply(event, &mut out);
        }
        out
    }

    pub fn handle(&mut self, event: InputEvent) -> Vec<RenderEvent> {
        let mut out = Vec::new();
        self.apply(event, &mut out);
        out
    }

    fn apply(&mut self, event: InputEvent, out: &mut Vec<RenderEvent>) {
        match event {
            InputEvent::GestureStart(p) => self.start_gesture(p, out),
            InputEvent::GestureMove(p) => self.move_gesture(p, out),
            InputEvent::GestureEnd(p) => self.end_gesture(p, out),
            InputEvent::Reset => self.reset(out),
        }
    }

    fn start_gesture(&mut self, origin: DVec2, out: &mut Vec<RenderEvent>) {
        if !self.state.active || self.state.shots_remaining == 0 {
            return;
        }
        self.gesture = Some(Gesture::begin(origin));
        out.push(RenderEvent::GestureStarted);
    }

    fn move_gesture(&mut self, point: DVec2, out: &mut Vec<RenderEvent>) {
        if !self.state.active {
            return;
        }
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        gesture.track(point);
        out.push(RenderEvent::PullChanged(PullFeedback::from_gesture(
            gesture,
            self.config.max_stretch,
        )));
    }

    fn end_gesture(&mut self, point: Option<DVec2>, out: &mut Vec<RenderEvent>) {
        if !self.state.active {
            return;
        }
        let Some(mut gesture) = self.gesture.take() else {
            return;
        };
        gesture.track(point.unwrap_or(gesture.origin));
        out.push(RenderEvent::GestureCleared);

        let cfg = &self.config;
        let Some(shot) = Shot::from_pull(
            gesture.pull(),
            self.layout.bow_center,
            cfg.max_stretch,
            cfg.min_power,
            cfg.distance_scale,
        ) else {
            debug!("draw released at power {:.2}, no shot", gesture.power(cfg.max_stretch));
            return;
        };
        self.fire(shot, out);
    }

    fn fire(&mut self, shot: Shot, out: &mut Vec<RenderEvent>) {
        self.state.shots_remaining = self.state.shots_remaining.saturating_sub(1);
        out.push(RenderEvent::ShotFired {
            launch: shot.launch,
            landing: shot.landing,
            angle: shot.angle,
            power: shot.power,
            flight_ms: shot.flight_ms(),
        });

        let outcome = score_landing(&self.config.rings, shot.landing, self.layout.target_center);
        self.state.score += outcome.points();
        debug!(
            "shot power {:.2} angle {:.2} landed ({:.1}, {:.1}): {:?}",
            shot.power, shot.angle, shot.landing.x, shot.landing.y, outcome
        );
        self.history.push(ShotRecord { shot, outcome });
        out.push(RenderEvent::Resolved(outcome));
        out.push(self.scoreboard());

        if self.state.shots_remaining == 0 {
            self.state.active = false;
            info!("round over, final score {}", self.state.score);
            out.push(RenderEvent::GameOver { final_score: self.state.score });
        }
    }

    fn reset(&mut self, out: &mut Vec<RenderEvent>) {
        if self.state.active && !self.config.reset_anytime {
            return;
        }
        self.state = GameState::fresh(self.config.shots_per_game);
        self.gesture = None;
        self.history.clear();
        info!("new round, {} arrows", self.state.shots_remaining);
        out.push(RenderEvent::GameReset);
        out.push(RenderEvent::GestureCleared);
        out.push(self.scoreboard());
    }

    pub fn scoreboard(&self) -> RenderEvent {
        RenderEvent::Scoreboard {
            score: self.state.score,
            shots: self.state.shots_remaining,
        }
    }
}
