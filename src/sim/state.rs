//! Match state and core simulation types
//!
//! One [`MatchState`] owns everything a match mutates: terrain, both tanks,
//! the live shell, the turn/phase machine, pending AI tasks and airstrikes.
//! Presentation code reads it and drains [`MatchState::events`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::airstrike::{Bomb, Bomber};
use super::projectile::Projectile;
use super::schedule::Scheduler;
use super::tank::{Side, Tank};
use super::terrain::Terrain;
use crate::secs_to_ticks;
use crate::tuning::Tuning;

/// Turn phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Active side adjusts aim, drives, and may fire
    Aiming,
    /// A shell is in flight
    Fired,
    /// An explosion happened; tanks settle next tick
    Resolve,
    /// Check for a winner, otherwise hand the turn over
    TurnEnd,
    /// Match decided; only a restart leaves this phase
    GameOver,
}

/// Who controls side B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Side B is computer-controlled
    #[default]
    Single,
    /// Both sides are human
    Double,
}

/// Outbound notifications for presentation (sounds, shakes, damage bars)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    Fired { side: Side, origin: Vec2, velocity: Vec2 },
    Exploded { pos: Vec2, direct: bool, small: bool },
    Damaged { side: Side, before: i32, after: i32 },
    /// Shell left the world without exploding
    ProjectileLost { pos: Vec2 },
    TurnStarted { side: Side, wind: f32 },
    GameOver { winner: Side },
    BomberSpawned { from_left: bool },
    BombDropped { pos: Vec2 },
    Restarted,
    ModeChanged { mode: GameMode },
}

/// Complete match state
#[derive(Debug, Clone, Serialize)]
pub struct MatchState {
    /// Seed the match generator started from
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub terrain: Terrain,
    /// Indexed by [`Side::index`]
    pub tanks: [Tank; 2],
    /// Present only while the phase is [`Phase::Fired`]
    pub projectile: Option<Projectile>,
    pub current_turn: Side,
    pub wind: f32,
    pub phase: Phase,
    pub mode: GameMode,
    pub winner: Option<Side>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Matches played with this state, counting the current one
    pub match_number: u32,
    /// The active side is being driven by the solver this turn
    pub ai_acting: bool,
    /// Bumped on turn change, mode switch and restart; stale AI tasks compare unequal
    pub ai_epoch: u32,
    pub scheduler: Scheduler,
    pub bombers: Vec<Bomber>,
    pub bombs: Vec<Bomb>,
    pub next_airstrike_tick: u64,
    #[serde(skip)]
    pub events: Vec<MatchEvent>,
}

impl MatchState {
    /// Start a match on procedurally generated terrain
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = Terrain::generate(&tuning, &mut rng);
        Self::build(seed, rng, tuning, terrain)
    }

    /// Start a match on the given terrain
    pub fn with_terrain(seed: u64, tuning: Tuning, terrain: Terrain) -> Self {
        Self::build(seed, Pcg32::seed_from_u64(seed), tuning, terrain)
    }

    fn build(seed: u64, rng: Pcg32, tuning: Tuning, terrain: Terrain) -> Self {
        let tanks = spawn_tanks(&terrain, &tuning);
        let mut state = Self {
            seed,
            rng,
            terrain,
            tanks,
            projectile: None,
            current_turn: Side::A,
            wind: 0.0,
            phase: Phase::Aiming,
            mode: GameMode::default(),
            winner: None,
            time_ticks: 0,
            match_number: 1,
            ai_acting: false,
            ai_epoch: 0,
            scheduler: Scheduler::new(),
            bombers: Vec::new(),
            bombs: Vec::new(),
            next_airstrike_tick: secs_to_ticks(tuning.airstrike_period),
            events: Vec::new(),
            tuning,
        };
        state.resample_wind();
        log::info!(
            "Match started: seed={} width={} wind={}",
            seed,
            state.terrain.width(),
            state.wind
        );
        state
    }

    /// Replace terrain and tanks and return to A's first turn
    ///
    /// The generator keeps running, so the sequence of matches is reproducible
    /// from the starting seed.
    pub(crate) fn rebuild(&mut self) {
        self.terrain = Terrain::generate(&self.tuning, &mut self.rng);
        self.tanks = spawn_tanks(&self.terrain, &self.tuning);
        self.projectile = None;
        self.current_turn = Side::A;
        self.phase = Phase::Aiming;
        self.winner = None;
        self.ai_acting = false;
        self.ai_epoch = self.ai_epoch.wrapping_add(1);
        self.scheduler.clear();
        self.bombers.clear();
        self.bombs.clear();
        self.next_airstrike_tick = self.time_ticks + secs_to_ticks(self.tuning.airstrike_period);
        self.match_number += 1;
        self.resample_wind();
    }

    #[inline]
    pub fn tank(&self, side: Side) -> &Tank {
        &self.tanks[side.index()]
    }

    #[inline]
    pub fn tank_mut(&mut self, side: Side) -> &mut Tank {
        &mut self.tanks[side.index()]
    }

    /// Whether the solver (not a human) plays `side`
    #[inline]
    pub fn is_ai_side(&self, side: Side) -> bool {
        self.mode == GameMode::Single && side == Side::B
    }

    /// Draw a new wind from the configured range
    ///
    /// The bounds are taken in either order, so an unvalidated `Tuning` cannot
    /// hand the generator an empty range.
    pub fn resample_wind(&mut self) {
        let (a, b) = (self.tuning.wind_min, self.tuning.wind_max);
        self.wind = self.rng.random_range(a.min(b)..=a.max(b)) as f32;
    }

    /// Put both tanks back on the surface
    pub fn settle_tanks(&mut self) {
        for tank in &mut self.tanks {
            tank.settle(&self.terrain, &self.tuning);
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub(crate) fn emit(&mut self, event: MatchEvent) {
        self.events.push(event);
    }
}

fn spawn_tanks(terrain: &Terrain, tuning: &Tuning) -> [Tank; 2] {
    let width = terrain.width() as f32;
    [
        Tank::spawn(Side::A, tuning.tank_anchor, terrain, tuning),
        Tank::spawn(Side::B, width - tuning.tank_anchor, terrain, tuning),
    ]
}
