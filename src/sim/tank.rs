//! Per-side tank state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;
use crate::clamp;
use crate::tuning::Tuning;

/// The two fixed combatants. A spawns on the left, B on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }

    /// Which way this side's barrel points at zero tilt
    #[inline]
    pub fn facing(self) -> Facing {
        match self {
            Side::A => Facing::Right,
            Side::B => Facing::Left,
        }
    }
}

/// Horizontal firing direction, used as a ±1 sign in the ballistic formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Right,
    Left,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

/// Horizontal drive request for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveDir {
    Left,
    Right,
    #[default]
    None,
}

impl MoveDir {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            MoveDir::Left => -1.0,
            MoveDir::Right => 1.0,
            MoveDir::None => 0.0,
        }
    }
}

/// A combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    pub side: Side,
    pub facing: Facing,
    /// Centre of the hull
    pub pos: Vec2,
    pub hp: i32,
    /// Barrel elevation relative to the hull, 0..=180 degrees
    pub angle_deg: f32,
    /// 0..=100
    pub power: f32,
    /// Collision radius
    pub radius: f32,
    pub max_move: f32,
    pub move_remaining: f32,
    /// Hull rotation from the ground slope (radians)
    pub tilt: f32,
}

impl Tank {
    pub const MAX_HP: i32 = 100;

    /// Spawn at world column `x`, resting on `terrain`
    pub fn spawn(side: Side, x: f32, terrain: &Terrain, tuning: &Tuning) -> Self {
        let mut tank = Self {
            side,
            facing: side.facing(),
            pos: Vec2::new(x, 0.0),
            hp: Self::MAX_HP,
            angle_deg: tuning.start_angle,
            power: tuning.start_power,
            radius: tuning.tank_radius,
            max_move: tuning.max_move,
            move_remaining: tuning.max_move,
            tilt: 0.0,
        };
        tank.settle(terrain, tuning);
        tank
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Snap onto the surface and recompute the hull tilt
    pub fn settle(&mut self, terrain: &Terrain, tuning: &Tuning) {
        self.pos.y = terrain.height_at(self.pos.x) as f32 - tuning.tank_vertical_offset;
        self.tilt = terrain.tilt_at(self.pos.x, tuning.tilt_probe);
    }

    /// Nudge the barrel; `axis` is clamped to [-1, 1] and scaled by the tick rate
    pub fn adjust_angle(&mut self, axis: f32, rate: f32) {
        if axis != 0.0 {
            self.angle_deg = clamp(self.angle_deg + axis.clamp(-1.0, 1.0) * rate, 0.0, 180.0);
        }
    }

    /// Nudge the power; `axis` is clamped to [-1, 1] and scaled by the tick rate
    pub fn adjust_power(&mut self, axis: f32, rate: f32) {
        if axis != 0.0 {
            self.power = clamp(self.power + axis.clamp(-1.0, 1.0) * rate, 0.0, 100.0);
        }
    }

    /// Drive up to `step` units, spending the turn budget
    ///
    /// Returns true if the tank moved (and was resettled).
    pub fn drive(&mut self, dir: MoveDir, step: f32, terrain: &Terrain, tuning: &Tuning) -> bool {
        if dir == MoveDir::None || self.move_remaining <= 0.0 || step <= 0.0 {
            return false;
        }
        let d = step.min(self.move_remaining);
        self.move_remaining -= d;

        let width = terrain.width() as f32;
        self.pos.x = clamp(
            self.pos.x + dir.sign() * d,
            tuning.edge_margin,
            width - tuning.edge_margin,
        );
        self.settle(terrain, tuning);
        true
    }

    /// Apply damage, keeping hp in 0..=MAX_HP. Returns (before, after).
    pub fn take_damage(&mut self, dmg: i32) -> (i32, i32) {
        let before = self.hp;
        self.hp = (self.hp - dmg).clamp(0, Self::MAX_HP);
        (before, self.hp)
    }

    /// Launch angle after the hull tilt is folded in (radians)
    ///
    /// A positive tilt tips the right side down, which lowers a right-facing
    /// barrel and raises a left-facing one.
    #[inline]
    pub fn effective_angle(&self) -> f32 {
        self.angle_deg.to_radians() - self.facing.sign() * self.tilt
    }

    /// Input angle (degrees) that produces the given effective launch angle
    #[inline]
    pub fn input_angle_for(&self, effective: f32) -> f32 {
        (effective + self.facing.sign() * self.tilt).to_degrees()
    }

    /// Unit vector along the barrel in world space
    #[inline]
    pub fn barrel_dir(&self) -> Vec2 {
        let eff = self.effective_angle();
        Vec2::new(eff.cos() * self.facing.sign(), -eff.sin())
    }

    /// World position of the barrel tip, where shells spawn
    pub fn muzzle(&self, tuning: &Tuning) -> Vec2 {
        let pivot = self.pos
            + Vec2::new(self.tilt.sin(), -self.tilt.cos()) * tuning.pivot_offset;
        pivot + self.barrel_dir() * tuning.barrel_length
    }

    /// Initial shell velocity for the current angle and power
    #[inline]
    pub fn launch_velocity(&self, tuning: &Tuning) -> Vec2 {
        self.barrel_dir() * tuning.speed_for_power(self.power)
    }

    /// Reset the movement gauge at the start of this side's turn
    #[inline]
    pub fn refuel(&mut self) {
        self.move_remaining = self.max_move;
    }
}
