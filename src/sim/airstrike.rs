//! Bombers that cross the sky and drop bombs outside the turn cycle
//!
//! Bomb blasts reuse the shell crater but deal token damage, settle the tanks
//! on the spot and never touch the phase.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{MatchEvent, MatchState, Phase};
use crate::secs_to_ticks;

/// Bombers spawn this far outside the world and despawn this far past the far edge
const SPAWN_OFFSET: f32 = 80.0;
const DESPAWN_OFFSET: f32 = 120.0;
/// Drop columns stay this far from either edge
const DROP_MARGIN: f32 = 200.0;
/// Bombs leave this far below the bomber
const BAY_OFFSET: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bomber {
    pub pos: Vec2,
    /// Signed horizontal speed
    pub vx: f32,
    /// Column the bomb is released over
    pub drop_x: f32,
    pub dropped: bool,
}

impl Bomber {
    fn passed_drop_point(&self) -> bool {
        if self.vx > 0.0 {
            self.pos.x >= self.drop_x
        } else {
            self.pos.x <= self.drop_x
        }
    }

    fn gone(&self, width: f32) -> bool {
        (self.vx > 0.0 && self.pos.x > width + DESPAWN_OFFSET)
            || (self.vx < 0.0 && self.pos.x < -DESPAWN_OFFSET)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec2,
    pub vy: f32,
}

/// Spawn a bomber with a random heading, altitude, speed and drop column
pub fn spawn_bomber(state: &mut MatchState) {
    let width = state.terrain.width() as f32;
    let rng = &mut state.rng;

    let from_left = rng.random::<f32>() > 0.5;
    let altitude = 30.0 + rng.random::<f32>() * 60.0;
    let speed = 280.0 + rng.random::<f32>() * 120.0;
    let span = (width - 2.0 * DROP_MARGIN).max(0.0);
    let drop_x = DROP_MARGIN.min(width) + rng.random::<f32>() * span;

    let bomber = if from_left {
        Bomber {
            pos: Vec2::new(-SPAWN_OFFSET, altitude),
            vx: speed,
            drop_x,
            dropped: false,
        }
    } else {
        Bomber {
            pos: Vec2::new(width + SPAWN_OFFSET, altitude),
            vx: -speed,
            drop_x,
            dropped: false,
        }
    };
    log::debug!("Bomber inbound from the {}", if from_left { "left" } else { "right" });
    state.bombers.push(bomber);
    state.emit(MatchEvent::BomberSpawned { from_left });
}

/// Advance bombers and bombs by one tick
pub fn update(state: &mut MatchState, dt: f32) {
    if !state.tuning.airstrikes || state.phase == Phase::GameOver {
        return;
    }

    if state.time_ticks >= state.next_airstrike_tick {
        spawn_bomber(state);
        state.next_airstrike_tick += secs_to_ticks(state.tuning.airstrike_period).max(1);
    }

    let width = state.terrain.width() as f32;
    let mut released = Vec::new();
    for bomber in &mut state.bombers {
        bomber.pos.x += bomber.vx * dt;
        if !bomber.dropped && bomber.passed_drop_point() {
            bomber.dropped = true;
            released.push(Bomb {
                pos: Vec2::new(bomber.drop_x, bomber.pos.y + BAY_OFFSET),
                vy: 0.0,
            });
        }
    }
    state.bombers.retain(|b| !b.gone(width));
    for bomb in released {
        log::debug!("Bomb away at x={:.0}", bomb.pos.x);
        state.emit(MatchEvent::BombDropped { pos: bomb.pos });
        state.bombs.push(bomb);
    }

    let gravity = state.tuning.bomb_gravity;
    let mut impacts = Vec::new();
    let terrain = &state.terrain;
    state.bombs.retain_mut(|bomb| {
        bomb.vy += gravity * dt;
        bomb.pos.y += bomb.vy * dt;
        let ground = terrain.height_at(bomb.pos.x) as f32;
        if bomb.pos.y >= ground {
            impacts.push(Vec2::new(bomb.pos.x, ground));
            false
        } else {
            true
        }
    });

    for at in impacts {
        small_explode(state, at);
    }
}

/// Bomb blast: same crater as a shell, damage capped at `bomb_damage`
///
/// Tanks settle immediately since this is not tied to a turn.
pub fn small_explode(state: &mut MatchState, at: Vec2) {
    let radius = state.tuning.blast_radius;
    state
        .terrain
        .crater(at.x, radius, state.tuning.crater_depth_scale);

    let peak = state.tuning.bomb_damage;
    let mut hits = Vec::new();
    for tank in &mut state.tanks {
        let d = tank.pos.distance(at);
        if d > radius {
            continue;
        }
        let dmg = (peak * (1.0 - d / radius)).round() as i32;
        if dmg > 0 {
            let (before, after) = tank.take_damage(dmg);
            hits.push((tank.side, before, after));
        }
    }

    state.emit(MatchEvent::Exploded {
        pos: at,
        direct: false,
        small: true,
    });
    for (side, before, after) in hits {
        state.emit(MatchEvent::Damaged { side, before, after });
    }
    state.settle_tanks();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tank::Side;
    use crate::sim::terrain::Terrain;
    use crate::tuning::Tuning;

    fn calm_state() -> MatchState {
        let tuning = Tuning::default();
        let terrain = Terrain::flat(tuning.world_width, 520, tuning.crater_floor);
        MatchState::with_terrain(3, tuning, terrain)
    }

    #[test]
    fn test_small_explode_token_damage_and_settle() {
        let mut state = calm_state();
        let a = state.tank(Side::A).pos;
        state.phase = Phase::Aiming;

        small_explode(&mut state, Vec2::new(a.x, a.y + 8.0));

        let tank = state.tank(Side::A);
        assert_eq!(tank.hp, 99);
        // Tank sank into the fresh crater
        assert_eq!(tank.pos.y, state.terrain.height_at(a.x) as f32 - 18.0);
        assert!(tank.pos.y > a.y);
        assert_eq!(state.phase, Phase::Aiming);
        assert_eq!(state.tank(Side::B).hp, 100);
    }

    #[test]
    fn test_small_explode_edge_of_blast_is_harmless() {
        let mut state = calm_state();
        let a = state.tank(Side::A).pos;
        // 30 units away: round(1 - 30/35) = 0
        small_explode(&mut state, Vec2::new(a.x + 30.0, a.y));
        assert_eq!(state.tank(Side::A).hp, 100);
    }

    #[test]
    fn test_bomber_drops_and_bomb_lands() {
        let mut state = calm_state();
        state.bombers.push(Bomber {
            pos: Vec2::new(998.0, 60.0),
            vx: 300.0,
            drop_x: 1000.0,
            dropped: false,
        });
        state.next_airstrike_tick = u64::MAX;

        let dt = crate::consts::SIM_DT;
        update(&mut state, dt);
        assert_eq!(state.bombs.len(), 1);
        assert!(state.bombers[0].dropped);

        for _ in 0..300 {
            update(&mut state, dt);
        }
        assert!(state.bombs.is_empty());
        assert!(state.terrain.height_at(1000.0) > 520);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, MatchEvent::BombDropped { .. })));
        assert!(events.iter().any(|e| matches!(e, MatchEvent::Exploded { small: true, .. })));
    }

    #[test]
    fn test_bombers_spawn_on_schedule_and_leave() {
        let mut state = calm_state();
        let period = secs_to_ticks(state.tuning.airstrike_period);
        for _ in 0..period {
            state.time_ticks += 1;
            update(&mut state, crate::consts::SIM_DT);
        }
        assert_eq!(state.bombers.len(), 1);
        let drop_x = state.bombers[0].drop_x;
        assert!((200.0..=1800.0).contains(&drop_x));

        // Long enough to cross the whole world at minimum speed
        state.next_airstrike_tick = u64::MAX;
        for _ in 0..520 {
            state.time_ticks += 1;
            update(&mut state, crate::consts::SIM_DT);
        }
        assert!(state.bombers.is_empty());
    }

    #[test]
    fn test_disabled_airstrikes() {
        let mut state = calm_state();
        state.tuning.airstrikes = false;
        state.time_ticks = 10_000;
        update(&mut state, crate::consts::SIM_DT);
        assert!(state.bombers.is_empty());
    }
}
