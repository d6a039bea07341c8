//! Fixed timestep simulation tick
//!
//! Core turn loop that advances the match deterministically. Each tick makes
//! at most one phase transition out of Fired, Resolve or TurnEnd, so damage
//! and turn swaps can never be applied twice.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aim;
use super::airstrike;
use super::projectile::Projectile;
use super::schedule::TaskAction;
use super::state::{GameMode, MatchEvent, MatchState, Phase};
use super::tank::{MoveDir, Side};
use crate::secs_to_ticks;
use crate::tuning::Tuning;

/// Intents for a single tick (deterministic)
///
/// Aim and move fields apply to the active tank only while it is human
/// controlled and the phase is [`Phase::Aiming`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Barrel axis in [-1, 1]; positive raises the angle
    pub angle_delta: f32,
    /// Power axis in [-1, 1]; positive adds power
    pub power_delta: f32,
    pub move_dir: MoveDir,
    /// Fire the active tank (one-shot)
    pub fire: bool,
    /// Rebuild the match (one-shot)
    pub restart: bool,
    /// Switch who controls side B (one-shot)
    pub set_mode: Option<GameMode>,
    /// Demo mode - the solver plays whichever side is active
    pub autopilot: bool,
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    if input.restart {
        restart(state);
        return;
    }
    if let Some(mode) = input.set_mode {
        set_mode(state, mode);
    }

    if state.phase == Phase::GameOver {
        return;
    }

    state.time_ticks += 1;

    run_due_tasks(state);

    if state.phase == Phase::Aiming {
        apply_intents(state, input, dt);
    }

    airstrike::update(state, dt);

    match state.phase {
        Phase::Fired => advance_projectile(state, dt),
        Phase::Resolve => {
            state.settle_tanks();
            state.phase = Phase::TurnEnd;
        }
        Phase::TurnEnd => end_turn(state),
        Phase::Aiming | Phase::GameOver => {}
    }
}

/// Human aiming/driving, or hand the turn to the solver
fn apply_intents(state: &mut MatchState, input: &TickInput, dt: f32) {
    let side = state.current_turn;

    if input.autopilot || state.is_ai_side(side) {
        if !state.ai_acting {
            let delay = state.tuning.ai_think_delay;
            begin_ai_turn(state, side, delay);
        }
        return;
    }

    let tuning = &state.tuning;
    let tank = &mut state.tanks[side.index()];
    tank.adjust_angle(input.angle_delta, tuning.angle_rate);
    tank.adjust_power(input.power_delta, tuning.power_rate);
    tank.drive(input.move_dir, tuning.move_speed * dt, &state.terrain, tuning);

    if input.fire && !state.ai_acting {
        fire(state, side);
    }
}

/// Mark the turn as AI-driven and schedule its aim after `delay_secs`
fn begin_ai_turn(state: &mut MatchState, side: Side, delay_secs: f32) {
    state.ai_acting = true;
    let due = state.time_ticks + secs_to_ticks(delay_secs);
    state
        .scheduler
        .schedule(due, TaskAction::AiAim { side }, state.ai_epoch);
}

/// Run every due task whose guard still holds
fn run_due_tasks(state: &mut MatchState) {
    for task in state.scheduler.drain_due(state.time_ticks) {
        let side = match task.action {
            TaskAction::AiAim { side } | TaskAction::AiFire { side } => side,
        };
        let live = task.epoch == state.ai_epoch
            && state.ai_acting
            && state.phase == Phase::Aiming
            && state.current_turn == side;
        if !live {
            log::debug!("Dropped stale AI task {:?}", task.action);
            continue;
        }

        match task.action {
            TaskAction::AiAim { side } => {
                let target = side.other();
                let shot = aim::solve(
                    &state.tanks[side.index()],
                    &state.tanks[target.index()],
                    state.wind,
                    &state.tuning,
                    &mut state.rng,
                );
                log::debug!(
                    "AI {:?} aims {:.1}° power {:.1} (speed {:.0}){}",
                    side,
                    shot.angle_deg,
                    shot.power,
                    shot.speed,
                    if shot.fallback { " (fallback)" } else { "" }
                );
                let tank = state.tank_mut(side);
                tank.angle_deg = shot.angle_deg;
                tank.power = shot.power;

                let due = state.time_ticks + secs_to_ticks(state.tuning.ai_fire_delay);
                state
                    .scheduler
                    .schedule(due, TaskAction::AiFire { side }, task.epoch);
            }
            TaskAction::AiFire { side } => {
                fire(state, side);
            }
        }
    }
}

/// Launch a shell from `side`'s barrel tip
///
/// Ignored unless the phase is Aiming and it is `side`'s turn. Returns
/// whether a shell was fired.
pub fn fire(state: &mut MatchState, side: Side) -> bool {
    if state.phase != Phase::Aiming || state.current_turn != side {
        log::debug!("Ignored fire from {:?} during {:?}", side, state.phase);
        return false;
    }

    let tank = state.tank(side);
    let origin = tank.muzzle(&state.tuning);
    let velocity = tank.launch_velocity(&state.tuning);
    log::debug!(
        "{:?} fires: angle {:.1}° power {:.1} from ({:.0}, {:.0})",
        side,
        tank.angle_deg,
        tank.power,
        origin.x,
        origin.y
    );

    state.projectile = Some(Projectile::new(origin, velocity));
    state.phase = Phase::Fired;
    state.emit(MatchEvent::Fired {
        side,
        origin,
        velocity,
    });
    true
}

/// One integration step, then the boundary, defending tank and terrain checks in that order
fn advance_projectile(state: &mut MatchState, dt: f32) {
    let Some(mut shell) = state.projectile else {
        state.phase = Phase::TurnEnd;
        return;
    };
    shell.step(dt, state.tuning.gravity, state.wind);
    state.projectile = Some(shell);
    log::trace!("shell at ({:.1}, {:.1})", shell.pos.x, shell.pos.y);

    let tuning = &state.tuning;
    let width = state.terrain.width() as f32;
    if shell.out_of_bounds(width, tuning.bounds_margin, tuning.world_height + tuning.lost_depth) {
        log::debug!("Shell lost at ({:.0}, {:.0})", shell.pos.x, shell.pos.y);
        state.projectile = None;
        state.phase = Phase::TurnEnd;
        state.emit(MatchEvent::ProjectileLost { pos: shell.pos });
        return;
    }

    // Tank before terrain: a shell inside the hit reach is a direct hit even below ground
    let defender = state.tank(state.current_turn.other());
    if shell.hit_tank(defender, tuning.hit_pad) {
        explode(state, shell.pos, true);
    } else if shell.hit_terrain(&state.terrain) {
        let ground = state.terrain.height_at(shell.pos.x) as f32;
        explode(state, Vec2::new(shell.pos.x, ground), false);
    }
}

/// Damage a tank `distance` away from a shell blast takes
pub fn blast_damage(distance: f32, direct: bool, tuning: &Tuning) -> i32 {
    if direct && distance <= tuning.direct_hit_radius {
        tuning.max_damage.round() as i32
    } else if distance <= tuning.blast_radius {
        (tuning.max_damage * (1.0 - distance / tuning.blast_radius)).round() as i32
    } else {
        0
    }
}

/// Shell explosion: crater, damage both tanks, move to Resolve
pub fn explode(state: &mut MatchState, at: Vec2, direct: bool) {
    let radius = state.tuning.blast_radius;
    state
        .terrain
        .crater(at.x, radius, state.tuning.crater_depth_scale);
    log::debug!(
        "Explosion at ({:.0}, {:.0}){}",
        at.x,
        at.y,
        if direct { " - direct hit" } else { "" }
    );
    state.emit(MatchEvent::Exploded {
        pos: at,
        direct,
        small: false,
    });

    for side in Side::BOTH {
        let d = state.tank(side).pos.distance(at);
        let dmg = blast_damage(d, direct, &state.tuning);
        if dmg > 0 {
            let (before, after) = state.tank_mut(side).take_damage(dmg);
            log::debug!("{:?} takes {} damage ({} -> {})", side, dmg, before, after);
            state.emit(MatchEvent::Damaged {
                side,
                before,
                after,
            });
        }
    }

    state.projectile = None;
    state.phase = Phase::Resolve;
}

/// Decide the match or pass the turn
fn end_turn(state: &mut MatchState) {
    state.projectile = None;
    state.ai_acting = false;
    state.ai_epoch = state.ai_epoch.wrapping_add(1);

    let a_dead = state.tank(Side::A).is_dead();
    let b_dead = state.tank(Side::B).is_dead();
    if a_dead || b_dead {
        // Mutual kill goes to the side that was shot at
        let winner = match (a_dead, b_dead) {
            (true, false) => Side::B,
            (false, true) => Side::A,
            _ => state.current_turn.other(),
        };
        state.winner = Some(winner);
        state.phase = Phase::GameOver;
        state.scheduler.clear();
        log::info!("Game over: {:?} wins", winner);
        state.emit(MatchEvent::GameOver { winner });
        return;
    }

    state.current_turn = state.current_turn.other();
    state.resample_wind();
    state.phase = Phase::Aiming;
    let side = state.current_turn;
    state.tank_mut(side).refuel();
    log::debug!("Turn {:?}, wind {}", side, state.wind);
    state.emit(MatchEvent::TurnStarted {
        side,
        wind: state.wind,
    });
}

/// New terrain, fresh tanks, A to move
pub fn restart(state: &mut MatchState) {
    state.rebuild();
    log::info!("Match restarted (match #{})", state.match_number);
    state.emit(MatchEvent::Restarted);
    state.emit(MatchEvent::TurnStarted {
        side: state.current_turn,
        wind: state.wind,
    });
}

/// Choose who controls side B
///
/// Any pending AI action is invalidated. Taking over B mid-turn starts the
/// solver after the shorter takeover delay.
pub fn set_mode(state: &mut MatchState, mode: GameMode) {
    if state.mode == mode {
        return;
    }
    state.mode = mode;
    state.ai_acting = false;
    state.ai_epoch = state.ai_epoch.wrapping_add(1);
    log::info!("Mode set to {:?}", mode);
    state.emit(MatchEvent::ModeChanged { mode });

    let side = state.current_turn;
    if state.phase == Phase::Aiming && state.is_ai_side(side) {
        let delay = state.tuning.ai_takeover_delay;
        begin_ai_turn(state, side, delay);
    }
}
