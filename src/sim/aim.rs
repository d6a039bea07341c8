//! Analytic aiming for the computer-controlled side
//!
//! Picks a launch angle from a distance band, then inverts the ballistic
//! range equation for the launch speed:
//!
//! ```text
//! v² = g·dx² / (2·cos²θ·(dy + dx·tanθ))
//! ```
//!
//! with screen-down Y, signed `cos θ` (facing folded in) and `dx, dy` measured
//! from the barrel tip to the target centre. Wind gets one first-order
//! correction using the zero-wind flight time; strong wind can make that
//! correction drift, which is accepted.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tank::{Facing, Tank};
use crate::tuning::Tuning;

/// Input angles the solver is allowed to write back
pub const MIN_INPUT_ANGLE: f32 = 5.0;
pub const MAX_INPUT_ANGLE: f32 = 175.0;

/// Horizontal distance thresholds for the launch angle bands
pub const NEAR_RANGE: f32 = 400.0;
pub const MID_RANGE: f32 = 900.0;

/// A shot chosen by the solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimSolution {
    /// Input angle to write to the shooter (degrees)
    pub angle_deg: f32,
    /// Power to write to the shooter, already clamped
    pub power: f32,
    /// Launch speed before the power clamp
    pub speed: f32,
    /// True when the range equation had no solution and a heuristic was used
    pub fallback: bool,
}

/// Desired effective launch angle (degrees) for a horizontal distance
pub fn pick_launch_angle(distance: f32, rng: &mut impl Rng) -> f32 {
    let (lo, span) = if distance < NEAR_RANGE {
        (55.0, 10.0)
    } else if distance < MID_RANGE {
        (40.0, 10.0)
    } else {
        (30.0, 8.0)
    };
    lo + rng.random::<f32>() * span
}

/// Launch speed that carries a shell from `origin` to `target`
///
/// `theta` is the effective launch angle in radians. Returns `None` when the
/// geometry has no real solution (non-positive denominator, vertical shot).
pub fn solve_speed(
    origin: Vec2,
    target: Vec2,
    theta: f32,
    facing: Facing,
    gravity: f32,
    wind: f32,
) -> Option<f32> {
    let dx = target.x - origin.x;
    let dy = target.y - origin.y;
    let cos_t = theta.cos() * facing.sign();
    let sin_t = theta.sin();
    if cos_t.abs() < 1e-4 {
        return None;
    }

    let numerator = gravity * dx * dx;
    let denominator = 2.0 * cos_t * cos_t * (dy + dx * (sin_t / cos_t));
    if denominator <= 0.0 {
        return None;
    }

    let v0 = (numerator / denominator).sqrt();
    let t0 = (dx / (v0 * cos_t)).abs();
    if !t0.is_finite() || t0 <= 0.0 {
        return None;
    }

    // Horizontal travel under wind: dx = vx·t + ½·wind·t²
    let required_vx = dx / t0 - 0.5 * wind * t0;
    let speed = required_vx / cos_t;
    speed.is_finite().then_some(speed)
}

/// Choose angle and power for `shooter` to hit `target`
///
/// Pure apart from the random draws; nothing is written back to the tanks.
pub fn solve(
    shooter: &Tank,
    target: &Tank,
    wind: f32,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> AimSolution {
    let distance = (target.pos.x - shooter.pos.x).abs();
    let desired = pick_launch_angle(distance, rng).to_radians();

    let angle_deg = shooter
        .input_angle_for(desired)
        .clamp(MIN_INPUT_ANGLE, MAX_INPUT_ANGLE);

    // Aim from where the shell will actually spawn
    let mut aimed = shooter.clone();
    aimed.angle_deg = angle_deg;
    let theta = aimed.effective_angle();
    let origin = aimed.muzzle(tuning);

    let solved = solve_speed(origin, target.pos, theta, shooter.facing, tuning.gravity, wind);
    let fallback = solved.is_none();
    let speed = solved.unwrap_or_else(|| (distance * tuning.gravity).sqrt());

    let jitter = tuning.ai_speed_jitter;
    let speed = speed * (1.0 - jitter + rng.random::<f32>() * 2.0 * jitter);

    let power = tuning
        .power_for_speed(speed)
        .clamp(tuning.ai_min_power.min(100.0), 100.0);

    AimSolution {
        angle_deg,
        power,
        speed,
        fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::Projectile;
    use crate::sim::tank::Side;
    use crate::sim::terrain::Terrain;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn duel(ax: f32, bx: f32) -> (Terrain, Tuning, Tank, Tank) {
        let tuning = Tuning::default();
        let terrain = Terrain::flat(2000, 520, tuning.crater_floor);
        let a = Tank::spawn(Side::A, ax, &terrain, &tuning);
        let b = Tank::spawn(Side::B, bx, &terrain, &tuning);
        (terrain, tuning, a, b)
    }

    /// Fly a shell from `shooter` until it reaches `target` or the ground
    fn lands_on(shooter: &Tank, target: &Tank, wind: f32, terrain: &Terrain, tuning: &Tuning) -> bool {
        let mut shell = Projectile::new(shooter.muzzle(tuning), shooter.launch_velocity(tuning));
        for _ in 0..10_000 {
            shell.step(crate::consts::SIM_DT, tuning.gravity, wind);
            if shell.hit_tank(target, tuning.hit_pad) {
                return true;
            }
            if shell.hit_terrain(terrain) {
                return false;
            }
        }
        false
    }

    #[test]
    fn test_angle_bands() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            let near = pick_launch_angle(250.0, &mut rng);
            let mid = pick_launch_angle(600.0, &mut rng);
            let far = pick_launch_angle(1400.0, &mut rng);
            assert!((55.0..=65.0).contains(&near));
            assert!((40.0..=50.0).contains(&mid));
            assert!((30.0..=38.0).contains(&far));
        }
        // Band edges
        assert!(pick_launch_angle(400.0, &mut rng) <= 50.0);
        assert!(pick_launch_angle(900.0, &mut rng) <= 38.0);
    }

    #[test]
    fn test_solve_speed_flat_ground_no_wind() {
        // Level target, 45 degrees: v² = g·R
        let speed = solve_speed(
            Vec2::ZERO,
            Vec2::new(1000.0, 0.0),
            45.0_f32.to_radians(),
            Facing::Right,
            520.0,
            0.0,
        )
        .unwrap();
        assert!((speed - (520.0_f32 * 1000.0).sqrt()).abs() < 0.5);

        // Mirrored for the left-facing side
        let mirrored = solve_speed(
            Vec2::ZERO,
            Vec2::new(-1000.0, 0.0),
            45.0_f32.to_radians(),
            Facing::Left,
            520.0,
            0.0,
        )
        .unwrap();
        assert!((speed - mirrored).abs() < 1e-2);
    }

    #[test]
    fn test_solve_speed_degenerate() {
        // Target far above a shallow shot is unreachable
        let none = solve_speed(
            Vec2::ZERO,
            Vec2::new(100.0, -500.0),
            10.0_f32.to_radians(),
            Facing::Right,
            520.0,
            0.0,
        );
        assert!(none.is_none());

        // Facing away from the target
        let away = solve_speed(
            Vec2::ZERO,
            Vec2::new(-500.0, 0.0),
            45.0_f32.to_radians(),
            Facing::Right,
            520.0,
            0.0,
        );
        assert!(away.is_none());
    }

    #[test]
    fn test_headwind_needs_more_speed() {
        let theta = 40.0_f32.to_radians();
        let target = Vec2::new(-900.0, 0.0);
        let calm = solve_speed(Vec2::ZERO, target, theta, Facing::Left, 520.0, 0.0).unwrap();
        let head = solve_speed(Vec2::ZERO, target, theta, Facing::Left, 520.0, 60.0).unwrap();
        let tail = solve_speed(Vec2::ZERO, target, theta, Facing::Left, 520.0, -60.0).unwrap();
        assert!(head > calm);
        assert!(tail < calm);
    }

    #[test]
    fn test_solver_hits_in_calm_air() {
        for (bx, seed) in [(1700.0, 3), (1700.0, 4), (1100.0, 5), (1100.0, 6)] {
            let (terrain, tuning, a, mut b) = duel(300.0, bx);
            let mut rng = Pcg32::seed_from_u64(seed);
            let shot = solve(&b, &a, 0.0, &tuning, &mut rng);
            assert!(!shot.fallback);
            b.angle_deg = shot.angle_deg;
            b.power = shot.power;
            assert!(
                lands_on(&b, &a, 0.0, &terrain, &tuning),
                "shot {shot:?} from x={bx} missed"
            );
        }
    }

    #[test]
    fn test_solver_compensates_tilt() {
        let (terrain, tuning, a, mut b) = duel(300.0, 1700.0);
        b.tilt = 0.15;
        let mut rng = Pcg32::seed_from_u64(11);
        let shot = solve(&b, &a, 0.0, &tuning, &mut rng);
        b.angle_deg = shot.angle_deg;
        let eff = b.effective_angle().to_degrees();
        assert!((30.0..=38.0).contains(&eff), "effective angle {eff}");
        b.power = shot.power;
        assert!(lands_on(&b, &a, 0.0, &terrain, &tuning));
    }

    #[test]
    fn test_solver_is_seeded() {
        let (_, tuning, a, b) = duel(300.0, 1700.0);
        let one = solve(&b, &a, 25.0, &tuning, &mut Pcg32::seed_from_u64(9));
        let two = solve(&b, &a, 25.0, &tuning, &mut Pcg32::seed_from_u64(9));
        assert_eq!(one, two);
        // Power is the clamped image of the jittered speed
        let expected = tuning.power_for_speed(one.speed).clamp(tuning.ai_min_power, 100.0);
        assert!((one.power - expected).abs() < 1e-4);
    }

    #[test]
    fn test_fallback_on_unreachable_target() {
        let (_, tuning, _, b) = duel(300.0, 1700.0);
        // A target high above and almost straight over the shooter
        let mut perch = b.clone();
        perch.pos = Vec2::new(b.pos.x - 40.0, b.pos.y - 600.0);
        let shot = solve(&b, &perch, 0.0, &tuning, &mut Pcg32::seed_from_u64(2));
        assert!(shot.fallback);
        assert!((tuning.ai_min_power..=100.0).contains(&shot.power));
    }
}
