//! Ballistic shell

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tank::Tank;
use super::terrain::Terrain;

/// A live shell in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Semi-implicit Euler: velocity first, then position
    ///
    /// Call once per fixed tick so trajectories do not depend on frame rate.
    #[inline]
    pub fn step(&mut self, dt: f32, gravity: f32, wind: f32) {
        self.vel.x += wind * dt;
        self.vel.y += gravity * dt;
        self.pos += self.vel * dt;
    }

    /// Below the surface, or past either side of the heightmap
    pub fn hit_terrain(&self, terrain: &Terrain) -> bool {
        if self.pos.x < 0.0 || self.pos.x >= terrain.width() as f32 {
            return true;
        }
        self.pos.y >= terrain.height_at(self.pos.x) as f32
    }

    /// Within the tank's radius plus `hit_pad`
    pub fn hit_tank(&self, tank: &Tank, hit_pad: f32) -> bool {
        let reach = tank.radius + hit_pad;
        self.pos.distance_squared(tank.pos) <= reach * reach
    }

    /// Left the playable area: `margin` past either edge, or `depth` under the world
    pub fn out_of_bounds(&self, width: f32, margin: f32, floor_y: f32) -> bool {
        self.pos.x < -margin || self.pos.x > width + margin || self.pos.y > floor_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tank::Side;
    use crate::tuning::Tuning;

    #[test]
    fn test_free_fall_matches_closed_form() {
        let (g, dt, n) = (520.0_f32, 1.0 / 60.0_f32, 120);
        let mut shell = Projectile::new(Vec2::ZERO, Vec2::ZERO);
        for _ in 0..n {
            shell.step(dt, g, 0.0);
        }
        let t = n as f32 * dt;
        assert!((shell.vel.y - g * t).abs() < 5e-2);
        // Semi-implicit Euler lands half a step's worth below the exact parabola
        let expected = 0.5 * g * dt * dt * (n * (n + 1)) as f32;
        assert!((shell.pos.y - expected).abs() < 1e-1);
        assert!((shell.pos.y - 0.5 * g * t * t - 0.5 * g * dt * t).abs() < 1e-1);
        assert_eq!(shell.pos.x, 0.0);
    }

    #[test]
    fn test_wind_accelerates_sideways() {
        let mut shell = Projectile::new(Vec2::ZERO, Vec2::new(100.0, 0.0));
        for _ in 0..60 {
            shell.step(1.0 / 60.0, 0.0, -90.0);
        }
        assert!((shell.vel.x - 10.0).abs() < 1e-3);
        assert!(shell.pos.x < 100.0);
    }

    #[test]
    fn test_terrain_hit() {
        let terrain = Terrain::flat(100, 500, 720);
        assert!(!Projectile::new(Vec2::new(50.0, 499.0), Vec2::ZERO).hit_terrain(&terrain));
        assert!(Projectile::new(Vec2::new(50.0, 500.0), Vec2::ZERO).hit_terrain(&terrain));
        // Side edges count as ground
        assert!(Projectile::new(Vec2::new(-0.1, 0.0), Vec2::ZERO).hit_terrain(&terrain));
        assert!(Projectile::new(Vec2::new(100.0, 0.0), Vec2::ZERO).hit_terrain(&terrain));
    }

    #[test]
    fn test_tank_hit_is_padded() {
        let tuning = Tuning::default();
        let terrain = Terrain::flat(2000, 520, 720);
        let tank = Tank::spawn(Side::B, 1000.0, &terrain, &tuning);
        let reach = tuning.tank_radius + tuning.hit_pad;
        let near = Projectile::new(tank.pos + Vec2::new(reach - 0.5, 0.0), Vec2::ZERO);
        let far = Projectile::new(tank.pos + Vec2::new(0.0, -(reach + 0.5)), Vec2::ZERO);
        assert!(near.hit_tank(&tank, tuning.hit_pad));
        assert!(!far.hit_tank(&tank, tuning.hit_pad));
    }

    #[test]
    fn test_out_of_bounds() {
        let at = |x, y| Projectile::new(Vec2::new(x, y), Vec2::ZERO);
        assert!(!at(2040.0, 100.0).out_of_bounds(2000.0, 50.0, 920.0));
        assert!(at(2051.0, 100.0).out_of_bounds(2000.0, 50.0, 920.0));
        assert!(at(-51.0, 100.0).out_of_bounds(2000.0, 50.0, 920.0));
        assert!(at(500.0, 921.0).out_of_bounds(2000.0, 50.0, 920.0));
    }
}
