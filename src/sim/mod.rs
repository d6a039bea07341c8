//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one generator per match)
//! - Tanks are always processed A then B
//! - No rendering or platform dependencies

pub mod aim;
pub mod airstrike;
pub mod projectile;
pub mod schedule;
pub mod state;
pub mod tank;
pub mod terrain;
pub mod tick;

pub use aim::{AimSolution, solve};
pub use airstrike::{Bomb, Bomber, small_explode};
pub use projectile::Projectile;
pub use schedule::{ScheduledTask, Scheduler, TaskAction};
pub use state::{GameMode, MatchEvent, MatchState, Phase};
pub use tank::{Facing, MoveDir, Side, Tank};
pub use terrain::Terrain;
pub use tick::{TickInput, blast_damage, explode, fire, restart, set_mode, tick};
