//! Artillery Duel - a turn-based two-tank artillery game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, ballistics, damage, turn flow, AI)
//! - `tuning`: Data-driven game balance
//! - `runner`: Variable frame time to fixed simulation steps
//!
//! Rendering, audio and input widgets live outside this crate. They read
//! [`sim::MatchState`] and feed [`sim::TickInput`] back in.

pub mod runner;
pub mod sim;
pub mod tuning;

pub use runner::Runner;
pub use tuning::{Tuning, TuningError};

/// Simulation constants that are not data-driven
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the runner will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Clamp helper that tolerates `min > max` by preferring `min`
#[inline]
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.min(max).max(min)
}

/// Convert a duration in seconds to a whole number of simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs / consts::SIM_DT).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(1.5), 90);
        assert_eq!(secs_to_ticks(0.4), 24);
        assert_eq!(secs_to_ticks(-1.0), 0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(190.0, 0.0, 180.0), 180.0);
        assert_eq!(clamp(-3.0, 0.0, 100.0), 0.0);
        assert_eq!(clamp(42.0, 0.0, 100.0), 42.0);
    }
}
