//! Frame-time driver for the fixed-step simulation
//!
//! Hosts call [`Runner::advance`] once per rendered frame with the wall-clock
//! delta. The runner turns that into whole [`SIM_DT`] ticks and consumes the
//! one-shot parts of the input after the first tick that sees them.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{MatchState, TickInput, tick};

pub struct Runner {
    pub state: MatchState,
    /// Held input; hosts overwrite it between frames
    pub input: TickInput,
    accumulator: f32,
}

impl Runner {
    pub fn new(state: MatchState) -> Self {
        Self {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    /// Run as many ticks as `frame_dt` covers. Returns the number run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.fire = false;
            self.input.restart = false;
            self.input.set_mode = None;
        }

        // Drop the backlog the cap left behind instead of replaying it later
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }
}
