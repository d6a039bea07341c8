//! Tick-based deferred actions
//!
//! Timers are plain data drained by the controller every tick. Nothing is
//! ever cancelled here: each task carries the AI epoch it was scheduled in,
//! and the controller re-checks that guard when the task comes due.

use serde::{Deserialize, Serialize};

use super::tank::Side;

/// What a due task does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskAction {
    /// Solve a shot for `side` and write it to the tank
    AiAim { side: Side },
    /// Fire `side`'s current aim
    AiFire { side: Side },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// First tick on which the task may run
    pub due_tick: u64,
    pub action: TaskAction,
    /// AI epoch at scheduling time; stale epochs make the task a no-op
    pub epoch: u32,
}

/// Pending tasks in scheduling order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn schedule(&mut self, due_tick: u64, action: TaskAction, epoch: u32) {
        self.tasks.push(ScheduledTask {
            due_tick,
            action,
            epoch,
        });
    }

    /// Remove and return every task due at `now`, earliest first
    ///
    /// Tasks due on the same tick keep their scheduling order.
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due_tick <= now);
        self.tasks = pending;
        due.sort_by_key(|t| t.due_tick);
        due
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
