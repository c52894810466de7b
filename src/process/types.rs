/*!
 * Process Types
 * Lifecycle state shared by the interpreter and the dispatcher
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process lifecycle state
///
/// `Ready -> Running -> {Ready, Sleeping, Finished}`, `Sleeping -> Ready`.
/// `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Waiting in the ready queue for a core
    Ready,
    /// Holding a core
    Running,
    /// Parked in the sleeping set until its sleep ticks run out
    Sleeping,
    /// Program counter reached the end of the program
    Finished,
}

impl ProcessState {
    #[inline(always)]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Sleeping => "sleeping",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
