/*!
 * Process Module
 * Virtual processes, their instruction set and the random program generator
 */

pub mod generator;
pub mod instruction;
mod interpreter;
pub mod types;

pub use generator::ProgramGenerator;
pub use instruction::{Instruction, Opcode, Operand, Program};
pub use types::ProcessState;

use crate::core::clock;
use crate::core::types::{CoreId, Pid};
use ahash::AHashMap;
use time::OffsetDateTime;

/// A virtual process
///
/// Instruction execution owns the counter, variables and logs; the dispatcher
/// owns `state` transitions other than SLEEP/finish and the core assignment.
#[derive(Debug, Clone)]
pub struct Process {
    pid: Pid,
    name: String,
    program: Program,
    pc: usize,
    variables: AHashMap<String, u16>,
    logs: Vec<String>,
    pub(crate) state: ProcessState,
    pub(crate) sleep_ticks: u8,
    pub(crate) core: Option<CoreId>,
    created_at: OffsetDateTime,
    finished_at: Option<OffsetDateTime>,
}

impl Process {
    /// New process in `Ready`; an empty program is finished on arrival
    pub fn new(pid: Pid, name: impl Into<String>, program: Program) -> Self {
        let created_at = clock::now();
        let finished = program.is_empty();
        Self {
            pid,
            name: name.into(),
            program,
            pc: 0,
            variables: AHashMap::new(),
            logs: Vec::new(),
            state: if finished {
                ProcessState::Finished
            } else {
                ProcessState::Ready
            },
            sleep_ticks: 0,
            core: None,
            created_at,
            finished_at: finished.then_some(created_at),
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn state(&self) -> ProcessState {
        self.state
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Index of the next instruction, `0..=total_lines()`
    #[inline]
    pub fn program_counter(&self) -> usize {
        self.pc
    }

    #[inline]
    pub fn total_lines(&self) -> usize {
        self.program.len()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Core currently running this process
    #[inline]
    pub fn assigned_core(&self) -> Option<CoreId> {
        self.core
    }

    /// Remaining sleep, meaningful only while `Sleeping`
    #[inline]
    pub fn sleep_ticks_remaining(&self) -> u8 {
        self.sleep_ticks
    }

    /// Read a variable without the auto-declare side effect
    pub fn variable(&self, name: &str) -> Option<u16> {
        self.variables.get(name).copied()
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, u16)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn finished_at(&self) -> Option<OffsetDateTime> {
        self.finished_at
    }
}
