/*!
 * OS Emulator Library
 * Process scheduler emulation: virtual cores, virtual processes, tick-driven dispatch
 */

pub mod config;
pub mod core;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod shell;

// Re-exports
pub use crate::config::SchedulerConfig;
pub use crate::core::errors::{
    ConfigError, ConfigResult, InstructionError, InstructionResult, SchedulerError,
    SchedulerResult,
};
pub use crate::core::types::{CoreId, Pid, Tick, MAX_FOR_DEPTH, MAX_FOR_STEPS};
pub use monitoring::init_tracing;
pub use process::{Instruction, Opcode, Operand, Process, ProcessState, Program, ProgramGenerator};
pub use scheduler::{
    CoreUtilization, CpuCore, Dispatcher, QueueLocation, SchedulerStats, SchedulingPolicy,
};
pub use shell::{Response, SharedDispatcher, Shell};
