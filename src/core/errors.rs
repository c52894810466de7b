/*!
 * Error Types
 * Centralized error handling with thiserror and miette diagnostics
 */

use crate::core::types::MAX_FOR_DEPTH;
use miette::Diagnostic;
use thiserror::Error;

/// Configuration loading and validation errors
///
/// Any of these means the dispatcher must not be initialized.
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    #[diagnostic(
        code(config::io),
        help("Check that the file exists and is readable. The default path is config.txt.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config line {line}: '{text}'")]
    #[diagnostic(
        code(config::malformed_line),
        help("Each line must be a `key value` pair, e.g. `num-cpu 4`.")
    )]
    MalformedLine { line: usize, text: String },

    #[error("Invalid config: {0}")]
    #[diagnostic(
        code(config::invalid),
        help("Every key must be present exactly once with a value of the right type.")
    )]
    Invalid(String),

    #[error("{key} = {value} is out of range ({min}..={max})")]
    #[diagnostic(code(config::out_of_range))]
    OutOfRange {
        key: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("min-ins ({min}) is greater than max-ins ({max})")]
    #[diagnostic(code(config::instruction_bounds))]
    InstructionBounds { min: u32, max: u32 },

    #[error("Unknown scheduler '{0}'")]
    #[diagnostic(code(config::unknown_scheduler), help("Use \"fcfs\" or \"rr\"."))]
    UnknownScheduler(String),
}

/// Dispatcher-level errors surfaced to the shell
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SchedulerError {
    #[error("Scheduler is not initialized")]
    #[diagnostic(code(scheduler::not_initialized), help("Run 'initialize' first."))]
    NotInitialized,

    #[error("Process {0} already exists")]
    #[diagnostic(
        code(scheduler::duplicate_name),
        help("A process with this name is still active. Pick another name or wait for it to finish.")
    )]
    DuplicateName(String),

    #[error("Process {0} not found")]
    #[diagnostic(code(scheduler::process_not_found))]
    ProcessNotFound(String),
}

/// Errors decoding externally supplied instruction text
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum InstructionError {
    #[error("Unknown opcode '{0}'")]
    #[diagnostic(code(instruction::unknown_opcode))]
    UnknownOpcode(String),

    #[error("{opcode} expects {expected} operand(s), got {found}")]
    #[diagnostic(code(instruction::arity))]
    Arity {
        opcode: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("'{0}' is not a decimal number")]
    #[diagnostic(code(instruction::bad_numeral))]
    BadNumeral(String),

    #[error("FOR nesting exceeds {} levels", MAX_FOR_DEPTH)]
    #[diagnostic(code(instruction::nesting_too_deep))]
    NestingTooDeep,

    #[error("FOR expands to {steps} steps, limit is {limit}")]
    #[diagnostic(
        code(instruction::too_many_steps),
        help("Lower the repeat counts so the whole loop fits in one tick.")
    )]
    TooManySteps { steps: u64, limit: u64 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type SchedulerResult<T> = Result<T, SchedulerError>;
pub type InstructionResult<T> = Result<T, InstructionError>;
