/*!
 * Core Types
 * Common types used across the emulator
 */

/// Process ID type (index into the dispatcher's process store)
pub type Pid = u32;

/// CPU core identifier, `0..num_cpu`
pub type CoreId = usize;

/// Logical tick count
pub type Tick = u64;

/// Maximum FOR nesting (a top-level FOR counts as level 1)
pub const MAX_FOR_DEPTH: usize = 3;

/// Maximum loop iterations plus body runs for one FOR statement, summed over every level
pub const MAX_FOR_STEPS: u64 = 10_000;

/// Upper bound on configured cores
pub const MAX_CPUS: u32 = 128;
