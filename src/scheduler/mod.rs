/*!
 * Dispatcher
 * Tick-driven multiplexing of virtual processes over virtual CPU cores
 */

mod cpu;
mod operations;
mod stats;
pub mod types;

pub use cpu::CpuCore;
pub use types::{CoreUtilization, SchedulerStats, SchedulingPolicy};

use crate::config::SchedulerConfig;
use crate::core::errors::ConfigResult;
use crate::core::types::{CoreId, Pid, Tick};
use crate::process::{Process, ProgramGenerator};
use ahash::AHashSet;
use std::collections::VecDeque;
use tracing::info;

/// Where a live process currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueLocation {
    Ready,
    Sleeping,
    Core(CoreId),
}

/// Owner of every process, the cores, the ready queue and the sleeping set
///
/// Single-threaded: callers drive it with [`Dispatcher::tick`]. Each live
/// process is in exactly one of the ready queue, the sleeping set or a core;
/// finished processes are in none but stay in the store for reporting.
#[derive(Debug)]
pub struct Dispatcher {
    config: SchedulerConfig,
    cores: Vec<CpuCore>,
    processes: Vec<Process>,
    ready_queue: VecDeque<Pid>,
    sleeping: AHashSet<Pid>,
    generator: ProgramGenerator,
    next_process_id: u32,
    tick_counter: u32,
    tick_interval: u32,
    total_ticks_processed: Tick,
    running: bool,
    stats: SchedulerStats,
}

impl Dispatcher {
    /// Validate the config and build an initialized dispatcher
    pub fn new(config: SchedulerConfig) -> ConfigResult<Self> {
        Self::with_generator(config, ProgramGenerator::new())
    }

    /// Dispatcher whose generated programs are reproducible
    pub fn with_seed(config: SchedulerConfig, seed: u64) -> ConfigResult<Self> {
        Self::with_generator(config, ProgramGenerator::with_seed(seed))
    }

    fn with_generator(config: SchedulerConfig, generator: ProgramGenerator) -> ConfigResult<Self> {
        config.validate()?;
        let mut dispatcher = Self {
            config,
            cores: Vec::new(),
            processes: Vec::new(),
            ready_queue: VecDeque::new(),
            sleeping: AHashSet::new(),
            generator,
            next_process_id: 1,
            tick_counter: 0,
            tick_interval: 0,
            total_ticks_processed: 0,
            running: false,
            stats: SchedulerStats::default(),
        };
        dispatcher.initialize();
        Ok(dispatcher)
    }

    /// Rebuild cores and start a fresh session
    ///
    /// Drops every process, empties both queues and zeroes the counters.
    pub fn initialize(&mut self) {
        self.cores = (0..self.config.num_cpu as CoreId).map(CpuCore::new).collect();
        self.processes.clear();
        self.ready_queue.clear();
        self.sleeping.clear();
        self.next_process_id = 1;
        self.tick_counter = 0;
        self.tick_interval = self.config.batch_process_freq;
        self.total_ticks_processed = 0;
        self.running = false;
        self.stats = SchedulerStats::default();

        info!(
            cores = self.cores.len(),
            policy = %self.config.scheduler,
            quantum = self.config.quantum_cycles,
            delay = self.config.delay_per_exec,
            "Dispatcher initialized"
        );
    }

    /// Enable batch admission of generated processes
    pub fn start(&mut self) {
        self.running = true;
        self.tick_interval = self.config.batch_process_freq;
        info!(every = self.tick_interval, "Batch admission started");
    }

    /// Halt batch admission; admitted processes keep running while ticks arrive
    pub fn stop(&mut self) {
        self.running = false;
        info!("Batch admission stopped");
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn policy(&self) -> SchedulingPolicy {
        self.config.scheduler
    }
}
