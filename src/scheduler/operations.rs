/*!
 * Dispatcher Operations
 * Process admission and the four-phase tick
 */

use super::Dispatcher;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::types::Pid;
use crate::process::{Process, ProcessState, Program};
use tracing::{debug, debug_span};

impl Dispatcher {
    /// Admit a process into the ready queue tail
    ///
    /// Names are not checked here; see [`Dispatcher::spawn`].
    pub fn create_process(&mut self, name: impl Into<String>, program: Program) -> Pid {
        let pid = self.processes.len() as Pid;
        let process = Process::new(pid, name, program);
        let finished = process.is_finished();

        debug!(
            pid,
            name = process.name(),
            lines = process.total_lines(),
            "Process admitted"
        );
        self.processes.push(process);
        self.stats.admitted += 1;

        if finished {
            self.stats.finished += 1;
        } else {
            self.ready_queue.push_back(pid);
        }
        pid
    }

    /// Admit a named process with a generated program
    ///
    /// Rejects a name still held by a process that has not finished.
    pub fn spawn(&mut self, name: &str) -> SchedulerResult<Pid> {
        if self.find_active(name).is_some() {
            return Err(SchedulerError::DuplicateName(name.to_string()));
        }
        let program = self
            .generator
            .program_between(self.config.min_ins, self.config.max_ins);
        Ok(self.create_process(name, program))
    }

    /// Admit `count` generated processes immediately
    pub fn generate_batch(&mut self, count: usize) -> Vec<Pid> {
        (0..count).map(|_| self.admit_generated()).collect()
    }

    fn admit_generated(&mut self) -> Pid {
        let name = self.next_process_name();
        let program = self
            .generator
            .program_between(self.config.min_ins, self.config.max_ins);
        self.create_process(name, program)
    }

    /// `p01`, `p02`, ... `p10`, ...
    fn next_process_name(&mut self) -> String {
        let name = format!("p{:02}", self.next_process_id);
        self.next_process_id += 1;
        name
    }

    /// Advance one logical time unit
    ///
    /// Admission (only while running), wake-ups, one instruction per occupied
    /// core in core-id order, then dispatch onto free cores.
    pub fn tick(&mut self) {
        self.stats.elapsed_ticks += 1;
        let _span = debug_span!("tick", tick = self.stats.elapsed_ticks).entered();

        if self.running {
            self.admit_batch();
        }
        self.wake_sleepers();
        self.execute_cores();
        self.dispatch_ready();

        #[cfg(debug_assertions)]
        self.check_invariants();
    }

    fn admit_batch(&mut self) {
        self.tick_counter += 1;
        if self.tick_counter >= self.tick_interval {
            let pid = self.admit_generated();
            self.tick_counter = 0;
            self.total_ticks_processed += 1;
            debug!(pid, "Batch admission");
        }
    }

    fn wake_sleepers(&mut self) {
        let processes = &mut self.processes;
        let ready_queue = &mut self.ready_queue;
        let mut woken = 0;

        self.sleeping.retain(|&pid| {
            let process = &mut processes[pid as usize];
            process.sleep_ticks = process.sleep_ticks.saturating_sub(1);
            if process.sleep_ticks > 0 {
                return true;
            }
            process.state = ProcessState::Ready;
            ready_queue.push_back(pid);
            woken += 1;
            debug!(pid, "Process woke");
            false
        });

        self.stats.wakeups += woken;
    }

    fn execute_cores(&mut self) {
        let delay = self.config.delay_per_exec;
        let preemptive = self.config.scheduler.is_preemptive();

        for core in self.cores.iter_mut() {
            let Some(pid) = core.current else {
                continue;
            };
            if core.delay_remaining > 0 {
                core.delay_remaining -= 1;
                self.stats.busy_ticks += 1;
                continue;
            }

            let process = &mut self.processes[pid as usize];
            process.execute_next(Some(core.id()));
            self.stats.instructions_executed += 1;

            match process.state {
                ProcessState::Finished => {
                    core.release();
                    process.core = None;
                    self.stats.finished += 1;
                    debug!(pid, name = process.name(), core = core.id(), "Process finished");
                }
                ProcessState::Sleeping => {
                    core.release();
                    process.core = None;
                    self.sleeping.insert(pid);
                    self.stats.sleeps += 1;
                    debug!(pid, ticks = process.sleep_ticks, core = core.id(), "Process sleeping");
                }
                _ => {
                    core.delay_remaining = delay;
                    if !preemptive {
                        continue;
                    }
                    core.quantum_remaining = core.quantum_remaining.saturating_sub(1);
                    if core.quantum_remaining == 0 {
                        core.release();
                        process.core = None;
                        process.state = ProcessState::Ready;
                        self.ready_queue.push_back(pid);
                        self.stats.preemptions += 1;
                        debug!(pid, core = core.id(), "Quantum expired");
                    }
                }
            }
        }
    }

    fn dispatch_ready(&mut self) {
        let quantum = self.config.quantum_cycles;
        let delay = self.config.delay_per_exec;

        for core in self.cores.iter_mut().filter(|c| c.is_idle()) {
            let Some(pid) = self.ready_queue.pop_front() else {
                break;
            };
            let process = &mut self.processes[pid as usize];
            debug_assert_eq!(process.state, ProcessState::Ready, "pid {} not ready", pid);

            process.state = ProcessState::Running;
            process.core = Some(core.id());
            core.assign(pid, quantum, delay);
            self.stats.dispatches += 1;
            debug!(pid, core = core.id(), "Dispatched");
        }
    }

    /// Every live process sits in exactly one place, cores agree with processes
    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        let mut seen = ahash::AHashSet::new();

        for &pid in &self.ready_queue {
            assert!(seen.insert(pid), "pid {} queued twice", pid);
            assert_eq!(self.processes[pid as usize].state, ProcessState::Ready);
        }
        for &pid in &self.sleeping {
            assert!(seen.insert(pid), "pid {} both sleeping and queued", pid);
            assert_eq!(self.processes[pid as usize].state, ProcessState::Sleeping);
        }
        for core in &self.cores {
            if let Some(pid) = core.current {
                assert!(seen.insert(pid), "pid {} on core {} is also elsewhere", pid, core.id());
                let process = &self.processes[pid as usize];
                assert_eq!(process.state, ProcessState::Running);
                assert_eq!(process.core, Some(core.id()));
            }
        }
    }
}
