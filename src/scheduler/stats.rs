/*!
 * Dispatcher Views
 * Read-only accessors over processes, cores and counters
 */

use super::{CoreUtilization, CpuCore, Dispatcher, QueueLocation, SchedulerStats};
use crate::core::types::{Pid, Tick};
use crate::process::Process;

impl Dispatcher {
    /// Every process admitted this session, in admission order
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.processes.get(pid as usize)
    }

    /// Most recent process with this name, finished or not
    pub fn find(&self, name: &str) -> Option<&Process> {
        self.processes.iter().rev().find(|p| p.name() == name)
    }

    /// Process with this name that has not finished yet
    pub fn find_active(&self, name: &str) -> Option<&Process> {
        self.processes
            .iter()
            .rev()
            .find(|p| p.name() == name && !p.is_finished())
    }

    pub fn cores(&self) -> &[CpuCore] {
        &self.cores
    }

    /// Ready queue, head first
    pub fn ready_queue(&self) -> impl Iterator<Item = Pid> + '_ {
        self.ready_queue.iter().copied()
    }

    /// Sleeping set, in no particular order
    pub fn sleeping(&self) -> impl Iterator<Item = Pid> + '_ {
        self.sleeping.iter().copied()
    }

    /// Where a live process sits; `None` once finished or unknown
    pub fn locate(&self, pid: Pid) -> Option<QueueLocation> {
        if let Some(core) = self.cores.iter().find(|c| c.current() == Some(pid)) {
            return Some(QueueLocation::Core(core.id()));
        }
        if self.sleeping.contains(&pid) {
            return Some(QueueLocation::Sleeping);
        }
        if self.ready_queue.contains(&pid) {
            return Some(QueueLocation::Ready);
        }
        None
    }

    pub fn utilization(&self) -> CoreUtilization {
        CoreUtilization {
            used: self.cores.iter().filter(|c| !c.is_idle()).count(),
            total: self.cores.len(),
        }
    }

    /// Batch admissions fired so far
    pub fn total_ticks(&self) -> Tick {
        self.total_ticks_processed
    }

    /// Every `tick()` call, running or not
    pub fn elapsed_ticks(&self) -> Tick {
        self.stats.elapsed_ticks
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Nothing on a core, queued or asleep
    pub fn is_idle(&self) -> bool {
        self.ready_queue.is_empty()
            && self.sleeping.is_empty()
            && self.cores.iter().all(CpuCore::is_idle)
    }
}
