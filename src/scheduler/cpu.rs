/*!
 * CPU Core Slot
 * One virtual core holding at most one process
 */

use crate::core::types::{CoreId, Pid};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuCore {
    id: CoreId,
    pub(super) current: Option<Pid>,
    /// Retired instructions left before round-robin preemption
    pub(super) quantum_remaining: u32,
    /// Busy ticks left before the next instruction may retire
    pub(super) delay_remaining: u32,
}

impl CpuCore {
    pub(super) fn new(id: CoreId) -> Self {
        Self {
            id,
            current: None,
            quantum_remaining: 0,
            delay_remaining: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> CoreId {
        self.id
    }

    #[inline]
    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    #[inline]
    pub fn quantum_remaining(&self) -> u32 {
        self.quantum_remaining
    }

    pub(super) fn assign(&mut self, pid: Pid, quantum: u32, delay: u32) {
        debug_assert!(self.current.is_none(), "core {} already busy", self.id);
        self.current = Some(pid);
        self.quantum_remaining = quantum;
        self.delay_remaining = delay;
    }

    pub(super) fn release(&mut self) -> Option<Pid> {
        self.quantum_remaining = 0;
        self.delay_remaining = 0;
        self.current.take()
    }
}
