/*!
 * Scheduler Types
 * Domain types for scheduling policy, utilization and statistics
 */

use crate::core::types::Tick;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Scheduling discipline applied to every core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulingPolicy {
    /// First-come first-served, a process keeps its core until it finishes or sleeps
    Fcfs,
    /// Round-robin with a quantum counted in retired instructions
    RoundRobin,
}

impl SchedulingPolicy {
    /// Config-file spelling
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::RoundRobin => "rr",
        }
    }

    #[inline(always)]
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }
}

impl FromStr for SchedulingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "rr" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            _ => Err(format!("Invalid policy '{}'. Valid: fcfs, rr", s)),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SchedulingPolicy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SchedulingPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Occupied cores over total cores
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoreUtilization {
    pub used: usize,
    pub total: usize,
}

impl CoreUtilization {
    pub fn available(&self) -> usize {
        self.total - self.used
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 * 100.0 / self.total as f64
        }
    }
}

/// Snapshot of dispatcher counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    pub elapsed_ticks: Tick,
    pub admitted: u64,
    pub dispatches: u64,
    pub preemptions: u64,
    pub sleeps: u64,
    pub wakeups: u64,
    pub finished: u64,
    pub instructions_executed: u64,
    pub busy_ticks: Tick,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!(SchedulingPolicy::from_str("fcfs").unwrap(), SchedulingPolicy::Fcfs);
        assert_eq!(SchedulingPolicy::from_str("RR").unwrap(), SchedulingPolicy::RoundRobin);
        assert!(SchedulingPolicy::from_str("priority").is_err());
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&SchedulingPolicy::RoundRobin).unwrap();
        assert_eq!(json, "\"rr\"");
        let back: SchedulingPolicy = serde_json::from_str("\"fcfs\"").unwrap();
        assert_eq!(back, SchedulingPolicy::Fcfs);
    }

    #[test]
    fn test_utilization_percent() {
        let util = CoreUtilization { used: 1, total: 4 };
        assert_eq!(util.available(), 3);
        assert!((util.percent() - 25.0).abs() < f64::EPSILON);
        assert_eq!(CoreUtilization { used: 0, total: 0 }.percent(), 0.0);
    }
}
