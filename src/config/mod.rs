/*!
 * Emulator Configuration
 * Scheduler parameters loaded once at initialization
 */

mod loader;

use crate::core::errors::{ConfigError, ConfigResult};
use crate::core::types::MAX_CPUS;
use crate::scheduler::SchedulingPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

pub use loader::parse_pairs;

/// Default config file consulted by `initialize`
pub const DEFAULT_CONFIG_PATH: &str = "config.txt";

/// Validated scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SchedulerConfig {
    pub num_cpu: u32,
    pub scheduler: SchedulingPolicy,
    pub quantum_cycles: u32,
    pub batch_process_freq: u32,
    pub min_ins: u32,
    pub max_ins: u32,
    pub delay_per_exec: u32,
}

/// Shape of the file before range checks; wide integers so overflow is reported, not wrapped
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    num_cpu: u64,
    scheduler: String,
    quantum_cycles: u64,
    batch_process_freq: u64,
    min_ins: u64,
    max_ins: u64,
    delay_per_exec: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            num_cpu: 4,
            scheduler: SchedulingPolicy::RoundRobin,
            quantum_cycles: 5,
            batch_process_freq: 1,
            min_ins: 1000,
            max_ins: 2000,
            delay_per_exec: 0,
        }
    }
}

impl SchedulerConfig {
    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&text)?;
        info!(path = %path.display(), ?config, "Config loaded");
        Ok(config)
    }

    /// Parse and validate config text
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let map = loader::parse_pairs(text)?;
        let raw: RawConfig = serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Self::try_from(raw)
    }

    pub fn with_num_cpu(mut self, num_cpu: u32) -> Self {
        self.num_cpu = num_cpu;
        self
    }

    pub fn with_scheduler(mut self, scheduler: SchedulingPolicy) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_quantum(mut self, quantum_cycles: u32) -> Self {
        self.quantum_cycles = quantum_cycles;
        self
    }

    pub fn with_batch_freq(mut self, batch_process_freq: u32) -> Self {
        self.batch_process_freq = batch_process_freq;
        self
    }

    pub fn with_instruction_bounds(mut self, min_ins: u32, max_ins: u32) -> Self {
        self.min_ins = min_ins;
        self.max_ins = max_ins;
        self
    }

    pub fn with_delay(mut self, delay_per_exec: u32) -> Self {
        self.delay_per_exec = delay_per_exec;
        self
    }

    /// Range-check every field
    pub fn validate(&self) -> ConfigResult<()> {
        check_range("num-cpu", self.num_cpu as u64, 1, MAX_CPUS as u64)?;
        check_range("quantum-cycles", self.quantum_cycles as u64, 1, u32::MAX as u64)?;
        check_range(
            "batch-process-freq",
            self.batch_process_freq as u64,
            1,
            u32::MAX as u64,
        )?;
        check_range("min-ins", self.min_ins as u64, 1, u32::MAX as u64)?;
        check_range("max-ins", self.max_ins as u64, 1, u32::MAX as u64)?;
        if self.min_ins > self.max_ins {
            return Err(ConfigError::InstructionBounds {
                min: self.min_ins,
                max: self.max_ins,
            });
        }
        Ok(())
    }
}

impl TryFrom<RawConfig> for SchedulerConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> ConfigResult<Self> {
        let scheduler = SchedulingPolicy::from_str(&raw.scheduler)
            .map_err(|_| ConfigError::UnknownScheduler(raw.scheduler.clone()))?;

        let config = Self {
            num_cpu: narrow("num-cpu", raw.num_cpu)?,
            scheduler,
            quantum_cycles: narrow("quantum-cycles", raw.quantum_cycles)?,
            batch_process_freq: narrow("batch-process-freq", raw.batch_process_freq)?,
            min_ins: narrow("min-ins", raw.min_ins)?,
            max_ins: narrow("max-ins", raw.max_ins)?,
            delay_per_exec: narrow("delay-per-exec", raw.delay_per_exec)?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn narrow(key: &'static str, value: u64) -> ConfigResult<u32> {
    u32::try_from(value).map_err(|_| ConfigError::OutOfRange {
        key,
        value,
        min: 0,
        max: u32::MAX as u64,
    })
}

fn check_range(key: &'static str, value: u64, min: u64, max: u64) -> ConfigResult<()> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            key,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
num-cpu 4
scheduler "rr"
quantum-cycles 5
batch-process-freq 1
min-ins 1000
max-ins 2000
delay-per-exec 0
"#;

    #[test]
    fn test_parse_sample() {
        let config = SchedulerConfig::parse(SAMPLE).unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[test]
    fn test_default_is_valid() {
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_cpu_bounds() {
        let config = SchedulerConfig::default().with_num_cpu(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { key: "num-cpu", .. })
        ));
        assert!(SchedulerConfig::default().with_num_cpu(129).validate().is_err());
        assert!(SchedulerConfig::default().with_num_cpu(128).validate().is_ok());
    }

    #[test]
    fn test_instruction_bounds() {
        let config = SchedulerConfig::default().with_instruction_bounds(10, 5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InstructionBounds { min: 10, max: 5 })
        ));
    }

    #[test]
    fn test_overflowing_value_rejected() {
        let text = SAMPLE.replace("quantum-cycles 5", "quantum-cycles 4294967296");
        assert!(matches!(
            SchedulerConfig::parse(&text),
            Err(ConfigError::OutOfRange {
                key: "quantum-cycles",
                ..
            })
        ));
    }
}
