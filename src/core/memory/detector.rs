use super::super::config::{CounterConfig, UninitPolicy};
use super::super::types::MemoryType;
use super::counters::AddressCounters;

/// Decides whether a read observes memory nothing has initialized yet.
#[derive(Debug, Clone, Copy)]
pub struct UninitReadDetector {
    policy: UninitPolicy,
    ignore_read_only: bool,
}

impl UninitReadDetector {
    pub fn new(policy: UninitPolicy, ignore_read_only: bool) -> Self {
        Self {
            policy,
            ignore_read_only,
        }
    }

    pub fn from_config(config: &CounterConfig) -> Self {
        Self::new(config.uninit_policy, config.ignore_read_only)
    }

    /// Whether the address has been initialized under this policy
    pub fn is_initialized(&self, record: &AddressCounters) -> bool {
        match self.policy {
            UninitPolicy::WriteOrExec => record.write_count != 0 || record.exec_count != 0,
            UninitPolicy::WriteOnly => record.write_count != 0,
        }
    }

    /// Apply the policy to a record whose read has already been counted.
    ///
    /// Sets the sticky flag and returns true only on the read that first
    /// sets it.
    pub fn on_read(&self, memory_type: MemoryType, record: &mut AddressCounters) -> bool {
        if record.uninit_read || self.is_initialized(record) {
            return false;
        }
        if self.ignore_read_only && memory_type.is_read_only() {
            return false;
        }
        record.uninit_read = true;
        true
    }
}

impl Default for UninitReadDetector {
    fn default() -> Self {
        Self::from_config(&CounterConfig::default())
    }
}
