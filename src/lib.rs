pub mod core;

// Re-export commonly used types
pub use crate::core::config::{ConcurrencyMode, CounterConfig, UninitPolicy};
pub use crate::core::memory::{
    AccessSnapshot, AddressCounters, CounterError, MemoryAccessCounter, MemorySizes, RegionLayout,
};
pub use crate::core::stats::RegionStats;
pub use crate::core::types::{AddressInfo, CpuType, MemoryType, SessionId};
