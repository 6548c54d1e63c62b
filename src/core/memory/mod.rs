pub mod access_counter;
pub mod counters;
pub mod detector;
pub mod errors;
pub mod layout;
pub(crate) mod region;

// Re-export commonly used types
pub use access_counter::{AccessSnapshot, MemoryAccessCounter};
pub use counters::AddressCounters;
pub use detector::UninitReadDetector;
pub use errors::CounterError;
pub use layout::{MemorySizes, RegionLayout};
