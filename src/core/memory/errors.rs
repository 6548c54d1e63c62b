use super::super::types::MemoryType;

/// Errors raised while laying out regions or naming memory types.
/// Counting and query operations never fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterError {
    /// Region length exceeds the 32-bit address range
    RegionTooLarge { memory_type: MemoryType, len: usize },
    /// No memory type with this name
    UnknownMemoryType(String),
}

impl std::fmt::Display for CounterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterError::RegionTooLarge { memory_type, len } => {
                write!(f, "Region too large: {} bytes for {}", len, memory_type)
            }
            CounterError::UnknownMemoryType(name) => write!(f, "Unknown memory type: {}", name),
        }
    }
}

impl std::error::Error for CounterError {}
