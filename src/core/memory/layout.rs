use super::super::types::MemoryType;

/// Source of region sizes for the loaded hardware configuration.
///
/// Implemented by the emulator core's memory dumper. A category absent from
/// the configuration reports 0.
pub trait MemorySizes {
    fn memory_size(&self, memory_type: MemoryType) -> usize;
}

/// Explicit list of region sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLayout {
    sizes: [usize; MemoryType::COUNT],
}

impl RegionLayout {
    /// Layout with every region empty
    pub fn new() -> Self {
        Self {
            sizes: [0; MemoryType::COUNT],
        }
    }

    /// Copy the sizes reported by a provider
    pub fn from_sizes(provider: &dyn MemorySizes) -> Self {
        let mut layout = Self::new();
        for memory_type in MemoryType::ALL {
            layout.sizes[memory_type.index()] = provider.memory_size(memory_type);
        }
        layout
    }

    /// Set the length of one region
    pub fn with_size(mut self, memory_type: MemoryType, len: usize) -> Self {
        self.sizes[memory_type.index()] = len;
        self
    }

    /// Categories present in this layout
    pub fn present(&self) -> impl Iterator<Item = (MemoryType, usize)> + '_ {
        MemoryType::ALL
            .into_iter()
            .map(move |memory_type| (memory_type, self.sizes[memory_type.index()]))
            .filter(|&(_, len)| len > 0)
    }
}

impl Default for RegionLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySizes for RegionLayout {
    fn memory_size(&self, memory_type: MemoryType) -> usize {
        self.sizes[memory_type.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSizes;

    impl MemorySizes for FixedSizes {
        fn memory_size(&self, memory_type: MemoryType) -> usize {
            match memory_type {
                MemoryType::WorkRam => 0x20000,
                MemoryType::SpcRam => 0x10000,
                _ => 0,
            }
        }
    }

    #[test]
    fn test_builder() {
        let layout = RegionLayout::new()
            .with_size(MemoryType::WorkRam, 0x20000)
            .with_size(MemoryType::GbHighRam, 0x7F);
        assert_eq!(layout.memory_size(MemoryType::WorkRam), 0x20000);
        assert_eq!(layout.memory_size(MemoryType::GbHighRam), 0x7F);
        assert_eq!(layout.memory_size(MemoryType::Cx4DataRam), 0);
    }

    #[test]
    fn test_from_provider() {
        let layout = RegionLayout::from_sizes(&FixedSizes);
        let present: Vec<_> = layout.present().collect();
        assert_eq!(
            present,
            vec![(MemoryType::WorkRam, 0x20000), (MemoryType::SpcRam, 0x10000)]
        );
    }
}
