use super::super::config::ConcurrencyMode;
use super::super::types::MemoryType;
use super::counters::{AddressCounters, CounterCell};
use super::errors::CounterError;
use super::layout::MemorySizes;
use rayon::prelude::*;

/// Counters for every address of one memory-type category.
///
/// Index in the store equals the offset within the region.
#[derive(Debug)]
pub(crate) struct RegionStore {
    memory_type: MemoryType,
    cells: Box<[CounterCell]>,
}

impl RegionStore {
    /// Unsized region
    pub(crate) fn empty(memory_type: MemoryType) -> Self {
        Self {
            memory_type,
            cells: Box::default(),
        }
    }

    /// Region with `len` zeroed cells
    pub(crate) fn with_len(memory_type: MemoryType, len: usize) -> Result<Self, CounterError> {
        if u32::try_from(len).is_err() {
            return Err(CounterError::RegionTooLarge { memory_type, len });
        }
        let cells = (0..len).map(|_| CounterCell::default()).collect();
        Ok(Self { memory_type, cells })
    }

    pub(crate) fn memory_type(&self) -> MemoryType {
        self.memory_type
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub(crate) fn cell(&self, offset: usize) -> Option<&CounterCell> {
        self.cells.get(offset)
    }

    /// Copy `out.len()` records starting at `offset`.
    ///
    /// Entries past the end of the region are zeroed records. Past the 32-bit
    /// address range the record address wraps but the entry stays zeroed.
    pub(crate) fn snapshot_into(&self, offset: u32, out: &mut [AddressCounters]) {
        for (i, slot) in out.iter_mut().enumerate() {
            let cell = (offset as usize)
                .checked_add(i)
                .filter(|&index| index <= u32::MAX as usize)
                .and_then(|index| self.cells.get(index));
            let address = offset.wrapping_add(i as u32);
            *slot = match cell {
                Some(cell) => cell.snapshot(address),
                None => AddressCounters::empty(address),
            };
        }
    }

    /// Number of in-region addresses from `offset`, at most `length`
    pub(crate) fn span(&self, offset: u32, length: u32) -> usize {
        self.len().saturating_sub(offset as usize).min(length as usize)
    }

    /// Every record in address order
    pub(crate) fn snapshots(&self) -> impl Iterator<Item = AddressCounters> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| cell.snapshot(i as u32))
    }

    pub(crate) fn clear(&mut self, mode: ConcurrencyMode) {
        match mode {
            ConcurrencyMode::Sequential => self.cells.iter_mut().for_each(CounterCell::clear),
            ConcurrencyMode::Rayon => self.cells[..].par_iter_mut().for_each(CounterCell::clear),
        }
    }
}

/// One store per memory-type category, indexed by ordinal
#[derive(Debug)]
pub(crate) struct RegionTable {
    stores: [RegionStore; MemoryType::COUNT],
}

impl RegionTable {
    pub(crate) fn new() -> Self {
        Self {
            stores: std::array::from_fn(|i| RegionStore::empty(MemoryType::ALL[i])),
        }
    }

    /// Build a table sized from a provider. Fails without side effects.
    pub(crate) fn from_sizes(provider: &dyn MemorySizes) -> Result<Self, CounterError> {
        let mut table = Self::new();
        for memory_type in MemoryType::ALL {
            let len = provider.memory_size(memory_type);
            if len > 0 {
                table.stores[memory_type.index()] = RegionStore::with_len(memory_type, len)?;
            }
        }
        Ok(table)
    }

    #[inline]
    pub(crate) fn get(&self, memory_type: MemoryType) -> &RegionStore {
        &self.stores[memory_type.index()]
    }

    pub(crate) fn replace(&mut self, store: RegionStore) {
        let index = store.memory_type().index();
        self.stores[index] = store;
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &RegionStore> {
        self.stores.iter()
    }

    pub(crate) fn stores(&self) -> &[RegionStore] {
        &self.stores
    }

    pub(crate) fn clear(&mut self, mode: ConcurrencyMode) {
        match mode {
            ConcurrencyMode::Sequential => {
                for store in self.stores.iter_mut() {
                    store.clear(mode);
                }
            }
            ConcurrencyMode::Rayon => {
                self.stores[..].par_iter_mut().for_each(|store| store.clear(mode));
            }
        }
    }
}
