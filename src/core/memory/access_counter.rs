use super::super::config::{ConcurrencyMode, CounterConfig};
use super::super::stats::RegionStats;
use super::super::types::{AddressInfo, MemoryType, SessionId};
use super::counters::{AddressCounters, CounterCell};
use super::detector::UninitReadDetector;
use super::errors::CounterError;
use super::layout::MemorySizes;
use super::region::{RegionStore, RegionTable};
use log::{debug, info, trace, warn};
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Copy of a contiguous range of counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessSnapshot {
    /// Layout the snapshot was taken from
    pub session: SessionId,
    pub memory_type: MemoryType,
    pub counters: Vec<AddressCounters>,
}

struct CounterState {
    regions: RegionTable,
    session: SessionId,
}

/// Records every read, write and exec against physical memory and answers
/// per-address count queries for the debugger.
///
/// Counting calls share a reader lock and update one address cell each, so
/// they never wait on each other or on queries. Reset and re-layout take the
/// lock exclusively.
pub struct MemoryAccessCounter {
    state: RwLock<CounterState>,
    config: CounterConfig,
    detector: UninitReadDetector,
    pool: Option<rayon::ThreadPool>,
}

impl MemoryAccessCounter {
    /// Create a counter with every region unsized
    pub fn new(config: CounterConfig) -> Self {
        let pool = Self::build_pool(&config);
        Self {
            state: RwLock::new(CounterState {
                regions: RegionTable::new(),
                session: SessionId::new(),
            }),
            detector: UninitReadDetector::from_config(&config),
            config,
            pool,
        }
    }

    /// Create a counter sized for the loaded hardware configuration
    pub fn with_sizes(config: CounterConfig, sizes: &dyn MemorySizes) -> Result<Self, CounterError> {
        let counter = Self::new(config);
        counter.configure(sizes)?;
        Ok(counter)
    }

    fn build_pool(config: &CounterConfig) -> Option<rayon::ThreadPool> {
        let size = match (config.concurrency_mode, config.thread_pool_size) {
            (ConcurrencyMode::Rayon, Some(size)) => size,
            _ => return None,
        };
        match rayon::ThreadPoolBuilder::new().num_threads(size).build() {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("Failed to build {} thread pool, using global pool: {}", size, e);
                None
            }
        }
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Lay out every region for a new session, dropping all statistics.
    ///
    /// Nothing changes if any region is too large.
    pub fn configure(&self, sizes: &dyn MemorySizes) -> Result<SessionId, CounterError> {
        let regions = RegionTable::from_sizes(sizes)?;
        for store in regions.iter().filter(|store| store.len() > 0) {
            debug!("Region {} sized to {} bytes", store.memory_type(), store.len());
        }

        let session = SessionId::new();
        let mut state = self.state.write();
        state.regions = regions;
        state.session = session;
        info!("Started access counter session {}", session);
        Ok(session)
    }

    /// Size one region.
    ///
    /// Meant for load time; resizing a region that already holds counts
    /// discards them.
    pub fn resize_region(&self, memory_type: MemoryType, len: usize) -> Result<(), CounterError> {
        let store = RegionStore::with_len(memory_type, len)?;
        self.state.write().regions.replace(store);
        debug!("Region {} sized to {} bytes", memory_type, len);
        Ok(())
    }

    pub fn region_size(&self, memory_type: MemoryType) -> usize {
        self.state.read().regions.get(memory_type).len()
    }

    pub fn session_id(&self) -> SessionId {
        self.state.read().session
    }

    #[inline]
    fn with_cell<R>(&self, info: AddressInfo, f: impl FnOnce(&CounterCell, u32) -> R) -> Option<R> {
        let offset = info.offset()?;
        let state = self.state.read();
        match state.regions.get(info.memory_type).cell(offset) {
            Some(cell) => Some(f(cell, offset as u32)),
            None => {
                trace!("Dropped access outside sized region: {}", info);
                None
            }
        }
    }

    /// Record a read.
    ///
    /// Returns true only for the read that first flags the address as read
    /// before initialization.
    pub fn process_memory_read(&self, info: AddressInfo, master_clock: u64) -> bool {
        let detector = self.detector;
        self.with_cell(info, |cell, address| {
            cell.modify(address, |record| {
                record.read_count = record.read_count.wrapping_add(1);
                record.read_stamp = master_clock;
                detector.on_read(info.memory_type, record)
            })
        })
        .unwrap_or(false)
    }

    /// Record a write. Does not clear an earlier uninitialized-read flag.
    pub fn process_memory_write(&self, info: AddressInfo, master_clock: u64) {
        self.with_cell(info, |cell, address| {
            cell.modify(address, |record| {
                record.write_count = record.write_count.wrapping_add(1);
                record.write_stamp = master_clock;
            })
        });
    }

    /// Record an instruction fetch
    pub fn process_memory_exec(&self, info: AddressInfo, master_clock: u64) {
        self.with_cell(info, |cell, address| {
            cell.modify(address, |record| {
                record.exec_count = record.exec_count.wrapping_add(1);
                record.exec_stamp = master_clock;
            })
        });
    }

    /// Read count for an address, 0 when it is outside any sized region
    pub fn get_read_count(&self, info: AddressInfo) -> u64 {
        self.with_cell(info, |cell, _| cell.read_count() as u64)
            .unwrap_or(0)
    }

    /// Copy of one address's counters, zeroed when outside any sized region
    pub fn get_counters(&self, info: AddressInfo) -> AddressCounters {
        self.with_cell(info, |cell, address| cell.snapshot(address))
            .unwrap_or_else(|| AddressCounters::empty(info.offset().unwrap_or(0) as u32))
    }

    /// Fill `counts` with copies of `[offset, offset + length)`.
    ///
    /// At most `counts.len()` entries are written. Entries outside the region
    /// are zeroed records carrying their address.
    pub fn get_access_counts(
        &self,
        offset: u32,
        length: u32,
        memory_type: MemoryType,
        counts: &mut [AddressCounters],
    ) {
        let len = counts.len().min(length as usize);
        let state = self.state.read();
        state
            .regions
            .get(memory_type)
            .snapshot_into(offset, &mut counts[..len]);
    }

    /// Freshly allocated copy of `[offset, offset + length)`.
    ///
    /// Only addresses inside the region are returned, so the allocation is
    /// bounded by the region size whatever `length` the caller asks for.
    pub fn snapshot(&self, memory_type: MemoryType, offset: u32, length: u32) -> AccessSnapshot {
        let state = self.state.read();
        let store = state.regions.get(memory_type);
        let mut counters = vec![AddressCounters::default(); store.span(offset, length)];
        store.snapshot_into(offset, &mut counters);
        AccessSnapshot {
            session: state.session,
            memory_type,
            counters,
        }
    }

    /// Zero every counter, stamp and flag in every region.
    /// Waits for in-flight counting calls and blocks new ones until done.
    pub fn reset_counts(&self) {
        let mode = self.config.concurrency_mode;
        let mut state = self.state.write();
        let regions = &mut state.regions;
        self.run_bulk(|| regions.clear(mode));
        info!("Reset access counters for session {}", state.session);
    }

    /// Summary of one region
    pub fn region_stats(&self, memory_type: MemoryType) -> RegionStats {
        let state = self.state.read();
        let store = state.regions.get(memory_type);
        RegionStats::collect(memory_type, store.len(), store.snapshots())
    }

    /// Summaries of every sized region in ordinal order
    pub fn all_region_stats(&self) -> Vec<RegionStats> {
        let state = self.state.read();
        let stores = state.regions.stores();
        let summarize =
            |store: &RegionStore| RegionStats::collect(store.memory_type(), store.len(), store.snapshots());
        match self.config.concurrency_mode {
            ConcurrencyMode::Sequential => stores
                .iter()
                .filter(|store| store.len() > 0)
                .map(summarize)
                .collect(),
            ConcurrencyMode::Rayon => self.run_bulk(|| {
                stores
                    .par_iter()
                    .filter(|store| store.len() > 0)
                    .map(summarize)
                    .collect()
            }),
        }
    }

    fn run_bulk<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl Default for MemoryAccessCounter {
    fn default() -> Self {
        Self::new(CounterConfig::default())
    }
}
