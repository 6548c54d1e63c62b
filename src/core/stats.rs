use super::memory::counters::AddressCounters;
use super::types::MemoryType;
use serde::{Deserialize, Serialize};

/// Summary of one region for monitoring and heat-map views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStats {
    pub memory_type: MemoryType,
    /// Total number of addresses in the region
    pub total_addresses: usize,
    /// Number of addresses with at least one access
    pub touched_addresses: usize,
    /// Number of addresses flagged with an uninitialized read
    pub uninit_read_addresses: usize,
    pub read_count: u64,
    pub write_count: u64,
    pub exec_count: u64,
    /// Most recent stamp of any access in the region
    pub last_stamp: u64,
    /// Most read address, lowest address on ties
    pub hottest_read: Option<u32>,
}

impl RegionStats {
    /// Create new empty stats for a region
    pub fn new(memory_type: MemoryType, total_addresses: usize) -> Self {
        Self {
            memory_type,
            total_addresses,
            touched_addresses: 0,
            uninit_read_addresses: 0,
            read_count: 0,
            write_count: 0,
            exec_count: 0,
            last_stamp: 0,
            hottest_read: None,
        }
    }

    /// Summarize a sequence of records
    pub fn collect(
        memory_type: MemoryType,
        total_addresses: usize,
        records: impl IntoIterator<Item = AddressCounters>,
    ) -> Self {
        let mut stats = Self::new(memory_type, total_addresses);
        let mut hottest = 0u32;
        for record in records {
            stats.add(&record);
            if record.read_count > hottest {
                hottest = record.read_count;
                stats.hottest_read = Some(record.address);
            }
        }
        stats
    }

    /// Accumulate one record
    pub fn add(&mut self, record: &AddressCounters) {
        if record.is_touched() {
            self.touched_addresses += 1;
        }
        if record.uninit_read {
            self.uninit_read_addresses += 1;
        }
        self.read_count += record.read_count as u64;
        self.write_count += record.write_count as u64;
        self.exec_count += record.exec_count as u64;
        self.last_stamp = self.last_stamp.max(record.last_stamp());
    }

    /// Fraction of addresses touched, 0.0 for an empty region
    pub fn coverage(&self) -> f64 {
        if self.total_addresses == 0 {
            0.0
        } else {
            self.touched_addresses as f64 / self.total_addresses as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: u32, reads: u32, writes: u32, uninit: bool) -> AddressCounters {
        AddressCounters {
            read_count: reads,
            read_stamp: if reads > 0 { address as u64 + 10 } else { 0 },
            write_count: writes,
            write_stamp: if writes > 0 { address as u64 + 20 } else { 0 },
            uninit_read: uninit,
            ..AddressCounters::empty(address)
        }
    }

    #[test]
    fn test_collect() {
        let records = vec![
            record(0, 3, 0, true),
            record(1, 0, 0, false),
            record(2, 5, 1, false),
            record(3, 5, 0, true),
        ];
        let stats = RegionStats::collect(MemoryType::WorkRam, 4, records);
        assert_eq!(stats.touched_addresses, 3);
        assert_eq!(stats.uninit_read_addresses, 2);
        assert_eq!(stats.read_count, 13);
        assert_eq!(stats.write_count, 1);
        assert_eq!(stats.exec_count, 0);
        assert_eq!(stats.last_stamp, 22);
        assert_eq!(stats.hottest_read, Some(2));
        assert!((stats.coverage() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_region() {
        let stats = RegionStats::collect(MemoryType::Cx4DataRam, 0, Vec::new());
        assert_eq!(stats, RegionStats::new(MemoryType::Cx4DataRam, 0));
        assert_eq!(stats.hottest_read, None);
        assert_eq!(stats.coverage(), 0.0);
    }
}
