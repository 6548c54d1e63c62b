use serde::{Deserialize, Serialize};
use std::sync::atomic::{fence, AtomicBool, AtomicU32, AtomicU64, Ordering};

/// Access statistics for one address, as returned to callers.
///
/// Counts wrap on overflow. A stamp is the master clock value of the most
/// recent access of that kind; zero with a zero count means never accessed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCounters {
    pub address: u32,
    pub read_count: u32,
    pub read_stamp: u64,
    /// Read observed before any write or exec. Sticky until reset.
    pub uninit_read: bool,
    pub write_count: u32,
    pub write_stamp: u64,
    pub exec_count: u32,
    pub exec_stamp: u64,
}

impl AddressCounters {
    /// Zeroed record for an address
    pub fn empty(address: u32) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    /// Whether any access of any kind has been recorded
    pub fn is_touched(&self) -> bool {
        self.read_count != 0 || self.write_count != 0 || self.exec_count != 0
    }

    /// Total accesses of all kinds
    pub fn total(&self) -> u64 {
        self.read_count as u64 + self.write_count as u64 + self.exec_count as u64
    }

    /// Most recent stamp of any kind
    pub fn last_stamp(&self) -> u64 {
        self.read_stamp.max(self.write_stamp).max(self.exec_stamp)
    }
}

/// Concurrently readable storage for one address.
///
/// A sequence lock: writers claim the cell by moving `seq` from even to odd
/// and publish by moving it to the next even value. Readers retry until they
/// observe the same even value before and after copying the fields.
#[derive(Debug, Default)]
pub(crate) struct CounterCell {
    seq: AtomicU32,
    read_count: AtomicU32,
    read_stamp: AtomicU64,
    uninit_read: AtomicBool,
    write_count: AtomicU32,
    write_stamp: AtomicU64,
    exec_count: AtomicU32,
    exec_stamp: AtomicU64,
}

impl CounterCell {
    /// Apply `f` to the record while holding the cell's write side.
    ///
    /// `address` only fills the record handed to `f`; it is not stored.
    #[inline]
    pub(crate) fn modify<R>(&self, address: u32, f: impl FnOnce(&mut AddressCounters) -> R) -> R {
        let seq = self.lock();
        // Field stores must not become visible before the odd sequence
        fence(Ordering::Release);
        let mut record = self.load_fields(address);
        let result = f(&mut record);
        self.store_fields(&record);
        self.seq.store(seq.wrapping_add(2), Ordering::Release);
        result
    }

    /// Copy the record without tearing
    pub(crate) fn snapshot(&self, address: u32) -> AddressCounters {
        loop {
            let before = self.seq.load(Ordering::Acquire);
            if before & 1 == 0 {
                let record = self.load_fields(address);
                fence(Ordering::Acquire);
                if self.seq.load(Ordering::Relaxed) == before {
                    return record;
                }
            }
            std::hint::spin_loop();
        }
    }

    /// Current read count. A single field cannot tear.
    #[inline]
    pub(crate) fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }

    /// Zero every field. Requires exclusive access.
    pub(crate) fn clear(&mut self) {
        *self.read_count.get_mut() = 0;
        *self.read_stamp.get_mut() = 0;
        *self.uninit_read.get_mut() = false;
        *self.write_count.get_mut() = 0;
        *self.write_stamp.get_mut() = 0;
        *self.exec_count.get_mut() = 0;
        *self.exec_stamp.get_mut() = 0;
    }

    fn lock(&self) -> u32 {
        loop {
            let seq = self.seq.load(Ordering::Relaxed);
            if seq & 1 == 0
                && self
                    .seq
                    .compare_exchange_weak(seq, seq.wrapping_add(1), Ordering::Acquire, Ordering::Relaxed)
                    .is_ok()
            {
                return seq;
            }
            std::hint::spin_loop();
        }
    }

    fn load_fields(&self, address: u32) -> AddressCounters {
        AddressCounters {
            address,
            read_count: self.read_count.load(Ordering::Relaxed),
            read_stamp: self.read_stamp.load(Ordering::Relaxed),
            uninit_read: self.uninit_read.load(Ordering::Relaxed),
            write_count: self.write_count.load(Ordering::Relaxed),
            write_stamp: self.write_stamp.load(Ordering::Relaxed),
            exec_count: self.exec_count.load(Ordering::Relaxed),
            exec_stamp: self.exec_stamp.load(Ordering::Relaxed),
        }
    }

    fn store_fields(&self, record: &AddressCounters) {
        self.read_count.store(record.read_count, Ordering::Relaxed);
        self.read_stamp.store(record.read_stamp, Ordering::Relaxed);
        self.uninit_read.store(record.uninit_read, Ordering::Relaxed);
        self.write_count.store(record.write_count, Ordering::Relaxed);
        self.write_stamp.store(record.write_stamp, Ordering::Relaxed);
        self.exec_count.store(record.exec_count, Ordering::Relaxed);
        self.exec_stamp.store(record.exec_stamp, Ordering::Relaxed);
    }
}
