use crate::core::config::{ConcurrencyMode, CounterConfig};
use crate::core::memory::{AddressCounters, MemoryAccessCounter, RegionLayout};
use crate::core::types::{AddressInfo, MemoryType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

const REGION_LEN: usize = 64;
const ITERATIONS: u64 = 20_000;

fn shared_counter(mode: ConcurrencyMode) -> Arc<MemoryAccessCounter> {
    let _ = env_logger::builder().is_test(true).try_init();
    let layout = RegionLayout::new()
        .with_size(MemoryType::WorkRam, REGION_LEN)
        .with_size(MemoryType::SpcRam, REGION_LEN);
    let config = CounterConfig::new().with_concurrency(mode);
    Arc::new(MemoryAccessCounter::with_sizes(config, &layout).unwrap())
}

#[test]
fn test_snapshots_never_tear() {
    let counter = shared_counter(ConcurrencyMode::Sequential);
    let done = Arc::new(AtomicBool::new(false));

    let producer = {
        let counter = Arc::clone(&counter);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            // One read per clock tick keeps read_count == read_stamp
            for clock in 1..=ITERATIONS {
                counter.process_memory_read(AddressInfo::new(0, MemoryType::WorkRam), clock);
            }
            done.store(true, Ordering::Release);
        })
    };

    let mut buffer = [AddressCounters::default(); 1];
    while !done.load(Ordering::Acquire) {
        counter.get_access_counts(0, 1, MemoryType::WorkRam, &mut buffer);
        assert_eq!(buffer[0].read_count as u64, buffer[0].read_stamp);
        let single = counter.get_counters(AddressInfo::new(0, MemoryType::WorkRam));
        assert_eq!(single.read_count as u64, single.read_stamp);
    }
    producer.join().unwrap();

    assert_eq!(counter.get_read_count(AddressInfo::new(0, MemoryType::WorkRam)), ITERATIONS);
}

#[test]
fn test_concurrent_chips_lose_no_updates() {
    let counter = shared_counter(ConcurrencyMode::Sequential);
    let producers: Vec<_> = (0..4)
        .map(|chip| {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for clock in 1..=ITERATIONS {
                    let address = (clock % REGION_LEN as u64) as i32;
                    // Every chip hits the same cells of both regions
                    counter.process_memory_write(AddressInfo::new(address, MemoryType::WorkRam), clock);
                    if chip % 2 == 0 {
                        counter.process_memory_exec(AddressInfo::new(address, MemoryType::SpcRam), clock);
                    }
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let work_ram = counter.region_stats(MemoryType::WorkRam);
    assert_eq!(work_ram.write_count, 4 * ITERATIONS);
    assert_eq!(work_ram.touched_addresses, REGION_LEN);
    let spc_ram = counter.region_stats(MemoryType::SpcRam);
    assert_eq!(spc_ram.exec_count, 2 * ITERATIONS);
    assert_eq!(spc_ram.write_count, 0);
}

#[test]
fn test_reset_during_emulation() {
    for mode in [ConcurrencyMode::Sequential, ConcurrencyMode::Rayon] {
        let counter = shared_counter(mode);
        let done = Arc::new(AtomicBool::new(false));

        let producer = {
            let counter = Arc::clone(&counter);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                for clock in 1..=ITERATIONS {
                    let address = (clock % REGION_LEN as u64) as i32;
                    counter.process_memory_read(AddressInfo::new(address, MemoryType::WorkRam), clock);
                }
                done.store(true, Ordering::Release);
            })
        };

        let mut buffer = vec![AddressCounters::default(); REGION_LEN];
        let mut polls = 0u32;
        while !done.load(Ordering::Acquire) {
            if polls % 16 == 0 {
                counter.reset_counts();
            }
            counter.get_access_counts(0, REGION_LEN as u32, MemoryType::WorkRam, &mut buffer);
            for record in &buffer {
                // A count without its stamp would be a torn record
                assert!(record.read_stamp >= record.read_count as u64);
                assert!(record.read_count == 0 || record.read_stamp != 0);
            }
            polls += 1;
        }
        producer.join().unwrap();

        counter.reset_counts();
        assert!(counter
            .snapshot(MemoryType::WorkRam, 0, REGION_LEN as u32)
            .counters
            .iter()
            .all(|record| !record.is_touched() && !record.uninit_read));
    }
}
