/*!
 * Queue Membership Invariants
 * Random workloads checked after every tick through the read-only views
 */

use os_emulator::{Dispatcher, ProcessState, QueueLocation, SchedulerConfig, SchedulingPolicy};
use proptest::prelude::*;
use std::collections::HashMap;

fn check(d: &Dispatcher) -> Result<(), TestCaseError> {
    let mut seen: HashMap<u32, QueueLocation> = HashMap::new();

    for pid in d.ready_queue() {
        prop_assert!(seen.insert(pid, QueueLocation::Ready).is_none());
    }
    for pid in d.sleeping() {
        prop_assert!(seen.insert(pid, QueueLocation::Sleeping).is_none());
    }
    for core in d.cores() {
        if let Some(pid) = core.current() {
            prop_assert!(seen.insert(pid, QueueLocation::Core(core.id())).is_none());
        }
    }

    for process in d.processes() {
        let location = seen.get(&process.pid()).copied();
        match process.state() {
            ProcessState::Finished => prop_assert_eq!(location, None),
            ProcessState::Ready => prop_assert_eq!(location, Some(QueueLocation::Ready)),
            ProcessState::Sleeping => prop_assert_eq!(location, Some(QueueLocation::Sleeping)),
            ProcessState::Running => {
                prop_assert_eq!(location, process.assigned_core().map(QueueLocation::Core));
                prop_assert!(process.assigned_core().is_some());
            }
        }
        prop_assert!(process.program_counter() <= process.total_lines());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_each_process_in_exactly_one_place(
        seed in any::<u64>(),
        cpus in 1u32..=4,
        rr in any::<bool>(),
        quantum in 1u32..=4,
        freq in 1u32..=3,
        delay in 0u32..=2,
        ticks in 10usize..60,
    ) {
        let policy = if rr { SchedulingPolicy::RoundRobin } else { SchedulingPolicy::Fcfs };
        let config = SchedulerConfig::default()
            .with_num_cpu(cpus)
            .with_scheduler(policy)
            .with_quantum(quantum)
            .with_batch_freq(freq)
            .with_delay(delay)
            .with_instruction_bounds(1, 12);
        let mut d = Dispatcher::with_seed(config, seed).unwrap();
        d.generate_batch(3);
        d.start();

        for _ in 0..ticks {
            d.tick();
            check(&d)?;
        }

        d.stop();
        for _ in 0..10_000 {
            if d.is_idle() {
                break;
            }
            d.tick();
            check(&d)?;
        }
        prop_assert!(d.is_idle());
        prop_assert!(d.processes().iter().all(|p| p.is_finished()));
    }
}
