//! Scenario-level integration tests from §8 of the specification,
//! driven through the public `Simulator` facade rather than the
//! engines directly.

use memsim::engine::Algo;
use memsim::Simulator;
use pretty_assertions::assert_eq;

#[test]
fn s1_first_fit_split_then_free_then_split_again() {
    let mut sim = Simulator::new();
    sim.init(1024).unwrap();
    sim.set_algo(Algo::FirstFit);

    let a = sim.alloc(100);
    let b = sim.alloc(200);
    assert_ne!(a, 0);
    assert_ne!(b, 0);

    sim.free(a).unwrap();

    let blocks: Vec<(usize, usize, bool)> = sim
        .dump_entries()
        .into_iter()
        .map(|e| (e.offset, e.size, e.free))
        .collect();
    assert_eq!(
        blocks,
        vec![(0, 100, true), (100, 200, false), (300, 724, true)]
    );

    let c = sim.alloc(50);
    assert_ne!(c, 0);
    let blocks: Vec<(usize, usize, bool)> = sim
        .dump_entries()
        .into_iter()
        .map(|e| (e.offset, e.size, e.free))
        .collect();
    assert_eq!(
        blocks,
        vec![
            (0, 50, false),
            (50, 50, true),
            (100, 200, false),
            (300, 724, true)
        ]
    );
}

#[test]
fn s4_buddy_splits_down_to_order_five() {
    let mut sim = Simulator::new();
    sim.init(1024).unwrap();
    sim.set_algo(Algo::Buddy);

    let id = sim.alloc(30);
    assert_ne!(id, 0);
    assert_eq!(sim.requested_size(id), Some(30));

    let mut free_sizes: Vec<usize> = sim
        .dump_entries()
        .into_iter()
        .filter(|e| e.free)
        .map(|e| e.size)
        .collect();
    free_sizes.sort_unstable();
    assert_eq!(free_sizes, vec![32, 64, 128, 256, 512]);
}

#[test]
fn s6_amat_across_a_hit_and_an_all_level_miss() {
    let mut sim = Simulator::new();
    sim.init(4096).unwrap();
    sim.set_algo(Algo::FirstFit);

    let id = sim.alloc(64);
    let base = sim.resolve(id).unwrap();

    // Prime the line directly isn't available through the facade, so
    // instead access the same address twice: cold miss, then hit.
    sim.cache_access(base as u64, false);
    let cost_hit = sim.cache_access(base as u64, false);
    assert_eq!(cost_hit, 1);

    let cost_miss = sim.cache_access(1 << 22, false);
    assert_eq!(cost_miss, 126);

    assert_eq!(sim.cache().total_requests, 3);
}

#[test]
fn invalid_size_and_pool_exhaustion_are_reported_via_failure_counter() {
    let mut sim = Simulator::new();
    sim.init(64).unwrap();
    sim.set_algo(Algo::FirstFit);

    assert_eq!(sim.alloc(0), 0);
    assert_eq!(sim.alloc(1024), 0);
    assert_eq!(sim.stats().alloc_failure, 2);
    assert_eq!(sim.stats().alloc_requests, 2);
}

#[test]
fn reverse_lookup_unsupported_on_buddy() {
    let mut sim = Simulator::new();
    sim.init(1024).unwrap();
    sim.set_algo(Algo::Buddy);

    let id = sim.alloc(16);
    let addr = sim.resolve(id).unwrap();
    assert_eq!(sim.reverse_lookup(addr), None);
}

#[test]
fn handle_ids_are_monotonic_and_never_reused() {
    let mut sim = Simulator::new();
    sim.init(1024).unwrap();

    let a = sim.alloc(16);
    let b = sim.alloc(16);
    sim.free(a).unwrap();
    let c = sim.alloc(16);

    assert!(b > a);
    assert!(c > b);
    assert!(sim.free(a).is_err());
}
