//! Placement engine selection and dispatch.
//!
//! §9's DESIGN NOTES calls for "a sum type `{ListFirst, ListBest,
//! ListWorst, Buddy}` whose associated state is the corresponding
//! engine; dispatch is by variant match." The three list policies share
//! one representation (`ListEngine`, parameterized by `FitPolicy`) since
//! they differ only in block selection, not in data layout — splitting
//! that into three structurally-identical variants would just be
//! indirection with no state of its own to carry.

pub mod buddy;
pub mod list;

use crate::error::{MemsimError, Result};
use buddy::BuddyEngine;
use list::{FitPolicy, ListEngine};

/// Placement algorithm selector, exposed via `set_algo`/`get_algo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algo {
    FirstFit,
    BestFit,
    WorstFit,
    Buddy,
}

impl Algo {
    fn fit_policy(self) -> Option<FitPolicy> {
        match self {
            Algo::FirstFit => Some(FitPolicy::First),
            Algo::BestFit => Some(FitPolicy::Best),
            Algo::WorstFit => Some(FitPolicy::Worst),
            Algo::Buddy => None,
        }
    }
}

/// One block's worth of dump-renderer input.
#[derive(Debug, Clone, Copy)]
pub struct DumpEntry {
    pub offset: usize,
    pub size: usize,
    pub free: bool,
}

/// Derived, engine-agnostic usage counters for the stats collector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub used_bytes: usize,
    pub free_bytes: usize,
    pub used_blocks: usize,
    pub free_blocks: usize,
    pub largest_free: usize,
    pub internal_fragmentation: usize,
}

/// The active placement-and-coalescing engine.
pub enum Engine {
    List(ListEngine),
    Buddy(BuddyEngine),
}

impl Engine {
    /// Builds the engine for `algo` over `pool[..total]` from scratch.
    pub fn new(algo: Algo, pool: &mut [u8], total: usize) -> Self {
        match algo.fit_policy() {
            Some(policy) => Engine::List(ListEngine::new(policy, total)),
            None => Engine::Buddy(BuddyEngine::new(pool, total)),
        }
    }

    pub fn algo(&self) -> Algo {
        match self {
            Engine::List(e) => match e.policy() {
                FitPolicy::First => Algo::FirstFit,
                FitPolicy::Best => Algo::BestFit,
                FitPolicy::Worst => Algo::WorstFit,
            },
            Engine::Buddy(_) => Algo::Buddy,
        }
    }

    pub fn alloc(&mut self, pool: &mut [u8], bytes: usize) -> Result<u32> {
        match self {
            Engine::List(e) => e.alloc(bytes),
            Engine::Buddy(e) => e.alloc(pool, bytes),
        }
    }

    pub fn free(&mut self, pool: &mut [u8], id: u32) -> Result<()> {
        match self {
            Engine::List(e) => e.free(id),
            Engine::Buddy(e) => e.free(pool, id),
        }
    }

    pub fn resolve(&self, pool: &[u8], id: u32) -> Option<usize> {
        match self {
            Engine::List(e) => e.resolve(id),
            Engine::Buddy(e) => e.resolve(pool, id),
        }
    }

    pub fn requested_size(&self, pool: &[u8], id: u32) -> Option<usize> {
        match self {
            Engine::List(e) => e.requested_size(id),
            Engine::Buddy(e) => e.requested_size(pool, id),
        }
    }

    /// Pointer (offset) to handle reverse lookup. Supported by the list
    /// engine only; buddy raises `UnsupportedReverseLookup`.
    pub fn reverse_lookup(&self, offset: usize) -> Result<Option<u32>> {
        match self {
            Engine::List(e) => Ok(e.reverse_lookup(offset)),
            Engine::Buddy(_) => Err(MemsimError::UnsupportedReverseLookup),
        }
    }

    pub fn dump_entries(&self, pool: &[u8]) -> Vec<DumpEntry> {
        match self {
            Engine::List(e) => e
                .blocks()
                .iter()
                .map(|b| DumpEntry {
                    offset: b.offset,
                    size: b.size,
                    free: b.free,
                })
                .collect(),
            Engine::Buddy(e) => e
                .walk(pool)
                .map(|(offset, order, id)| DumpEntry {
                    offset,
                    size: 1usize << order,
                    free: id == 0,
                })
                .collect(),
        }
    }

    pub fn usage(&self, pool: &[u8]) -> Usage {
        let mut usage = Usage::default();
        match self {
            Engine::List(e) => {
                for b in e.blocks() {
                    if b.free {
                        usage.free_blocks += 1;
                        usage.free_bytes += b.size;
                        usage.largest_free = usage.largest_free.max(b.size);
                    } else {
                        usage.used_blocks += 1;
                        usage.used_bytes += b.size;
                    }
                }
            }
            Engine::Buddy(e) => {
                for (_, order, id) in e.walk(pool) {
                    let size = 1usize << order;
                    if id == 0 {
                        usage.free_blocks += 1;
                        usage.free_bytes += size;
                        usage.largest_free = usage.largest_free.max(size);
                    } else {
                        usage.used_blocks += 1;
                        let requested = e
                            .requested_size(pool, id)
                            .unwrap_or(0);
                        usage.used_bytes += requested;
                        usage.internal_fragmentation += size - requested;
                    }
                }
            }
        }
        usage
    }
}
