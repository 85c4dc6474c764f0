//! Contiguous-list placement engine: first-fit, best-fit, worst-fit.
//!
//! Grounded in `allocator/allocator.c` + `allocator/{first,best,worst}_fit.c`
//! from the original simulator: a single offset-sorted, gap-free list of
//! out-of-band descriptors, searched by the active fit policy and
//! split/coalesced in place.

use crate::error::{MemsimError, Result};

/// Which end of the size-ordering a match is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPolicy {
    First,
    Best,
    Worst,
}

/// One descriptor in the sorted, gap-free block list.
///
/// `requested_size == 0` iff `free`; `id == 0` iff `free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub offset: usize,
    pub size: usize,
    pub requested_size: usize,
    pub free: bool,
    pub id: u32,
}

/// The first/best/worst-fit engine.
#[derive(Debug)]
pub struct ListEngine {
    policy: FitPolicy,
    blocks: Vec<Block>,
    next_id: u32,
}

impl ListEngine {
    /// Builds a fresh engine covering `[0, total)` as one free block.
    pub fn new(policy: FitPolicy, total: usize) -> Self {
        Self {
            policy,
            blocks: vec![Block {
                offset: 0,
                size: total,
                requested_size: 0,
                free: true,
                id: 0,
            }],
            next_id: 1,
        }
    }

    pub fn policy(&self) -> FitPolicy {
        self.policy
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Scans for a free block of sufficient size under the active policy.
    fn find(&self, bytes: usize) -> Option<usize> {
        let mut chosen: Option<usize> = None;

        for (i, b) in self.blocks.iter().enumerate() {
            if !b.free || b.size < bytes {
                continue;
            }
            match self.policy {
                FitPolicy::First => return Some(i),
                FitPolicy::Best => {
                    if chosen.map_or(true, |c| b.size < self.blocks[c].size) {
                        chosen = Some(i);
                    }
                }
                FitPolicy::Worst => {
                    if chosen.map_or(true, |c| b.size > self.blocks[c].size) {
                        chosen = Some(i);
                    }
                }
            }
        }
        chosen
    }

    /// Allocates `bytes`, splitting the chosen block if it is larger than
    /// requested. Returns the new handle.
    pub fn alloc(&mut self, bytes: usize) -> Result<u32> {
        if bytes == 0 {
            return Err(MemsimError::InvalidSize { requested: bytes });
        }

        let idx = self
            .find(bytes)
            .ok_or(MemsimError::PoolExhausted { requested: bytes })?;

        let block = self.blocks[idx];
        if block.size > bytes {
            let remainder = Block {
                offset: block.offset + bytes,
                size: block.size - bytes,
                requested_size: 0,
                free: true,
                id: 0,
            };
            self.blocks.insert(idx + 1, remainder);
            self.blocks[idx].size = bytes;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.blocks[idx].free = false;
        self.blocks[idx].id = id;
        self.blocks[idx].requested_size = bytes;

        Ok(id)
    }

    /// Frees `id`, then coalesces with the right neighbor (if free) and
    /// then the left neighbor (if free) — at most once per side, which
    /// suffices given the no-adjacent-free invariant held beforehand.
    pub fn free(&mut self, id: u32) -> Result<()> {
        let idx = self
            .blocks
            .iter()
            .position(|b| !b.free && b.id == id)
            .ok_or(MemsimError::UnknownHandle { id })?;

        self.blocks[idx].free = true;
        self.blocks[idx].id = 0;
        self.blocks[idx].requested_size = 0;

        if idx + 1 < self.blocks.len() && self.blocks[idx + 1].free {
            let absorbed = self.blocks.remove(idx + 1);
            self.blocks[idx].size += absorbed.size;
        }

        if idx > 0 && self.blocks[idx - 1].free {
            let absorbed = self.blocks.remove(idx);
            self.blocks[idx - 1].size += absorbed.size;
        }

        Ok(())
    }

    /// Payload offset for a live handle.
    pub fn resolve(&self, id: u32) -> Option<usize> {
        self.blocks
            .iter()
            .find(|b| !b.free && b.id == id)
            .map(|b| b.offset)
    }

    /// Bytes the caller originally requested for a live handle.
    pub fn requested_size(&self, id: u32) -> Option<usize> {
        self.blocks
            .iter()
            .find(|b| !b.free && b.id == id)
            .map(|b| b.requested_size)
    }

    /// Pointer (offset) to handle reverse lookup — supported for list
    /// engines (unlike buddy).
    pub fn reverse_lookup(&self, offset: usize) -> Option<u32> {
        self.blocks
            .iter()
            .find(|b| !b.free && b.offset == offset)
            .map(|b| b.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(engine: &ListEngine) -> Vec<(usize, usize, bool)> {
        engine.blocks().iter().map(|b| (b.offset, b.size, b.free)).collect()
    }

    #[test]
    fn alloc_zero_fails() {
        let mut e = ListEngine::new(FitPolicy::First, 1024);
        assert_eq!(e.alloc(0), Err(MemsimError::InvalidSize { requested: 0 }));
    }

    #[test]
    fn s1_first_fit_split_and_coalesce() {
        let mut e = ListEngine::new(FitPolicy::First, 1024);
        let a = e.alloc(100).unwrap();
        let b = e.alloc(200).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);

        e.free(a).unwrap();
        assert_eq!(
            sizes(&e),
            vec![(0, 100, true), (100, 200, false), (300, 724, true)]
        );

        let c = e.alloc(50).unwrap();
        assert_eq!(c, 3);
        assert_eq!(
            sizes(&e),
            vec![
                (0, 50, false),
                (50, 50, true),
                (100, 200, false),
                (300, 724, true)
            ]
        );
    }

    #[test]
    fn s2_best_fit_ties_to_lowest_offset() {
        // Build holes of 80, 50, 50 at offsets 0, 100, 200 with used gaps
        // in between, by allocating a 300-byte pool as alternating
        // used/free blocks directly.
        let mut e = ListEngine::new(FitPolicy::Best, 300);
        e.blocks = vec![
            Block { offset: 0, size: 80, requested_size: 0, free: true, id: 0 },
            Block { offset: 80, size: 20, requested_size: 20, free: false, id: 10 },
            Block { offset: 100, size: 50, requested_size: 0, free: true, id: 0 },
            Block { offset: 150, size: 50, requested_size: 50, free: false, id: 11 },
            Block { offset: 200, size: 50, requested_size: 0, free: true, id: 0 },
            Block { offset: 250, size: 50, requested_size: 50, free: false, id: 12 },
        ];
        e.next_id = 13;

        let idx = e.find(40).unwrap();
        assert_eq!(e.blocks[idx].offset, 100);
    }

    #[test]
    fn s3_coalesce_both_sides() {
        let mut e = ListEngine::new(FitPolicy::First, 300);
        e.blocks = vec![
            Block { offset: 0, size: 100, requested_size: 0, free: true, id: 0 },
            Block { offset: 100, size: 100, requested_size: 100, free: false, id: 5 },
            Block { offset: 200, size: 100, requested_size: 0, free: true, id: 0 },
        ];
        e.next_id = 6;

        e.free(5).unwrap();
        assert_eq!(sizes(&e), vec![(0, 300, true)]);
    }

    #[test]
    fn free_unknown_handle_errors() {
        let mut e = ListEngine::new(FitPolicy::First, 64);
        assert_eq!(e.free(42), Err(MemsimError::UnknownHandle { id: 42 }));
    }

    #[test]
    fn pool_exhausted_when_no_fit() {
        let mut e = ListEngine::new(FitPolicy::First, 16);
        assert_eq!(
            e.alloc(32),
            Err(MemsimError::PoolExhausted { requested: 32 })
        );
    }

    #[test]
    fn ids_are_monotonic_and_unique() {
        let mut e = ListEngine::new(FitPolicy::First, 1024);
        let a = e.alloc(10).unwrap();
        let b = e.alloc(10).unwrap();
        e.free(a).unwrap();
        let c = e.alloc(10).unwrap();
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn resolve_and_reverse_lookup_round_trip() {
        let mut e = ListEngine::new(FitPolicy::First, 1024);
        let id = e.alloc(64).unwrap();
        let offset = e.resolve(id).unwrap();
        assert_eq!(e.reverse_lookup(offset), Some(id));

        e.free(id).unwrap();
        assert_eq!(e.resolve(id), None);
        assert!(e.free(id).is_err());
    }
}
