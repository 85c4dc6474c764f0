//! Optional bump-arena helper.
//!
//! Grounded in `my_sbrk.c`: "Optional small arena helper (not required
//! by allocator which uses malloc). Provided for completeness." Not
//! part of the core per §1 — it has no interaction with `Simulator`,
//! the engines, or the cache; it's a standalone `sbrk`-style bump
//! allocator over its own buffer.

/// A bump-pointer arena with no free operation, mirroring `my_sbrk.c`.
#[derive(Debug)]
pub struct Arena {
    buffer: Vec<u8>,
    offset: usize,
}

impl Arena {
    /// Allocates `size` bytes for the arena to bump-allocate from.
    pub fn new(size: usize) -> Self {
        Self {
            buffer: vec![0u8; size],
            offset: 0,
        }
    }

    /// Bumps the arena pointer by `inc` bytes and returns the offset of
    /// the region handed out, or `None` if the arena is exhausted.
    pub fn sbrk(&mut self, inc: usize) -> Option<usize> {
        let start = self.offset;
        let end = start.checked_add(inc)?;
        if end > self.buffer.len() {
            return None;
        }
        self.offset = end;
        Some(start)
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn used(&self) -> usize {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bumps_and_exhausts() {
        let mut arena = Arena::new(16);
        assert_eq!(arena.sbrk(10), Some(0));
        assert_eq!(arena.sbrk(6), Some(10));
        assert_eq!(arena.sbrk(1), None);
        assert_eq!(arena.used(), 16);
    }
}
