//! The backing byte pool.
//!
//! The original simulator acquires its pool with a single `malloc(bytes)`
//! call and tears it down with `free`. Here the host allocation is a plain
//! `Vec<u8>` owned exclusively by `Pool`; engines only ever see borrowed
//! slices of it. Addresses handed out by engines and printed by the dump
//! renderer are offsets into this region (§6: "Addresses are the absolute
//! byte positions within the host-provided region"), not real pointers.

use crate::error::{MemsimError, Result};

/// Owns the simulator's backing bytes.
///
/// Invariant: `bytes.is_some() <=> initialized`.
#[derive(Debug, Default)]
pub struct Pool {
    bytes: Option<Vec<u8>>,
}

impl Pool {
    /// Creates an uninitialized pool.
    pub fn new() -> Self {
        Self { bytes: None }
    }

    /// Whether `init` has been called without a matching `shutdown`.
    pub fn is_initialized(&self) -> bool {
        self.bytes.is_some()
    }

    /// Acquires `total` zeroed bytes from the host.
    ///
    /// Fails with `AlreadyInitialized` if the pool already owns a region.
    pub fn init(&mut self, total: usize) -> Result<()> {
        if self.bytes.is_some() {
            return Err(MemsimError::AlreadyInitialized);
        }
        self.bytes = Some(vec![0u8; total]);
        Ok(())
    }

    /// Releases the backing bytes. Idempotent.
    pub fn shutdown(&mut self) {
        self.bytes = None;
    }

    /// Total size of the pool in bytes, or `0` if uninitialized.
    pub fn total(&self) -> usize {
        self.bytes.as_ref().map_or(0, Vec::len)
    }

    /// Borrows the pool's bytes immutably.
    pub fn bytes(&self) -> Result<&[u8]> {
        self.bytes.as_deref().ok_or(MemsimError::NotInitialized)
    }

    /// Borrows the pool's bytes mutably.
    pub fn bytes_mut(&mut self) -> Result<&mut [u8]> {
        self.bytes.as_deref_mut().ok_or(MemsimError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        let pool = Pool::new();
        assert!(!pool.is_initialized());
        assert_eq!(pool.total(), 0);
    }

    #[test]
    fn init_then_reinit_fails() {
        let mut pool = Pool::new();
        pool.init(1024).unwrap();
        assert_eq!(pool.total(), 1024);
        assert_eq!(pool.init(512), Err(MemsimError::AlreadyInitialized));
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut pool = Pool::new();
        pool.init(64).unwrap();
        pool.shutdown();
        pool.shutdown();
        assert!(!pool.is_initialized());
        assert!(pool.bytes().is_err());
    }

    #[test]
    fn shutdown_then_reinit_succeeds() {
        let mut pool = Pool::new();
        pool.init(64).unwrap();
        pool.shutdown();
        pool.init(128).unwrap();
        assert_eq!(pool.total(), 128);
    }
}
