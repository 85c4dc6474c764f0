//! Error taxonomy for the simulator's core operations.
//!
//! Every fallible entry point in this crate returns `Result<T, MemsimError>`.
//! The handle API (`Simulator::alloc`, `Simulator::free`, ...) additionally
//! collapses these down to the sentinel-return convention of the original
//! C interface (`0` for a failed allocation, `-1`/`false` for a failed
//! free) at its own boundary, per the external handle API contract.

use thiserror::Error;

/// Errors raised by the pool, engines, and handle API.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemsimError {
    /// `init` was called while a pool was already live.
    #[error("memory pool already initialized")]
    AlreadyInitialized,

    /// An operation that requires a live pool was attempted before `init`.
    #[error("memory pool is not initialized")]
    NotInitialized,

    /// No free region large enough (or no free order high enough) exists.
    #[error("pool exhausted: no region available for {requested} bytes")]
    PoolExhausted {
        /// Bytes that were requested.
        requested: usize,
    },

    /// `alloc(0)` or a buddy request whose order exceeds `max_order`.
    #[error("invalid allocation size: {requested} bytes")]
    InvalidSize {
        /// The offending size.
        requested: usize,
    },

    /// `free`/resolve/reverse-lookup referenced an id that isn't live.
    #[error("unknown allocation handle: {id}")]
    UnknownHandle {
        /// The handle that was not found.
        id: u32,
    },

    /// Pointer-to-id reverse lookup was attempted against the buddy engine.
    #[error("reverse lookup is not supported by the active allocator")]
    UnsupportedReverseLookup,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MemsimError>;
