//! `memsim` — a user-space memory-allocation simulator with a
//! three-level CPU cache model.
//!
//! The crate is organized around [`Simulator`], which owns a single
//! [`pool::Pool`], the currently active [`engine::Engine`] (first-fit,
//! best-fit, worst-fit, or buddy), an allocation [`stats::Stats`]
//! collector, and a cache [`cache::Controller`]. Exactly one engine is
//! active at a time; switching engines rebuilds engine-internal state
//! over the same pool bytes and invalidates any live handles.
//!
//! Per §5, this is single-threaded and non-reentrant: `Simulator` keeps
//! no global state of its own. The `memsim-cli` binary owns one
//! `Simulator` locally in its REPL loop rather than reaching for a
//! process-wide singleton, since nothing here is ever accessed
//! concurrently.

pub mod arena;
pub mod cache;
pub mod dump;
pub mod engine;
pub mod error;
pub mod malloc_facade;
pub mod pool;
pub mod stats;

use engine::{Algo, Engine};
use error::{MemsimError, Result};
use pool::Pool;
use stats::{DerivedMetrics, Stats};
use tracing::{debug, trace};

/// Ties the pool, active engine, stats collector and cache controller
/// together behind the §6 handle API.
pub struct Simulator {
    pool: Pool,
    engine: Option<Engine>,
    algo: Algo,
    stats: Stats,
    cache: cache::Controller,
}

impl Simulator {
    /// A simulator with no pool yet; `init` must be called before
    /// allocating.
    pub fn new() -> Self {
        Self {
            pool: Pool::new(),
            engine: None,
            algo: Algo::FirstFit,
            stats: Stats::new(),
            cache: cache::Controller::new(),
        }
    }

    /// Acquires `total` bytes from the host and builds the active
    /// engine over the whole region as one free block. Resets the
    /// stats counters and the cache hierarchy.
    pub fn init(&mut self, total: usize) -> Result<()> {
        self.pool.init(total)?;
        let bytes = self.pool.bytes_mut()?;
        self.engine = Some(Engine::new(self.algo, bytes, total));
        self.stats.reset();
        self.cache = cache::Controller::new();
        debug!(total, algo = ?self.algo, "pool initialized");
        Ok(())
    }

    /// Releases the pool, engine, and cache state. Idempotent.
    pub fn shutdown(&mut self) {
        self.pool.shutdown();
        self.engine = None;
        self.cache = cache::Controller::new();
        debug!("pool shut down");
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.is_initialized()
    }

    /// Switches the active policy. A no-op if unchanged; otherwise
    /// tears down the current engine's state and rebuilds the new one
    /// over the same pool bytes from scratch. All live handles become
    /// invalid.
    pub fn set_algo(&mut self, algo: Algo) {
        if algo == self.algo {
            return;
        }
        self.algo = algo;
        if self.pool.is_initialized() {
            let total = self.pool.total();
            if let Ok(bytes) = self.pool.bytes_mut() {
                self.engine = Some(Engine::new(algo, bytes, total));
            }
        }
        debug!(algo = ?algo, "allocator strategy switched");
    }

    pub fn get_algo(&self) -> Algo {
        self.algo
    }

    /// Allocates `n` bytes, returning the new handle or `0` on failure
    /// (`n == 0`, no pool, or no suitable region). Counter updates
    /// happen on every call, successful or not.
    pub fn alloc(&mut self, n: usize) -> u32 {
        self.stats.record_alloc_attempt();

        let result = self.try_alloc(n);
        match result {
            Ok(id) => {
                self.stats.record_alloc_success();
                trace!(id, n, "alloc succeeded");
                id
            }
            Err(err) => {
                self.stats.record_alloc_failure();
                trace!(n, error = %err, "alloc failed");
                0
            }
        }
    }

    fn try_alloc(&mut self, n: usize) -> Result<u32> {
        let engine = self.engine.as_mut().ok_or(MemsimError::NotInitialized)?;
        let bytes = self.pool.bytes_mut()?;
        engine.alloc(bytes, n)
    }

    /// Frees `id`. Errors if `id` is not currently live.
    pub fn free(&mut self, id: u32) -> Result<()> {
        let engine = self.engine.as_mut().ok_or(MemsimError::NotInitialized)?;
        let bytes = self.pool.bytes_mut()?;
        engine.free(bytes, id)?;
        self.stats.record_free();
        trace!(id, "freed");
        Ok(())
    }

    /// Payload address (an offset into the pool) for a live handle.
    pub fn resolve(&self, id: u32) -> Option<usize> {
        let bytes = self.pool.bytes().ok()?;
        self.engine.as_ref()?.resolve(bytes, id)
    }

    /// Bytes originally requested for a live handle.
    pub fn requested_size(&self, id: u32) -> Option<usize> {
        let bytes = self.pool.bytes().ok()?;
        self.engine.as_ref()?.requested_size(bytes, id)
    }

    /// Address-to-handle reverse lookup. `None` both when the address
    /// is unknown and when the active engine doesn't support reverse
    /// lookup at all (buddy) — the facade's `my_free` treats both the
    /// same way: a no-op.
    pub fn reverse_lookup(&self, address: usize) -> Option<u32> {
        self.engine
            .as_ref()?
            .reverse_lookup(address)
            .ok()
            .flatten()
    }

    /// Simulates one CPU access at `address`, returning the cycle cost.
    pub fn cache_access(&mut self, address: u64, is_write: bool) -> u64 {
        self.cache.access(address, is_write)
    }

    pub fn cache(&self) -> &cache::Controller {
        &self.cache
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Derived fragmentation/utilization metrics, computed by walking
    /// the engine's current state.
    pub fn derived_metrics(&self) -> DerivedMetrics {
        let usage = match (&self.engine, self.pool.bytes()) {
            (Some(engine), Ok(bytes)) => engine.usage(bytes),
            _ => engine::Usage::default(),
        };
        DerivedMetrics::compute(self.pool.total(), usage, &self.stats)
    }

    /// Block-by-block dump entries for the dump renderer.
    pub fn dump_entries(&self) -> Vec<engine::DumpEntry> {
        match (&self.engine, self.pool.bytes()) {
            (Some(engine), Ok(bytes)) => engine.dump_entries(bytes),
            _ => Vec::new(),
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
