//! Thin `malloc`/`free` facade over the handle API.
//!
//! Grounded in `my_malloc.c`: `my_malloc` resolves a handle straight to
//! an address and discards it, so the caller deals in addresses alone;
//! `my_free` reverse-looks-up the address back to a handle, which only
//! the list engine supports — on buddy this is a documented no-op.

use crate::Simulator;

/// `my_malloc(n) = resolve(alloc(n))`, `None` on failure.
pub fn my_malloc(sim: &mut Simulator, size: usize) -> Option<usize> {
    let id = sim.alloc(size);
    if id == 0 {
        return None;
    }
    sim.resolve(id)
}

/// Reverse-looks-up `address` to a handle and frees it. A no-op if the
/// address is unknown or the active engine doesn't support reverse
/// lookup (buddy).
pub fn my_free(sim: &mut Simulator, address: usize) {
    if let Some(id) = sim.reverse_lookup(address) {
        let _ = sim.free(id);
    }
}
