//! Human-readable pool dump, formatted exactly as
//! `observability/memory_dump.c` prints it.

use crate::engine::DumpEntry;
use std::fmt::Write as _;

/// Renders one line per block plus a used/free totals footer, in the
/// §6 format: `[0xSTART - 0xEND] {FREE|USED} (N bytes)`.
pub fn render(entries: &[DumpEntry]) -> String {
    let mut out = String::new();
    let mut total_used = 0usize;
    let mut total_free = 0usize;

    let _ = writeln!(out, "========== MEMORY DUMP ==========");

    for entry in entries {
        let start = entry.offset;
        let end = entry.offset + entry.size - 1;
        let label = if entry.free { "FREE" } else { "USED" };
        let _ = writeln!(
            out,
            "[0x{start:016x} - 0x{end:016x}] {label} ({size} bytes)",
            size = entry.size
        );
        if entry.free {
            total_free += entry.size;
        } else {
            total_used += entry.size;
        }
    }

    let _ = writeln!(out, "--------------------------------");
    let _ = writeln!(out, "Total used memory : {total_used} bytes");
    let _ = writeln!(out, "Total free memory : {total_free} bytes");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_blocks_and_totals() {
        let entries = vec![
            DumpEntry {
                offset: 0,
                size: 100,
                free: true,
            },
            DumpEntry {
                offset: 100,
                size: 200,
                free: false,
            },
        ];
        let text = render(&entries);
        assert!(text.contains("[0x0000000000000000 - 0x0000000000000063] FREE (100 bytes)"));
        assert!(text.contains("[0x0000000000000064 - 0x000000000000012b] USED (200 bytes)"));
        assert!(text.contains("Total used memory : 200 bytes"));
        assert!(text.contains("Total free memory : 100 bytes"));
    }
}
