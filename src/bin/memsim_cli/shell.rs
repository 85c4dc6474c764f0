//! Interactive command shell.
//!
//! Grounded in `simulator/cli.c`: a line-oriented REPL, one command per
//! line tokenized on whitespace, with its own table of allocation ids
//! the shell has handed out — `free`/`read`/`write` on an id the shell
//! never allocated is rejected even if it happens to be numerically
//! live in the engine, matching the original's `has_alloc` gate.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use memsim::engine::Algo;
use memsim::Simulator;

/// The shell's own view of which ids are currently live, independent of
/// what the engine thinks — mirrors `simulator/cli.c`'s `alloc_table`.
#[derive(Debug, Default)]
struct ShellState {
    known_ids: HashSet<u32>,
}

impl ShellState {
    fn reset(&mut self) {
        self.known_ids.clear();
    }
}

fn parse_algo(word: &str) -> Option<Algo> {
    match word {
        "first" => Some(Algo::FirstFit),
        "best" => Some(Algo::BestFit),
        "worst" => Some(Algo::WorstFit),
        "buddy" => Some(Algo::Buddy),
        _ => None,
    }
}

fn print_help() {
    println!("Commands:");
    println!("  init memory <size>");
    println!("  set allocator <first|best|worst|buddy>");
    println!("  malloc <size>");
    println!("  free <id>");
    println!("  read <id> <offset>");
    println!("  write <id> <offset>");
    println!("  dump");
    println!("  stats");
    println!("  cache_stats");
    println!("  shutdown");
    println!("  exit | quit");
}

fn print_stats(sim: &Simulator) {
    let m = sim.derived_metrics();
    println!();
    println!("---------- SUMMARY ----------");
    println!("Total heap size        : {} bytes", m.total);
    println!("Used memory            : {} bytes", m.used_bytes);
    println!("Free memory            : {} bytes", m.free_bytes);
    println!("Used blocks            : {}", m.used_blocks);
    println!("Free blocks            : {}", m.free_blocks);
    println!("Internal fragmentation : {} bytes", m.internal_fragmentation);
    println!("Memory utilization     : {:.2}%", m.utilization);
    println!("External fragmentation : {:.3}", m.external_fragmentation);
    println!("Allocation requests    : {}", sim.stats().alloc_requests);
    println!("Successful allocs      : {}", sim.stats().alloc_success);
    println!("Failed allocs          : {}", sim.stats().alloc_failure);
    println!("Frees                  : {}", sim.stats().free_count);
    println!("Success rate           : {:.2}%", m.success_rate);
    println!("-----------------------------");
}

fn print_cache_stats(sim: &Simulator) {
    let ctrl = sim.cache();
    println!();
    println!("========== CACHE STATS ==========");
    for (name, level) in [("L1", &ctrl.l1), ("L2", &ctrl.l2), ("L3", &ctrl.l3)] {
        println!(
            "[{name}] Hits: {}  Misses: {}  HitRate: {:.2}%",
            level.hits,
            level.misses,
            level.hit_rate()
        );
    }
    println!("---------------------------------");
    println!("Total Requests : {}", ctrl.total_requests);
    println!("Total Cycles   : {}", ctrl.total_cycles);
    if ctrl.total_requests > 0 {
        println!("AMAT           : {:.2} cycles", ctrl.amat());
    }
    println!("=================================");
}

/// Resolves an id to a payload address for the `malloc`/`read`/`write`
/// commands, using whichever resolution mechanism the active engine
/// supports.
fn resolve_address(sim: &Simulator, id: u32) -> Option<usize> {
    sim.resolve(id)
}

fn run_line(sim: &mut Simulator, state: &mut ShellState, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return true;
    };

    match cmd {
        "help" => print_help(),

        "init" => {
            let (Some("memory"), Some(size)) = (words.next(), words.next()) else {
                println!("Usage: init memory <size>");
                return true;
            };
            let Ok(size) = size.parse::<usize>() else {
                println!("Usage: init memory <size>");
                return true;
            };
            match sim.init(size) {
                Ok(()) => {
                    state.reset();
                    println!("initialized memory: {size} bytes");
                }
                Err(err) => println!("{err}"),
            }
        }

        "set" => {
            let (Some("allocator"), Some(arg)) = (words.next(), words.next()) else {
                println!("Usage: set allocator <first|best|worst|buddy>");
                return true;
            };
            match parse_algo(arg) {
                Some(algo) => {
                    sim.set_algo(algo);
                    println!("Allocator strategy set");
                }
                None => println!("Unknown allocator strategy"),
            }
        }

        "malloc" => {
            let Some(size) = words.next().and_then(|s| s.parse::<usize>().ok()) else {
                println!("Usage: malloc <size>");
                return true;
            };
            let id = sim.alloc(size);
            if id == 0 {
                println!("Allocation failed");
                return true;
            }
            state.known_ids.insert(id);
            let addr = resolve_address(sim, id).unwrap_or(0);
            println!("Allocated block id={id} at address=0x{addr:016x}");
        }

        "free" => {
            let Some(id) = words.next().and_then(|s| s.parse::<u32>().ok()) else {
                println!("Usage: free <id>");
                return true;
            };
            if !state.known_ids.contains(&id) {
                println!("Invalid block id");
                return true;
            }
            let _ = sim.free(id);
            state.known_ids.remove(&id);
            println!("Block {id} freed");
        }

        "read" | "write" => {
            let is_write = cmd == "write";
            let (Some(id), Some(offset)) = (
                words.next().and_then(|s| s.parse::<u32>().ok()),
                words.next().and_then(|s| s.parse::<usize>().ok()),
            ) else {
                println!("Usage: {cmd} <id> <offset>");
                return true;
            };
            if !state.known_ids.contains(&id) {
                println!("Invalid block id");
                return true;
            }
            let Some(base) = resolve_address(sim, id) else {
                println!("Failed to resolve address");
                return true;
            };
            let addr = (base + offset) as u64;
            sim.cache_access(addr, is_write);
            let label = if is_write { "WRITE" } else { "READ" };
            println!("{label} access at address 0x{addr:016x}");
        }

        "dump" => {
            print!("{}", memsim::dump::render(&sim.dump_entries()));
        }

        "stats" => print_stats(sim),

        "cache_stats" => print_cache_stats(sim),

        "shutdown" => {
            sim.shutdown();
            state.reset();
            println!("Memory shutdown completed");
        }

        "exit" | "quit" => return false,

        _ => println!("Unknown command"),
    }

    true
}

/// Runs the shell against any line source until `exit`/`quit` or
/// end-of-input. Used for both the interactive stdin REPL and
/// non-interactive script playback.
pub fn run_reader<R: BufRead>(mut reader: R) {
    let mut sim = Simulator::new();
    let mut state = ShellState::default();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        if !run_line(&mut sim, &mut state, &line) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malloc_then_free_round_trips_through_shell_state() {
        let mut sim = Simulator::new();
        let mut state = ShellState::default();

        assert!(run_line(&mut sim, &mut state, "init memory 1024"));
        assert!(run_line(&mut sim, &mut state, "set allocator first"));
        assert!(run_line(&mut sim, &mut state, "malloc 64"));
        assert_eq!(state.known_ids.len(), 1);

        let id = *state.known_ids.iter().next().unwrap();
        assert!(run_line(&mut sim, &mut state, &format!("free {id}")));
        assert!(state.known_ids.is_empty());
    }

    #[test]
    fn free_of_unknown_shell_id_is_rejected() {
        let mut sim = Simulator::new();
        let mut state = ShellState::default();
        run_line(&mut sim, &mut state, "init memory 1024");

        // Even if this id later becomes live in the engine, the shell
        // never handed it out, so it's rejected here.
        assert!(run_line(&mut sim, &mut state, "free 1"));
        assert!(state.known_ids.is_empty());
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut sim = Simulator::new();
        let mut state = ShellState::default();
        assert!(!run_line(&mut sim, &mut state, "exit"));
    }
}
