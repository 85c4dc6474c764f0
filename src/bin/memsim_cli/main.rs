//! Interactive shell for the memory-allocation & cache simulator.
//!
//! Usage:
//!   memsim-cli            # interactive REPL over stdin
//!   memsim-cli run <file> # play back shell commands from a script

mod shell;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "memsim-cli", about = "Memory allocation & cache simulator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive shell (default if no subcommand is given).
    Repl,
    /// Play back shell commands from a script file.
    Run {
        /// Path to a file of newline-separated shell commands.
        script: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => shell::run_reader(std::io::stdin().lock()),
        Command::Run { script } => match File::open(&script) {
            Ok(file) => shell::run_reader(BufReader::new(file)),
            Err(err) => eprintln!("failed to open {}: {err}", script.display()),
        },
    }
}
