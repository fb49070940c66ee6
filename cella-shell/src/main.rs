//! cella-shell: read-only line shell over a cella store file.

mod commands;

use clap::Parser;
use cella::store::Store;
use commands::{Command, Flow};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Inspect a cella store file from the command line.
#[derive(Parser, Debug)]
#[command(name = "cella-shell", version, about)]
struct Cli {
    /// Path to the store file. It is created on the first write if missing.
    path: PathBuf,
}

fn main() -> ExitCode {
    colog::init();
    let cli = Cli::parse();

    let store = match Store::open(&cli.path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("could not load store {}: {}", cli.path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match run(&store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(store: &Store) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(stdout, "error: {:#}", e)?;
                continue;
            }
        };

        if command.execute(store, &mut stdout)? == Flow::Exit {
            return Ok(());
        }
    }
}
