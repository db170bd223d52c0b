//! Contact Terminal command-line host.
//!
//! Wires the [`contact_core::Sequencer`] to a crossterm-rendered stdout, a
//! blocking stdin reader and either the EmailJS relay or a dry-run sink.

pub mod cli;
pub mod config;
pub mod dry_run;
pub mod session;
pub mod terminal;

use std::io::Write;

/// Restore terminal state after an interrupted session.
pub fn restore_terminal() {
    let mut stdout = std::io::stdout();
    // Show cursor, reset colors/styles, move off the partial line.
    let _ = writeln!(stdout, "\x1b[?25h\x1b[0m");
    let _ = stdout.flush();
}
