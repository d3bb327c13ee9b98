//! `bj`: a terminal bullet journal

/// CLI module - command-line interface for bjournal
mod cli;

/// Status endpoint serving today's entries over HTTP
mod server;

fn main() {
    cli::run_cli();
}
