//! Interactive journal over today, the previous day and the index
//!
//! Today's entries are always shown; the previous day (for migration) and
//! the index of notes open in a side pane.

mod app;
mod keys;
mod state;
mod ui;

use bjournal_core::config::Config;
use bjournal_core::date;
use bjournal_core::fs::RealFileSystem;
use bjournal_core::{LogStore, PreviousDayPolicy};

use state::JournalState;

/// Handle running `bj` without a subcommand
pub fn handle_journal(config: &Config) -> bool {
    let mut store = LogStore::new(RealFileSystem, &config.journal_dir)
        .with_previous_day_policy(PreviousDayPolicy::StrictlyBefore);
    let mut state = JournalState::new(date::today(), config.wrap_around);
    state.refresh_previous(&store);

    if let Some(port) = config.status_endpoint_port() {
        crate::server::spawn(config.journal_dir.clone(), port);
    }

    log::info!("Opening journal at {:?}", config.journal_dir);

    // Initialize terminal
    let mut terminal = ratatui::init();

    // Run TUI (editor is launched inside the loop, TUI resumes after)
    let result = app::run(&mut terminal, &mut state, &mut store, config);

    // Restore terminal (always, even on error)
    ratatui::restore();

    if let Err(e) = result {
        eprintln!("✗ TUI error: {}", e);
        return false;
    }

    true
}
