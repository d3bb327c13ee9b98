//! Main event loop for the journal TUI

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;

use bjournal_core::config::Config;
use bjournal_core::date;
use bjournal_core::editor::CommandEditor;
use bjournal_core::fs::FileSystem;
use bjournal_core::LogStore;

use super::keys::handle_key;
use super::state::{JournalState, PendingAction};
use super::ui::render;

/// Run the journal TUI event loop
pub fn run<FS: FileSystem>(
    terminal: &mut DefaultTerminal,
    state: &mut JournalState,
    store: &mut LogStore<FS>,
    config: &Config,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(frame, state, store))?;

        if state.should_quit {
            break;
        }

        // Editor work runs with the TUI suspended
        if let Some(action) = state.pending.take() {
            run_in_editor(terminal, state, store, config, action);
            continue;
        }

        // Handle events (with timeout for responsiveness)
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            state.set_today(date::today(), store);
            handle_key(state, store, key);
        }
    }

    Ok(())
}

/// Suspend the TUI, run the editor action, then resume the TUI
fn run_in_editor<FS: FileSystem>(
    terminal: &mut DefaultTerminal,
    state: &mut JournalState,
    store: &mut LogStore<FS>,
    config: &Config,
    action: PendingAction,
) {
    let editor = CommandEditor::from_config(config);

    // Restore terminal to normal mode
    ratatui::restore();

    // Blocks until the editor closes
    match action {
        PendingAction::OpenIndexItem(item) => store.open_index_item(&item, &editor),
        PendingAction::CreateIndexNote(name) => {
            match store.create_index_item(&name, state.today, &editor) {
                Some(_) => state.index_selected = store.index().len().checked_sub(1),
                None => state.set_status(format!("Could not create note \"{}\"", name), true),
            }
        }
    }

    *terminal = ratatui::init();
}
