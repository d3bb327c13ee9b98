//! Key binding handling for the journal TUI

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use bjournal_core::error::JournalError;
use bjournal_core::fs::FileSystem;
use bjournal_core::{Category, Cursor, Log, LogAddress, LogStore};

use super::state::{InputMode, JournalState, Pane, PendingAction, PromptKind};

#[derive(Clone, Copy)]
enum Mark {
    Complete,
    Irrelevant,
    Important,
}

/// Handle a key event, dispatching by current input mode.
pub fn handle_key<FS: FileSystem>(
    state: &mut JournalState,
    store: &mut LogStore<FS>,
    key: KeyEvent,
) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if state.mode == InputMode::Normal {
        handle_normal_key(state, store, key);
    } else {
        handle_prompt_key(state, store, key);
    }
}

/// Handle keys in normal browsing mode
fn handle_normal_key<FS: FileSystem>(
    state: &mut JournalState,
    store: &mut LogStore<FS>,
    key: KeyEvent,
) {
    state.status_message = None;

    match key.code {
        // Quit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.should_quit = true;
        }
        KeyCode::Char('q') => {
            state.should_quit = true;
        }

        // Navigation (vim-style)
        KeyCode::Char('j') | KeyCode::Down => match state.focus {
            Pane::Index => state.index_next(store.index().len()),
            _ => with_focused_logs(state, store, Cursor::advance),
        },
        KeyCode::Char('k') | KeyCode::Up => match state.focus {
            Pane::Index => state.index_previous(store.index().len()),
            _ => with_focused_logs(state, store, Cursor::retreat),
        },

        // Panes
        KeyCode::Tab => state.cycle_focus(),
        KeyCode::Char('P') => {
            state.toggle_previous();
            state.refresh_previous(store);
        }
        KeyCode::Char('I') => state.toggle_index(),

        // New entries
        KeyCode::Char('t') => open_prompt(state, PromptKind::Entry(Category::Task)),
        KeyCode::Char('e') => open_prompt(state, PromptKind::Entry(Category::Event)),
        KeyCode::Char('n') if state.focus == Pane::Index => {
            open_prompt(state, PromptKind::IndexNote)
        }
        KeyCode::Char('n') => open_prompt(state, PromptKind::Entry(Category::Note)),

        // Category changes on the selected entry
        KeyCode::Char('c') => mark_selected(state, store, Mark::Complete),
        KeyCode::Char('x') => mark_selected(state, store, Mark::Irrelevant),
        KeyCode::Char('!') => mark_selected(state, store, Mark::Important),

        // Migration
        KeyCode::Char('m') => migrate_selected(state, store),
        KeyCode::Char('M') => migrate_previous_day(state, store),

        // Open the selected index note (TUI will resume after)
        KeyCode::Enter => {
            if state.focus == Pane::Index
                && let Some(item) = state
                    .index_selected
                    .and_then(|i| store.index().items.get(i))
            {
                state.pending = Some(PendingAction::OpenIndexItem(item.clone()));
            }
        }

        _ => {}
    }
}

/// Handle keys while the entry prompt is open
fn handle_prompt_key<FS: FileSystem>(
    state: &mut JournalState,
    store: &mut LogStore<FS>,
    key: KeyEvent,
) {
    let InputMode::Prompt { kind, buffer } = &mut state.mode else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            state.mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Enter => {
            let kind = *kind;
            let text = buffer.trim().to_string();
            state.mode = InputMode::Normal;
            commit_prompt(state, store, kind, text);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            buffer.push(c);
        }
        _ => {}
    }
}

fn open_prompt(state: &mut JournalState, kind: PromptKind) {
    state.mode = InputMode::Prompt {
        kind,
        buffer: String::new(),
    };
}

/// Create what the prompt asked for. Entries become sub-logs of the selected
/// entry of today, or top-level entries when nothing is selected.
fn commit_prompt<FS: FileSystem>(
    state: &mut JournalState,
    store: &mut LogStore<FS>,
    kind: PromptKind,
    text: String,
) {
    if text.is_empty() {
        return;
    }

    let category = match kind {
        PromptKind::IndexNote => {
            state.pending = Some(PendingAction::CreateIndexNote(text));
            return;
        }
        PromptKind::Entry(category) => category,
    };

    let target = store
        .read_day(state.today)
        .ok()
        .and_then(|day| state.today_cursor.address(day.logs()));

    let result = match target {
        Some(address) => store
            .append_new_log(address.index, state.today, text, category)
            .map(|_| ()),
        None => store.add_new_log(state.today, text, category).map(|_| ()),
    };
    if let Err(e) = result {
        report_error(state, e);
    }
}

/// Run `step` with the cursor and entries of the focused day pane.
fn with_focused_logs<FS: FileSystem>(
    state: &mut JournalState,
    store: &mut LogStore<FS>,
    step: impl FnOnce(&mut Cursor, &[Log]),
) {
    let result = match state.focus {
        Pane::Today => store
            .read_day(state.today)
            .map(|day| step(&mut state.today_cursor, day.logs())),
        Pane::Previous => match state.previous {
            Some(date) => store
                .read_day(date)
                .map(|day| step(&mut state.previous_cursor, day.logs())),
            None => Ok(()),
        },
        Pane::Index => Ok(()),
    };
    if let Err(e) = result {
        report_error(state, e);
    }
}

/// Day and address of the entry selected in the focused day pane.
fn selected_entry<FS: FileSystem>(
    state: &JournalState,
    store: &mut LogStore<FS>,
) -> Option<(NaiveDate, LogAddress)> {
    let (date, cursor) = match state.focus {
        Pane::Today => (state.today, &state.today_cursor),
        Pane::Previous => (state.previous?, &state.previous_cursor),
        Pane::Index => return None,
    };
    let day = store.read_day(date).ok()?;
    cursor.address(day.logs()).map(|address| (date, address))
}

fn mark_selected<FS: FileSystem>(state: &mut JournalState, store: &mut LogStore<FS>, mark: Mark) {
    let Some((date, address)) = selected_entry(state, store) else {
        return;
    };

    let result = store.checkout(date).and_then(|mut day| {
        match mark {
            Mark::Complete => {
                day.mark_complete(address)?;
            }
            Mark::Irrelevant => {
                day.mark_irrelevant(address)?;
            }
            Mark::Important => {
                day.toggle_important(address)?;
            }
        }
        day.commit()
    });
    if let Err(e) = result {
        report_error(state, e);
    }
}

fn migrate_selected<FS: FileSystem>(state: &mut JournalState, store: &mut LogStore<FS>) {
    if state.focus != Pane::Previous {
        state.set_status("Focus the previous day to migrate an entry", true);
        return;
    }
    let Some((from, address)) = selected_entry(state, store) else {
        return;
    };

    match store.migrate_log(from, address, state.today) {
        Ok(carried) => state.set_status(format!("Migrated, {} carried to today", carried), false),
        Err(e) => report_error(state, e),
    }
    state.refresh_previous(store);
}

fn migrate_previous_day<FS: FileSystem>(state: &mut JournalState, store: &mut LogStore<FS>) {
    state.refresh_previous(store);
    let Some(from) = state.previous else {
        state.set_status("No previous day to migrate", true);
        return;
    };

    match store.migrate_all(from, state.today) {
        Ok(carried) => state.set_status(format!("Migrated day, {} carried to today", carried), false),
        Err(e) => report_error(state, e),
    }
    state.refresh_previous(store);
}

fn report_error(state: &mut JournalState, error: JournalError) {
    log::error!("{}", error);
    state.set_status(error.to_string(), true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bjournal_core::PreviousDayPolicy;
    use bjournal_core::fs::InMemoryFileSystem;
    use std::path::PathBuf;

    const PREVIOUS_DAY: &str = "\
items:
- name: finish slides
  mark: task
  important: false
  subLogs:
  - name: add charts
    mark: task
    important: false
  - name: ask Sam
    mark: note
    important: false
- name: gym
  mark: event
  important: false
";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 2, 19).unwrap()
    }

    fn setup() -> (JournalState, LogStore<InMemoryFileSystem>) {
        let fs = InMemoryFileSystem::with_files(vec![
            (
                PathBuf::from("journal/18.02.2022.yaml"),
                PREVIOUS_DAY.to_string(),
            ),
            (
                PathBuf::from("journal/index.yaml"),
                "items:\n- name: Books\n  url: BOOKS.md\n".to_string(),
            ),
        ]);
        let store = LogStore::new(fs, "journal")
            .with_previous_day_policy(PreviousDayPolicy::StrictlyBefore);
        let mut state = JournalState::new(today(), false);
        state.refresh_previous(&store);
        (state, store)
    }

    fn press(state: &mut JournalState, store: &mut LogStore<InMemoryFileSystem>, code: KeyCode) {
        handle_key(state, store, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(state: &mut JournalState, store: &mut LogStore<InMemoryFileSystem>, text: &str) {
        for c in text.chars() {
            press(state, store, KeyCode::Char(c));
        }
    }

    fn today_names(store: &mut LogStore<InMemoryFileSystem>) -> Vec<String> {
        store
            .read_day(today())
            .unwrap()
            .logs()
            .iter()
            .map(|l| l.name.clone())
            .collect()
    }

    #[test]
    fn test_quit() {
        let (mut state, mut store) = setup();
        press(&mut state, &mut store, KeyCode::Char('q'));
        assert!(state.should_quit);

        let (mut state, mut store) = setup();
        handle_key(
            &mut state,
            &mut store,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }

    #[test]
    fn test_prompt_adds_top_level_entry() {
        let (mut state, mut store) = setup();
        press(&mut state, &mut store, KeyCode::Char('t'));
        assert_eq!(
            state.mode,
            InputMode::Prompt {
                kind: PromptKind::Entry(Category::Task),
                buffer: String::new()
            }
        );

        type_text(&mut state, &mut store, "buy mulk");
        press(&mut state, &mut store, KeyCode::Backspace);
        press(&mut state, &mut store, KeyCode::Backspace);
        press(&mut state, &mut store, KeyCode::Backspace);
        type_text(&mut state, &mut store, "ilk");
        press(&mut state, &mut store, KeyCode::Enter);

        assert_eq!(state.mode, InputMode::Normal);
        assert_eq!(today_names(&mut store), vec!["buy milk"]);
        assert!(store.fs().exists(&store.day_path(today())));
    }

    #[test]
    fn test_prompt_appends_to_selected_entry() {
        let (mut state, mut store) = setup();
        press(&mut state, &mut store, KeyCode::Char('t'));
        type_text(&mut state, &mut store, "trip");
        press(&mut state, &mut store, KeyCode::Enter);

        // Select "trip", then add a note below it
        press(&mut state, &mut store, KeyCode::Char('j'));
        press(&mut state, &mut store, KeyCode::Char('n'));
        type_text(&mut state, &mut store, "bring passport");
        press(&mut state, &mut store, KeyCode::Enter);

        // With the sub-log selected the next entry still goes to its owner
        press(&mut state, &mut store, KeyCode::Char('j'));
        assert_eq!(state.today_cursor.secondary(), Some(0));
        press(&mut state, &mut store, KeyCode::Char('e'));
        type_text(&mut state, &mut store, "flight at 9");
        press(&mut state, &mut store, KeyCode::Enter);

        let day = store.read_day(today()).unwrap();
        assert_eq!(day.logs().len(), 1);
        let subs: Vec<(&str, Category)> = day.logs()[0]
            .sub_logs()
            .iter()
            .map(|s| (s.name.as_str(), s.mark))
            .collect();
        assert_eq!(
            subs,
            vec![
                ("bring passport", Category::Note),
                ("flight at 9", Category::Event)
            ]
        );
    }

    #[test]
    fn test_prompt_escape_and_empty_text() {
        let (mut state, mut store) = setup();
        press(&mut state, &mut store, KeyCode::Char('t'));
        type_text(&mut state, &mut store, "never mind");
        press(&mut state, &mut store, KeyCode::Esc);
        assert_eq!(state.mode, InputMode::Normal);

        press(&mut state, &mut store, KeyCode::Char('t'));
        type_text(&mut state, &mut store, "   ");
        press(&mut state, &mut store, KeyCode::Enter);

        assert!(today_names(&mut store).is_empty());
        assert!(!store.fs().exists(&store.day_path(today())));
    }

    #[test]
    fn test_complete_selected_entry() {
        let (mut state, mut store) = setup();
        store.add_new_log(today(), "call plumber", Category::Task).unwrap();

        press(&mut state, &mut store, KeyCode::Down);
        press(&mut state, &mut store, KeyCode::Char('c'));

        store.clear_cache();
        assert!(store.read_day(today()).unwrap().logs()[0].is_complete());
    }

    #[test]
    fn test_irrelevant_on_previous_day() {
        let (mut state, mut store) = setup();
        press(&mut state, &mut store, KeyCode::Char('P'));
        press(&mut state, &mut store, KeyCode::Tab);
        assert_eq!(state.focus, Pane::Previous);

        // finish slides -> add charts
        press(&mut state, &mut store, KeyCode::Char('j'));
        press(&mut state, &mut store, KeyCode::Char('j'));
        press(&mut state, &mut store, KeyCode::Char('x'));

        store.clear_cache();
        let previous = store.read_day(NaiveDate::from_ymd_opt(2022, 2, 18).unwrap()).unwrap();
        assert!(previous.logs()[0].is_task());
        assert!(previous.logs()[0].sub_logs()[0].is_irrelevant());
    }

    #[test]
    fn test_migrate_selected_previous_entry() {
        let (mut state, mut store) = setup();
        press(&mut state, &mut store, KeyCode::Char('P'));
        press(&mut state, &mut store, KeyCode::Tab);
        press(&mut state, &mut store, KeyCode::Char('j'));
        press(&mut state, &mut store, KeyCode::Char('m'));

        assert_eq!(today_names(&mut store), vec!["finish slides"]);
        let today_day = store.read_day(today()).unwrap();
        assert_eq!(today_day.logs()[0].sub_logs().len(), 1);

        let previous = store.read_day(NaiveDate::from_ymd_opt(2022, 2, 18).unwrap()).unwrap();
        assert!(previous.logs()[0].is_migrated());
        assert!(previous.logs()[0].sub_logs()[0].is_migrated());
    }

    #[test]
    fn test_migrate_requires_previous_focus() {
        let (mut state, mut store) = setup();
        press(&mut state, &mut store, KeyCode::Char('m'));
        assert!(matches!(state.status_message, Some((_, true))));
        assert!(today_names(&mut store).is_empty());
    }

    #[test]
    fn test_migrate_whole_previous_day() {
        let (mut state, mut store) = setup();
        press(&mut state, &mut store, KeyCode::Char('M'));
        assert_eq!(today_names(&mut store), vec!["finish slides", "gym"]);
        assert!(matches!(state.status_message, Some((_, false))));
    }

    #[test]
    fn test_index_pane_keys() {
        let (mut state, mut store) = setup();
        press(&mut state, &mut store, KeyCode::Char('I'));
        press(&mut state, &mut store, KeyCode::Tab);
        assert_eq!(state.focus, Pane::Index);

        press(&mut state, &mut store, KeyCode::Char('j'));
        press(&mut state, &mut store, KeyCode::Enter);
        assert!(matches!(
            &state.pending,
            Some(PendingAction::OpenIndexItem(item)) if item.name == "Books"
        ));

        state.pending = None;
        press(&mut state, &mut store, KeyCode::Char('n'));
        type_text(&mut state, &mut store, "Recipes");
        press(&mut state, &mut store, KeyCode::Enter);
        assert_eq!(
            state.pending,
            Some(PendingAction::CreateIndexNote("Recipes".to_string()))
        );
        assert!(today_names(&mut store).is_empty());
    }

    #[test]
    fn test_actions_follow_day_change() {
        let (mut state, mut store) = setup();
        let tomorrow = NaiveDate::from_ymd_opt(2022, 2, 20).unwrap();
        state.set_today(tomorrow, &store);

        press(&mut state, &mut store, KeyCode::Char('t'));
        type_text(&mut state, &mut store, "late idea");
        press(&mut state, &mut store, KeyCode::Enter);
        press(&mut state, &mut store, KeyCode::Char('M'));

        assert!(today_names(&mut store).is_empty());
        let names: Vec<String> = store
            .read_day(tomorrow)
            .unwrap()
            .logs()
            .iter()
            .map(|l| l.name.clone())
            .collect();
        assert_eq!(names, vec!["late idea", "finish slides", "gym"]);
    }

    #[test]
    fn test_previous_day_resolved_on_toggle() {
        let (mut state, mut store) = setup();
        state.previous = None;
        state.previous_cursor.select(LogAddress::top(0));

        press(&mut state, &mut store, KeyCode::Char('P'));
        assert!(state.show_previous);
        assert_eq!(state.previous, NaiveDate::from_ymd_opt(2022, 2, 18));
        // The selection belonged to another day
        assert!(state.previous_cursor.is_none());
    }
}
