//! Journal TUI state

use chrono::NaiveDate;
use ratatui::widgets::ListState;

use bjournal_core::fs::FileSystem;
use bjournal_core::index::IndexItem;
use bjournal_core::{Category, Cursor, LogStore};

/// A list pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Today,
    Previous,
    Index,
}

/// What the prompt will create when committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// An entry of today with this category
    Entry(Category),
    /// A new index note
    IndexNote,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::Entry(Category::Task) => "New task",
            PromptKind::Entry(Category::Event) => "New event",
            PromptKind::Entry(Category::Scheduled) => "New scheduled entry",
            PromptKind::Entry(_) => "New note",
            PromptKind::IndexNote => "New index note",
        }
    }
}

/// Current input mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Prompt { kind: PromptKind, buffer: String },
}

/// Work that needs the terminal suspended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    OpenIndexItem(IndexItem),
    CreateIndexNote(String),
}

/// Journal application state
pub struct JournalState {
    /// Day shown in the main pane
    pub today: NaiveDate,

    /// Day shown in the previous pane, resolved by
    /// [`JournalState::refresh_previous`]
    pub previous: Option<NaiveDate>,

    /// Pane receiving navigation keys
    pub focus: Pane,

    pub show_previous: bool,
    pub show_index: bool,

    pub today_cursor: Cursor,
    pub previous_cursor: Cursor,
    pub index_selected: Option<usize>,

    /// Scroll state of each list, kept across frames
    pub today_list: ListState,
    pub previous_list: ListState,
    pub index_list: ListState,

    pub mode: InputMode,

    /// Whether to quit the app
    pub should_quit: bool,

    /// Editor work to run with the TUI suspended
    pub pending: Option<PendingAction>,

    /// Status line message and whether it is an error
    pub status_message: Option<(String, bool)>,
}

impl JournalState {
    pub fn new(today: NaiveDate, wrap_around: bool) -> Self {
        Self {
            today,
            previous: None,
            focus: Pane::Today,
            show_previous: false,
            show_index: false,
            today_cursor: Cursor::new(wrap_around),
            previous_cursor: Cursor::new(wrap_around),
            index_selected: None,
            today_list: ListState::default(),
            previous_list: ListState::default(),
            index_list: ListState::default(),
            mode: InputMode::Normal,
            should_quit: false,
            pending: None,
            status_message: None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status_message = Some((message.into(), is_error));
    }

    /// Look up the previous day of [`JournalState::today`] again
    pub fn refresh_previous<FS: FileSystem>(&mut self, store: &LogStore<FS>) {
        let previous = store.previous_date(self.today);
        if previous != self.previous {
            self.previous_cursor.clear();
        }
        self.previous = previous;
    }

    /// Follow the calendar when it moved past `today`. Both selections are
    /// dropped and the previous day is looked up again.
    pub fn set_today<FS: FileSystem>(&mut self, today: NaiveDate, store: &LogStore<FS>) {
        if today == self.today {
            return;
        }
        log::info!("Day changed, showing {}", today);
        self.today = today;
        self.today_cursor.clear();
        self.previous_cursor.clear();
        self.refresh_previous(store);
    }

    /// The side pane currently shown, if any
    pub fn side_pane(&self) -> Option<Pane> {
        if self.show_previous {
            Some(Pane::Previous)
        } else if self.show_index {
            Some(Pane::Index)
        } else {
            None
        }
    }

    /// Show or hide the previous day. Hides the index.
    pub fn toggle_previous(&mut self) {
        self.show_previous = !self.show_previous;
        if self.show_previous {
            self.show_index = false;
        }
        self.fix_focus();
    }

    /// Show or hide the index. Hides the previous day.
    pub fn toggle_index(&mut self) {
        self.show_index = !self.show_index;
        if self.show_index {
            self.show_previous = false;
        }
        self.fix_focus();
    }

    /// Move focus between today and the side pane
    pub fn cycle_focus(&mut self) {
        self.focus = match (self.focus, self.side_pane()) {
            (Pane::Today, Some(side)) => side,
            _ => Pane::Today,
        };
    }

    fn fix_focus(&mut self) {
        if self.focus != Pane::Today && self.side_pane() != Some(self.focus) {
            self.focus = Pane::Today;
        }
    }

    pub fn index_next(&mut self, len: usize) {
        let wrap = self.today_cursor.wraps_around();
        self.index_selected = step_index(self.index_selected, len, true, wrap);
    }

    pub fn index_previous(&mut self, len: usize) {
        let wrap = self.today_cursor.wraps_around();
        self.index_selected = step_index(self.index_selected, len, false, wrap);
    }
}

/// Single-level counterpart of [`Cursor`] for the flat index list
fn step_index(current: Option<usize>, len: usize, forward: bool, wrap: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    match (current, forward) {
        (None, true) => Some(0),
        (None, false) => Some(last),
        (Some(i), true) if i >= last => wrap.then_some(0),
        (Some(i), true) => Some(i + 1),
        (Some(0), false) => wrap.then_some(last),
        (Some(i), false) => Some(i.min(len) - 1),
    }
}
