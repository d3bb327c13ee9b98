//! Two-level list cursor.
//!
//! A day renders as one vertical list where every top-level entry is followed
//! by its sub-logs. [`Cursor`] walks that list in display order while only
//! tracking two positions:
//!
//! - `primary`: the selected top-level entry, `None` when nothing is selected
//! - `secondary`: the selected sub-log of that entry, `None` when the entry
//!   itself is selected
//!
//! ```text
//! • write report        primary 0, secondary None
//!    ✘ outline          primary 0, secondary 0
//!    • draft            primary 0, secondary 1
//! ○ lunch               primary 1, secondary None
//! ```
//!
//! The cursor borrows the entries only for the duration of a call, so it
//! stays valid across reloads of the day as long as it is re-clamped.

use crate::entry::{Log, LogAddress};

/// Selection state over a list of top-level entries and their sub-logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    primary: Option<usize>,
    secondary: Option<usize>,
    wrap_around: bool,
}

impl Cursor {
    /// A cursor with nothing selected.
    pub fn new(wrap_around: bool) -> Self {
        Self {
            primary: None,
            secondary: None,
            wrap_around,
        }
    }

    /// Selected top-level position.
    pub fn primary(&self) -> Option<usize> {
        self.primary
    }

    /// Selected sub-log position under [`Cursor::primary`].
    pub fn secondary(&self) -> Option<usize> {
        self.secondary
    }

    /// Whether stepping past either end cycles to the other.
    pub fn wraps_around(&self) -> bool {
        self.wrap_around
    }

    /// Whether nothing is selected.
    pub fn is_none(&self) -> bool {
        self.primary.is_none()
    }

    /// Drop the selection.
    pub fn clear(&mut self) {
        self.primary = None;
        self.secondary = None;
    }

    /// Select an address directly.
    pub fn select(&mut self, address: LogAddress) {
        self.primary = Some(address.index);
        self.secondary = address.sub;
    }

    /// Address of the effective selection in `logs`.
    ///
    /// A stale `secondary` on an entry without sub-logs addresses the entry
    /// itself.
    pub fn address(&self, logs: &[Log]) -> Option<LogAddress> {
        let primary = self.primary?;
        let item = logs.get(primary)?;
        match self.secondary {
            Some(sub) if sub < item.sub_logs().len() => Some(LogAddress::sub(primary, sub)),
            _ => Some(LogAddress::top(primary)),
        }
    }

    /// The selected entry: the top-level entry when `secondary` is unset or
    /// the entry has no sub-logs, otherwise the selected sub-log.
    pub fn current_selection<'a>(&self, logs: &'a [Log]) -> Option<&'a Log> {
        let address = self.address(logs)?;
        let item = logs.get(address.index)?;
        match address.sub {
            None => Some(item),
            Some(sub) => item.sub_logs().get(sub),
        }
    }

    /// Move down one row.
    pub fn advance(&mut self, logs: &[Log]) {
        let Some(primary) = self.primary else {
            if !logs.is_empty() {
                self.primary = Some(0);
                self.secondary = None;
            }
            return;
        };

        if let Some(item) = logs.get(primary) {
            let next_sub = self.secondary.map_or(0, |sub| sub + 1);
            if next_sub < item.sub_logs().len() {
                self.secondary = Some(next_sub);
                return;
            }
        }

        self.secondary = None;
        if primary + 1 < logs.len() {
            self.primary = Some(primary + 1);
        } else if self.wrap_around && !logs.is_empty() {
            self.primary = Some(0);
        } else {
            self.primary = None;
        }
    }

    /// Move up one row.
    pub fn retreat(&mut self, logs: &[Log]) {
        let Some(primary) = self.primary else {
            self.select_last(logs);
            return;
        };
        if primary >= logs.len() {
            self.select_last(logs);
            return;
        }

        match self.secondary {
            Some(0) => self.secondary = None,
            Some(sub) => self.secondary = Some(sub - 1),
            None if primary == 0 => {
                if self.wrap_around {
                    self.select_last(logs);
                } else {
                    self.clear();
                }
            }
            None => self.select_row_end(logs, primary - 1),
        }
    }

    /// Pull the selection back inside `logs` after they shrank.
    pub fn clamp(&mut self, logs: &[Log]) {
        let Some(primary) = self.primary else {
            self.secondary = None;
            return;
        };
        if logs.is_empty() {
            self.clear();
            return;
        }
        if primary >= logs.len() {
            self.primary = Some(logs.len() - 1);
            self.secondary = None;
            return;
        }
        let subs = logs[primary].sub_logs().len();
        if let Some(sub) = self.secondary
            && sub >= subs
        {
            self.secondary = subs.checked_sub(1);
        }
    }

    /// Row of the selection in the flattened list, counting every top-level
    /// entry and sub-log above it. Used to keep the selection on screen.
    pub fn row(&self, logs: &[Log]) -> Option<usize> {
        let address = self.address(logs)?;
        let above: usize = logs[..address.index]
            .iter()
            .map(|log| 1 + log.sub_logs().len())
            .sum();
        Some(above + address.sub.map_or(0, |sub| sub + 1))
    }

    fn select_last(&mut self, logs: &[Log]) {
        match logs.len().checked_sub(1) {
            Some(last) => self.select_row_end(logs, last),
            None => self.clear(),
        }
    }

    /// Select the last visible row of entry `index`: its last sub-log, or
    /// the entry itself.
    fn select_row_end(&mut self, logs: &[Log], index: usize) {
        self.primary = Some(index);
        self.secondary = logs[index].sub_logs().len().checked_sub(1);
    }
}
