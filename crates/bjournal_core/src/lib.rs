#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Entry categories and transitions
pub mod category;

/// Configuration options
pub mod config;

/// Two-level list cursor
pub mod cursor;

/// One day of entries
pub mod daily_log;

/// Day keys and date parsing
pub mod date;

/// External editor
pub mod editor;

/// Journal entries
pub mod entry;

/// Error (common error types)
pub mod error;

/// Filesystem abstraction
pub mod fs;

/// Index of permanent notes
pub mod index;

/// Day-keyed cache, persistence and migration
pub mod store;

pub use category::Category;
pub use cursor::Cursor;
pub use daily_log::DailyLog;
pub use entry::{Log, LogAddress};
pub use error::{JournalError, Result};
pub use store::{DayHandle, LogStore, PreviousDayPolicy};
