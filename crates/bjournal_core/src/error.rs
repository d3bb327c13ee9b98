use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for bjournal operations
#[derive(Debug, Error)]
pub enum JournalError {
    // IO errors
    /// Any other IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file exists but could not be read
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        /// Path that was being read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// A file could not be written
    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        /// Path that was being written
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    // Record errors
    /// A persisted day record exists but does not decode
    #[error("Malformed day record '{path}': {source}")]
    MalformedDay {
        /// Path of the day record
        path: PathBuf,
        /// Decoder error
        source: serde_yaml::Error,
    },

    /// YAML encode/decode failure outside of day records
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No top-level entry at the given position of a day
    #[error("No entry #{index} in day {day}")]
    LogNotFound {
        /// Day key of the targeted day
        day: String,
        /// Requested top-level position
        index: usize,
    },

    // Date errors
    /// User supplied a date we could not understand
    #[error(
        "Invalid date format: '{0}'. Try 'today', 'yesterday', 'last friday', 'DD.MM.YYYY', or 'YYYY-MM-DD'"
    )]
    InvalidDateFormat(String),

    /// User supplied an unknown category name
    #[error("Unknown category '{0}'. Try task, note, event or scheduled")]
    UnknownCategory(String),

    // Config errors
    /// Config file is not valid TOML
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be encoded
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Platform has no config directory
    #[error("Could not determine config directory")]
    NoConfigDir,

    // Editor errors
    /// Nothing usable to open notes with
    #[error("No editor found. Set $EDITOR, $VISUAL, or configure editor in config file")]
    NoEditorFound,

    /// The editor process could not be spawned
    #[error("Failed to launch editor '{editor}': {source}")]
    EditorLaunchFailed {
        /// Editor command
        editor: String,
        /// Spawn error
        source: std::io::Error,
    },

    /// The editor ran but exited unsuccessfully
    #[error("Editor exited with code {0}")]
    EditorExited(i32),
}

/// Result type alias for bjournal operations
pub type Result<T> = std::result::Result<T, JournalError>;
