//! User configuration.
//!
//! Persisted as TOML at `<config dir>/bjournal/config.toml`
//! (`~/.config/bjournal/config.toml` on Linux). A missing file is not an
//! error: [`Config::load()`] falls back to [`Config::default()`].
//!
//! # Fields
//!
//! - `journal_dir`: directory holding the day records and the index
//! - `editor`: command used to open index notes (falls back to `$EDITOR`)
//! - `status_port`: port of the read-only status endpoint (`0` disables it)
//! - `wrap_around`: whether list cursors cycle past either end

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};
use crate::fs::FileSystem;

/// Port the status endpoint listens on unless configured otherwise.
pub const DEFAULT_STATUS_PORT: u16 = 8778;

/// The parts of bjournal the user can configure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding `DD.MM.YYYY.yaml` day records and `index.yaml`
    #[serde(alias = "base_dir")]
    pub journal_dir: PathBuf,

    /// Preferred editor (falls back to $EDITOR if not set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Port of the status endpoint opened alongside the TUI. `0` keeps the
    /// endpoint off.
    #[serde(default = "default_status_port")]
    pub status_port: u16,

    /// Cursor wraps from the last entry to the first and back
    #[serde(default)]
    pub wrap_around: bool,
}

fn default_status_port() -> u16 {
    DEFAULT_STATUS_PORT
}

impl Default for Config {
    fn default() -> Self {
        let journal_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Journal");
        Self::new(journal_dir)
    }
}

impl Config {
    /// Create a config for the given journal directory with default settings
    pub fn new(journal_dir: PathBuf) -> Self {
        Self {
            journal_dir,
            editor: None,
            status_port: default_status_port(),
            wrap_around: false,
        }
    }

    /// Get the config file path (~/.config/bjournal/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bjournal").join("config.toml"))
    }

    /// Status endpoint port, if the endpoint is enabled
    pub fn status_endpoint_port(&self) -> Option<u16> {
        (self.status_port != 0).then_some(self.status_port)
    }

    /// Load config from default location, or return default if file doesn't exist
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from_or_default(crate::fs::RealFileSystem, &path),
            None => Ok(Config::default()),
        }
    }

    /// Save config to default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(JournalError::NoConfigDir)?;
        self.save_to(crate::fs::RealFileSystem, &path)
    }

    /// Write a fresh config pointing at `journal_dir` and create the directory
    pub fn init(journal_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&journal_dir)?;
        let config = Config::new(journal_dir);
        config.save()?;
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from<FS: FileSystem>(fs: FS, path: &Path) -> Result<Self> {
        let contents = fs
            .read_to_string(path)
            .map_err(|e| JournalError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config from a specific path, returning defaults when it is absent.
    /// A file that exists but does not parse is still an error.
    pub fn load_from_or_default<FS: FileSystem>(fs: FS, path: &Path) -> Result<Self> {
        if !fs.exists(path) {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Config::default());
        }
        Self::load_from(fs, path)
    }

    /// Save config to a specific path.
    pub fn save_to<FS: FileSystem>(&self, fs: FS, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs.create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs.write_file(path, &contents)
            .map_err(|e| JournalError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(())
    }
}
