//! Opening note files in an external editor.

use std::path::Path;
use std::process::Command;

use crate::config::Config;
use crate::error::{JournalError, Result};

/// Something that can open a file for the user and block until they are done.
pub trait EditorLauncher {
    /// Open `path` and return once the editor has exited.
    fn open(&self, path: &Path) -> Result<()>;
}

impl<T: EditorLauncher + ?Sized> EditorLauncher for &T {
    fn open(&self, path: &Path) -> Result<()> {
        (**self).open(path)
    }
}

/// Spawns an editor process attached to the current terminal.
#[derive(Debug, Clone, Default)]
pub struct CommandEditor {
    configured: Option<String>,
}

impl CommandEditor {
    /// Use the editor from `config`, falling back to the environment.
    pub fn from_config(config: &Config) -> Self {
        Self {
            configured: config.editor.clone(),
        }
    }

    /// Use exactly this command.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            configured: Some(command.into()),
        }
    }

    /// Determine which editor to use
    pub fn determine_editor(&self) -> Result<String> {
        // 1. Check config file
        if let Some(editor) = self.configured.as_ref().filter(|e| !e.trim().is_empty()) {
            return Ok(editor.clone());
        }

        // 2. Check $EDITOR environment variable
        if let Ok(editor) = std::env::var("EDITOR")
            && !editor.trim().is_empty()
        {
            return Ok(editor);
        }

        // 3. Check $VISUAL environment variable
        if let Ok(visual) = std::env::var("VISUAL")
            && !visual.trim().is_empty()
        {
            return Ok(visual);
        }

        // 4. Platform-specific defaults
        #[cfg(target_os = "windows")]
        {
            return Ok("notepad.exe".to_string());
        }

        #[cfg(not(target_os = "windows"))]
        {
            for editor in &["vim", "vi", "nano", "emacs"] {
                if which(editor) {
                    return Ok(editor.to_string());
                }
            }
        }

        Err(JournalError::NoEditorFound)
    }
}

impl EditorLauncher for CommandEditor {
    fn open(&self, path: &Path) -> Result<()> {
        let editor = self.determine_editor()?;

        // Allow commands with flags such as `code --wait`
        let mut parts = editor.split_whitespace();
        let program = parts.next().ok_or(JournalError::NoEditorFound)?;

        log::debug!("Opening {:?} with '{}'", path, editor);
        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .map_err(|e| JournalError::EditorLaunchFailed {
                editor: editor.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(JournalError::EditorExited(status.code().unwrap_or(-1)));
        }

        Ok(())
    }
}

/// Check if a command exists in PATH
#[cfg(not(target_os = "windows"))]
fn which(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
