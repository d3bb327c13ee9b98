//! Entry categories and their transition rules.
//!
//! Only [`Category::Task`] can change state. Every other category is terminal
//! once assigned, so the transition helpers return `self` unchanged for them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JournalError;

/// The kind of a bullet, persisted as its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Open task
    Task,
    /// Task that was done
    Complete,
    /// Task that no longer matters
    Irrelevant,
    /// Task carried forward to another day
    Migrated,
    /// Task scheduled for a future day
    Scheduled,
    /// Free note
    Note,
    /// Something that happened or will happen
    Event,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::Task,
        Category::Complete,
        Category::Irrelevant,
        Category::Migrated,
        Category::Scheduled,
        Category::Note,
        Category::Event,
    ];

    /// Bullet glyph drawn in front of an entry.
    pub fn glyph(self) -> char {
        match self {
            Category::Task => '•',
            Category::Complete => '✘',
            Category::Irrelevant => ' ',
            Category::Migrated => '>',
            Category::Scheduled => '<',
            Category::Note => '-',
            Category::Event => '○',
        }
    }

    /// Lowercase name, as persisted.
    pub fn label(self) -> &'static str {
        match self {
            Category::Task => "task",
            Category::Complete => "complete",
            Category::Irrelevant => "irrelevant",
            Category::Migrated => "migrated",
            Category::Scheduled => "scheduled",
            Category::Note => "note",
            Category::Event => "event",
        }
    }

    /// `Task -> Complete`, identity otherwise.
    pub fn completed(self) -> Category {
        match self {
            Category::Task => Category::Complete,
            other => other,
        }
    }

    /// `Task -> Irrelevant`, identity otherwise.
    pub fn made_irrelevant(self) -> Category {
        match self {
            Category::Task => Category::Irrelevant,
            other => other,
        }
    }

    /// `Task -> Migrated`, identity otherwise.
    pub fn migrated(self) -> Category {
        match self {
            Category::Task => Category::Migrated,
            other => other,
        }
    }

    /// Resolved entries are closed and never carried to another day.
    pub fn is_resolved(self) -> bool {
        matches!(
            self,
            Category::Complete | Category::Migrated | Category::Irrelevant
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.label() == lowered)
            .ok_or_else(|| JournalError::UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_task_transitions() {
        for category in Category::ALL {
            let expected_complete = if category == Category::Task {
                Category::Complete
            } else {
                category
            };
            assert_eq!(category.completed(), expected_complete);
        }
        assert_eq!(Category::Task.made_irrelevant(), Category::Irrelevant);
        assert_eq!(Category::Note.made_irrelevant(), Category::Note);
        assert_eq!(Category::Task.migrated(), Category::Migrated);
        assert_eq!(Category::Event.migrated(), Category::Event);
    }

    #[test]
    fn test_glyphs() {
        let glyphs: String = Category::ALL.iter().map(|c| c.glyph()).collect();
        assert_eq!(glyphs, "•✘ ><-○");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Task".parse::<Category>().unwrap(), Category::Task);
        assert_eq!(" event ".parse::<Category>().unwrap(), Category::Event);
        assert!(matches!(
            "chore".parse::<Category>(),
            Err(JournalError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let yaml = serde_yaml::to_string(&Category::Scheduled).unwrap();
        assert_eq!(yaml.trim(), "scheduled");
        let parsed: Category = serde_yaml::from_str("irrelevant").unwrap();
        assert_eq!(parsed, Category::Irrelevant);
    }
}
