//! Journal entries: a single bullet and its one level of sub-entries.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// One bullet of a daily log.
///
/// Nesting is one level deep: the sub-logs of a top-level entry never carry
/// sub-logs of their own. `sub_logs: Some(vec![])` and `None` are treated the
/// same everywhere; use [`Log::sub_logs()`] rather than the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    /// Single-line text of the entry
    pub name: String,

    /// Current category
    pub mark: Category,

    /// Highlighted entry
    #[serde(default)]
    pub important: bool,

    /// Body file, relative to the journal directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Body text resolved from `url` at load time. Never persisted.
    #[serde(skip)]
    pub text: Option<String>,

    /// Nested entries
    #[serde(rename = "subLogs", default, skip_serializing_if = "Option::is_none")]
    pub sub_logs: Option<Vec<Log>>,

    /// Position of the owning top-level entry, set only on sub-logs.
    /// Re-derived on every load, never persisted.
    #[serde(skip)]
    pub(crate) parent: Option<usize>,
}

impl Log {
    /// Create a plain entry with no body and no sub-logs.
    pub fn new(name: impl Into<String>, mark: Category) -> Self {
        Self {
            name: name.into(),
            mark,
            important: false,
            url: None,
            text: None,
            sub_logs: None,
            parent: None,
        }
    }

    /// Sub-logs, empty when absent.
    pub fn sub_logs(&self) -> &[Log] {
        self.sub_logs.as_deref().unwrap_or(&[])
    }

    /// Whether this entry has at least one sub-log.
    pub fn has_sub_logs(&self) -> bool {
        !self.sub_logs().is_empty()
    }

    /// Position of the owning top-level entry, for sub-logs.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Append a new sub-log at the end.
    pub fn append_sub_log(&mut self, name: impl Into<String>, mark: Category) {
        self.sub_logs
            .get_or_insert_with(Vec::new)
            .push(Log::new(name, mark));
    }

    /// `Task -> Complete`, no-op otherwise.
    pub fn mark_complete(&mut self) {
        self.mark = self.mark.completed();
    }

    /// `Task -> Irrelevant`, no-op otherwise.
    pub fn mark_irrelevant(&mut self) {
        self.mark = self.mark.made_irrelevant();
    }

    /// `Task -> Migrated`, no-op otherwise. A migrated task also migrates
    /// every open task below it; other sub-logs are left as they are.
    pub fn mark_migrated(&mut self) {
        if !self.is_task() {
            return;
        }
        self.mark = Category::Migrated;
        if let Some(sub_logs) = self.sub_logs.as_mut() {
            for sub_log in sub_logs {
                sub_log.mark_migrated();
            }
        }
    }

    /// Whether the entry is an open task.
    pub fn is_task(&self) -> bool {
        self.mark == Category::Task
    }

    /// Whether the entry was completed.
    pub fn is_complete(&self) -> bool {
        self.mark == Category::Complete
    }

    /// Whether the entry was migrated.
    pub fn is_migrated(&self) -> bool {
        self.mark == Category::Migrated
    }

    /// Whether the entry was marked irrelevant.
    pub fn is_irrelevant(&self) -> bool {
        self.mark == Category::Irrelevant
    }
}

/// Positional address of an entry inside one day.
///
/// `index` is the top-level position; `sub` selects one of its sub-logs.
/// Addresses are derived from the persisted order, so they stay valid across
/// cache reloads as long as the day has not been restructured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogAddress {
    /// Top-level position
    pub index: usize,
    /// Sub-log position under `index`
    pub sub: Option<usize>,
}

impl LogAddress {
    /// Address of a top-level entry.
    pub fn top(index: usize) -> Self {
        Self { index, sub: None }
    }

    /// Address of a sub-log.
    pub fn sub(index: usize, sub: usize) -> Self {
        Self {
            index,
            sub: Some(sub),
        }
    }

    /// The top-level entry owning this address.
    pub fn owner(self) -> Self {
        Self::top(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with(subs: &[Category]) -> Log {
        let mut log = Log::new("parent", Category::Task);
        for (i, mark) in subs.iter().enumerate() {
            log.append_sub_log(format!("sub {}", i), *mark);
        }
        log
    }

    #[test]
    fn test_mark_complete_only_from_task() {
        for category in Category::ALL {
            let mut log = Log::new("entry", category);
            log.mark_complete();
            if category == Category::Task {
                assert_eq!(log.mark, Category::Complete);
            } else {
                assert_eq!(log.mark, category);
            }
        }
    }

    #[test]
    fn test_mark_irrelevant_only_from_task() {
        let mut task = Log::new("task", Category::Task);
        task.mark_irrelevant();
        assert!(task.is_irrelevant());

        let mut event = Log::new("event", Category::Event);
        event.mark_irrelevant();
        assert_eq!(event.mark, Category::Event);
    }

    #[test]
    fn test_mark_migrated_recurses_into_tasks() {
        let mut log = task_with(&[
            Category::Task,
            Category::Note,
            Category::Task,
            Category::Complete,
        ]);
        log.mark_migrated();

        assert!(log.is_migrated());
        let marks: Vec<Category> = log.sub_logs().iter().map(|s| s.mark).collect();
        assert_eq!(
            marks,
            vec![
                Category::Migrated,
                Category::Note,
                Category::Migrated,
                Category::Complete,
            ]
        );
    }

    #[test]
    fn test_mark_migrated_is_noop_for_closed_parent() {
        let mut log = task_with(&[Category::Task]);
        log.mark = Category::Complete;
        log.mark_migrated();

        assert!(log.is_complete());
        assert!(log.sub_logs()[0].is_task());
    }

    #[test]
    fn test_empty_sub_logs_equivalent_to_none() {
        let mut log = Log::new("entry", Category::Note);
        log.sub_logs = Some(Vec::new());
        assert!(!log.has_sub_logs());
        assert!(log.sub_logs().is_empty());
    }

    #[test]
    fn test_yaml_shape() {
        let mut log = task_with(&[Category::Note]);
        log.url = Some("notes/body.md".to_string());
        log.text = Some("never written".to_string());

        let yaml = serde_yaml::to_string(&log).unwrap();
        assert!(yaml.contains("name: parent"));
        assert!(yaml.contains("mark: task"));
        assert!(yaml.contains("important: false"));
        assert!(yaml.contains("url: notes/body.md"));
        assert!(yaml.contains("subLogs:"));
        assert!(!yaml.contains("never written"));
        assert!(!yaml.contains("parent:"));
    }

    #[test]
    fn test_yaml_defaults() {
        let log: Log = serde_yaml::from_str("name: call mum\nmark: event\n").unwrap();
        assert_eq!(log, Log::new("call mum", Category::Event));
    }
}
