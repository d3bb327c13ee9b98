//! One calendar day of entries.
//!
//! A [`DailyLog`] is persisted as a YAML document with a single `items`
//! sequence. The day key, date and base directory are not part of the
//! document; they are reconstructed from the file name when the day is read.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::day_key;
use crate::entry::{Log, LogAddress};
use crate::fs::FileSystem;

/// Ordered entries of one day.
///
/// Read-only outside the crate: mutations go through
/// [`LogStore`](crate::store::LogStore) and its
/// [`DayHandle`](crate::store::DayHandle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    #[serde(skip)]
    key: String,

    #[serde(skip, default = "unresolved_date")]
    date: NaiveDate,

    #[serde(rename = "items", default)]
    logs: Vec<Log>,

    #[serde(skip)]
    base_path: PathBuf,
}

fn unresolved_date() -> NaiveDate {
    NaiveDate::default()
}

impl DailyLog {
    /// An empty day, used when nothing has been persisted for `date` yet.
    pub fn new(date: NaiveDate, base_path: impl Into<PathBuf>) -> Self {
        Self {
            key: day_key(&date),
            date,
            logs: Vec::new(),
            base_path: base_path.into(),
        }
    }

    /// An empty placeholder with no key, returned when there is no previous
    /// day to show.
    pub fn unresolved(base_path: impl Into<PathBuf>) -> Self {
        Self {
            key: String::new(),
            date: unresolved_date(),
            logs: Vec::new(),
            base_path: base_path.into(),
        }
    }

    /// Decode a persisted day and restore everything that is not persisted:
    /// key, date, body texts and parent links.
    ///
    /// An empty document is an empty day.
    pub fn from_yaml<FS: FileSystem>(
        content: &str,
        date: NaiveDate,
        base_path: &Path,
        fs: &FS,
    ) -> Result<Self, serde_yaml::Error> {
        let mut daily = if content.trim().is_empty() {
            DailyLog::new(date, base_path)
        } else {
            let mut parsed: DailyLog = serde_yaml::from_str(content)?;
            parsed.key = day_key(&date);
            parsed.date = date;
            parsed.base_path = base_path.to_path_buf();
            parsed
        };
        daily.resolve_bodies(fs);
        daily.link_parents();
        Ok(daily)
    }

    /// Encode the day as persisted.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Canonical day key, empty for [`DailyLog::unresolved`].
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Calendar date of the day.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Directory body references are resolved against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Top-level entries in insertion order.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Whether this is the keyless placeholder.
    pub fn is_unresolved(&self) -> bool {
        self.key.is_empty()
    }

    /// Entry at `address`, if any.
    pub fn get(&self, address: LogAddress) -> Option<&Log> {
        let top = self.logs.get(address.index)?;
        match address.sub {
            None => Some(top),
            Some(sub) => top.sub_logs().get(sub),
        }
    }

    pub(crate) fn get_mut(&mut self, address: LogAddress) -> Option<&mut Log> {
        let top = self.logs.get_mut(address.index)?;
        match address.sub {
            None => Some(top),
            Some(sub) => top.sub_logs.as_mut()?.get_mut(sub),
        }
    }

    /// Append a top-level entry. It is detached from any previous parent.
    pub(crate) fn push(&mut self, mut log: Log) {
        log.parent = None;
        self.logs.push(log);
        self.link_parents();
    }

    /// Point every sub-log at the position of its owner.
    pub(crate) fn link_parents(&mut self) {
        for (index, log) in self.logs.iter_mut().enumerate() {
            log.parent = None;
            if let Some(sub_logs) = log.sub_logs.as_mut() {
                for sub_log in sub_logs {
                    sub_log.parent = Some(index);
                }
            }
        }
    }

    /// Load the body of every entry with a `url`. Missing or unreadable
    /// files leave the body unset.
    fn resolve_bodies<FS: FileSystem>(&mut self, fs: &FS) {
        let base = self.base_path.clone();
        for log in self.logs.iter_mut() {
            resolve_body(log, &base, fs);
            if let Some(sub_logs) = log.sub_logs.as_mut() {
                for sub_log in sub_logs {
                    resolve_body(sub_log, &base, fs);
                }
            }
        }
    }
}

fn resolve_body<FS: FileSystem>(log: &mut Log, base: &Path, fs: &FS) {
    let Some(url) = log.url.as_deref() else {
        return;
    };
    let path = base.join(url);
    match fs.read_to_string(&path) {
        Ok(text) => log.text = Some(text),
        Err(e) => log::warn!("Body of '{}' unavailable at {:?}: {}", log.name, path, e),
    }
}
