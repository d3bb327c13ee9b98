//! Day-keyed journal storage.
//!
//! [`LogStore`] owns every loaded [`DailyLog`] and the [`Index`]. Days are read
//! through a cache keyed by day key and written through on every mutation:
//! each change rewrites the whole `DD.MM.YYYY.yaml` document for that day.
//!
//! # Error policy
//!
//! - A day with no record is an empty day, never an error.
//! - A record that does not decode aborts the load with
//!   [`JournalError::MalformedDay`].
//! - Write failures are returned; the cache keeps the attempted change.
//! - Index and editor operations are best-effort and only log failures.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::category::Category;
use crate::daily_log::DailyLog;
use crate::date::{day_key, parse_day_key};
use crate::editor::EditorLauncher;
use crate::entry::{Log, LogAddress};
use crate::error::{JournalError, Result};
use crate::fs::FileSystem;
use crate::index::{INDEX_FILE, Index, IndexItem, note_file_name};

const DAY_EXTENSION: &str = "yaml";

/// Which persisted day counts as "the previous day" of a given date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviousDayPolicy {
    /// The latest day other than the reference day, even if it lies after it.
    #[default]
    AnyOtherDay,
    /// The latest day strictly before the reference day.
    StrictlyBefore,
}

/// What survives when `log` is carried to another day.
///
/// A resolved entry (complete, migrated or irrelevant) stays behind, but each
/// of its open task sub-logs becomes a top-level entry of its own. An open
/// entry is carried whole, keeping only its task sub-logs.
pub fn carry_forward(mut log: Log) -> Vec<Log> {
    let sub_logs = log.sub_logs.take().unwrap_or_default();
    let open_tasks = sub_logs.into_iter().filter(Log::is_task);

    if log.mark.is_resolved() {
        return open_tasks.collect();
    }

    let kept: Vec<Log> = open_tasks.collect();
    log.sub_logs = (!kept.is_empty()).then_some(kept);
    vec![log]
}

/// Where day records live and how they are encoded.
#[derive(Debug)]
struct DayFiles<FS: FileSystem> {
    fs: FS,
    base_dir: PathBuf,
}

impl<FS: FileSystem> DayFiles<FS> {
    fn day_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", key, DAY_EXTENSION))
    }

    fn load_day(&self, date: NaiveDate) -> Result<DailyLog> {
        let path = self.day_path(&day_key(&date));
        let content = match self.fs.read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No record at {:?}, starting an empty day", path);
                return Ok(DailyLog::new(date, &self.base_dir));
            }
            Err(e) => return Err(JournalError::FileRead { path, source: e }),
        };

        DailyLog::from_yaml(&content, date, &self.base_dir, &self.fs)
            .map_err(|e| JournalError::MalformedDay { path, source: e })
    }

    fn write_day(&self, day: &DailyLog) -> Result<()> {
        let path = self.day_path(day.key());
        let content = day.to_yaml()?;
        self.write(&path, &content)?;
        log::debug!("Wrote {} entries to {:?}", day.logs().len(), path);
        Ok(())
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.fs
            .create_dir_all(&self.base_dir)
            .and_then(|_| self.fs.write_file(path, content))
            .map_err(|e| JournalError::FileWrite {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Latest persisted day other than `from`, per `policy`. A directory that
    /// cannot be listed has no previous day.
    fn previous_day(&self, from: NaiveDate, policy: PreviousDayPolicy) -> Option<NaiveDate> {
        let files = match self.fs.list_files(&self.base_dir) {
            Ok(files) => files,
            Err(e) => {
                log::warn!("Could not scan {:?} for day records: {}", self.base_dir, e);
                return None;
            }
        };

        files
            .iter()
            .filter_map(|path| path.file_stem()?.to_str())
            .filter_map(parse_day_key)
            .filter(|date| *date != from)
            .filter(|date| match policy {
                PreviousDayPolicy::AnyOtherDay => true,
                PreviousDayPolicy::StrictlyBefore => *date < from,
            })
            .max()
    }

    fn read_index(&self) -> Index {
        let path = self.base_dir.join(INDEX_FILE);
        let content = match self.fs.read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Index::default(),
            Err(e) => {
                log::warn!("Error reading the index {:?}: {}", path, e);
                return Index::default();
            }
        };
        match Index::from_yaml(&content, &self.base_dir) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("Error parsing the index {:?}: {}", path, e);
                Index::default()
            }
        }
    }
}

/// Cache and persistence for daily logs and the index.
///
/// Single-threaded: all operations block on the filesystem and take
/// `&mut self` when they may populate the cache.
#[derive(Debug)]
pub struct LogStore<FS: FileSystem> {
    files: DayFiles<FS>,
    cache: HashMap<String, DailyLog>,
    index: Index,
    previous_day_policy: PreviousDayPolicy,
    no_previous_day: DailyLog,
}

impl<FS: FileSystem> LogStore<FS> {
    /// Open the journal in `base_dir`. The index is loaded once here; a
    /// missing or unreadable index starts empty.
    pub fn new(fs: FS, base_dir: impl Into<PathBuf>) -> Self {
        let files = DayFiles {
            fs,
            base_dir: base_dir.into(),
        };
        let index = files.read_index();
        let no_previous_day = DailyLog::unresolved(&files.base_dir);
        Self {
            files,
            cache: HashMap::new(),
            index,
            previous_day_policy: PreviousDayPolicy::default(),
            no_previous_day,
        }
    }

    /// Use `policy` for [`LogStore::get_previous_date`].
    pub fn with_previous_day_policy(mut self, policy: PreviousDayPolicy) -> Self {
        self.previous_day_policy = policy;
        self
    }

    /// Journal directory.
    pub fn base_dir(&self) -> &Path {
        &self.files.base_dir
    }

    /// Filesystem the store reads and writes through.
    pub fn fs(&self) -> &FS {
        &self.files.fs
    }

    /// File backing the day `date`.
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.files.day_path(&day_key(&date))
    }

    /// Loaded permanent notes.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The cached day for `date`, without touching storage.
    pub fn cached(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.cache.get(&day_key(&date))
    }

    /// Drop every cached day so the next read goes to storage.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn load_cached<'a>(
        cache: &'a mut HashMap<String, DailyLog>,
        files: &DayFiles<FS>,
        date: NaiveDate,
    ) -> Result<&'a mut DailyLog> {
        match cache.entry(day_key(&date)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                log::debug!("Loading day {}", entry.key());
                let day = files.load_day(date)?;
                Ok(entry.insert(day))
            }
        }
    }

    /// The day for `date`, from the cache or storage. A day without a record
    /// is empty; repeated reads return the same cached value.
    pub fn read_day(&mut self, date: NaiveDate) -> Result<&DailyLog> {
        let day = Self::load_cached(&mut self.cache, &self.files, date)?;
        Ok(day)
    }

    /// Append a top-level entry to `date` and persist the day.
    pub fn add_new_log(
        &mut self,
        date: NaiveDate,
        name: impl Into<String>,
        category: Category,
    ) -> Result<&DailyLog> {
        let day = Self::load_cached(&mut self.cache, &self.files, date)?;
        day.push(Log::new(name, category));
        self.files.write_day(day)?;
        Ok(day)
    }

    /// Append a sub-log to the top-level entry at `target` of `date` and
    /// persist the day.
    ///
    /// Fails with [`JournalError::LogNotFound`] without writing when the day
    /// has no entry at `target`.
    pub fn append_new_log(
        &mut self,
        target: usize,
        date: NaiveDate,
        name: impl Into<String>,
        category: Category,
    ) -> Result<&DailyLog> {
        let day = Self::load_cached(&mut self.cache, &self.files, date)?;
        if target >= day.logs().len() {
            return Err(JournalError::LogNotFound {
                day: day.key().to_string(),
                index: target,
            });
        }
        if let Some(owner) = day.get_mut(LogAddress::top(target)) {
            owner.append_sub_log(name, category);
        }
        day.link_parents();
        self.files.write_day(day)?;
        Ok(day)
    }

    /// Date of the day shown as "previous" for `from`, if any record exists.
    pub fn previous_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        self.files.previous_day(from, self.previous_day_policy)
    }

    /// The previous day of `from`, loaded like [`LogStore::read_day`].
    ///
    /// With no other record in the journal this is an empty day with an
    /// empty key (see [`DailyLog::is_unresolved`]); it is not cached.
    pub fn get_previous_date(&mut self, from: NaiveDate) -> Result<&DailyLog> {
        let previous = self.previous_date(from);
        self.read_previous(previous)
    }

    /// Load a previous day that was already resolved with
    /// [`LogStore::previous_date`], without scanning the journal again.
    pub fn read_previous(&mut self, previous: Option<NaiveDate>) -> Result<&DailyLog> {
        match previous {
            Some(date) => self.read_day(date),
            None => Ok(&self.no_previous_day),
        }
    }

    /// Carry `previous_log` into `date` (see [`carry_forward`]) and persist
    /// the day.
    ///
    /// The source day is left untouched; marking the source entry migrated
    /// and saving its day is up to the caller, or use
    /// [`LogStore::migrate_log`] to do both.
    pub fn move_existing_log(&mut self, date: NaiveDate, previous_log: Log) -> Result<&DailyLog> {
        let day = Self::load_cached(&mut self.cache, &self.files, date)?;
        for log in carry_forward(previous_log) {
            day.push(log);
        }
        self.files.write_day(day)?;
        Ok(day)
    }

    /// Write the day for `date` as it currently is in the cache.
    pub fn save_log(&mut self, date: NaiveDate) -> Result<&DailyLog> {
        let day = Self::load_cached(&mut self.cache, &self.files, date)?;
        self.files.write_day(day)?;
        Ok(day)
    }

    /// Borrow the day for `date` for category changes. Nothing is written
    /// until [`DayHandle::commit`].
    pub fn checkout(&mut self, date: NaiveDate) -> Result<DayHandle<'_, FS>> {
        let day = Self::load_cached(&mut self.cache, &self.files, date)?;
        Ok(DayHandle {
            day,
            files: &self.files,
            dirty: false,
        })
    }

    /// Migrate one entry of `from` to `to`: carry it forward, then mark it
    /// migrated in `from`. Both days are persisted, `to` first.
    ///
    /// Returns the number of entries added to `to`.
    pub fn migrate_log(
        &mut self,
        from: NaiveDate,
        address: LogAddress,
        to: NaiveDate,
    ) -> Result<usize> {
        let source = self.read_day(from)?;
        let log = source
            .get(address)
            .cloned()
            .ok_or_else(|| JournalError::LogNotFound {
                day: source.key().to_string(),
                index: address.index,
            })?;

        let carried = carry_forward(log.clone()).len();
        self.move_existing_log(to, log)?;

        let mut source = self.checkout(from)?;
        source.mark_migrated(address)?;
        source.commit()?;

        log::info!(
            "Migrated entry {:?} of {} ({} carried)",
            address,
            day_key(&from),
            carried
        );
        Ok(carried)
    }

    /// Migrate every top-level entry of `from` to `to`, in order.
    ///
    /// Returns the number of entries added to `to`.
    pub fn migrate_all(&mut self, from: NaiveDate, to: NaiveDate) -> Result<usize> {
        let logs: Vec<Log> = self.read_day(from)?.logs().to_vec();
        let count = logs.len();

        let mut carried = 0;
        {
            let target = Self::load_cached(&mut self.cache, &self.files, to)?;
            for log in logs {
                for kept in carry_forward(log) {
                    target.push(kept);
                    carried += 1;
                }
            }
            self.files.write_day(target)?;
        }

        let mut source = self.checkout(from)?;
        for index in 0..count {
            source.mark_migrated(LogAddress::top(index))?;
        }
        source.commit()?;

        log::info!(
            "Migrated {} entries of {} to {} ({} carried)",
            count,
            day_key(&from),
            day_key(&to),
            carried
        );
        Ok(carried)
    }

    /// Persist the index. Failures are logged.
    pub fn save_index(&self) {
        let path = self.files.base_dir.join(INDEX_FILE);
        let content = match self.index.to_yaml() {
            Ok(content) => content,
            Err(e) => {
                log::error!("Error encoding the index {:?}: {}", path, e);
                return;
            }
        };
        if let Err(e) = self.files.write(&path, &content) {
            log::error!("Error saving the index: {}", e);
        }
    }

    /// Create an empty note named after `today` and `name`, register it in
    /// the index, save the index and open the note in `editor`.
    ///
    /// An existing note file with the same name is reused as is, and a note
    /// already in the index is only opened, not registered again. Failures
    /// are logged; `None` means nothing was registered.
    pub fn create_index_item<E: EditorLauncher>(
        &mut self,
        name: &str,
        today: NaiveDate,
        editor: &E,
    ) -> Option<IndexItem> {
        let name = name.trim();
        if name.is_empty() {
            log::warn!("Ignoring index note without a name");
            return None;
        }

        let url = note_file_name(&day_key(&today), name);
        if let Some(existing) = self.index.items.iter().find(|item| item.url == url) {
            log::debug!("Index note {:?} is already registered", existing.full_path);
            let existing = existing.clone();
            self.open_index_item(&existing, editor);
            return Some(existing);
        }
        let item = IndexItem::new(name, url, &self.files.base_dir);

        let created = self
            .files
            .fs
            .create_dir_all(&self.files.base_dir)
            .and_then(|_| self.files.fs.create_new(&item.full_path, ""));
        match created {
            Ok(()) => log::info!("Created index note {:?}", item.full_path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::debug!("Index note {:?} already exists", item.full_path);
            }
            Err(e) => {
                log::error!("Error creating the file {:?}: {}", item.full_path, e);
                return None;
            }
        }

        self.index.items.push(item.clone());
        self.save_index();
        self.open_index_item(&item, editor);
        Some(item)
    }

    /// Open an index note in `editor`. Failures are logged.
    pub fn open_index_item<E: EditorLauncher>(&self, item: &IndexItem, editor: &E) {
        if let Err(e) = editor.open(&item.full_path) {
            log::error!("Error opening the editor for {:?}: {}", item.full_path, e);
        }
    }
}

/// A day checked out of a [`LogStore`] for category changes.
///
/// Changes apply to the cached day immediately and are persisted by
/// [`DayHandle::commit`]. Dropping a handle with uncommitted changes keeps
/// them in the cache and logs a warning.
pub struct DayHandle<'a, FS: FileSystem> {
    day: &'a mut DailyLog,
    files: &'a DayFiles<FS>,
    dirty: bool,
}

impl<FS: FileSystem> DayHandle<'_, FS> {
    /// The checked-out day.
    pub fn day(&self) -> &DailyLog {
        &*self.day
    }

    /// Whether there are changes not yet committed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Complete the task at `address`; other categories are unchanged.
    pub fn mark_complete(&mut self, address: LogAddress) -> Result<Category> {
        self.transition(address, Log::mark_complete)
    }

    /// Mark the task at `address` irrelevant; other categories are unchanged.
    pub fn mark_irrelevant(&mut self, address: LogAddress) -> Result<Category> {
        self.transition(address, Log::mark_irrelevant)
    }

    /// Mark the task at `address` and its open sub-tasks migrated; other
    /// categories are unchanged.
    pub fn mark_migrated(&mut self, address: LogAddress) -> Result<Category> {
        self.transition(address, Log::mark_migrated)
    }

    /// Flip the `important` flag of the entry at `address`.
    pub fn toggle_important(&mut self, address: LogAddress) -> Result<bool> {
        let key = self.day.key().to_string();
        let log = self
            .day
            .get_mut(address)
            .ok_or(JournalError::LogNotFound {
                day: key,
                index: address.index,
            })?;
        log.important = !log.important;
        self.dirty = true;
        Ok(log.important)
    }

    fn transition(&mut self, address: LogAddress, apply: fn(&mut Log)) -> Result<Category> {
        let key = self.day.key().to_string();
        let log = self
            .day
            .get_mut(address)
            .ok_or(JournalError::LogNotFound {
                day: key,
                index: address.index,
            })?;
        let before = log.mark;
        apply(log);
        if log.mark != before {
            self.dirty = true;
        }
        Ok(log.mark)
    }

    /// Persist the day. Nothing is written when there are no changes.
    pub fn commit(mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        self.dirty = false;
        self.files.write_day(&*self.day)
    }
}

impl<FS: FileSystem> Drop for DayHandle<'_, FS> {
    fn drop(&mut self) {
        if self.dirty {
            log::warn!("Day {} has uncommitted changes", self.day.key());
        }
    }
}
