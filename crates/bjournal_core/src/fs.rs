use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::{Error, ErrorKind, Result, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Storage the journal reads and writes through.
///
/// The store only needs whole-file reads and writes plus a flat listing of
/// the journal directory, so that is all this trait offers.
pub trait FileSystem {
    /// Read a whole file (day record, index, note body).
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace a file's content, creating the file if needed.
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Create a file that must not exist yet. Fails with
    /// [`ErrorKind::AlreadyExists`] otherwise.
    fn create_new(&self, path: &Path, content: &str) -> Result<()>;

    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Files directly inside `dir`. Sub-directories are skipped.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

impl<T: FileSystem> FileSystem for &T {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        (**self).write_file(path, content)
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        (**self).create_new(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        (**self).create_dir_all(path)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        (**self).list_files(dir)
    }
}

/// The disk, through `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(content.as_bytes())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}

#[derive(Debug, Default)]
struct MemoryTree {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    read_only: bool,
}

impl MemoryTree {
    fn add_dir(&mut self, dir: &Path) {
        for ancestor in dir.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                self.dirs.insert(ancestor.to_path_buf());
            }
        }
    }

    fn check_writable(&self, path: &Path) -> Result<()> {
        if self.read_only {
            return Err(Error::new(
                ErrorKind::PermissionDenied,
                format!("read-only filesystem: {:?}", path),
            ));
        }
        Ok(())
    }

    fn insert(&mut self, path: PathBuf, content: &str) {
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path, content.to_string());
    }
}

/// A filesystem kept in memory, for tests.
///
/// Clones share the same tree. Paths are compared after dropping `.` and
/// resolving `..`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFileSystem {
    tree: Arc<Mutex<MemoryTree>>,
}

impl InMemoryFileSystem {
    /// An empty filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// A filesystem holding `entries`, with their directories.
    pub fn with_files(entries: Vec<(PathBuf, String)>) -> Self {
        let fs = Self::new();
        {
            let mut tree = fs.lock();
            for (path, content) in entries {
                tree.insert(normalize(&path), &content);
            }
        }
        fs
    }

    /// Make every later write fail with [`ErrorKind::PermissionDenied`].
    pub fn set_read_only(&self, read_only: bool) {
        self.lock().read_only = read_only;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryTree> {
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

impl FileSystem for InMemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.lock()
            .files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("no such file: {:?}", path)))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let mut tree = self.lock();
        tree.check_writable(path)?;
        tree.insert(normalize(path), content);
        Ok(())
    }

    fn create_new(&self, path: &Path, content: &str) -> Result<()> {
        let path = normalize(path);
        let mut tree = self.lock();
        tree.check_writable(&path)?;
        if tree.files.contains_key(&path) {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("file exists: {:?}", path),
            ));
        }
        tree.insert(path, content);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        let tree = self.lock();
        tree.files.contains_key(&path) || tree.dirs.contains(&path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut tree = self.lock();
        tree.check_writable(path)?;
        tree.add_dir(&normalize(path));
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let dir = normalize(dir);
        let tree = self.lock();
        if !tree.dirs.contains(&dir) {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("no such directory: {:?}", dir),
            ));
        }
        Ok(tree
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir.as_path()))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_read_write() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("journal/01.01.2024.yaml"), "items: []\n")
            .unwrap();

        assert_eq!(
            fs.read_to_string(Path::new("journal/01.01.2024.yaml"))
                .unwrap(),
            "items: []\n"
        );
        assert!(fs.exists(Path::new("journal")));
        assert!(!fs.exists(Path::new("journal/02.01.2024.yaml")));

        let err = fs
            .read_to_string(Path::new("journal/02.01.2024.yaml"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_in_memory_create_new() {
        let fs = InMemoryFileSystem::new();
        fs.create_new(Path::new("NOTE.md"), "").unwrap();

        let err = fs.create_new(Path::new("NOTE.md"), "again").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(fs.read_to_string(Path::new("NOTE.md")).unwrap(), "");
    }

    #[test]
    fn test_in_memory_list_files_is_flat_and_sorted() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("dir/index.yaml"), "").unwrap();
        fs.write_file(Path::new("dir/01.01.2024.yaml"), "").unwrap();
        fs.write_file(Path::new("dir/sub/02.01.2024.yaml"), "")
            .unwrap();

        assert_eq!(
            fs.list_files(Path::new("dir")).unwrap(),
            vec![
                PathBuf::from("dir/01.01.2024.yaml"),
                PathBuf::from("dir/index.yaml"),
            ]
        );

        let err = fs.list_files(Path::new("missing")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_in_memory_read_only() {
        let fs = InMemoryFileSystem::with_files(vec![(
            PathBuf::from("journal/index.yaml"),
            "items: []\n".to_string(),
        )]);
        fs.set_read_only(true);

        let err = fs
            .write_file(Path::new("journal/index.yaml"), "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(
            fs.read_to_string(Path::new("journal/index.yaml")).unwrap(),
            "items: []\n"
        );
    }

    #[test]
    fn test_in_memory_path_normalization() {
        let fs = InMemoryFileSystem::new();
        fs.write_file(Path::new("dir/file.md"), "body").unwrap();

        assert!(fs.exists(Path::new("dir/./file.md")));
        assert!(fs.exists(Path::new("dir/sub/../file.md")));
    }
}
