//! Backing stores for icon set files
//!
//! The registry never touches the disk directly. Every lookup goes through a
//! [`Filesystem`], which only has to answer three questions: does a path exist,
//! which files live below it, and what does a file contain.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use include_dir::Dir;
use parking_lot::RwLock;
use walkdir::WalkDir;

/// A file discovered below an icon set root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    /// Directory of the file, relative to the listed root (empty for top-level files)
    pub relative_dir: PathBuf,
    /// Filename without its extension
    pub stem: String,
}

impl IconFile {
    pub fn new(relative_dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            relative_dir: relative_dir.into(),
            stem: stem.into(),
        }
    }

    fn from_relative(relative: &Path) -> Option<Self> {
        let stem = relative.file_stem()?.to_str()?.to_string();
        let relative_dir = relative.parent().map(Path::to_path_buf).unwrap_or_default();
        Some(Self { relative_dir, stem })
    }
}

/// Read-only storage capability consumed by the registry.
///
/// Implementations must report a missing file from [`Filesystem::get`] as an
/// error of kind [`io::ErrorKind::NotFound`]; any other error kind is passed
/// through to callers untouched.
pub trait Filesystem: Send + Sync {
    /// Whether a file or directory exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Every file below `root`, recursively, in a stable order
    fn all_files(&self, root: &Path) -> io::Result<Vec<IconFile>>;

    /// Full contents of the file at `path`
    fn get(&self, path: &Path) -> io::Result<String>;
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("file not found: {}", path.display()),
    )
}

/// The local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn all_files(&self, root: &Path) -> io::Result<Vec<IconFile>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            if let Some(file) = IconFile::from_relative(relative) {
                files.push(file);
            }
        }

        Ok(files)
    }

    fn get(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Strip `.` components so `a/./b` and `a/b` address the same entry
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// In-memory store for tests and hosts that assemble icon sets at runtime
#[derive(Debug, Default)]
pub struct MemoryFilesystem {
    files: RwLock<HashMap<PathBuf, String>>,
    dirs: RwLock<Vec<PathBuf>>,
    reads: AtomicUsize,
}

impl MemoryFilesystem {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files
            .write()
            .insert(normalize(path.as_ref()), contents.into());
    }

    /// Builder form of [`MemoryFilesystem::insert`]
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Register an empty directory
    pub fn create_dir(&self, path: impl AsRef<Path>) {
        self.dirs.write().push(normalize(path.as_ref()));
    }

    /// Remove a file, returning its previous contents
    pub fn remove(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.write().remove(&normalize(path.as_ref()))
    }

    /// Number of successful and failed [`Filesystem::get`] calls so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.files.read().keys().any(|p| p.starts_with(&path))
            || self.dirs.read().iter().any(|d| d.starts_with(&path))
    }

    fn all_files(&self, root: &Path) -> io::Result<Vec<IconFile>> {
        let root = normalize(root);
        let files = self.files.read();

        let mut relative: Vec<&Path> = files
            .keys()
            .filter_map(|p| p.strip_prefix(&root).ok())
            .filter(|p| {
                !p.as_os_str().is_empty()
                    && !p.iter().any(|c| is_hidden(&c.to_string_lossy()))
            })
            .collect();
        relative.sort();

        Ok(relative.into_iter().filter_map(IconFile::from_relative).collect())
    }

    fn get(&self, path: &Path) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .read()
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| not_found(path))
    }
}

/// Icon sets compiled into the binary with [`include_dir::include_dir!`].
///
/// Paths are relative to the embedded root; an empty path names the root itself.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedFilesystem {
    dir: &'static Dir<'static>,
}

impl EmbeddedFilesystem {
    pub fn new(dir: &'static Dir<'static>) -> Self {
        Self { dir }
    }

    fn dir_at(&self, path: &Path) -> Option<&'static Dir<'static>> {
        let path = normalize(path);
        if path.as_os_str().is_empty() {
            return Some(self.dir);
        }
        self.dir.get_dir(&path)
    }

    fn collect(dir: &'static Dir<'static>, root: &Path, out: &mut Vec<PathBuf>) {
        for file in dir.files() {
            if let Ok(relative) = file.path().strip_prefix(root) {
                out.push(relative.to_path_buf());
            }
        }
        for sub in dir.dirs() {
            Self::collect(sub, root, out);
        }
    }
}

impl Filesystem for EmbeddedFilesystem {
    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        path.as_os_str().is_empty() || self.dir.get_entry(&path).is_some()
    }

    fn all_files(&self, root: &Path) -> io::Result<Vec<IconFile>> {
        let dir = self.dir_at(root).ok_or_else(|| not_found(root))?;

        let mut relative = Vec::new();
        Self::collect(dir, dir.path(), &mut relative);
        relative.retain(|p| !p.iter().any(|c| is_hidden(&c.to_string_lossy())));
        relative.sort();

        Ok(relative.iter().filter_map(|p| IconFile::from_relative(p)).collect())
    }

    fn get(&self, path: &Path) -> io::Result<String> {
        let file = self
            .dir
            .get_file(normalize(path))
            .ok_or_else(|| not_found(path))?;

        file.contents_utf8().map(str::to_string).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not valid UTF-8", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_lists_nested_files() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("solid")).unwrap();
        std::fs::write(dir.path().join("github.svg"), "<svg/>").unwrap();
        std::fs::write(dir.path().join("solid/user.svg"), "<svg/>").unwrap();
        std::fs::write(dir.path().join(".DS_Store"), "").unwrap();

        let files = LocalFilesystem.all_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                IconFile::new("", "github"),
                IconFile::new("solid", "user"),
            ]
        );
    }

    #[test]
    fn test_local_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = LocalFilesystem.get(&dir.path().join("nope.svg")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_exists_for_directories() {
        let fs = MemoryFilesystem::new().with_file("icons/solid/user.svg", "<svg/>");
        assert!(fs.exists(Path::new("icons")));
        assert!(fs.exists(Path::new("icons/solid")));
        assert!(fs.exists(Path::new("icons/solid/user.svg")));
        assert!(!fs.exists(Path::new("other")));

        fs.create_dir("empty");
        assert!(fs.exists(Path::new("empty")));
    }

    #[test]
    fn test_memory_lists_relative_to_root() {
        let fs = MemoryFilesystem::new()
            .with_file("icons/b.svg", "")
            .with_file("icons/solid/a.svg", "")
            .with_file("other/c.svg", "");

        let files = fs.all_files(Path::new("icons")).unwrap();
        assert_eq!(
            files,
            vec![IconFile::new("", "b"), IconFile::new("solid", "a")]
        );
    }

    #[test]
    fn test_memory_counts_reads() {
        let fs = MemoryFilesystem::new().with_file("icons/a.svg", "<svg/>");
        assert_eq!(fs.get(Path::new("icons/./a.svg")).unwrap(), "<svg/>");
        assert!(fs.get(Path::new("icons/b.svg")).is_err());
        assert_eq!(fs.reads(), 2);
    }
}
