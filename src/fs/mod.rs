//! Filesystem abstraction used by package discovery.
//!
//! Discovery only needs to list directories, read manifests and
//! canonicalize paths, so the trait stays that small. The in-memory
//! implementation lets the traversal rules be tested without touching disk.

#[cfg(test)]
mod mock;
mod real;

#[cfg(test)]
pub use mock::MockFileSystem;
pub use real::RealFileSystem;

use std::io;
use std::path::{Path, PathBuf};

/// Type of a directory entry, after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Other,
}

/// A directory entry returned by [`FileSystem::read_dir`].
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub file_type: FileType,
}

impl DirEntry {
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

pub trait FileSystem: Send + Sync {
    /// List the immediate children of a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Resolve symlinks, used to detect directories reached twice.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}
