use super::{DirEntry, FileSystem, FileType};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// [`FileSystem`] backed by `std::fs`. Entry types follow symlinks.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut result = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            // fs::metadata follows the link, a dangling one counts as Other
            let file_type = match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => FileType::Directory,
                Ok(meta) if meta.is_file() => FileType::File,
                _ => FileType::Other,
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }

        Ok(result)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        path.canonicalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_dir_reports_types() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("package.xml"), "<package/>").unwrap();
        fs::create_dir(temp_dir.path().join("src")).unwrap();

        let fs = RealFileSystem::new();
        let mut entries = fs.read_dir(temp_dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "package.xml");
        assert!(entries[0].is_file());
        assert_eq!(entries[1].name, "src");
        assert!(entries[1].is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_dir_follows_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("real"), temp_dir.path().join("link"))
            .unwrap();

        let fs = RealFileSystem::new();
        let entries = fs.read_dir(temp_dir.path()).unwrap();
        assert!(entries.iter().all(|e| e.is_dir()));
        assert_eq!(
            fs.canonicalize(&temp_dir.path().join("link")).unwrap(),
            fs.canonicalize(&temp_dir.path().join("real")).unwrap()
        );
    }
}
