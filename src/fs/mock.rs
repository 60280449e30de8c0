use super::{DirEntry, FileSystem, FileType};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
struct MockEntry {
    content: Option<String>,
    file_type: FileType,
}

/// In-memory [`FileSystem`] for traversal tests.
///
/// Relative paths are rooted at `/mock`. Links behave like directory
/// symlinks: listing through a link shows the target's children under the
/// link's path, and `canonicalize` resolves to the target.
pub struct MockFileSystem {
    entries: RwLock<BTreeMap<PathBuf, MockEntry>>,
    links: RwLock<HashMap<PathBuf, PathBuf>>,
    unreadable: RwLock<HashSet<PathBuf>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self {
            entries: RwLock::new(BTreeMap::new()),
            links: RwLock::new(HashMap::new()),
            unreadable: RwLock::new(HashSet::new()),
            root: PathBuf::from("/mock"),
        };
        fs.add_dir("");
        fs
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut entries = self.entries.write().unwrap();
        if let Some(parent) = path.parent() {
            ensure_parents(&mut entries, parent);
        }
        entries.insert(
            path,
            MockEntry {
                content: Some(content.to_string()),
                file_type: FileType::File,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut entries = self.entries.write().unwrap();
        ensure_parents(&mut entries, &path);
    }

    /// Add a directory link at `path` pointing at `target`.
    pub fn add_link(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let target = self.normalize_path(target.as_ref());
        {
            let mut entries = self.entries.write().unwrap();
            if let Some(parent) = path.parent() {
                ensure_parents(&mut entries, parent);
            }
            entries.insert(
                path.clone(),
                MockEntry {
                    content: None,
                    file_type: FileType::Directory,
                },
            );
        }
        self.links.write().unwrap().insert(path, target);
    }

    /// Make `read_dir` fail on this directory.
    pub fn deny(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        self.unreadable.write().unwrap().insert(path);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Replace any linked prefix of `path` with its target.
    fn resolve(&self, path: &Path) -> PathBuf {
        let links = self.links.read().unwrap();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if let Some(target) = links.get(&current) {
                current = target.clone();
            }
        }
        current
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_parents(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        if matches!(component, Component::CurDir) {
            continue;
        }
        current.push(component);
        entries.entry(current.clone()).or_insert(MockEntry {
            content: None,
            file_type: FileType::Directory,
        });
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("Path not found: {}", path.display()),
    )
}

impl FileSystem for MockFileSystem {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let requested = self.normalize_path(path);
        let real = self.resolve(&requested);

        if self.unreadable.read().unwrap().contains(&real) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("Permission denied: {}", requested.display()),
            ));
        }

        let entries = self.entries.read().unwrap();
        match entries.get(&real) {
            Some(entry) if entry.file_type == FileType::Directory => {}
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Not a directory: {}", requested.display()),
                ))
            }
            None => return Err(not_found(&requested)),
        }

        let mut result = Vec::new();
        for (child, entry) in entries.iter() {
            if child.parent() == Some(real.as_path()) && child != &real {
                let name = child
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                result.push(DirEntry {
                    path: requested.join(&name),
                    name,
                    file_type: entry.file_type,
                });
            }
        }

        Ok(result)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let real = self.resolve(&self.normalize_path(path));
        let entries = self.entries.read().unwrap();
        entries
            .get(&real)
            .and_then(|e| e.content.clone())
            .ok_or_else(|| not_found(path))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let real = self.resolve(&self.normalize_path(path));
        if self.entries.read().unwrap().contains_key(&real) {
            Ok(real)
        } else {
            Err(not_found(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_dir_lists_children() {
        let fs = MockFileSystem::new();
        fs.add_dir("src");
        fs.add_file("package.xml", "<package/>");
        fs.add_file("src/main.cpp", "int main() {}");

        let entries = fs.read_dir(Path::new("/mock")).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(names, vec!["package.xml", "src"]);
    }

    #[test]
    fn test_link_lists_target_under_link_path() {
        let fs = MockFileSystem::new();
        fs.add_file("real/package.xml", "<package/>");
        fs.add_link("alias", "real");

        let entries = fs.read_dir(Path::new("alias")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, PathBuf::from("/mock/alias/package.xml"));
        assert_eq!(
            fs.canonicalize(Path::new("alias")).unwrap(),
            PathBuf::from("/mock/real")
        );
        assert_eq!(
            fs.read_to_string(Path::new("alias/package.xml")).unwrap(),
            "<package/>"
        );
    }

    #[test]
    fn test_denied_directory_fails() {
        let fs = MockFileSystem::new();
        fs.add_dir("secret");
        fs.deny("secret");

        let err = fs.read_dir(Path::new("secret")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
