//! File access for template loading.
//!
//! The renderer never touches the filesystem directly. It goes through a
//! [`FileStore`], which can read a file and enumerate the files of a
//! directory tree. [`DiskStore`] is the real implementation; tests and
//! embedders can supply their own (in-memory trees, call counting, etc.).

use std::io;
use std::path::{Path, PathBuf};

/// Read and walk access to template files.
pub trait FileStore: Send + Sync {
    /// Reads the full contents of a file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Lists every file under `dir`, recursively, whose path ends with `suffix`.
    ///
    /// Order is whatever the underlying traversal produces. A missing
    /// directory yields an empty list.
    fn walk(&self, dir: &Path, suffix: &str) -> io::Result<Vec<PathBuf>>;
}

/// [`FileStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl FileStore for DiskStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn walk(&self, dir: &Path, suffix: &str) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !dir.is_dir() {
            return Ok(files);
        }
        walk_recursive(dir, suffix, &mut files)?;
        Ok(files)
    }
}

fn walk_recursive(current: &Path, suffix: &str, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(current)? {
        let path = entry?.path();

        if path.is_dir() {
            walk_recursive(&path, suffix, files)?;
        } else if path.is_file() && path.to_string_lossy().ends_with(suffix) {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::normalize;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_file(dir: &Path, relative_path: &str, content: &str) {
        let full_path = dir.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(&full_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn relative_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = files
            .iter()
            .map(|f| normalize(f.strip_prefix(root).unwrap()))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_walk_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = DiskStore
            .walk(&temp_dir.path().join("nope"), ".jinja")
            .unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_walk_filters_suffix() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "good.jinja", "x");
        create_file(temp_dir.path(), "bad.txt", "x");
        create_file(temp_dir.path(), "also.jinja.bak", "x");

        let files = DiskStore.walk(temp_dir.path(), ".jinja").unwrap();
        assert_eq!(relative_names(temp_dir.path(), &files), vec!["good.jinja"]);
    }

    #[test]
    fn test_walk_nested() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "root.jinja", "x");
        create_file(temp_dir.path(), "sub/nested.jinja", "x");
        create_file(temp_dir.path(), "sub/deep/very.jinja", "x");

        let files = DiskStore.walk(temp_dir.path(), ".jinja").unwrap();
        assert_eq!(
            relative_names(temp_dir.path(), &files),
            vec!["root.jinja", "sub/deep/very.jinja", "sub/nested.jinja"]
        );
    }

    #[test]
    fn test_read_missing_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let err = DiskStore
            .read(&temp_dir.path().join("missing.jinja"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_returns_bytes() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "hello.jinja", "Hello {{ name }}");
        let bytes = DiskStore.read(&temp_dir.path().join("hello.jinja")).unwrap();
        assert_eq!(bytes, b"Hello {{ name }}");
    }
}
