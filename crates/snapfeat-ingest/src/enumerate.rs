//! Candidate file discovery
//!
//! Walks the input root and yields root-relative paths of regular files, in
//! file-name order at every level. Symlinked files are yielded; symlinked
//! directories are not descended into. Excluded prefixes are matched against the
//! forward-slash form of the relative path, so `features` skips both
//! `features.tsv` and a `features/` directory. Excluded directories are
//! pruned without being descended into.

use crate::config::{relative_to, DEFAULT_EXCLUDED_PREFIXES};
use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct FileEnumerator {
    root: PathBuf,
    excluded_prefixes: Vec<String>,
}

impl FileEnumerator {
    /// Enumerator over `root` with the default exclusions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Replace the exclusion list. Empty prefixes are dropped; they would
    /// exclude everything.
    pub fn with_excluded_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_prefixes = prefixes
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.is_empty())
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a root-relative path is excluded
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| relative.starts_with(prefix.as_str()))
    }

    /// Lazily walk the root. Each call starts a fresh walk.
    ///
    /// Traversal errors (missing root, unreadable directory) are yielded as
    /// items rather than swallowed.
    pub fn iter(&self) -> impl Iterator<Item = Result<PathBuf>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !self.entry_excluded(entry))
            .filter_map(move |entry| -> Option<Result<PathBuf>> {
                match entry {
                    Ok(entry) if is_candidate(&entry) => entry
                        .path()
                        .strip_prefix(&self.root)
                        .ok()
                        .map(|relative| Ok(relative.to_path_buf())),
                    Ok(_) => None,
                    Err(e) => Some(Err(e.into())),
                }
            })
    }

    /// Collect every candidate path, failing on the first traversal error
    pub fn collect_paths(&self) -> Result<Vec<PathBuf>> {
        self.iter().collect()
    }

    fn entry_excluded(&self, entry: &DirEntry) -> bool {
        match relative_to(entry.path(), &self.root) {
            Some(relative) => self.is_excluded(&relative),
            // The root itself
            None => false,
        }
    }
}

/// Regular files, and symlinks unless they resolve to a directory. A dangling
/// link is still yielded so that reading it reports the broken target.
fn is_candidate(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    !std::fs::metadata(entry.path()).is_ok_and(|meta| meta.is_dir())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn layout() -> TempDir {
        let dir = TempDir::new().unwrap();
        for relative in [
            "b.dna",
            "a.dna",
            ".DS_Store",
            "features.tsv",
            "features/old.dna",
            "vectors/pUC19.dna",
            "vectors/.DS_Store",
            "vectors/nested/pET28.dna",
        ] {
            touch(dir.path(), relative);
        }
        dir
    }

    #[test]
    fn test_enumerates_sorted_relative_files() {
        let dir = layout();
        let paths = FileEnumerator::new(dir.path()).collect_paths().unwrap();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.dna"),
                PathBuf::from("b.dna"),
                PathBuf::from("vectors/.DS_Store"),
                PathBuf::from("vectors/nested/pET28.dna"),
                PathBuf::from("vectors/pUC19.dna"),
            ]
        );
    }

    #[test]
    fn test_restartable() {
        let dir = layout();
        let enumerator = FileEnumerator::new(dir.path());
        let first: Vec<_> = enumerator.iter().map(|p| p.unwrap()).collect();
        let second: Vec<_> = enumerator.iter().map(|p| p.unwrap()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn test_custom_prefixes() {
        let dir = layout();
        let paths = FileEnumerator::new(dir.path())
            .with_excluded_prefixes(["vectors", ""])
            .collect_paths()
            .unwrap();

        assert_eq!(
            paths,
            vec![
                PathBuf::from(".DS_Store"),
                PathBuf::from("a.dna"),
                PathBuf::from("b.dna"),
                PathBuf::from("features/old.dna"),
                PathBuf::from("features.tsv"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_yielded_directories_not_followed() {
        let dir = layout();
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "shared/pBR322.dna");

        std::os::unix::fs::symlink(
            outside.path().join("shared/pBR322.dna"),
            dir.path().join("link.dna"),
        )
        .unwrap();
        std::os::unix::fs::symlink(outside.path().join("shared"), dir.path().join("linked_dir"))
            .unwrap();

        let paths = FileEnumerator::new(dir.path()).collect_paths().unwrap();

        assert!(paths.contains(&PathBuf::from("link.dna")));
        assert!(!paths.iter().any(|p| p.starts_with("linked_dir")));
        assert_eq!(paths.len(), 6);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_yielded() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.dna"), dir.path().join("stale.dna"))
            .unwrap();

        let paths = FileEnumerator::new(dir.path()).collect_paths().unwrap();
        assert_eq!(paths, vec![PathBuf::from("stale.dna")]);
    }

    #[test]
    fn test_empty_root() {
        let dir = TempDir::new().unwrap();
        assert!(FileEnumerator::new(dir.path()).collect_paths().unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let result = FileEnumerator::new(dir.path().join("nope")).collect_paths();
        assert!(result.is_err());
    }
}
