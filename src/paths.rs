//! Filesystem path deduplication for archive candidates
//!
//! Metadata references routinely overlap: a directory reference plus
//! individual files inside it. Archiving the directory already covers the
//! files, so covered files are dropped before the archive is built.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Remove files already covered by an included directory.
///
/// Paths are partitioned into those that currently exist as directories and
/// those that exist as plain files; anything else is dropped silently here
/// (the archive builder reports nonexistent references, not this filter).
/// The result is all directories plus the files not contained in any of
/// them, with no ordering guarantee.
pub fn filter_files<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut dirs: HashSet<PathBuf> = HashSet::new();
    let mut files: HashSet<PathBuf> = HashSet::new();

    for path in paths {
        let path = path.into();
        if path.is_dir() {
            dirs.insert(path);
        } else if path.is_file() {
            files.insert(path);
        }
    }

    let mut result: Vec<PathBuf> = dirs.iter().cloned().collect();
    result.extend(
        files
            .into_iter()
            .filter(|file| !dirs.iter().any(|dir| is_contained(file, dir))),
    );
    result
}

/// True when `path` lies inside `dir` (strictly or as the same path)
fn is_contained(path: &Path, dir: &Path) -> bool {
    path.starts_with(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths.sort();
        paths
    }

    #[test]
    fn test_file_inside_directory_dropped() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("sub");
        fs::create_dir(&dir).unwrap();
        let inner = dir.join("b.txt");
        fs::write(&inner, "b").unwrap();

        let result = filter_files([dir.clone(), inner]);
        assert_eq!(result, vec![dir]);
    }

    #[test]
    fn test_sibling_files_preserved() {
        let tmp = TempDir::new().unwrap();
        let dir_a = tmp.path().join("a");
        let dir_b = tmp.path().join("b");
        fs::create_dir_all(&dir_a).unwrap();
        fs::create_dir_all(&dir_b).unwrap();
        let file_a = dir_a.join("one.txt");
        let file_b = dir_b.join("two.txt");
        fs::write(&file_a, "1").unwrap();
        fs::write(&file_b, "2").unwrap();

        let result = filter_files([file_a.clone(), file_b.clone()]);
        assert_eq!(sorted(result), sorted(vec![file_a, file_b]));
    }

    #[test]
    fn test_nonexistent_paths_dropped() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real.txt");
        fs::write(&real, "x").unwrap();
        let missing = tmp.path().join("missing.txt");

        let result = filter_files([real.clone(), missing]);
        assert_eq!(result, vec![real]);
    }

    #[test]
    fn test_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("data");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("inner.txt"), "x").unwrap();
        let standalone = tmp.path().join("standalone.txt");
        fs::write(&standalone, "y").unwrap();

        let input = vec![dir.clone(), dir.join("inner.txt"), standalone.clone()];
        let once = filter_files(input);
        let twice = filter_files(once.clone());
        assert_eq!(sorted(once), sorted(twice));
    }

    #[test]
    fn test_duplicate_input_collapsed() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, "a").unwrap();

        let result = filter_files([file.clone(), file.clone()]);
        assert_eq!(result, vec![file]);
    }
}
