//! Directory traversal shared by validate and cleanup.

use std::path::{Path, PathBuf};
use text2file_spec::Fault;
use walkdir::WalkDir;

/// Regular files under `root` in file-name order.
///
/// Only the top level is visited unless `recursive`; symbolic links are
/// never followed. Traversal errors are yielded as faults so callers can
/// record them and keep going.
pub fn regular_files(root: &Path, recursive: bool) -> impl Iterator<Item = Result<PathBuf, Fault>> {
    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let root = root.to_path_buf();
    walker.into_iter().filter_map(move |entry| match entry {
        Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
        Ok(_) => None,
        Err(err) => Some(Err(Fault {
            path: err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone()),
            message: err.to_string(),
        })),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(root: &Path, recursive: bool) -> Vec<String> {
        regular_files(root, recursive)
            .map(|entry| {
                let path = entry.unwrap();
                path.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn depth_and_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.txt"), "c").unwrap();

        assert_eq!(names(dir.path(), false), vec!["a.txt", "b.txt"]);
        assert_eq!(names(dir.path(), true), vec!["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "s").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("file-link.txt"),
        )
        .unwrap();

        assert!(names(dir.path(), true).is_empty());
    }
}
