//! Cleanup orchestrator: validate every known file under a root and delete
//! the invalid ones.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use text2file_spec::{CleanupReport, Fault, RequestError, ValidateError};
use tracing::{debug, info, warn};

use crate::inspect;
use crate::registry::Registry;
use crate::walk;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    pub root: PathBuf,
    pub recursive: bool,
    /// Report what would be removed without deleting anything.
    pub dry_run: bool,
    /// Larger files are left alone and recorded as failures.
    pub max_file_bytes: u64,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            recursive: false,
            dry_run: false,
            max_file_bytes: inspect::MAX_VALIDATE_BYTES,
        }
    }
}

/// Walk `options.root` and remove files that fail validation.
///
/// Files with unknown or unavailable extensions are never touched. Read
/// faults and failed deletions are recorded and the walk continues.
pub fn run(registry: &Registry, options: &CleanupOptions) -> Result<CleanupReport, RequestError> {
    let metadata = fs::metadata(&options.root).map_err(|source| RequestError::Read {
        path: options.root.clone(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(RequestError::NotADirectory {
            path: options.root.clone(),
        });
    }

    let mut report = CleanupReport {
        dry_run: options.dry_run,
        ..Default::default()
    };

    for entry in walk::regular_files(&options.root, options.recursive) {
        let path = match entry {
            Ok(path) => path,
            Err(fault) => {
                warn!(path = %fault.path.display(), "{}", fault.message);
                report.failures.push(fault);
                continue;
            }
        };

        let result = match inspect::validate_path_within(registry, &path, options.max_file_bytes) {
            Ok(result) => result,
            Err(ValidateError::Capability(err)) => {
                debug!(path = %path.display(), reason = %err, "skipping file");
                report.skipped.push(path);
                continue;
            }
            Err(err) => {
                warn!(path = %path.display(), "cannot inspect file: {}", err);
                report.failures.push(err.into_fault(&path));
                continue;
            }
        };

        if !result.valid {
            if options.dry_run {
                info!(path = %path.display(), "would remove invalid file");
                report.removed.push(path);
            } else {
                match fs::remove_file(&path) {
                    Ok(()) => {
                        info!(path = %path.display(), "removed invalid file");
                        report.removed.push(path);
                    }
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {
                        report.removed.push(path);
                    }
                    Err(err) => {
                        warn!(path = %path.display(), "cannot remove file: {}", err);
                        report.failures.push(Fault {
                            path,
                            message: format!("cannot remove: {}", err),
                        });
                    }
                }
            }
        }
        report.inspected.push(result);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(root: PathBuf, recursive: bool, dry_run: bool) -> CleanupOptions {
        CleanupOptions {
            root,
            recursive,
            dry_run,
            ..Default::default()
        }
    }

    #[test]
    fn removes_only_invalid_known_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        let unknown = dir.path().join("mystery.bin");
        fs::write(&good, "{}").unwrap();
        fs::write(&bad, "{").unwrap();
        fs::write(&unknown, [0u8, 1, 2]).unwrap();

        let report = run(&Registry::builtin(), &options(dir.path().to_path_buf(), false, false)).unwrap();
        assert_eq!(report.removed, vec![bad.clone()]);
        assert_eq!(report.skipped, vec![unknown.clone()]);
        assert_eq!(report.inspected.len(), 2);
        assert!(good.exists());
        assert!(!bad.exists());
        assert!(unknown.exists());
    }

    #[test]
    fn dry_run_deletes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.yaml");
        fs::write(&bad, "key: [unclosed").unwrap();

        let report = run(&Registry::builtin(), &options(dir.path().to_path_buf(), false, true)).unwrap();
        assert!(report.dry_run);
        assert_eq!(report.removed, vec![bad.clone()]);
        assert!(bad.exists());
    }

    #[test]
    fn recursion_is_opt_in() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        let bad = nested.join("bad.csv");
        fs::write(&bad, "\"open").unwrap();

        let shallow = run(&Registry::builtin(), &options(dir.path().to_path_buf(), false, false)).unwrap();
        assert!(shallow.inspected.is_empty());
        assert!(bad.exists());

        let deep = run(&Registry::builtin(), &options(dir.path().to_path_buf(), true, false)).unwrap();
        assert_eq!(deep.removed, vec![bad.clone()]);
        assert!(!bad.exists());
    }

    #[test]
    fn oversize_files_are_never_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.txt");
        let bad = dir.path().join("small.json");
        fs::write(&big, "a".repeat(4096)).unwrap();
        fs::write(&bad, "{").unwrap();

        let opts = CleanupOptions {
            max_file_bytes: 1024,
            ..options(dir.path().to_path_buf(), false, false)
        };
        let report = run(&Registry::builtin(), &opts).unwrap();
        assert_eq!(report.removed, vec![bad.clone()]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, big);
        assert!(report.failures[0].message.contains("4096 bytes"));
        assert!(report.inspected.iter().all(|r| r.path != big));
        assert!(big.exists());
    }

    #[cfg(unix)]
    #[test]
    fn failed_deletions_are_recorded_and_the_walk_continues() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        let first = locked.join("a.json");
        let second = locked.join("b.csv");
        fs::write(&first, "{").unwrap();
        fs::write(&second, "\"open").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users ignore directory permissions.
        if fs::write(locked.join("write-check"), "x").is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let report = run(&Registry::builtin(), &options(locked.clone(), false, false));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let report = report.unwrap();

        assert!(report.removed.is_empty());
        assert_eq!(report.inspected.len(), 2);
        let failed: Vec<&PathBuf> = report.failures.iter().map(|f| &f.path).collect();
        assert_eq!(failed, vec![&first, &second]);
        assert!(report.failures.iter().all(|f| f.message.starts_with("cannot remove")));
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn root_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            run(&Registry::builtin(), &options(file, false, false)),
            Err(RequestError::NotADirectory { .. })
        ));
        assert!(matches!(
            run(&Registry::builtin(), &options(dir.path().join("missing"), false, false)),
            Err(RequestError::Read { .. })
        ));
    }
}
