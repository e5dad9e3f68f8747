//! Atomic artifact writes.
//!
//! Every write goes to a uniquely named sibling temp file, is fsynced, and is
//! then renamed over the target. Readers never observe a half-written
//! deliverable, and two agents writing into the same stage directory cannot
//! trample each other's temp files.
//!
//! Source and destination share a directory, so the rename never crosses a
//! filesystem boundary. A crash mid-write can leave a `.{name}.{id}.tmp`
//! file behind; it is never mistaken for a deliverable.

use crate::error::{OrchestratorError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Atomically write bytes to `path`, creating parent directories as needed.
///
/// # Errors
///
/// * `OrchestratorError::Artifact` - directory creation, write, sync or
///   rename failed; the target is left untouched
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            OrchestratorError::Artifact(format!(
                "failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        OrchestratorError::Artifact(format!(
            "failed to move artifact into place at '{}': {}",
            path.display(),
            e
        ))
    })?;

    #[cfg(unix)]
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Atomically write a string to `path`.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            OrchestratorError::Artifact(format!(
                "artifact path '{}' has no file name",
                target.display()
            ))
        })?;

    let temp_name = format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple());
    Ok(match target.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    })
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        OrchestratorError::Artifact(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(path);
        return Err(OrchestratorError::Artifact(format!(
            "failed to write temporary file '{}': {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn leftover_temp_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("prd.md");

        atomic_write_file(&file_path, "# PRD\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "# PRD\n");
        assert!(leftover_temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("architecture.md");
        fs::write(&file_path, "draft").unwrap();

        atomic_write_file(&file_path, "final").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "final");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir
            .path()
            .join("feature-x")
            .join("05-review")
            .join("security-audit.md");

        atomic_write(&file_path, b"no findings").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "no findings");
    }

    #[test]
    fn test_atomic_write_fails_when_parent_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("03-implementation");
        fs::write(&blocker, "not a directory").unwrap();

        let err = atomic_write(blocker.join("backend.md"), b"code").unwrap_err();

        assert!(matches!(err, OrchestratorError::Artifact(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_temp_paths_are_unique_siblings() {
        let target = Path::new("/ws/feature-x/04-testing/test-plan.md");
        let a = temp_path_for(target).unwrap();
        let b = temp_path_for(target).unwrap();

        assert_ne!(a, b);
        assert_eq!(a.parent(), target.parent());
        let name = a.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".test-plan.md."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_temp_path_requires_file_name() {
        assert!(temp_path_for(Path::new("/")).is_err());
    }

    #[test]
    fn test_concurrent_writers_to_one_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_path_buf();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dir = dir.clone();
                std::thread::spawn(move || {
                    atomic_write_file(dir.join(format!("part-{}.md", i)), &format!("part {}", i))
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        for i in 0..8 {
            let content = fs::read_to_string(dir.join(format!("part-{}.md", i))).unwrap();
            assert_eq!(content, format!("part {}", i));
        }
        assert!(leftover_temp_files(&dir).is_empty());
    }
}
