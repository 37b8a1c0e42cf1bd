//! Atomic file replacement for the file-backed store.
//!
//! Every write goes to a temporary file in the target's directory, is synced
//! to disk, and then renamed over the target. A reader therefore sees either
//! the previous document or the new one, never a partial file. Source and
//! destination must be on the same filesystem for the rename to be atomic.

use crate::error::{LockError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Atomically write bytes to a file, creating parent directories.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            LockError::Transport(format!(
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
        LockError::Transport(format!(
            "failed to atomically replace '{}': {}",
            path.display(),
            e
        ))
    })?;

    // Persist the directory entry as well.
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Temporary sibling of `target`: `.{filename}.{random}.tmp`.
///
/// The random part keeps concurrent writers of the same target from
/// clobbering each other's temporary file.
fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            LockError::Transport(format!("invalid file path '{}'", target.display()))
        })?;

    let suffix = Uuid::new_v4().simple().to_string();
    Ok(parent.join(format!(".{}.{}.tmp", filename, &suffix[..8])))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        LockError::Transport(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    file.write_all(content).map_err(|e| {
        let _ = fs::remove_file(path);
        LockError::Transport(format!("failed to write temporary file: {}", e))
    })?;

    file.sync_all().map_err(|e| {
        let _ = fs::remove_file(path);
        LockError::Transport(format!("failed to sync temporary file to disk: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("cfg.yml");

        atomic_write(&file_path, b"a: 1\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "a: 1\n");
    }

    #[test]
    fn replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("cfg.yml");
        fs::write(&file_path, "a: 1\n").unwrap();

        atomic_write(&file_path, b"a: 2\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "a: 2\n");
    }

    #[test]
    fn creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("director").join("cfg.yml");

        atomic_write(&file_path, b"networks: []\n").unwrap();

        assert!(file_path.exists());
    }

    #[test]
    fn leaves_no_temporary_files() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("cfg.yml");

        atomic_write(&file_path, b"a: 1\n").unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("cfg.yml")]);
    }

    #[test]
    fn temp_path_is_hidden_sibling() {
        let temp = temp_path_for(Path::new("/some/path/cfg.yml")).unwrap();

        assert_eq!(temp.parent().unwrap(), Path::new("/some/path"));
        let name = temp.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".cfg.yml."));
        assert!(name.ends_with(".tmp"));
    }
}
