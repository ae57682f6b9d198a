//! Whole-file writes that never leave a partial file at the destination

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::DomainError;

/// Write `contents` to a sibling temporary file, then rename it over `path`.
///
/// Parent directories are created as needed. On failure the temporary file
/// is removed and `path` is left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), DomainError> {
    create_parent(path)?;

    let temp = temp_path(path);
    let result = fs::write(&temp, contents).and_then(|_| fs::rename(&temp, path));

    if let Err(e) = result {
        let _ = fs::remove_file(&temp);
        return Err(DomainError::io(format!(
            "Error saving {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

/// Serialize `value` as pretty JSON and write it atomically
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DomainError> {
    write_atomic(path, &json_bytes(path, value)?)
}

/// Several files that must land together.
///
/// Each file is written to a sibling temporary path by [`StagedWrites::stage`];
/// nothing reaches a destination until [`StagedWrites::commit`]. Dropping
/// without committing discards the temporary files.
#[derive(Debug, Default)]
pub struct StagedWrites {
    staged: Vec<Staged>,
}

#[derive(Debug)]
struct Staged {
    temp: PathBuf,
    dest: PathBuf,
}

/// A destination that has been replaced, with the file it displaced
struct Placed {
    dest: PathBuf,
    backup: Option<PathBuf>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, path: &Path, contents: &[u8]) -> Result<(), DomainError> {
        create_parent(path)?;

        let temp = temp_path(path);
        if let Err(e) = fs::write(&temp, contents) {
            let _ = fs::remove_file(&temp);
            return Err(DomainError::io(format!(
                "Error saving {}: {}",
                path.display(),
                e
            )));
        }

        self.staged.push(Staged {
            temp,
            dest: path.to_path_buf(),
        });
        Ok(())
    }

    pub fn stage_json<T: Serialize>(&mut self, path: &Path, value: &T) -> Result<(), DomainError> {
        self.stage(path, &json_bytes(path, value)?)
    }

    /// Move every staged file into place.
    ///
    /// If any move fails, destinations already replaced get their previous
    /// file back (or are removed when there was none) and the error is
    /// returned.
    pub fn commit(mut self) -> Result<(), DomainError> {
        let staged = std::mem::take(&mut self.staged);
        let mut placed: Vec<Placed> = Vec::with_capacity(staged.len());

        for (i, entry) in staged.iter().enumerate() {
            match place(entry) {
                Ok(done) => placed.push(done),
                Err(e) => {
                    for done in placed.iter().rev() {
                        let _ = fs::remove_file(&done.dest);
                        if let Some(backup) = &done.backup {
                            let _ = fs::rename(backup, &done.dest);
                        }
                    }
                    for pending in &staged[i..] {
                        let _ = fs::remove_file(&pending.temp);
                    }
                    return Err(DomainError::io(format!(
                        "Error saving {}: {}",
                        entry.dest.display(),
                        e
                    )));
                }
            }
        }

        for done in placed {
            if let Some(backup) = done.backup {
                let _ = fs::remove_file(backup);
            }
        }
        Ok(())
    }
}

impl Drop for StagedWrites {
    fn drop(&mut self) {
        for entry in &self.staged {
            let _ = fs::remove_file(&entry.temp);
        }
    }
}

fn place(entry: &Staged) -> std::io::Result<Placed> {
    let backup = if entry.dest.is_file() {
        let backup = backup_path(&entry.dest);
        fs::rename(&entry.dest, &backup)?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = fs::rename(&entry.temp, &entry.dest) {
        if let Some(backup) = &backup {
            let _ = fs::rename(backup, &entry.dest);
        }
        return Err(e);
    }

    Ok(Placed {
        dest: entry.dest.clone(),
        backup,
    })
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DomainError> {
    let bytes = fs::read(path)
        .map_err(|e| DomainError::io(format!("Error reading {}: {}", path.display(), e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| DomainError::dataset(format!("Invalid JSON in {}: {}", path.display(), e)))
}

fn json_bytes<T: Serialize>(path: &Path, value: &T) -> Result<Vec<u8>, DomainError> {
    let mut json = serde_json::to_vec_pretty(value)
        .map_err(|e| DomainError::internal(format!("Cannot serialize {}: {}", path.display(), e)))?;
    json.push(b'\n');
    Ok(json)
}

fn create_parent(path: &Path) -> Result<(), DomainError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            DomainError::io(format!("Cannot create directory {}: {}", parent.display(), e))
        })?;
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    sibling(path, "tmp")
}

fn backup_path(path: &Path) -> PathBuf {
    sibling(path, "bak")
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.{}", name, Uuid::new_v4().simple(), suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/out.txt");

        write_atomic(&path, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");

        write_json(&path, &serde_json::json!({"test_f1": 0.5})).unwrap();
        let value: serde_json::Value = read_json(&path).unwrap();
        assert_eq!(value["test_f1"], 0.5);
    }

    fn hidden_files(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with('.'))
            .collect()
    }

    #[test]
    fn test_staged_writes_land_together() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("out/first.csv");
        let second = dir.path().join("out/second.csv");

        let mut writes = StagedWrites::new();
        writes.stage(&first, b"a").unwrap();
        writes.stage(&second, b"b").unwrap();
        assert!(!first.exists());
        assert!(!second.exists());

        writes.commit().unwrap();
        assert_eq!(fs::read_to_string(&first).unwrap(), "a");
        assert_eq!(fs::read_to_string(&second).unwrap(), "b");
        assert!(hidden_files(&dir.path().join("out")).is_empty());
    }

    #[test]
    fn test_staged_writes_dropped_without_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut writes = StagedWrites::new();
        writes.stage(&path, b"a").unwrap();
        drop(writes);

        assert!(!path.exists());
        assert!(hidden_files(dir.path()).is_empty());
    }

    #[test]
    fn test_failed_commit_restores_earlier_destinations() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let fresh = dir.path().join("fresh.csv");
        let blocked = dir.path().join("blocked.csv");
        fs::write(&first, "old").unwrap();
        fs::create_dir_all(blocked.join("occupied")).unwrap();

        let mut writes = StagedWrites::new();
        writes.stage(&first, b"new").unwrap();
        writes.stage(&fresh, b"new").unwrap();
        writes.stage(&blocked, b"new").unwrap();

        let err = writes.commit().unwrap_err();
        assert!(matches!(err, DomainError::Io { .. }));
        assert_eq!(fs::read_to_string(&first).unwrap(), "old");
        assert!(!fresh.exists());
        assert!(blocked.is_dir());
        assert!(hidden_files(dir.path()).is_empty());
    }

    #[test]
    fn test_read_json_missing_file() {
        let err = read_json::<serde_json::Value>(Path::new("/nonexistent/doc.json")).unwrap_err();
        assert!(matches!(err, DomainError::Io { .. }));
    }
}
