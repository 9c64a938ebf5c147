//! Atomic file write helpers.
//!
//! Bytes go to a temp file next to the target, which is then renamed over it.
//! A reader therefore sees either the old file or the new one, never a torn
//! write. Where rename-over-existing fails (Windows) the old file is moved to
//! `<name>.bak` first and restored if the second rename fails too.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileSyncPolicy {
    /// `fsync` the temp file before it replaces the target.
    #[default]
    SyncAll,
    /// Skip the `fsync`; used by tests and throwaway writes.
    SkipSync,
}

fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("bak")
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Restore `path` from `path.bak` when a previous write was interrupted
/// between moving the old file aside and renaming the new one in.
pub fn recover_bak_file(path: &Path) {
    let backup = backup_path(path);
    if path.exists() || !backup.exists() {
        return;
    }
    match fs::rename(&backup, path) {
        Ok(()) => {
            tracing::warn!(path = %path.display(), "Recovered .bak file from interrupted write");
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to recover .bak file: {e}");
        }
    }
}

/// Write `bytes` to `path`, creating missing parent directories.
pub fn atomic_write_with_sync(
    path: impl AsRef<Path>,
    bytes: &[u8],
    sync: FileSyncPolicy,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = parent_dir(path);
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    if sync == FileSyncPolicy::SyncAll {
        tmp.as_file().sync_all()?;
    }

    let Err(err) = tmp.persist(path) else {
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Atomic write complete");
        return Ok(());
    };
    if !path.exists() {
        return Err(err.error);
    }

    let backup = backup_path(path);
    let _ = fs::remove_file(&backup);
    fs::rename(path, &backup)?;
    if let Err(retry) = err.file.persist(path) {
        let _ = fs::rename(&backup, path);
        return Err(retry.error);
    }
    if let Err(e) = fs::remove_file(&backup) {
        tracing::warn!(path = %backup.display(), "Failed to remove .bak after write: {e}");
    }
    Ok(())
}

/// Read a UTF-8 file, treating "not found" as `None`.
pub fn read_if_exists(path: &Path) -> io::Result<Option<String>> {
    recover_bak_file(path);
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Remove a file along with any `.bak` left by an earlier write, so a later
/// read cannot resurrect it. Returns `false` if there was nothing to remove.
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    let removed = remove_file_if_exists(path)?;
    let backup_removed = remove_file_if_exists(&backup_path(path))?;
    Ok(removed || backup_removed)
}

fn remove_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
