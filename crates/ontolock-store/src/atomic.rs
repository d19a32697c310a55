//! Atomic write primitives
//!
//! Uses temp→rename pattern so a reader never observes a partial lock file

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temp file next to the target, unique per process
fn temp_path_for(target_path: &Path) -> PathBuf {
    let file_name = target_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}

/// Atomically write bytes to a file
///
/// Writes and syncs a temp file in the target's directory, then renames it
/// over the target. Creates the directory if needed.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| io_error("create_lock_dir", e))?;
        }
    }

    let temp_path = temp_path_for(target_path);

    let mut file = File::create(&temp_path).map_err(|e| io_error("write_lock_temp", e))?;
    let written = file.write_all(content).and_then(|()| file.sync_all());
    drop(file);
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("write_lock_temp", e));
    }

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_lock_temp", e));
    }

    Ok(())
}
