//! The approved-snapshot lock record.
//!
//! One JSON file per project directory:
//!
//! ```text
//! {
//!   "version": 1,
//!   "hash": "<16 lowercase hex>",
//!   "approvedAt": "<RFC 3339>",
//!   "ontology": { ...snapshot... }
//! }
//! ```
//!
//! Only [`LOCK_VERSION`] is accepted on read; there is no forward
//! compatibility. A record whose hash does not match its own snapshot is
//! treated as corrupt.

#![allow(clippy::result_large_err)]

use crate::atomic::atomic_write;
use crate::errors::{concurrency_error, hash_mismatch, io_error, lock_parse_error, Result};
use chrono::{DateTime, Utc};
use ontolock_core::snapshot::{hash_snapshot, is_valid_hash, ApiSurfaceSnapshot};
use ontolock_core::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the lock record inside the target directory
pub const LOCK_FILE_NAME: &str = "ontology.lock.json";

/// The only supported lock record version
pub const LOCK_VERSION: u32 = 1;

/// Persisted approval of one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRecord {
    pub version: u32,
    pub hash: String,
    pub approved_at: DateTime<Utc>,
    #[serde(rename = "ontology")]
    pub snapshot: ApiSurfaceSnapshot,
}

/// Path of the lock record for `dir`
pub fn lock_path(dir: &Path) -> PathBuf {
    dir.join(LOCK_FILE_NAME)
}

/// Whether a lock record exists in `dir`
pub fn exists(dir: &Path) -> bool {
    lock_path(dir).is_file()
}

/// Read and verify the lock record in `dir`.
///
/// Returns `Ok(None)` if no record exists.
///
/// # Errors
///
/// - `LockParse`: not valid JSON, unsupported version, malformed hash, or a
///   hash that does not match the stored snapshot
/// - `Io`: the file exists but cannot be read
pub fn read(dir: &Path) -> Result<Option<LockRecord>> {
    let path = lock_path(dir);
    log_op_start!("lock_read", lock_path = %path.display());
    let start = std::time::Instant::now();

    match read_record(&path) {
        Ok(record) => {
            log_op_end!(
                "lock_read",
                duration_ms = start.elapsed().as_millis() as u64,
                stored_hash = record.as_ref().map(|r| r.hash.as_str()).unwrap_or("none")
            );
            Ok(record)
        }
        Err(err) => {
            log_op_error!(
                "lock_read",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

fn read_record(path: &Path) -> Result<Option<LockRecord>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error("lock_read", e).with_path(path.display().to_string())),
    };

    let raw: Value = serde_json::from_str(&text)
        .map_err(|e| lock_parse_error(path, format!("lock file is not valid JSON: {}", e)))?;

    // Version first, so an unsupported layout is reported as such rather
    // than as a missing field.
    match raw.get("version").and_then(Value::as_u64) {
        Some(v) if v == u64::from(LOCK_VERSION) => {}
        Some(v) => {
            return Err(lock_parse_error(
                path,
                format!("unsupported lock version {} (expected {})", v, LOCK_VERSION),
            ))
        }
        None => return Err(lock_parse_error(path, "missing or non-integer `version`")),
    }

    let record: LockRecord = serde_json::from_value(raw)
        .map_err(|e| lock_parse_error(path, format!("malformed lock record: {}", e)))?;

    if !is_valid_hash(&record.hash) {
        return Err(lock_parse_error(
            path,
            format!("`hash` is not 16 lowercase hex characters: {:?}", record.hash),
        ));
    }

    let recomputed = hash_snapshot(&record.snapshot)?;
    if recomputed != record.hash {
        return Err(lock_parse_error(
            path,
            format!(
                "stored hash {} does not match stored snapshot (computed {})",
                record.hash, recomputed
            ),
        ));
    }

    Ok(Some(record))
}

/// Write a lock record for `snapshot`, replacing any existing one.
///
/// Stamps `approvedAt` with the current time.
///
/// # Errors
///
/// - `InvalidInput`: `hash` is not the hash of `snapshot`
/// - `Io` / `Serialization`: the record cannot be written
pub fn write(dir: &Path, snapshot: &ApiSurfaceSnapshot, hash: &str) -> Result<LockRecord> {
    let path = lock_path(dir);
    log_op_start!("lock_write", lock_path = %path.display(), hash = hash);
    let start = std::time::Instant::now();

    match write_record(&path, snapshot, hash) {
        Ok(record) => {
            log_op_end!(
                "lock_write",
                duration_ms = start.elapsed().as_millis() as u64,
                hash = hash
            );
            Ok(record)
        }
        Err(err) => {
            log_op_error!(
                "lock_write",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

/// Write a lock record only if the stored hash is still `expected_prior`.
///
/// `expected_prior` is the hash the caller read before reviewing (`None` if
/// there was no lock). If another writer approved in the meantime the write
/// is refused.
///
/// # Errors
///
/// - `Concurrency`: the stored hash is no longer `expected_prior`
/// - anything [`read`] or [`write`] returns
pub fn write_if_current(
    dir: &Path,
    snapshot: &ApiSurfaceSnapshot,
    hash: &str,
    expected_prior: Option<&str>,
) -> Result<LockRecord> {
    let current = read(dir)?;
    let current_hash = current.as_ref().map(|r| r.hash.as_str());
    if current_hash != expected_prior {
        let err = concurrency_error(&lock_path(dir), expected_prior, current_hash);
        tracing::warn!(
            op = "lock_write",
            expected = expected_prior.unwrap_or("none"),
            found = current_hash.unwrap_or("none"),
            "lock changed under approval, refusing to overwrite"
        );
        return Err(err);
    }
    write(dir, snapshot, hash)
}

fn write_record(path: &Path, snapshot: &ApiSurfaceSnapshot, hash: &str) -> Result<LockRecord> {
    let computed = hash_snapshot(snapshot)?;
    if computed != hash {
        return Err(hash_mismatch(&computed, hash));
    }

    let record = LockRecord {
        version: LOCK_VERSION,
        hash: hash.to_string(),
        approved_at: Utc::now(),
        snapshot: snapshot.clone(),
    };
    let mut bytes = serde_json::to_vec_pretty(&record)?;
    bytes.push(b'\n');
    atomic_write(path, &bytes)?;
    Ok(record)
}
