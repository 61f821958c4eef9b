//! # File I/O Module
//!
//! Quote book persistence with:
//! - **Atomic saves**: write to .tmp, sync, rename
//! - **File locking**: one editor at a time on a shared drive
//! - **Version validation**: refuse books written by a newer schema
//!
//! Books are `.hzq` files containing JSON. The lock sidecar is `.hzq.lock`
//! and records who holds it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use coating_core::book::QuoteBook;
//! use coating_core::file_io::{load_book, save_book, FileLock};
//! use std::path::Path;
//!
//! let book = QuoteBook::new("user-7", "Dewi");
//! let path = Path::new("quotes.hzq");
//!
//! let lock = FileLock::acquire(path, "dewi@horizon.id")?;
//! save_book(&book, path)?;
//! drop(lock);
//!
//! let loaded = load_book(path)?;
//! assert_eq!(loaded.meta.owner_id, "user-7");
//! # Ok::<(), coating_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::book::{QuoteBook, SCHEMA_VERSION};
use crate::errors::{CalcError, CalcResult};

/// File extension for quote books
pub const BOOK_EXTENSION: &str = "hzq";

/// Locks older than this are considered abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Lock file metadata stored in .hzq.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Combines an OS-level lock (fs2) with a `.lock` sidecar that tells other
/// users who is editing.
pub struct FileLock {
    book_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a quote book.
    ///
    /// # Returns
    ///
    /// * `Err(CalcError::FileLocked)` - another live process holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    tracing::warn!(
                        path = %path.display(),
                        holder = %existing.user_id,
                        "quote book is locked"
                    );
                    return Err(CalcError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                tracing::info!(path = %path.display(), holder = %existing.user_id, "taking over stale lock");
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json = serde_json::to_string_pretty(&info)?;

        lock_file
            .write_all(lock_json.as_bytes())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file
            .sync_all()
            .map_err(|e| CalcError::file_error("sync lock", lock_path.display().to_string(), e.to_string()))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "lock acquired");

        Ok(FileLock {
            book_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Who holds the lock, without taking it. `None` if free.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    pub fn book_path(&self) -> &Path {
        &self.book_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock goes with _lock_file
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(book_path: &Path) -> PathBuf {
    let mut lock_path = book_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    Ok(serde_json::from_str(&contents)?)
}

/// A lock is stale once it is older than [`STALE_LOCK_HOURS`], or sooner
/// when it was taken on this machine by a process that has exited.
fn is_lock_stale(info: &LockInfo) -> bool {
    let same_machine = hostname().is_some_and(|machine| machine == info.machine);
    if same_machine && !process_alive(info.pid) {
        return true;
    }
    (Utc::now() - info.locked_at).num_hours() > STALE_LOCK_HOURS
}

/// Without a process table to ask, assume the holder is alive and let the
/// age limit decide.
fn process_alive(pid: u32) -> bool {
    if cfg!(target_os = "linux") {
        Path::new("/proc").join(pid.to_string()).exists()
    } else {
        true
    }
}

fn read_to_string(path: &Path, operation: &str) -> CalcResult<String> {
    let mut file =
        File::open(path).map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Save a quote book with atomic write semantics.
///
/// Serializes to JSON, writes `<path>.tmp`, syncs, then renames over `path`.
pub fn save_book(book: &QuoteBook, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(book)?;

    let tmp_path = path.with_extension(format!("{}.tmp", BOOK_EXTENSION));

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::info!(path = %path.display(), quotes = book.quote_count(), "quote book saved");
    Ok(())
}

/// Load a quote book.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - written by an incompatible schema
/// * `Err(CalcError::SerializationError)` - invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_book(path: &Path) -> CalcResult<QuoteBook> {
    let contents = read_to_string(path, "read")?;

    let book: QuoteBook = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&book.meta.version)?;

    tracing::debug!(path = %path.display(), quotes = book.quote_count(), "quote book loaded");
    Ok(book)
}

/// Load a book, or start a new one for `owner` when the file does not exist.
pub fn load_or_create_book(
    path: &Path,
    owner_id: impl Into<String>,
    owner_name: impl Into<String>,
) -> CalcResult<QuoteBook> {
    if path.exists() {
        load_book(path)
    } else {
        tracing::info!(path = %path.display(), "starting new quote book");
        Ok(QuoteBook::new(owner_id, owner_name))
    }
}

/// Major must match; in 0.x the file's minor may not be newer than ours.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn book_path(dir: &TempDir, name: &str) -> PathBuf {
        dir.path().join(format!("{}.{}", name, BOOK_EXTENSION))
    }

    #[test]
    fn test_lock_path_generation() {
        let lock_path = lock_path_for(Path::new("/data/quotes.hzq"));
        assert_eq!(lock_path, Path::new("/data/quotes.hzq.lock"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = book_path(&dir, "roundtrip");

        let book = QuoteBook::new("user-1", "Dewi");
        save_book(&book, &path).unwrap();

        let loaded = load_book(&path).unwrap();
        assert_eq!(loaded.meta.owner_id, "user-1");
        assert_eq!(loaded.meta.owner_name, "Dewi");
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = book_path(&dir, "atomic");

        save_book(&QuoteBook::default(), &path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("hzq.tmp").exists());
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = book_path(&dir, "broken");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_book(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let dir = TempDir::new().unwrap();
        let path = book_path(&dir, "future");
        let mut book = QuoteBook::default();
        book.meta.version = "0.9.0".to_string();
        save_book(&book, &path).unwrap();
        assert_eq!(load_book(&path).unwrap_err().error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_load_or_create() {
        let dir = TempDir::new().unwrap();
        let path = book_path(&dir, "fresh");
        let book = load_or_create_book(&path, "user-9", "Rina").unwrap();
        assert_eq!(book.meta.owner_id, "user-9");
        assert!(!path.exists());
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let path = book_path(&dir, "locked");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "dewi@horizon.id").unwrap();
        assert_eq!(lock.info.user_id, "dewi@horizon.id");
        assert_eq!(lock.book_path(), path.as_path());

        let lock_path = lock_path_for(&path);
        assert!(lock_path.exists());

        drop(lock);
        assert!(!lock_path.exists());
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_second_acquire_reports_holder() {
        let dir = TempDir::new().unwrap();
        let path = book_path(&dir, "shared");
        save_book(&QuoteBook::new("alice", "Alice"), &path).unwrap();

        let held = FileLock::acquire(&path, "alice").unwrap();
        match FileLock::acquire(&path, "bob") {
            Err(CalcError::FileLocked { locked_by, .. }) => assert!(locked_by.starts_with("alice")),
            Err(other) => panic!("expected FileLocked, got {:?}", other),
            Ok(_) => panic!("second lock should be refused"),
        }
        assert_eq!(FileLock::check(&path).map(|info| info.user_id), Some("alice".to_string()));

        drop(held);
        assert!(FileLock::check(&path).is_none());
        let retaken = FileLock::acquire(&path, "bob").unwrap();
        assert_eq!(retaken.info.user_id, "bob");
    }

    #[test]
    fn test_stale_lock_is_taken_over() {
        let dir = TempDir::new().unwrap();
        let path = book_path(&dir, "abandoned");
        save_book(&QuoteBook::default(), &path).unwrap();

        let mut old = LockInfo::new("carol");
        old.machine = "another-host".to_string();
        old.locked_at = Utc::now() - chrono::Duration::hours(STALE_LOCK_HOURS + 1);
        fs::write(lock_path_for(&path), serde_json::to_string(&old).unwrap()).unwrap();

        assert!(FileLock::check(&path).is_none());
        let lock = FileLock::acquire(&path, "dewi").unwrap();
        assert_eq!(lock.info.user_id, "dewi");
    }
}
