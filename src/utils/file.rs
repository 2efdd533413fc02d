//! Filesystem helpers: recursive content removal, idempotent delete, and
//! exclusive temp file creation.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::defaults::TempFileConfig;
use crate::ensure::ensure_true;
use crate::error::{Error, Result};

/// Numeric code of the error raised when a sub-directory cannot be removed.
pub const DIRECTORY_REMOVAL_FAILED: i64 = 1;
/// Numeric code of the error raised when a file cannot be removed.
pub const FILE_REMOVAL_FAILED: i64 = 2;

fn io_error(err: &io::Error, context: String) -> Error {
    Error::internal_io(err.to_string(), Some(context))
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

/// Whether anything (including a dangling symlink) exists at `path`.
fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Remove everything inside `dir`, leaving `dir` itself in place.
///
/// Symlinks are removed, never followed.
pub fn delete_directory_contents(dir: &Path) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::validation_unexpected_value(
            "directoryPath",
            Some(dir.display().to_string()),
            format!("cannot list '{}': {}", dir.display(), e),
        )
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| io_error(&e, format!("list {}", dir.display())))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| io_error(&e, format!("stat {}", path.display())))?;

        if file_type.is_dir() {
            delete_directory_contents(&path)?;
            fs::remove_dir(&path).map_err(|e| {
                Error::failure(format!("cannot delete '{}'", path.display()))
                    .with_numeric_code(DIRECTORY_REMOVAL_FAILED)
                    .with_previous(io_error(&e, "remove directory".to_string()))
            })?;
            continue;
        }

        fs::remove_file(&path).map_err(|e| {
            Error::failure(format!("cannot delete '{}'", path.display()))
                .with_numeric_code(FILE_REMOVAL_FAILED)
                .with_previous(io_error(&e, "remove file".to_string()))
        })?;
    }

    Ok(())
}

/// Delete the file at `path`. A missing path is not an error.
pub fn delete(path: &Path) -> Result<()> {
    if is_blank(path) {
        return Err(Error::validation_invalid_argument(
            "path",
            "path is empty or whitespace",
            None,
            None,
        ));
    }

    if !path_exists(path) {
        return Ok(());
    }

    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        // Someone else removed it first.
        Err(_) if !path_exists(path) => Ok(()),
        Err(io_err) => ensure_true(false, format!("remove_file failed for '{}'", path.display()))
            .map_err(|err| err.with_previous(io_error(&io_err, "remove file".to_string()))),
    }
}

/// Timing and permissions for [`create_temp_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempFileOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
    /// Mode for a directory created on demand (unix only).
    pub dir_mode: u32,
}

impl Default for TempFileOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(30_000),
            poll_interval: Duration::from_millis(100),
            dir_mode: 0o775,
        }
    }
}

impl TempFileOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

impl From<&TempFileConfig> for TempFileOptions {
    fn from(config: &TempFileConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            dir_mode: config.dir_mode_bits(),
        }
    }
}

fn create_dir(dir: &Path, mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(dir)
}

/// Create a new empty file named `<prefix><32 hex chars>` in `dir` and
/// return its path.
///
/// `dir` is created if missing; losing a creation race to another process
/// is fine as long as the directory ends up existing. Names that are taken
/// are retried every `poll_interval` until `timeout` has elapsed.
pub fn create_temp_file(dir: &Path, prefix: &str, options: &TempFileOptions) -> Result<PathBuf> {
    if is_blank(dir) {
        return Err(Error::validation_invalid_argument(
            "dir",
            "dir is empty or whitespace",
            None,
            None,
        ));
    }

    if !dir.is_dir() {
        let created = create_dir(dir, options.dir_mode);
        if !dir.is_dir() {
            let mut err = Error::failure("couldn't create temp directory");
            if let Err(e) = created {
                err = err.with_previous(io_error(&e, format!("create {}", dir.display())));
            }
            return Err(err);
        }
    }

    let started = Instant::now();
    loop {
        let candidate = dir.join(format!("{}{}", prefix, Uuid::new_v4().simple()));

        let last_error = match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) => e,
        };

        if started.elapsed() >= options.timeout {
            return Err(Error::failure("timed out trying to get temp file")
                .with_previous(io_error(&last_error, format!("create {}", candidate.display()))));
        }

        crate::log_status!(
            "file",
            "Could not create {} ({}), retrying",
            candidate.display(),
            last_error
        );
        thread::sleep(options.poll_interval);
    }
}
