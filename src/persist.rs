//! Writing edited save-files back to storage.
//!
//! The only ordering that matters is causal: the original bytes are copied
//! somewhere safe, and the copy is confirmed, before the working buffer or
//! the file on disk is touched. A failure at that stage returns
//! [`Error::Backup`] with the buffer unchanged. Once the edits are applied,
//! a failed final write returns [`Error::Write`]; the buffer is then no
//! longer considered authoritative and callers should fall back to the
//! backup.
//!
//! ## Policies
//! * [`BackupPolicy::InPlace`] - copy `FILE` to `FILE_YYYYmmdd-HHMMSS`, then
//!   overwrite `FILE`.
//! * [`BackupPolicy::NewFile`] - copy `FILE` to the destination, then
//!   overwrite the destination. `FILE` itself is never written.
//!
//! Storage goes through the [`SaveStore`] trait so the sequence can be
//! driven against something other than the real filesystem.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::formats::mcs::{EditReport, ModificationGroup, SaveFile};
use crate::{Error, Result};

/// Format of the suffix appended to in-place backups.
pub const BACKUP_TIMESTAMP: &str = "%Y%m%d-%H%M%S";

/// Where the edited bytes end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupPolicy {
    /// Overwrite the source after writing a timestamped backup next to it.
    InPlace,
    /// Copy the source to this path and write the edits there.
    NewFile(PathBuf),
}

/// Minimal storage interface used by [`commit`].
pub trait SaveStore {
    /// Read a whole file.
    fn read(&mut self, path: &Path) -> io::Result<Vec<u8>>;
    /// Copy `from` to `to`, returning the number of bytes copied.
    fn copy(&mut self, from: &Path, to: &Path) -> io::Result<u64>;
    /// Replace the contents of `path` with `data`.
    fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()>;
    /// Whether `a` and `b` name the same stored file.
    fn same_file(&mut self, a: &Path, b: &Path) -> io::Result<bool>;
}

/// [`SaveStore`] backed by [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl SaveStore for FsStore {
    fn read(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn copy(&mut self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }

    fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
        fs::write(path, data)
    }

    fn same_file(&mut self, a: &Path, b: &Path) -> io::Result<bool> {
        let a = fs::canonicalize(a)?;
        match fs::canonicalize(b) {
            Ok(b) => Ok(a == b),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Result of a successful [`commit`].
#[derive(Debug, Clone)]
pub struct Committed {
    /// Offsets written and groups skipped.
    pub report: EditReport,
    /// File that received the edited bytes.
    pub destination: PathBuf,
    /// Backup created for an in-place edit.
    pub backup: Option<PathBuf>,
}

/// Backup name for `source` taken at `at`: `<source>_YYYYmmdd-HHMMSS`.
pub fn backup_path(source: &Path, at: &DateTime<Local>) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push("_");
    name.push(at.format(BACKUP_TIMESTAMP).to_string());
    PathBuf::from(name)
}

/// Secure the original bytes, apply `groups` to `save` and write the result.
///
/// `save` must hold the bytes currently stored at `source`.
pub fn commit<S: SaveStore>(
    store: &mut S,
    source: &Path,
    save: &mut SaveFile,
    groups: &[ModificationGroup],
    policy: &BackupPolicy,
) -> Result<Committed> {
    let expected = save.len() as u64;
    let (destination, backup) = match policy {
        BackupPolicy::InPlace => {
            let backup = backup_path(source, &Local::now());
            secure_copy(store, source, &backup, expected)?;
            log::debug!("backed up {} to {}", source.display(), backup.display());
            (source.to_path_buf(), Some(backup))
        }
        BackupPolicy::NewFile(dest) => {
            secure_copy(store, source, dest, expected)?;
            (dest.clone(), None)
        }
    };

    let report = save.apply(groups);

    store
        .write(&destination, save.as_bytes())
        .map_err(|source| Error::Write {
            path: destination.clone(),
            source,
        })?;

    Ok(Committed {
        report,
        destination,
        backup,
    })
}

/// Load `source` through `store` and [`commit`] the edits.
///
/// Returns the edited save-file alongside the commit summary.
pub fn edit_file<S: SaveStore>(
    store: &mut S,
    source: &Path,
    groups: &[ModificationGroup],
    policy: &BackupPolicy,
) -> Result<(SaveFile, Committed)> {
    let mut save = SaveFile::from_bytes(store.read(source)?);
    let committed = commit(store, source, &mut save, groups, policy)?;
    Ok((save, committed))
}

fn secure_copy<S: SaveStore>(store: &mut S, from: &Path, to: &Path, expected: u64) -> Result<()> {
    let backup_err = |source| Error::Backup {
        path: to.to_path_buf(),
        source,
    };
    // Copying a file onto itself truncates it before a byte is read.
    if store.same_file(from, to).map_err(backup_err)? {
        return Err(backup_err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination is the source file",
        )));
    }
    let copied = store.copy(from, to).map_err(backup_err)?;
    if copied != expected {
        return Err(backup_err(io::Error::other(format!(
            "copied {copied} of {expected} bytes"
        ))));
    }
    Ok(())
}
