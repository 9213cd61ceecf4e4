//! Durable writes: the backup is synced before the manifest is replaced, and the
//! manifest is replaced by rename so it is never observed truncated.
//!
//! An existing backup is never overwritten. When `<path><suffix>` is taken, the next
//! free `<path><suffix>.<n>` is used, so the first backup always holds the pristine
//! original.

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::{self, Write};
use tempfile::NamedTempFile;
use tracing::debug;

/// Highest rotation index tried before giving up on finding a free backup name.
const MAX_BACKUP_ROTATIONS: u32 = 999;

pub fn backup_path(path: &Utf8Path, suffix: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}{}", path, suffix))
}

fn rotated_backup_path(base: &Utf8Path, n: u32) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}.{}", base, n))
}

/// Writes `contents` to the first free name among `base`, `base.1`, `base.2`, ...
///
/// Returns the path actually written. The file and its directory entry are synced.
pub(crate) fn write_new_backup(
    base: &Utf8Path,
    contents: &str,
) -> Result<Utf8PathBuf, (Utf8PathBuf, io::Error)> {
    let mut candidate = base.to_path_buf();
    let mut n = 0;
    loop {
        match write_synced(&candidate, contents) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && n < MAX_BACKUP_ROTATIONS => {
                debug!("backup {} exists, keeping it", candidate);
                n += 1;
                candidate = rotated_backup_path(base, n);
            }
            Err(e) => return Err((candidate, e)),
        }
    }
}

/// Creates `path` (failing if it exists), writes `contents` and syncs file and directory.
pub(crate) fn write_synced(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path.as_std_path())?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    sync_parent(path)
}

pub(crate) fn replace_atomically(path: &Utf8Path, contents: &str) -> io::Result<()> {
    let dir = parent_dir(path);

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| with_path(e, "create temp file in", dir))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| with_path(e, "write temp file for", path))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| with_path(e, "sync temp file for", path))?;
    if let Ok(meta) = fs::metadata(path.as_std_path()) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| with_path(e, "copy permissions of", path))?;
    }
    tmp.persist(path)
        .map_err(|e| with_path(e.error, "rename temp file over", path))?;
    sync_parent(path)
}

fn parent_dir(path: &Utf8Path) -> &Utf8Path {
    match path.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    }
}

/// `tempfile` errors do not name the path; give them the same shape `fs_err` uses.
fn with_path(e: io::Error, action: &str, path: &Utf8Path) -> io::Error {
    io::Error::new(e.kind(), format!("failed to {action} `{path}`: {e}"))
}

/// Makes a new or renamed directory entry durable.
#[cfg(unix)]
fn sync_parent(path: &Utf8Path) -> io::Result<()> {
    fs::File::open(parent_dir(path).as_std_path())?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent(_path: &Utf8Path) -> io::Result<()> {
    Ok(())
}
