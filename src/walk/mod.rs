//! Directory enumeration for whole-tree snapshots.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// True for names that are never backed up: hidden entries and editor
/// backups, i.e. anything starting with `.` or `~`.
pub fn is_skipped(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    matches!(bytes.first(), Some(b'.' | b'~'))
}

/// Lists the regular files under `root` in a stable, sorted order.
///
/// Skipped names prune whole subtrees. Symlinks are not followed. The root
/// itself is always walked, whatever its name.
pub fn enumerate_files(root: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry.file_name()));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
