//! Input enumeration: find replay files under a directory.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Collect regular files under `dir` whose extension matches `extension`
/// (case-insensitive, without the leading dot). Subdirectories are walked
/// only when `include_subdirectories` is set. The result is sorted.
///
/// # Errors
/// Fails if `dir` is not an existing directory. Unreadable entries below
/// it are skipped.
pub fn discover_replays(
    dir: &Path,
    include_subdirectories: bool,
    extension: &str,
) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        ));
    }

    let max_depth = if include_subdirectories { usize::MAX } else { 1 };
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).max_depth(max_depth) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case(extension));
        if matches {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    debug!("found {} replay files under {}", paths.len(), dir.display());
    Ok(paths)
}
