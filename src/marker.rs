//! Context marker files.
//!
//! A bound context owns the directory subtree rooted at its path. The root
//! carries a `.husk_context` file naming the context:
//!
//! ```json
//! {"context_name": "proj", "context_path": "/home/me/proj"}
//! ```
//!
//! [`find_owning_context`] walks from a directory towards the filesystem
//! root and reports the name recorded in the nearest marker. The recorded
//! name is trusted as is, even if the marker has been copied elsewhere.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{HuskError, HuskResult};

pub const MARKER_FILENAME: &str = ".husk_context";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub context_name: String,
    pub context_path: String,
}

/// A marker located by [`find_marker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundMarker {
    /// Directory the marker file sits in.
    pub dir: PathBuf,
    pub marker: Marker,
}

pub fn read_marker(dir: &Path) -> HuskResult<Marker> {
    let path = dir.join(MARKER_FILENAME);
    let content = std::fs::read_to_string(&path).map_err(|e| HuskError::io(&path, e))?;
    serde_json::from_str(&content).map_err(|source| HuskError::Marker { path, source })
}

/// Write (or replace) the marker for context `name` in `dir`.
pub fn write_marker(dir: &Path, name: &str) -> HuskResult<PathBuf> {
    let path = dir.join(MARKER_FILENAME);
    let marker = Marker {
        context_name: name.to_string(),
        context_path: dir.display().to_string(),
    };
    let json = serde_json::to_string(&marker)
        .map_err(|source| HuskError::Marker {
            path: path.clone(),
            source,
        })?;
    std::fs::write(&path, json).map_err(|e| HuskError::io(&path, e))?;
    Ok(path)
}

/// Whether `dir` directly contains a marker file.
///
/// Scans the directory listing rather than stat-ing the marker path so that
/// an unreadable directory is reported instead of looking empty.
fn has_marker(dir: &Path) -> HuskResult<bool> {
    let entries = std::fs::read_dir(dir).map_err(|e| HuskError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| HuskError::io(dir, e))?;
        if entry.file_name() != MARKER_FILENAME {
            continue;
        }
        // Follows symlinks, so a linked marker counts like a plain one.
        let path = entry.path();
        let metadata = std::fs::metadata(&path).map_err(|e| HuskError::io(&path, e))?;
        if metadata.is_file() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Find the nearest marker at or above `start`.
///
/// Every directory on the way up is checked once. A directory that cannot
/// be listed, or a marker that cannot be parsed, is an error: treating it
/// as "no marker" could resolve to the wrong context.
pub fn find_marker(start: &Path) -> HuskResult<Option<FoundMarker>> {
    let start = std::path::absolute(start).map_err(|e| HuskError::io(start, e))?;

    for dir in start.ancestors() {
        debug!(dir = %dir.display(), "checking for context marker");
        if has_marker(dir)? {
            let marker = read_marker(dir)?;
            debug!(
                dir = %dir.display(),
                context = %marker.context_name,
                "found context marker"
            );
            return Ok(Some(FoundMarker {
                dir: dir.to_path_buf(),
                marker,
            }));
        }
    }

    Ok(None)
}

/// Name of the context owning `start`, if any.
pub fn find_owning_context(start: &Path) -> HuskResult<Option<String>> {
    Ok(find_marker(start)?.map(|found| found.marker.context_name))
}
