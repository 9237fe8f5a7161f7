//! Local tree walker
//!
//! Enumerates a directory into a flat, ordered list of [`Item`]s whose
//! keys are forward-slash paths relative to the walk root. The order is
//! whatever the filesystem returns; it only drives upload scheduling and
//! exclusion filtering, so it is stable within one call but not sorted.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::traits::Item;

/// Enumerate the entries of `root`.
///
/// Non-recursive walks return only direct children, keyed by base name.
/// Recursive walks descend depth-first and produce an item for every file
/// and directory in the tree. Any unreadable directory aborts the walk
/// with [`Error::Traversal`].
pub fn walk(root: &Path, recursive: bool) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    walk_dir(root, root, recursive, &mut items)?;
    Ok(items)
}

fn walk_dir(root: &Path, current: &Path, recursive: bool, items: &mut Vec<Item>) -> Result<()> {
    let entries = fs::read_dir(current).map_err(|source| Error::Traversal {
        path: current.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| Error::Traversal {
            path: current.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        let metadata = entry.metadata().map_err(|source| Error::Traversal {
            path: path.clone(),
            source,
        })?;

        let key = relative_key(root, &path)?;
        let last_modified = metadata
            .modified()
            .ok()
            .and_then(|t| jiff::Timestamp::try_from(t).ok());

        items.push(Item {
            key,
            last_modified,
            is_dir: metadata.is_dir(),
        });

        if recursive && metadata.is_dir() {
            walk_dir(root, &path, recursive, items)?;
        }
    }

    Ok(())
}

/// Path of `path` relative to `root`, with forward-slash separators.
fn relative_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| Error::Traversal {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not relative to {}", root.display()),
        ),
    })?;

    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Ok(segments.join("/"))
}
