//! Common filesystem utilities
//!
//! Directory creation, listing, text writes and the "unhoist" step that
//! removes the single wrapper directory most source archives carry.

use std::io;
use std::path::{Path, PathBuf};

/// Create the full directory path, including missing parents.
///
/// An existing directory counts as success. An existing non-directory at
/// `path` is an error.
pub fn make_dirs(path: &Path) -> io::Result<()> {
    match std::fs::create_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        other => other,
    }
}

/// Absolute path of every immediate child of `path`, in the order the
/// filesystem enumerates them.
pub fn list_files(path: &Path) -> io::Result<Vec<PathBuf>> {
    let base = std::path::absolute(path)?;
    let mut children = Vec::new();
    for entry in std::fs::read_dir(&base)? {
        children.push(base.join(entry?.file_name()));
    }
    Ok(children)
}

/// Write `text` as UTF-8 to `path`, replacing any existing content.
pub fn write_to_file(path: &Path, text: &str) -> io::Result<()> {
    std::fs::write(path, text.as_bytes())
}

/// If `path` contains exactly one entry and it is a directory, move that
/// directory's children up into `path` and remove it.
///
/// Returns whether anything was flattened.
///
/// # Example
/// ```ignore
/// // build/sqlcipher-3.4.1/{configure,src} -> build/{configure,src}
/// unhoist_directory(Path::new("build"))?;
/// ```
pub fn unhoist_directory(path: &Path) -> io::Result<bool> {
    let children = list_files(path)?;
    let [container] = children.as_slice() else {
        return Ok(false);
    };
    if !container.is_dir() || container.is_symlink() {
        return Ok(false);
    }

    // Move the wrapper aside first so a child sharing its name can take its place.
    let name = container
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = path.join(format!(".{}.unhoist", name));
    std::fs::rename(container, &staging)?;

    for child in list_files(&staging)? {
        if let Some(child_name) = child.file_name() {
            std::fs::rename(&child, path.join(child_name))?;
        }
    }

    std::fs::remove_dir(&staging)?;
    Ok(true)
}
