//! Executable lookup on the search path.
//!
//! Directories are tried in listed order. A candidate only counts if it is an
//! executable file; on Windows the `PATHEXT` suffixes are tried as well.

use std::ffi::OsStr;
use std::path::PathBuf;

/// Locate `cmd` using the `PATH` environment variable.
///
/// Returns `None` when `PATH` is unset or no directory holds the command.
pub fn locate_command(cmd: &str) -> Option<PathBuf> {
    let search_path = std::env::var_os("PATH")?;
    locate_command_in(cmd, search_path)
}

/// Locate `cmd` in an explicit search path (directories joined with the
/// platform's path separator).
pub fn locate_command_in(cmd: &str, search_path: impl AsRef<OsStr>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which::which_in(cmd, Some(search_path), cwd).ok()
}

/// Whether `cmd` resolves to something runnable on `PATH`.
pub fn is_available(cmd: &str) -> bool {
    locate_command(cmd).is_some()
}
