//! Filesystem, process and integrity helpers
//!
//! Small standalone functions used while staging a library build.
//!
//! ## Categories
//!
//! - **hash**: sha256_file, file_hash, verify_file_hash
//! - **locate**: locate_command, locate_command_in
//! - **fs_utils**: make_dirs, list_files, write_to_file, unhoist_directory
//! - **extract**: extract, unpack_source

pub mod extract;
pub mod fs_utils;
pub mod hash;
pub mod locate;

pub use extract::{extract, unpack_source, ArchiveFormat};
pub use fs_utils::{list_files, make_dirs, unhoist_directory, write_to_file};
pub use hash::{file_hash, sha256_file, verify_file_hash, HashAlgorithm};
pub use locate::{is_available, locate_command, locate_command_in};
