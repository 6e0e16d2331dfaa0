//! Helpers for cross-compiling a native library for desktop and Android targets
//!
//! The build itself is driven elsewhere; this crate supplies the pieces it
//! needs for each architecture:
//!
//! 1. Look up toolchain names for the architecture ([`arch`]).
//! 2. Stage the sources from an archive ([`unpack_source`]).
//! 3. Apply templated patches to the staged tree ([`Patcher`]).
//! 4. Render generated build files from templates ([`template`]).
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::path::Path;
//! use libforge::{arch, unpack_source, Patcher, TemplateLoader};
//!
//! # fn main() -> libforge::Result<()> {
//! let arch = "android-armeabi-v7a";
//! let host = arch::get_android_configure_host_type(arch)?;
//!
//! let src = Path::new("build").join(arch).join("src");
//! unpack_source(Path::new("sqlcipher-3.4.1.tar.gz"), &src)?;
//!
//! let patcher = Patcher::new(TemplateLoader::from_root("."));
//! patcher.apply(&src, "android-configure", &HashMap::from([("host", host)]))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture identifiers
//!
//! - `android-armeabi-v7a` - host `arm-linux-androideabi`, toolchain `arm-linux-androideabi-4.9`
//! - `android-x86` - host `i686-linux-android`, toolchain `x86-4.9`
//! - `<platform>-<cpu>` for desktop targets (`linux-x64`, `osx-x64`, ...)

pub mod arch;
pub mod config;
mod core;
pub mod error;
pub mod helpers;
pub mod patch;
pub mod template;

pub use crate::core::output;
pub use config::BuildConfig;
pub use error::{Error, Result};
pub use helpers::{
    is_available, list_files, locate_command, locate_command_in, make_dirs, sha256_file,
    unhoist_directory, unpack_source, verify_file_hash, write_to_file, HashAlgorithm,
};
pub use patch::Patcher;
pub use template::{render_template_to_file, Template, TemplateLoader};
