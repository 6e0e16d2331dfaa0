//! Common test utilities for integration tests.

#![allow(dead_code)]

mod fixtures;

pub use fixtures::*;

use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A builder checkout: `templates/`, `patches/` and a scratch `build/` dir.
pub struct BuilderEnv {
    pub dir: TempDir,
}

impl BuilderEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        for sub in ["templates", "patches", "build"] {
            std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn build_dir(&self) -> PathBuf {
        self.dir.path().join("build")
    }

    pub fn write_patch(&self, name: &str, body: &str) {
        std::fs::write(self.root().join("patches").join(format!("{}.diff", name)), body).unwrap();
    }

    pub fn write_template(&self, name: &str, body: &str) {
        std::fs::write(self.root().join("templates").join(name), body).unwrap();
    }

    /// Write a gzipped tarball containing `files` and return its path.
    pub fn write_tarball(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let path = self.root().join(name);
        let file = File::create(&path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (entry, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, entry, content.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
        path
    }
}

/// Whether the real `patch` tool is installed.
pub fn have_patch_tool() -> bool {
    libforge::is_available("patch")
}
