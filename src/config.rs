//! Builder configuration (`libforge.toml`).
//!
//! ```toml
//! templates_dir = "templates"
//! patches_dir = "patches"
//! patch_program = "patch"
//! archs = ["android-armeabi-v7a", "android-x86", "linux-x64"]
//! ```
//!
//! Relative directories are resolved against the directory holding the file.

use crate::error::{Error, Result};
use crate::patch::Patcher;
use crate::template::TemplateLoader;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "libforge.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "LIBFORGE_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub templates_dir: PathBuf,
    pub patches_dir: PathBuf,
    pub patch_program: String,
    pub archs: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            patches_dir: PathBuf::from("patches"),
            patch_program: "patch".to_string(),
            archs: Vec::new(),
        }
    }
}

impl BuildConfig {
    /// Parse a config file and resolve its relative directories.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config: BuildConfig = toml::from_str(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Load the first config found in discovery order, or the defaults.
    ///
    /// Order: `explicit`, `$LIBFORGE_CONFIG`, `./libforge.toml`,
    /// `$XDG_CONFIG_HOME/libforge/config.toml`.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Self::load(Path::new(&path));
        }
        for candidate in [PathBuf::from(CONFIG_FILE_NAME), user_config_path()] {
            if candidate.is_file() {
                return Self::load(&candidate);
            }
        }
        Ok(Self::default())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if self.templates_dir.is_relative() {
            self.templates_dir = base.join(&self.templates_dir);
        }
        if self.patches_dir.is_relative() {
            self.patches_dir = base.join(&self.patches_dir);
        }
    }

    pub fn loader(&self) -> TemplateLoader {
        TemplateLoader::new(&self.templates_dir, &self.patches_dir)
    }

    pub fn patcher(&self) -> Patcher {
        Patcher::new(self.loader()).program(&self.patch_program)
    }
}

fn xdg_config_home() -> PathBuf {
    if let Ok(raw) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".").join(".config"))
}

fn user_config_path() -> PathBuf {
    xdg_config_home().join("libforge").join("config.toml")
}
