//! Minimal `{{name}}` templates for patches and generated build files.
//!
//! A template is split once into literal text and placeholders. Rendering
//! replaces every placeholder with its value from a substitution context;
//! a placeholder with no value is an error. There is no escaping, nesting,
//! or control flow.
//!
//! # Example
//! ```
//! use std::collections::HashMap;
//! use libforge::template::Template;
//!
//! let tpl = Template::new("hello {{name}}");
//! let ctx = HashMap::from([("name", "world")]);
//! assert_eq!(tpl.render(&ctx).unwrap(), "hello world");
//! ```

use crate::error::{Error, Result};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::path::{Path, PathBuf};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// File extension of patch templates under the patches directory.
pub const PATCH_EXTENSION: &str = "diff";

/// A piece of a tokenized template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone)]
pub struct Template {
    text: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let segments = tokenize(&text);
        Self { text, segments }
    }

    /// Load a template from a UTF-8 file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }

    /// The raw template text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in order of appearance (duplicates included).
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder with its value from `context`.
    pub fn render<K, V, S>(&self, context: &HashMap<K, V, S>) -> Result<String>
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
        S: BuildHasher,
    {
        let mut out = String::with_capacity(self.text.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = context
                        .get(name.as_str())
                        .ok_or_else(|| Error::MissingPlaceholder(name.clone()))?;
                    out.push_str(value.as_ref());
                }
            }
        }
        Ok(out)
    }
}

/// Split `text` into literals and `{{name}}` placeholders.
///
/// A name is a non-empty run of characters other than `}`. Matches are found
/// left to right without overlap; an opening `{{` that never closes is literal.
fn tokenize(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(OPEN) {
        let open = cursor + offset;
        let name_start = open + OPEN.len();
        let name_len = text[name_start..]
            .find('}')
            .unwrap_or(text.len() - name_start);
        let name_end = name_start + name_len;

        if name_len == 0 || !text[name_end..].starts_with(CLOSE) {
            // '{' is one byte, so this stays on a char boundary.
            cursor = open + 1;
            continue;
        }

        if literal_start < open {
            segments.push(Segment::Literal(text[literal_start..open].to_string()));
        }
        segments.push(Segment::Placeholder(text[name_start..name_end].to_string()));
        cursor = name_end + CLOSE.len();
        literal_start = cursor;
    }

    if literal_start < text.len() {
        segments.push(Segment::Literal(text[literal_start..].to_string()));
    }

    segments
}

/// Loads templates by name from a templates directory and a patches directory.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    templates_dir: PathBuf,
    patches_dir: PathBuf,
}

impl TemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>, patches_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            patches_dir: patches_dir.into(),
        }
    }

    /// Use `<root>/templates` and `<root>/patches`.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root.join("templates"), root.join("patches"))
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    pub fn patches_dir(&self) -> &Path {
        &self.patches_dir
    }

    pub fn template_path(&self, name: &str) -> PathBuf {
        self.templates_dir.join(name)
    }

    /// Path of `<patches_dir>/<name>.diff`.
    pub fn patch_path(&self, name: &str) -> PathBuf {
        self.patches_dir.join(format!("{}.{}", name, PATCH_EXTENSION))
    }

    pub fn template(&self, name: &str) -> Result<Template> {
        Template::from_file(&self.template_path(name))
    }

    pub fn patch(&self, name: &str) -> Result<Template> {
        Template::from_file(&self.patch_path(name))
    }
}

/// Render the named template and write the result to `out`.
pub fn render_template_to_file<K, V, S>(
    loader: &TemplateLoader,
    name: &str,
    context: &HashMap<K, V, S>,
    out: &Path,
) -> Result<()>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    let text = loader.template(name)?.render(context)?;
    crate::helpers::fs_utils::write_to_file(out, &text)?;
    Ok(())
}
