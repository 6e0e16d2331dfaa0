//! Patch flow - renders patch templates and feeds them to `patch -p1`.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::hash::{BuildHasher, Hash};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::core::output;
use crate::error::{Error, Result};
use crate::template::TemplateLoader;

/// Leading path components stripped from every patched file name.
pub const STRIP_LEVEL: u32 = 1;

/// Applies rendered patch templates to a source tree.
#[derive(Debug, Clone)]
pub struct Patcher {
    loader: TemplateLoader,
    program: OsString,
}

impl Patcher {
    /// Create a patcher that runs `patch` from the search path.
    pub fn new(loader: TemplateLoader) -> Self {
        Self {
            loader,
            program: OsString::from("patch"),
        }
    }

    /// Use a different patch executable.
    pub fn program(mut self, program: impl AsRef<OsStr>) -> Self {
        self.program = program.as_ref().to_os_string();
        self
    }

    pub fn loader(&self) -> &TemplateLoader {
        &self.loader
    }

    /// Render `<patches>/<patch_name>.diff` with `context` and apply it in `cwd`.
    pub fn apply<K, V, S>(
        &self,
        cwd: &Path,
        patch_name: &str,
        context: &HashMap<K, V, S>,
    ) -> Result<()>
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
        S: BuildHasher,
    {
        let patch_data = self.loader.patch(patch_name)?.render(context)?;
        self.apply_text(cwd, patch_name, &patch_data)
    }

    /// Apply several patches in order, stopping at the first failure.
    pub fn apply_all<K, V, S>(
        &self,
        cwd: &Path,
        patch_names: &[&str],
        context: &HashMap<K, V, S>,
    ) -> Result<()>
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
        S: BuildHasher,
    {
        for name in patch_names {
            self.apply(cwd, name, context)?;
        }
        Ok(())
    }

    /// Pipe already-rendered patch text into the patch program.
    pub fn apply_text(&self, cwd: &Path, patch_name: &str, patch_data: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .arg(format!("-p{}", STRIP_LEVEL))
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A program that exits without reading everything is judged by its status.
            match stdin.write_all(patch_data.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    let _ = child.wait();
                    return Err(e.into());
                }
                _ => {}
            }
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(Error::PatchFailed {
                name: patch_name.to_string(),
                code: status.code(),
            });
        }

        output::detail(&format!("applied patch {}", patch_name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn patcher_with(patch_name: &str, body: &str) -> (TempDir, Patcher) {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("patches")).unwrap();
        std::fs::write(
            root.path().join("patches").join(format!("{}.diff", patch_name)),
            body,
        )
        .unwrap();
        let patcher = Patcher::new(TemplateLoader::from_root(root.path()));
        (root, patcher)
    }

    #[test]
    fn test_missing_patch_file() {
        let root = TempDir::new().unwrap();
        let patcher = Patcher::new(TemplateLoader::from_root(root.path()));
        let ctx: HashMap<&str, &str> = HashMap::new();

        let err = patcher.apply(root.path(), "nope", &ctx).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_missing_placeholder_runs_nothing() {
        let (root, patcher) = patcher_with("cfg", "+HOST={{host}}\n");
        let patcher = patcher.program("definitely-not-a-real-patch-program");
        let ctx: HashMap<&str, &str> = HashMap::new();

        let err = patcher.apply(root.path(), "cfg", &ctx).unwrap_err();
        assert!(matches!(err, Error::MissingPlaceholder(ref n) if n == "host"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_names_the_patch() {
        let (root, patcher) = patcher_with("android-config", "+{{x}}\n");
        let patcher = patcher.program("false");
        let ctx = HashMap::from([("x", "1")]);

        let err = patcher.apply(root.path(), "android-config", &ctx).unwrap_err();
        match &err {
            Error::PatchFailed { name, code } => {
                assert_eq!(name, "android-config");
                assert_eq!(*code, Some(1));
            }
            other => panic!("expected PatchFailed, got {other:?}"),
        }
        assert!(err.to_string().contains("android-config"));
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_is_success() {
        let (root, patcher) = patcher_with("noop", "+{{x}}\n");
        let patcher = patcher.program("true");
        let ctx = HashMap::from([("x", "1")]);

        patcher.apply(root.path(), "noop", &ctx).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_apply_all_stops_at_first_failure() {
        // "later" has no patch file, so reaching it would fail with an IO error instead.
        let (root, patcher) = patcher_with("first", "+{{x}}\n");
        let patcher = patcher.program("false");
        let ctx = HashMap::from([("x", "1")]);

        let err = patcher
            .apply_all(root.path(), &["first", "later"], &ctx)
            .unwrap_err();
        assert!(
            matches!(err, Error::PatchFailed { ref name, .. } if name == "first"),
            "got: {err:?}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_apply_all_applies_in_order() {
        let (root, patcher) = patcher_with("first", "+{{x}}\n");
        std::fs::write(root.path().join("patches/second.diff"), "+{{x}}\n").unwrap();
        let patcher = patcher.program("true");
        let ctx = HashMap::from([("x", "1")]);

        patcher
            .apply_all(root.path(), &["first", "second"], &ctx)
            .unwrap();

        // A missing patch after a good one is still reached.
        let err = patcher
            .apply_all(root.path(), &["first", "missing"], &ctx)
            .unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == ErrorKind::NotFound));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let (root, patcher) = patcher_with("p", "+\n");
        let patcher = patcher.program("definitely-not-a-real-patch-program");
        let ctx: HashMap<&str, &str> = HashMap::new();

        let err = patcher.apply(root.path(), "p", &ctx).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == ErrorKind::NotFound));
    }
}
