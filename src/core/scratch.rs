//! Scoped scratch directories for scripts that only exist in memory.
//!
//! A [`ScratchDir`] is removed when it goes out of scope, whichever way the
//! scope is left. [`ScratchDir::close`] removes it eagerly and reports
//! failures to do so.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::invocation::ensure_script_extension;
use crate::utils::io;

pub const DEFAULT_PREFIX: &str = "blendrun-";

/// How a scratch directory is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchOptions {
    pub prefix: String,
    /// Directory to create the scratch directory in. Defaults to the system
    /// temporary directory.
    pub parent_dir: Option<PathBuf>,
}

impl Default for ScratchOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            parent_dir: None,
        }
    }
}

#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn create(options: &ScratchOptions) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&options.prefix);

        let dir = match &options.parent_dir {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| {
            Error::internal_io(e.to_string(), Some("create scratch directory".to_string()))
        })?;

        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `text` verbatim to `<scratch>/<name>.py` and return the path.
    ///
    /// `name` may only hold ASCII letters, digits, `_` and `-`; the resulting
    /// path is later spliced unquoted into a shell command line.
    pub fn materialize(&self, name: &str, text: &str) -> Result<PathBuf> {
        if !is_safe_name(name) {
            return Err(Error::validation_invalid_argument(
                "name",
                "Scratch file name may only contain letters, digits, '_' and '-'",
                Some(name.to_string()),
            ));
        }

        let path = self.dir.path().join(ensure_script_extension(name));
        io::write_file(&path, text, "write scratch script")?;
        Ok(path)
    }

    pub fn close(self) -> Result<()> {
        let path = self.dir.path().display().to_string();
        self.dir.close().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("remove scratch directory {}", path)))
        })
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options_in(parent: &Path) -> ScratchOptions {
        ScratchOptions {
            parent_dir: Some(parent.to_path_buf()),
            ..ScratchOptions::default()
        }
    }

    #[test]
    fn materialize_writes_text_verbatim() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchDir::create(&options_in(parent.path())).unwrap();

        let path = scratch.materialize("abc123", "import bpy\nprint(1)").unwrap();
        assert_eq!(path.file_name().unwrap(), "abc123.py");
        assert_eq!(fs::read_to_string(&path).unwrap(), "import bpy\nprint(1)");
    }

    #[test]
    fn scratch_directory_uses_prefix() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchDir::create(&options_in(parent.path())).unwrap();
        let name = scratch.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(DEFAULT_PREFIX));
    }

    #[test]
    fn dropping_removes_directory_and_contents() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchDir::create(&options_in(parent.path())).unwrap();
        let dir = scratch.path().to_path_buf();
        scratch.materialize("g", "x").unwrap();

        drop(scratch);
        assert!(!dir.exists());
    }

    #[test]
    fn close_removes_directory() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchDir::create(&options_in(parent.path())).unwrap();
        let dir = scratch.path().to_path_buf();

        scratch.close().unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn names_with_separators_are_rejected() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchDir::create(&options_in(parent.path())).unwrap();
        let err = scratch.materialize("../escape", "x").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn names_with_shell_metacharacters_are_rejected() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchDir::create(&options_in(parent.path())).unwrap();

        for name in ["g;echo X", "a b", "$(id)", "x.y", ""] {
            let err = scratch.materialize(name, "x").unwrap_err();
            assert_eq!(err.code.as_str(), "validation.invalid_argument", "{name}");
        }
        assert!(fs::read_dir(scratch.path()).unwrap().next().is_none());
    }

    #[test]
    fn hex_and_dashed_names_are_accepted() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchDir::create(&options_in(parent.path())).unwrap();
        assert!(scratch.materialize("aa5a315d61ae9438b18d", "x").is_ok());
        assert!(scratch.materialize("my_script-2", "x").is_ok());
    }
}
