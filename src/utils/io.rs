//! File I/O helpers that map `std::io` failures onto `internal.io_error`.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

fn io_error(e: std::io::Error, operation: &str, path: &Path) -> Error {
    Error::internal_io(e.to_string(), Some(format!("{} {}", operation, path.display())))
}

pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| io_error(e, operation, path))
}

/// Write `content` exactly as given. No newline is added or normalized.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| io_error(e, operation, path))
}

/// Create `dir` and its parents if they are missing.
pub fn ensure_dir(dir: &Path, operation: &str) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| io_error(e, operation, dir))
}

/// Remove a file, reporting whether it existed.
pub fn remove_file_if_exists(path: &Path, operation: &str) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(e, operation, path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_file_keeps_content_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("script.py");

        write_file(&path, "import bpy", "write script").unwrap();
        assert_eq!(read_file(&path, "read script").unwrap(), "import bpy");
    }

    #[test]
    fn read_file_error_carries_operation_context() {
        let err = read_file(Path::new("/nonexistent/blendrun.json"), "read config").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(err.details["context"], "read config /nonexistent/blendrun.json");
    }

    #[test]
    fn remove_file_if_exists_reports_presence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blendrun.json");
        write_file(&path, "{}", "write").unwrap();

        assert!(remove_file_if_exists(&path, "delete").unwrap());
        assert!(!remove_file_if_exists(&path, "delete").unwrap());
    }

    #[test]
    fn ensure_dir_creates_nested_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_dir(&nested, "create").unwrap();
        assert!(nested.is_dir());
    }
}
