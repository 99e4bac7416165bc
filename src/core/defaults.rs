use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::blender::{Blender, DEFAULT_EXECUTABLE};
use crate::error::{Error, Result};
use crate::gist::{GistClient, DEFAULT_API_BASE};
use crate::invocation::RunOptions;
use crate::paths;
use crate::scratch::{ScratchOptions, DEFAULT_PREFIX};
use crate::utils::io;

/// Root configuration structure for blendrun.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BlendrunConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via blendrun.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    /// Blender executable, a bare name looked up on PATH or a path (`~` is expanded).
    #[serde(default = "default_executable")]
    pub executable: String,

    #[serde(flatten)]
    pub run: RunOptions,

    #[serde(default = "default_gist_api_base")]
    pub gist_api_base: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_scratch_prefix")]
    pub scratch_prefix: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            run: RunOptions::default(),
            gist_api_base: default_gist_api_base(),
            user_agent: default_user_agent(),
            scratch_prefix: default_scratch_prefix(),
        }
    }
}

fn default_executable() -> String {
    DEFAULT_EXECUTABLE.to_string()
}

fn default_gist_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_user_agent() -> String {
    format!("blendrun/{}", env!("CARGO_PKG_VERSION"))
}

fn default_scratch_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Defaults {
    /// Blender runner for the configured executable, `override_path` wins.
    pub fn blender(&self, override_path: Option<&str>) -> Blender {
        let raw = override_path.unwrap_or(self.executable.as_str());
        let executable = shellexpand::tilde(raw).into_owned();
        Blender::new(executable).with_defaults(self.run)
    }

    pub fn gist_client(&self) -> Result<GistClient> {
        GistClient::new(self.gist_api_base.clone(), &self.user_agent)
    }

    pub fn scratch_options(&self) -> ScratchOptions {
        ScratchOptions {
            prefix: self.scratch_prefix.clone(),
            parent_dir: None,
        }
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If blendrun.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full blendrun.json config, falling back to defaults on any error.
pub fn load_config() -> BlendrunConfig {
    paths::blendrun_json()
        .and_then(|path| load_config_from_file(&path))
        .unwrap_or_default()
}

/// Read and parse a config file. Missing files are an error here.
pub fn load_config_from_file(path: &Path) -> Result<BlendrunConfig> {
    let content = io::read_file(path, "read")?;
    serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
}

/// Save config to blendrun.json file (creates if missing).
pub fn save_config(config: &BlendrunConfig) -> Result<()> {
    save_config_to_file(config, &paths::blendrun_json()?)
}

pub fn save_config_to_file(config: &BlendrunConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        io::ensure_dir(parent, "create")?;
    }

    let content = serde_json::to_string_pretty(config).map_err(|e| {
        Error::internal_json(e.to_string(), Some("serialize blendrun.json".to_string()))
    })?;

    io::write_file(path, &content, "write")
}

/// Return a copy of `config` with the value at JSON `pointer` replaced.
///
/// The pointer must name an existing field (e.g. `/defaults/audio`) and the
/// result must still deserialize into a valid config.
pub fn set_value(config: &BlendrunConfig, pointer: &str, value: Value) -> Result<BlendrunConfig> {
    if !pointer.starts_with('/') {
        return Err(Error::validation_invalid_argument(
            "pointer",
            "JSON pointer must start with '/'",
            Some(pointer.to_string()),
        ));
    }

    let mut config_json = serde_json::to_value(config).map_err(|e| {
        Error::internal_json(e.to_string(), Some("serialize config".to_string()))
    })?;

    let slot = config_json.pointer_mut(pointer).ok_or_else(|| {
        Error::config_invalid_value(pointer, None, "No configuration key at this pointer")
    })?;
    *slot = value;

    serde_json::from_value(config_json).map_err(|e| {
        Error::config_invalid_value(pointer, None, format!("Value does not fit: {}", e))
    })
}

/// Check if blendrun.json file exists
pub fn config_exists() -> bool {
    paths::blendrun_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Delete blendrun.json file (reset to defaults)
pub fn reset_config() -> Result<bool> {
    let path = paths::blendrun_json()?;
    io::remove_file_if_exists(&path, "delete")
}

/// Get the path to blendrun.json (for display purposes)
pub fn config_path() -> Result<String> {
    Ok(paths::blendrun_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn builtin_defaults_match_blender_conventions() {
        let defaults = builtin_defaults();
        assert_eq!(defaults.executable, "blender");
        assert_eq!(defaults.run, RunOptions::default());
        assert_eq!(defaults.gist_api_base, "https://api.github.com/gists/");
        assert!(defaults.user_agent.starts_with("blendrun/"));
    }

    #[test]
    fn partial_file_is_filled_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blendrun.json");
        std::fs::write(&path, r#"{"defaults": {"executable": "/opt/blender/blender", "audio": true}}"#)
            .unwrap();

        let config = load_config_from_file(&path).unwrap();
        assert_eq!(config.defaults.executable, "/opt/blender/blender");
        assert!(config.defaults.run.audio);
        assert!(config.defaults.run.headless);
        assert_eq!(config.defaults.gist_api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn invalid_file_reports_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blendrun.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_config_from_file(&path).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("blendrun.json");

        save_config_to_file(&BlendrunConfig::default(), &path).unwrap();
        assert_eq!(load_config_from_file(&path).unwrap(), BlendrunConfig::default());
    }

    #[test]
    fn set_value_updates_flattened_option() {
        let updated =
            set_value(&BlendrunConfig::default(), "/defaults/headless", json!(false)).unwrap();
        assert!(!updated.defaults.run.headless);
    }

    #[test]
    fn set_value_rejects_wrong_type() {
        let err = set_value(&BlendrunConfig::default(), "/defaults/audio", json!("loud"))
            .unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn set_value_rejects_unknown_pointer() {
        let err = set_value(&BlendrunConfig::default(), "/defaults/nope", json!(1)).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn blender_uses_override_path_and_defaults() {
        let mut defaults = builtin_defaults();
        defaults.run.python = false;

        let blender = defaults.blender(Some("/usr/local/bin/blender"));
        assert_eq!(blender.executable(), "/usr/local/bin/blender");
        assert!(!blender.defaults().python);
    }
}
