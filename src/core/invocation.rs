//! Command construction for a Blender script run.
//!
//! [`build`] turns a script path, its arguments and the three [`RunOptions`]
//! switches into an [`Invocation`]. The invocation renders to the shell
//! command line Blender is started with:
//!
//! ```text
//! <executable> <audio_flag> <headless_flag> <python_flag> <script_path> -- <args...>
//! ```
//!
//! Flags that are switched off render as empty tokens and the surrounding
//! spaces are kept, so `blender  -b -P gen.py -- ` is a valid result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub const SCRIPT_EXTENSION: &str = ".py";

pub const HEADLESS_FLAG: &str = "-b";
pub const PYTHON_FLAG: &str = "-P";
pub const NO_AUDIO_FLAG: &str = "-noaudio";

/// The Blender switches a run can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Run without opening a window (`-b`).
    #[serde(default = "default_true")]
    pub headless: bool,
    /// Run the script with Blender's Python runtime (`-P`).
    #[serde(default = "default_true")]
    pub python: bool,
    /// Keep audio enabled. When false Blender gets `-noaudio`.
    #[serde(default)]
    pub audio: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            headless: true,
            python: true,
            audio: false,
        }
    }
}

impl RunOptions {
    /// Overlay the recognized keys of a JSON object onto `self`.
    ///
    /// Each recognized key must hold a JSON boolean. Unknown keys are ignored.
    pub fn merge_json(mut self, options: &Map<String, Value>) -> Result<Self> {
        for (key, value) in options {
            let slot = match key.as_str() {
                "headless" => &mut self.headless,
                "python" => &mut self.python,
                "audio" => &mut self.audio,
                _ => continue,
            };
            *slot = value.as_bool().ok_or_else(|| {
                Error::validation_invalid_argument(
                    key.clone(),
                    format!("{}; should be a boolean", key),
                    Some(value.to_string()),
                )
            })?;
        }
        Ok(self)
    }

    /// Build options from a JSON object, starting from the defaults.
    pub fn from_json(options: &Map<String, Value>) -> Result<Self> {
        Self::default().merge_json(options)
    }

    pub fn audio_flag(&self) -> &'static str {
        if self.audio {
            ""
        } else {
            NO_AUDIO_FLAG
        }
    }

    pub fn headless_flag(&self) -> &'static str {
        if self.headless {
            HEADLESS_FLAG
        } else {
            ""
        }
    }

    pub fn python_flag(&self) -> &'static str {
        if self.python {
            PYTHON_FLAG
        } else {
            ""
        }
    }
}

/// Convert loosely typed script arguments into text, rejecting anything
/// that is not a JSON string.
pub fn script_args_from_json(values: &[Value]) -> Result<Vec<String>> {
    values
        .iter()
        .map(|value| match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::validation_invalid_argument(
                "script_args",
                "All Python arguments should be a string",
                Some(other.to_string()),
            )),
        })
        .collect()
}

/// A fully resolved Blender command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub executable: String,
    pub audio_flag: &'static str,
    pub headless_flag: &'static str,
    pub python_flag: &'static str,
    pub script: String,
    pub script_args: Vec<String>,
}

impl Invocation {
    /// Render the shell command line. Tokens are joined as-is, without quoting.
    pub fn command_line(&self) -> String {
        format!(
            "{} {} {} {} {} -- {}",
            self.executable,
            self.audio_flag,
            self.headless_flag,
            self.python_flag,
            self.script,
            self.script_args.join(" ")
        )
    }

    /// Token vector for execution without a shell. Empty flags are skipped.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = vec![self.executable.clone()];
        argv.extend(
            [self.audio_flag, self.headless_flag, self.python_flag]
                .into_iter()
                .filter(|flag| !flag.is_empty())
                .map(str::to_string),
        );
        argv.push(self.script.clone());
        argv.push("--".to_string());
        argv.extend(self.script_args.iter().cloned());
        argv
    }
}

/// Append `.py` unless the path already ends with it.
pub fn ensure_script_extension(script: &str) -> String {
    if script.ends_with(SCRIPT_EXTENSION) {
        script.to_string()
    } else {
        format!("{}{}", script, SCRIPT_EXTENSION)
    }
}

/// Resolve a script run into an [`Invocation`].
pub fn build(
    executable: &str,
    script: &str,
    script_args: &[String],
    options: &RunOptions,
) -> Result<Invocation> {
    if executable.trim().is_empty() {
        return Err(Error::validation_invalid_argument(
            "executable",
            "Blender executable path is empty",
            None,
        ));
    }

    if script.is_empty() {
        return Err(Error::validation_invalid_argument(
            "script",
            "Provide either a local or external (gist) script source",
            None,
        ));
    }

    Ok(Invocation {
        executable: executable.to_string(),
        audio_flag: options.audio_flag(),
        headless_flag: options.headless_flag(),
        python_flag: options.python_flag(),
        script: ensure_script_extension(script),
        script_args: script_args.to_vec(),
    })
}
