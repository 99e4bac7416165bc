//! Run Python scripts inside a Blender process.
//!
//! ```no_run
//! use blendrun::blender::Blender;
//! use blendrun::invocation::RunOptions;
//!
//! let blender = Blender::new("blender");
//! // `.py` is appended to the script path when missing.
//! let output = blender.run("generate", &[], &RunOptions::default())?;
//! print!("{}", output);
//! # Ok::<(), blendrun::Error>(())
//! ```

use crate::error::Result;
use crate::gist::{self, GistClient, KeyPath};
use crate::invocation::{self, Invocation, RunOptions};
use crate::scratch::{ScratchDir, ScratchOptions};
use crate::utils::command::{self, ProcessOptions};

pub const DEFAULT_EXECUTABLE: &str = "blender";

/// A Blender executable plus the options new runs start from.
///
/// Holds no mutable state; one instance can serve any number of sequential
/// runs.
#[derive(Debug, Clone)]
pub struct Blender {
    executable: String,
    defaults: RunOptions,
    process: ProcessOptions,
}

impl Default for Blender {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLE)
    }
}

impl Blender {
    /// `executable` may be a bare name resolved through `PATH`.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            defaults: RunOptions::default(),
            process: ProcessOptions::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: RunOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_process_options(mut self, process: ProcessOptions) -> Self {
        self.process = process;
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn defaults(&self) -> &RunOptions {
        &self.defaults
    }

    /// Resolve a run without starting anything.
    pub fn invocation(
        &self,
        script: &str,
        script_args: &[String],
        options: &RunOptions,
    ) -> Result<Invocation> {
        invocation::build(&self.executable, script, script_args, options)
    }

    /// Run a local script and return Blender's captured output.
    ///
    /// Blender's exit status is not checked; errors printed by Blender or the
    /// script show up in the returned text.
    pub fn run(&self, script: &str, script_args: &[String], options: &RunOptions) -> Result<String> {
        let invocation = self.invocation(script, script_args, options)?;
        self.execute(&invocation)
    }

    pub fn execute(&self, invocation: &Invocation) -> Result<String> {
        let command = if self.process.use_shell {
            invocation.command_line()
        } else {
            invocation.argv().join(" ")
        };
        command::run_command(&command, &self.process)
    }

    /// Write `text` into a fresh scratch directory as `<name>.py` and run it.
    ///
    /// The scratch directory is gone when this returns, on success and on
    /// every error path.
    pub fn run_script_text(
        &self,
        name: &str,
        text: &str,
        script_args: &[String],
        options: &RunOptions,
        scratch: &ScratchOptions,
    ) -> Result<String> {
        let dir = ScratchDir::create(scratch)?;
        let script = dir.materialize(name, text)?;
        let output = self.run(&script.to_string_lossy(), script_args, options)?;
        dir.close()?;
        Ok(output)
    }

    /// Download gist `id`, pull the script text out of it and run it.
    ///
    /// With no `key_path` the first Python file of the gist is used.
    pub fn run_gist(
        &self,
        client: &GistClient,
        id: &str,
        key_path: Option<&KeyPath>,
        script_args: &[String],
        options: &RunOptions,
        scratch: &ScratchOptions,
    ) -> Result<String> {
        let document = client.fetch(id)?;
        let text = gist::script_text(id, &document, key_path)?;
        self.run_script_text(id, text, script_args, options, scratch)
    }
}
