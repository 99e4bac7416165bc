use clap::Args;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use blendrun::blender::Blender;
use blendrun::defaults::Defaults;
use blendrun::invocation::{script_args_from_json, RunOptions};

pub type CmdResult<T> = blendrun::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub(crate) dry_run: bool,
    /// Tokens after the first `--` on the blendrun command line.
    pub(crate) script_args: Vec<String>,
}

pub mod config;
pub mod error;
pub mod gist;
pub mod run;

/// Blender switches shared by every command that starts Blender.
#[derive(Args, Debug, Default)]
pub struct RunFlags {
    /// Blender executable (overrides the configured one)
    #[arg(long, value_name = "PATH")]
    pub binary: Option<String>,

    /// Open the Blender window instead of running in the background
    #[arg(long)]
    pub no_headless: bool,

    /// Do not pass the script through Blender's Python runtime
    #[arg(long)]
    pub no_python: bool,

    /// Keep audio enabled
    #[arg(long)]
    pub audio: bool,

    /// Options as a JSON object, e.g. '{"headless":false}' (supports @file and - for stdin)
    #[arg(long, value_name = "JSON")]
    pub options: Option<String>,

    /// Script arguments as a JSON array of strings, placed before the ones after `--`
    #[arg(long, value_name = "JSON")]
    pub args_json: Option<String>,

    /// Print Blender's output verbatim instead of the JSON envelope
    #[arg(long)]
    pub raw: bool,
}

/// Everything a command needs to start Blender.
pub(crate) struct ResolvedRun {
    pub(crate) defaults: Defaults,
    pub(crate) blender: Blender,
    pub(crate) options: RunOptions,
    pub(crate) script_args: Vec<String>,
}

/// Merge configuration, `--options` JSON and explicit flags, in that order.
pub(crate) fn resolve_run(
    defaults: Defaults,
    flags: &RunFlags,
    global: &GlobalArgs,
) -> blendrun::Result<ResolvedRun> {
    let blender = defaults.blender(flags.binary.as_deref());

    let mut options = *blender.defaults();
    if let Some(spec) = &flags.options {
        let value = read_json_spec(spec, "options")?;
        let map = value.as_object().ok_or_else(|| {
            blendrun::Error::validation_invalid_argument(
                "options",
                "Options must be a JSON object",
                Some(value.to_string()),
            )
        })?;
        options = options.merge_json(map)?;
    }
    if flags.no_headless {
        options.headless = false;
    }
    if flags.no_python {
        options.python = false;
    }
    if flags.audio {
        options.audio = true;
    }

    let mut script_args = match &flags.args_json {
        Some(spec) => {
            let value = read_json_spec(spec, "args_json")?;
            let items = value.as_array().ok_or_else(|| {
                blendrun::Error::validation_invalid_argument(
                    "args_json",
                    "Script arguments must be a JSON array",
                    Some(value.to_string()),
                )
            })?;
            script_args_from_json(items)?
        }
        None => Vec::new(),
    };
    script_args.extend(global.script_args.iter().cloned());

    Ok(ResolvedRun {
        defaults,
        blender,
        options,
        script_args,
    })
}

// ============================================================================
// JSON Input Parsing (CLI layer)
// ============================================================================

/// Read JSON spec from string, file (@path), or stdin (-).
fn read_json_spec_to_string(spec: &str, field: &str) -> blendrun::Result<String> {
    if spec.trim() == "-" {
        if crate::tty::is_stdin_tty() {
            return Err(blendrun::Error::validation_invalid_argument(
                field,
                "Cannot read JSON from stdin when stdin is a TTY",
                None,
            ));
        }
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(|e| {
            blendrun::Error::internal_io(e.to_string(), Some("read stdin".to_string()))
        })?;
        return Ok(buf);
    }

    if let Some(path) = spec.strip_prefix('@') {
        if path.trim().is_empty() {
            return Err(blendrun::Error::validation_invalid_argument(
                field,
                "Invalid JSON spec '@' (missing file path)",
                None,
            ));
        }
        return blendrun::io::read_file(Path::new(path), "read");
    }

    Ok(spec.to_string())
}

fn read_json_spec(spec: &str, field: &str) -> blendrun::Result<Value> {
    let raw = read_json_spec_to_string(spec, field)?;
    serde_json::from_str(&raw).map_err(|e| {
        blendrun::Error::validation_invalid_json(
            e,
            Some(format!("parse --{}", field.replace('_', "-"))),
            Some(raw.chars().take(200).collect::<String>()),
        )
    })
}

pub(crate) fn run_json(command: crate::Commands, global: &GlobalArgs) -> (blendrun::Result<Value>, i32) {
    use crate::output::map_cmd_result_to_json;

    match command {
        crate::Commands::Run(args) => map_cmd_result_to_json(run::run(args, global)),
        crate::Commands::Gist(args) => map_cmd_result_to_json(gist::run(args, global)),
        crate::Commands::Config(args) => map_cmd_result_to_json(config::run(args, global)),
        crate::Commands::Error(args) => map_cmd_result_to_json(error::run(args, global)),
    }
}
