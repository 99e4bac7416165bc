use clap::Args;
use serde::Serialize;

use blendrun::defaults::{self, Defaults};
use blendrun::log_status;

use super::{resolve_run, CmdResult, GlobalArgs, RunFlags};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Script path (`.py` is appended when missing)
    pub script: String,

    #[command(flatten)]
    pub flags: RunFlags,
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub command: String,
    pub script: String,
    pub script_args: Vec<String>,
    pub executed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

pub fn run(args: RunArgs, global: &GlobalArgs) -> CmdResult<RunOutput> {
    run_with(args, global, defaults::load_defaults())
}

fn run_with(args: RunArgs, global: &GlobalArgs, defaults: Defaults) -> CmdResult<RunOutput> {
    let resolved = resolve_run(defaults, &args.flags, global)?;
    let invocation =
        resolved
            .blender
            .invocation(&args.script, &resolved.script_args, &resolved.options)?;
    let command = invocation.command_line();

    let output = if global.dry_run {
        None
    } else {
        log_status!("run", "{}", command);
        Some(resolved.blender.execute(&invocation)?)
    };

    Ok((
        RunOutput {
            command,
            script: invocation.script,
            script_args: invocation.script_args,
            executed: output.is_some(),
            output,
        },
        0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_builds_command_without_executing() {
        let args = RunArgs {
            script: "generate".to_string(),
            flags: RunFlags {
                binary: Some("/nonexistent/blender".to_string()),
                ..RunFlags::default()
            },
        };
        let global = GlobalArgs {
            dry_run: true,
            script_args: vec!["-a".to_string(), "1".to_string()],
        };

        let (out, code) = run_with(args, &global, Defaults::default()).unwrap();
        assert_eq!(code, 0);
        assert!(!out.executed);
        assert_eq!(out.script, "generate.py");
        assert!(out.command.starts_with("/nonexistent/blender "));
        assert!(out.command.ends_with("generate.py -- -a 1"));
    }
}
