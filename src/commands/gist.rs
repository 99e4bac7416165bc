use clap::Args;
use serde::Serialize;

use blendrun::defaults;
use blendrun::gist::{self, KeyPath};
use blendrun::invocation::ensure_script_extension;
use blendrun::log_status;

use super::{resolve_run, CmdResult, GlobalArgs, RunFlags};

#[derive(Args, Debug)]
pub struct GistArgs {
    /// Gist identifier
    pub id: String,

    /// Key to descend into, repeat once per level (default: first .py file's content)
    #[arg(long = "key", value_name = "KEY")]
    pub keys: Vec<String>,

    #[command(flatten)]
    pub flags: RunFlags,
}

#[derive(Debug, Serialize)]
pub struct GistOutput {
    pub id: String,
    pub url: String,
    pub script_args: Vec<String>,
    pub executed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

pub fn run(args: GistArgs, global: &GlobalArgs) -> CmdResult<GistOutput> {
    let resolved = resolve_run(defaults::load_defaults(), &args.flags, global)?;
    let client = resolved.defaults.gist_client()?;
    let key_path = KeyPath::from_keys(args.keys);
    let url = client.url_for(&args.id);

    if global.dry_run {
        log_status!("gist", "Fetching {}", url);
        let document = client.fetch(&args.id)?;
        let text = gist::script_text(&args.id, &document, key_path.as_ref())?;
        let placeholder = format!("<scratch>/{}", ensure_script_extension(&args.id));
        let invocation =
            resolved
                .blender
                .invocation(&placeholder, &resolved.script_args, &resolved.options)?;

        return Ok((
            GistOutput {
                id: args.id,
                url,
                script_args: resolved.script_args,
                executed: false,
                command: Some(invocation.command_line()),
                script_bytes: Some(text.len()),
                output: None,
            },
            0,
        ));
    }

    log_status!("gist", "Running {}", url);
    let output = resolved.blender.run_gist(
        &client,
        &args.id,
        key_path.as_ref(),
        &resolved.script_args,
        &resolved.options,
        &resolved.defaults.scratch_options(),
    )?;

    Ok((
        GistOutput {
            id: args.id,
            url,
            script_args: resolved.script_args,
            executed: true,
            command: None,
            script_bytes: None,
            output: Some(output),
        },
        0,
    ))
}
