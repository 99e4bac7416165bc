use clap::{Parser, Subcommand};

use commands::GlobalArgs;

#[derive(Debug, Clone, Copy)]
enum ResponseMode {
    Json,
    Raw,
}

mod commands;
mod output;
mod tty;

use commands::{config, error, gist, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "blendrun")]
#[command(version = VERSION)]
#[command(about = "Run Python scripts in a headless Blender")]
#[command(after_help = "Arguments after `--` are passed to the script unchanged.")]
struct Cli {
    /// Dry-run: show what would happen without starting Blender or writing files.
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a local Python script in Blender
    Run(run::RunArgs),
    /// Download a gist and run its script in Blender
    Gist(gist::GistArgs),
    /// Manage blendrun.json configuration
    Config(config::ConfigArgs),
    /// Error code registry and explanations
    Error(error::ErrorArgs),
}

fn response_mode(command: &Commands) -> ResponseMode {
    match command {
        Commands::Run(args) if args.flags.raw => ResponseMode::Raw,
        Commands::Gist(args) if args.flags.raw => ResponseMode::Raw,
        _ => ResponseMode::Json,
    }
}

fn main() -> std::process::ExitCode {
    let (host_args, script_args) = blendrun::args::split_host_and_script(std::env::args().collect());

    let cli = match Cli::try_parse_from(host_args) {
        Ok(cli) => cli,
        Err(e) => {
            e.exit();
        }
    };

    let global = GlobalArgs {
        dry_run: cli.dry_run,
        script_args,
    };

    let mode = response_mode(&cli.command);
    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    let printed = match (mode, json_result) {
        (ResponseMode::Raw, Ok(data)) => {
            let text = data
                .get("output")
                .or_else(|| data.get("command"))
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            output::print_raw(text)
        }
        (_, result) => output::print_json_result(result),
    };

    if let Err(err) = printed {
        eprintln!("{}", err);
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
