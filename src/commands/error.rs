use clap::{Args, Subcommand};
use serde::Serialize;

use blendrun::error::{self as codes, ErrorHelp, ErrorHelpSummary};

use super::CmdResult;

#[derive(Args, Debug)]
pub struct ErrorArgs {
    #[command(subcommand)]
    command: ErrorCommand,
}

#[derive(Subcommand, Debug)]
enum ErrorCommand {
    /// List available blendrun error codes
    List,
    /// Explain an error code
    Explain {
        /// Error code (example: `remote.content_not_found`)
        code: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorOutput {
    List {
        command: String,
        codes: Vec<ErrorHelpSummary>,
    },
    Explain {
        command: String,
        help: ErrorHelp,
    },
}

pub fn run(args: ErrorArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ErrorOutput> {
    match args.command {
        ErrorCommand::List => Ok((
            ErrorOutput::List {
                command: "error.list".to_string(),
                codes: codes::list(),
            },
            0,
        )),
        ErrorCommand::Explain { code } => {
            let Some(code_enum) = codes::parse_code(&code) else {
                return Err(blendrun::Error::validation_invalid_argument(
                    "code",
                    "Unknown error code",
                    Some(code),
                )
                .with_hint("Run 'blendrun error list' to see available codes"));
            };

            Ok((
                ErrorOutput::Explain {
                    command: "error.explain".to_string(),
                    help: codes::explain(code_enum),
                },
                0,
            ))
        }
    }
}
