use super::{codes, ErrorCode, Hint};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorHelpSummary {
    pub code: String,
    pub summary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorHelp {
    pub code: String,
    pub summary: String,
    pub details_schema: serde_json::Value,
    pub hints: Vec<Hint>,
}

pub fn list() -> Vec<ErrorHelpSummary> {
    codes::all_codes()
        .iter()
        .copied()
        .map(|code| {
            let help = explain(code);
            ErrorHelpSummary {
                code: help.code,
                summary: help.summary,
            }
        })
        .collect()
}

fn help(code: ErrorCode, summary: &str, details_schema: serde_json::Value, hint: &str) -> ErrorHelp {
    ErrorHelp {
        code: code.as_str().to_string(),
        summary: summary.to_string(),
        details_schema,
        hints: vec![Hint {
            message: hint.to_string(),
        }],
    }
}

pub fn explain(code: ErrorCode) -> ErrorHelp {
    use serde_json::json;

    match code {
        ErrorCode::ConfigInvalidJson => help(
            code,
            "Configuration JSON is invalid",
            json!({"path":"string","error":"string"}),
            "Fix the JSON syntax in blendrun.json or run 'blendrun config reset'",
        ),
        ErrorCode::ConfigInvalidValue => help(
            code,
            "Configuration value is invalid",
            json!({"key":"string","value":"string?","problem":"string"}),
            "Correct the config value to match the expected type",
        ),
        ErrorCode::ValidationInvalidArgument => help(
            code,
            "Argument or option failed validation",
            json!({"field":"string","problem":"string","value":"string?"}),
            "Script paths must be non-empty, script arguments must be strings and options must be booleans",
        ),
        ErrorCode::ValidationInvalidJson => help(
            code,
            "Provided JSON could not be parsed",
            json!({"error":"string","context":"string?","input":"string?"}),
            "Fix the JSON passed to --options",
        ),
        ErrorCode::ProcessLaunchFailed => help(
            code,
            "The Blender process could not be started",
            json!({"command":"string","error":"string"}),
            "Check the executable path and its permissions",
        ),
        ErrorCode::ProcessInvalidUtf8 => help(
            code,
            "Captured process output is not valid UTF-8",
            json!({"command":"string","error":"string","validUpTo":"number"}),
            "Make the script print UTF-8 text only",
        ),
        ErrorCode::RemoteFetchFailed => help(
            code,
            "The remote document could not be downloaded",
            json!({"url":"string","error":"string","status":"number?"}),
            "Check network access and that the gist identifier exists",
        ),
        ErrorCode::RemoteInvalidJson => help(
            code,
            "The remote response body is not valid JSON",
            json!({"url":"string","error":"string"}),
            "Check that gist_api_base points at a JSON API",
        ),
        ErrorCode::RemoteContentNotFound => help(
            code,
            "The requested key path holds no script text",
            json!({"id":"string","keyPath":"string[]","problem":"string"}),
            "Pass --key once per level, e.g. --key files --key main.py --key content",
        ),
        ErrorCode::InternalIoError => help(
            code,
            "Internal IO error",
            json!({"error":"string","context":"string?"}),
            "Report as a blendrun bug if persistent",
        ),
        ErrorCode::InternalJsonError => help(
            code,
            "Internal JSON error",
            json!({"error":"string","context":"string?"}),
            "Report as a blendrun bug if persistent",
        ),
        ErrorCode::InternalUnexpected => help(
            code,
            "Unexpected internal error",
            json!({}),
            "Report as a blendrun bug with steps to reproduce",
        ),
    }
}
