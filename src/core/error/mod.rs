mod codes;
mod help;

pub use codes::{all_codes, parse_code};
pub use help::{explain, list, ErrorHelp, ErrorHelpSummary};

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationInvalidArgument,
    ValidationInvalidJson,

    ProcessLaunchFailed,
    ProcessInvalidUtf8,

    RemoteFetchFailed,
    RemoteInvalidJson,
    RemoteContentNotFound,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",

            ErrorCode::ProcessLaunchFailed => "process.launch_failed",
            ErrorCode::ProcessInvalidUtf8 => "process.invalid_utf8",

            ErrorCode::RemoteFetchFailed => "remote.fetch_failed",
            ErrorCode::RemoteInvalidJson => "remote.invalid_json",
            ErrorCode::RemoteContentNotFound => "remote.content_not_found",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessLaunchFailedDetails {
    pub command: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInvalidUtf8Details {
    pub command: String,
    pub error: String,
    pub valid_up_to: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFetchFailedDetails {
    pub url: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteContentNotFoundDetails {
    pub id: String,
    pub key_path: Vec<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        let field = field.into();
        let problem = problem.into();
        let message = format!("Invalid argument '{}': {}", field, problem);
        let details = to_details(InvalidArgumentDetails {
            field,
            problem,
            value,
        });

        Self::new(ErrorCode::ValidationInvalidArgument, message, details)
    }

    pub fn validation_invalid_json(
        err: serde_json::Error,
        context: Option<String>,
        input: Option<String>,
    ) -> Self {
        let details = serde_json::json!({
            "error": err.to_string(),
            "context": context,
            "input": input,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let details = to_details(ConfigInvalidValueDetails {
            key: key.into(),
            value,
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            details,
        )
    }

    pub fn process_launch_failed(command: impl Into<String>, err: std::io::Error) -> Self {
        let command = command.into();
        let message = format!("Failed to start process: {}", err);
        let details = to_details(ProcessLaunchFailedDetails {
            command,
            error: err.to_string(),
        });

        Self::new(ErrorCode::ProcessLaunchFailed, message, details)
            .with_hint("Check that the Blender executable exists and is on PATH, or pass --binary")
    }

    pub fn process_invalid_utf8(command: impl Into<String>, err: std::string::FromUtf8Error) -> Self {
        let details = to_details(ProcessInvalidUtf8Details {
            command: command.into(),
            valid_up_to: err.utf8_error().valid_up_to(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ProcessInvalidUtf8,
            "Process output is not valid UTF-8",
            details,
        )
    }

    pub fn remote_fetch_failed(
        url: impl Into<String>,
        error: impl Into<String>,
        status: Option<u16>,
    ) -> Self {
        let error = error.into();
        let message = match status {
            Some(code) => format!("Remote fetch failed: HTTP {}", code),
            None => format!("Remote fetch failed: {}", error),
        };
        let details = to_details(RemoteFetchFailedDetails {
            url: url.into(),
            error,
            status,
        });

        let mut err = Self::new(ErrorCode::RemoteFetchFailed, message, details);
        err.retryable = Some(true);
        err
    }

    pub fn remote_invalid_json(url: impl Into<String>, error: impl Into<String>) -> Self {
        let details = serde_json::json!({
            "url": url.into(),
            "error": error.into(),
        });

        Self::new(
            ErrorCode::RemoteInvalidJson,
            "Remote document is not valid JSON",
            details,
        )
    }

    pub fn remote_content_not_found(
        id: impl Into<String>,
        key_path: Vec<String>,
        problem: impl Into<String>,
    ) -> Self {
        let message = if key_path.is_empty() {
            "Could not find any script content in the remote document".to_string()
        } else {
            format!("Could not find any content under {}", key_path.join("."))
        };
        let details = to_details(RemoteContentNotFoundDetails {
            id: id.into(),
            key_path,
            problem: problem.into(),
        });

        Self::new(ErrorCode::RemoteContentNotFound, message, details)
            .with_hint("Gist documents keep script text under files.<filename>.content")
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_names_field_in_message_and_details() {
        let err = Error::validation_invalid_argument("audio", "must be a boolean", Some("1".into()));
        assert_eq!(err.code, ErrorCode::ValidationInvalidArgument);
        assert!(err.message.contains("audio"));
        assert_eq!(err.details["field"], "audio");
        assert_eq!(err.details["value"], "1");
    }

    #[test]
    fn fetch_failure_is_marked_retryable() {
        let err = Error::remote_fetch_failed("https://example.invalid/x", "refused", None);
        assert_eq!(err.retryable, Some(true));
        assert_eq!(err.code.as_str(), "remote.fetch_failed");
    }

    #[test]
    fn content_not_found_joins_key_path() {
        let err = Error::remote_content_not_found(
            "abc",
            vec!["files".into(), "main.py".into(), "content".into()],
            "missing key",
        );
        assert_eq!(
            err.message,
            "Could not find any content under files.main.py.content"
        );
        assert_eq!(err.details["keyPath"][1], "main.py");
    }
}
