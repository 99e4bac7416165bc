//! Argument splitting around the literal `--` separator.
//!
//! Everything before the first `--` belongs to the host (Blender itself, or
//! the `blendrun` CLI); everything after it is forwarded verbatim to the
//! wrapped script.

use clap::Parser;

use crate::error::{Error, Result};

pub const SEPARATOR: &str = "--";

/// Return the tokens strictly after the first `--`, or nothing if absent.
pub fn split_after_separator<S: AsRef<str>>(argv: &[S]) -> Vec<String> {
    match argv.iter().position(|arg| arg.as_ref() == SEPARATOR) {
        Some(idx) => argv[idx + 1..]
            .iter()
            .map(|arg| arg.as_ref().to_string())
            .collect(),
        None => Vec::new(),
    }
}

/// Split argv at the first `--` into host tokens and script tokens.
///
/// The separator itself is dropped. Later `--` tokens stay in the script part.
pub fn split_host_and_script(argv: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut host = argv;
    match host.iter().position(|arg| arg == SEPARATOR) {
        Some(idx) => {
            let script = host.split_off(idx + 1);
            host.pop();
            (host, script)
        }
        None => (host, Vec::new()),
    }
}

/// Parse the script-side arguments of a Blender invocation with clap.
///
/// Meant for use inside a wrapped script process: `argv` is the full process
/// argument list (Blender's own flags included) and only the tokens after
/// `--` reach `T`.
///
/// ```no_run
/// use clap::Parser;
///
/// #[derive(Parser)]
/// struct ScriptArgs {
///     #[arg(short)]
///     count: u32,
/// }
///
/// let argv: Vec<String> = std::env::args().collect();
/// let args: ScriptArgs = blendrun::args::parse_script_args("render.py", &argv).unwrap();
/// ```
pub fn parse_script_args<T: Parser>(program: &str, argv: &[String]) -> Result<T> {
    let script_args = split_after_separator(argv);
    T::try_parse_from(std::iter::once(program.to_string()).chain(script_args)).map_err(|e| {
        Error::validation_invalid_argument("script_args", e.to_string(), None)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn returns_tokens_after_separator() {
        assert_eq!(split_after_separator(&["a", "--", "b", "c"]), argv(&["b", "c"]));
    }

    #[test]
    fn missing_separator_returns_empty() {
        assert!(split_after_separator(&["a", "b"]).is_empty());
    }

    #[test]
    fn trailing_separator_returns_empty() {
        assert!(split_after_separator(&["--"]).is_empty());
    }

    #[test]
    fn only_first_separator_splits() {
        assert_eq!(
            split_after_separator(&["blender", "--", "-x", "--", "y"]),
            argv(&["-x", "--", "y"])
        );
    }

    #[test]
    fn host_and_script_split_drops_separator() {
        let (host, script) =
            split_host_and_script(argv(&["blendrun", "run", "gen", "--", "-a", "1"]));
        assert_eq!(host, argv(&["blendrun", "run", "gen"]));
        assert_eq!(script, argv(&["-a", "1"]));
    }

    #[test]
    fn host_and_script_split_without_separator_keeps_everything_on_host() {
        let (host, script) = split_host_and_script(argv(&["blendrun", "config", "path"]));
        assert_eq!(host, argv(&["blendrun", "config", "path"]));
        assert!(script.is_empty());
    }

    #[derive(Parser, Debug)]
    struct ScriptArgs {
        #[arg(short)]
        a: u32,
        #[arg(short)]
        b: Option<String>,
    }

    #[test]
    fn parse_script_args_ignores_host_flags() {
        let full = argv(&["blender", "-b", "-P", "gen.py", "--", "-a", "1", "-b", "two"]);
        let parsed: ScriptArgs = parse_script_args("gen.py", &full).unwrap();
        assert_eq!(parsed.a, 1);
        assert_eq!(parsed.b.as_deref(), Some("two"));
    }

    #[test]
    fn parse_script_args_reports_clap_errors() {
        let full = argv(&["blender", "-b", "--", "-a", "not-a-number"]);
        let err = parse_script_args::<ScriptArgs>("gen.py", &full).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }
}
