//! Gist download and script text extraction.
//!
//! A gist document is plain JSON. Script text is usually found under
//! `files.<filename>.content`, but the key path is up to the caller.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com/gists/";

/// A key path into a JSON document: one key, or a sequence walked in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPath {
    Single(String),
    Many(Vec<String>),
}

impl KeyPath {
    /// Build from repeated CLI values. One value becomes [`KeyPath::Single`].
    pub fn from_keys(mut keys: Vec<String>) -> Option<Self> {
        match keys.len() {
            0 => None,
            1 => keys.pop().map(KeyPath::Single),
            _ => Some(KeyPath::Many(keys)),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        match self {
            KeyPath::Single(key) => vec![key.clone()],
            KeyPath::Many(keys) => keys.clone(),
        }
    }
}

fn step<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    }
}

/// Walk `document` along `path`, stopping at the first missing key.
///
/// Objects are indexed by key and arrays by decimal position. JSON `null`
/// counts as missing. An empty [`KeyPath::Many`] yields the document itself.
pub fn extract<'a>(document: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    let keys: &[String] = match path {
        KeyPath::Single(key) => std::slice::from_ref(key),
        KeyPath::Many(keys) => keys,
    };

    let mut node = document;
    if node.is_null() {
        return None;
    }
    for key in keys {
        node = step(node, key).filter(|next| !next.is_null())?;
    }
    Some(node)
}

/// Pick the script of a gist when no key path was given.
///
/// Prefers the first file whose name ends in `.py`, otherwise the first file.
/// Files are visited in key order.
pub fn default_script(document: &Value) -> Option<&str> {
    let files = document.get("files")?.as_object()?;
    let (_, file) = files
        .iter()
        .find(|(name, _)| name.ends_with(".py"))
        .or_else(|| files.iter().next())?;
    file.get("content")?.as_str()
}

/// Resolve the script text for gist `id` out of its document.
pub fn script_text<'a>(id: &str, document: &'a Value, path: Option<&KeyPath>) -> Result<&'a str> {
    let Some(path) = path else {
        return default_script(document).ok_or_else(|| {
            Error::remote_content_not_found(id, Vec::new(), "no file with text content")
        });
    };

    match extract(document, path) {
        Some(Value::String(text)) => Ok(text.as_str()),
        Some(_) => Err(Error::remote_content_not_found(
            id,
            path.keys(),
            "value is not text",
        )),
        None => Err(Error::remote_content_not_found(
            id,
            path.keys(),
            "key path not found",
        )),
    }
}

/// Blocking client for a gist-style JSON API.
pub struct GistClient {
    client: Client,
    base_url: String,
}

impl GistClient {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent.to_string())
            .build()
            .map_err(|e| {
                Error::internal_io(e.to_string(), Some("create HTTP client".to_string()))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn url_for(&self, id: &str) -> String {
        format!("{}{}", self.base_url, id)
    }

    /// Download and decode the document for `id`. One request, no retries.
    ///
    /// The body must be UTF-8 JSON; anything else is `remote.invalid_json`.
    pub fn fetch(&self, id: &str) -> Result<Value> {
        let url = self.url_for(id);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| Error::remote_fetch_failed(&url, e.to_string(), None))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::remote_fetch_failed(
                &url,
                body.chars().take(200).collect::<String>(),
                Some(status.as_u16()),
            ));
        }

        response.json::<Value>().map_err(|e| {
            if e.is_decode() {
                Error::remote_invalid_json(&url, e.to_string())
            } else {
                Error::remote_fetch_failed(&url, e.to_string(), None)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn many(keys: &[&str]) -> KeyPath {
        KeyPath::Many(keys.iter().map(|k| k.to_string()).collect())
    }

    #[test]
    fn nested_path_reaches_content() {
        let doc = json!({"f1": {"content": "hello"}});
        let found = extract(&doc, &many(&["f1", "content"]));
        assert_eq!(found, Some(&json!("hello")));
    }

    #[test]
    fn missing_leaf_is_none() {
        let doc = json!({"f1": {}});
        assert_eq!(extract(&doc, &many(&["f1", "content"])), None);
    }

    #[test]
    fn missing_single_key_is_none() {
        let doc = json!({});
        assert_eq!(extract(&doc, &KeyPath::Single("missing".into())), None);
    }

    #[test]
    fn missing_intermediate_short_circuits() {
        let doc = json!({"a": {"b": 1}});
        assert_eq!(extract(&doc, &many(&["x", "b", "c"])), None);
    }

    #[test]
    fn null_document_is_none() {
        assert_eq!(extract(&Value::Null, &many(&[])), None);
    }

    #[test]
    fn empty_path_returns_document() {
        let doc = json!({"a": 1});
        assert_eq!(extract(&doc, &many(&[])), Some(&doc));
    }

    #[test]
    fn arrays_are_indexed_by_position() {
        let doc = json!({"history": [{"version": "abc"}, {"version": "def"}]});
        assert_eq!(
            extract(&doc, &many(&["history", "1", "version"])),
            Some(&json!("def"))
        );
        assert_eq!(extract(&doc, &many(&["history", "x"])), None);
    }

    #[test]
    fn scalar_in_the_middle_stops_the_walk() {
        let doc = json!({"a": "text"});
        assert_eq!(extract(&doc, &many(&["a", "b"])), None);
    }

    #[test]
    fn default_script_prefers_python_files() {
        let doc = json!({"files": {
            "README.md": {"content": "# readme"},
            "scene.py": {"content": "import bpy"}
        }});
        assert_eq!(default_script(&doc), Some("import bpy"));
    }

    #[test]
    fn default_script_falls_back_to_first_file() {
        let doc = json!({"files": {"notes.txt": {"content": "print(1)"}}});
        assert_eq!(default_script(&doc), Some("print(1)"));
    }

    #[test]
    fn script_text_rejects_non_text_values() {
        let doc = json!({"files": {"a.py": {"size": 10}}});
        let err = script_text("g1", &doc, Some(&many(&["files", "a.py", "size"]))).unwrap_err();
        assert_eq!(err.code.as_str(), "remote.content_not_found");
        assert_eq!(err.details["problem"], "value is not text");
    }

    #[test]
    fn script_text_names_missing_key_path() {
        let doc = json!({"files": {}});
        let err = script_text("g1", &doc, Some(&many(&["files", "a.py", "content"]))).unwrap_err();
        assert_eq!(err.details["keyPath"], json!(["files", "a.py", "content"]));
        assert_eq!(err.details["id"], "g1");
    }

    #[test]
    fn key_path_from_cli_values() {
        assert_eq!(KeyPath::from_keys(vec![]), None);
        assert_eq!(
            KeyPath::from_keys(vec!["content".into()]),
            Some(KeyPath::Single("content".into()))
        );
        assert_eq!(
            KeyPath::from_keys(vec!["files".into(), "a.py".into()]),
            Some(many(&["files", "a.py"]))
        );
    }

    #[test]
    fn url_appends_identifier_to_base() {
        let client = GistClient::new(DEFAULT_API_BASE, "blendrun-test").unwrap();
        assert_eq!(
            client.url_for("aa5a315d61ae9438b18d"),
            "https://api.github.com/gists/aa5a315d61ae9438b18d"
        );
    }
}
