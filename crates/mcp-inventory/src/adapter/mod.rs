//! Client-specific config schemas normalized into `ServerDraft`s.
//!
//! Each client variant is bound to one adapter. Adapters tolerate missing
//! optional fields and drop malformed entries silently; they never merge or
//! deduplicate across files.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::model::{ClientKind, ServerDraft};

pub mod claude;
pub mod continue_dev;
pub mod cursor;
pub mod generic;
pub mod vscode;

use claude::{ClaudeCodeAdapter, ClaudeDesktopAdapter};
use continue_dev::ContinueAdapter;
use cursor::CursorAdapter;
use generic::GenericAdapter;
use vscode::{VsCodeAdapter, VsCodeExtensionAdapter};

/// Converts one parsed config document into canonical records.
pub trait SchemaAdapter: Send + Sync {
    fn client(&self) -> ClientKind;
    fn adapt(&self, doc: &JsonValue, source: &Path, captured_at: DateTime<Utc>) -> Vec<ServerDraft>;
}

static CLAUDE_DESKTOP: ClaudeDesktopAdapter = ClaudeDesktopAdapter;
static CLAUDE_CODE: ClaudeCodeAdapter = ClaudeCodeAdapter;
static VSCODE: VsCodeAdapter = VsCodeAdapter;
static VSCODE_EXTENSIONS: VsCodeExtensionAdapter = VsCodeExtensionAdapter;
static CURSOR: CursorAdapter = CursorAdapter;
static CONTINUE: ContinueAdapter = ContinueAdapter;
static COPILOT: GenericAdapter = GenericAdapter::new(ClientKind::Copilot);
static CODEX: GenericAdapter = GenericAdapter::new(ClientKind::Codex);
static GEMINI: GenericAdapter = GenericAdapter::new(ClientKind::Gemini);
static HUGGING_FACE: GenericAdapter = GenericAdapter::new(ClientKind::HuggingFace);
static CODY: GenericAdapter = GenericAdapter::new(ClientKind::Cody);
static OLLAMA: GenericAdapter = GenericAdapter::new(ClientKind::Ollama);
static CUSTOM: GenericAdapter = GenericAdapter::new(ClientKind::Custom);

/// The adapter bound to `kind`.
pub fn adapter_for(kind: ClientKind) -> &'static dyn SchemaAdapter {
    match kind {
        ClientKind::ClaudeDesktop => &CLAUDE_DESKTOP,
        ClientKind::ClaudeCode => &CLAUDE_CODE,
        ClientKind::VsCode => &VSCODE,
        ClientKind::VsCodeExtensions => &VSCODE_EXTENSIONS,
        ClientKind::Cursor => &CURSOR,
        ClientKind::Continue => &CONTINUE,
        ClientKind::Copilot => &COPILOT,
        ClientKind::Codex => &CODEX,
        ClientKind::Gemini => &GEMINI,
        ClientKind::HuggingFace => &HUGGING_FACE,
        ClientKind::Cody => &CODY,
        ClientKind::Ollama => &OLLAMA,
        ClientKind::Custom => &CUSTOM,
    }
}

/// Dispatch `doc` to the adapter for `kind`.
pub fn adapt(
    kind: ClientKind,
    doc: &JsonValue,
    source: &Path,
    captured_at: DateTime<Utc>,
) -> Vec<ServerDraft> {
    adapter_for(kind).adapt(doc, source, captured_at)
}

const COMMAND_KEYS: &[&str] = &["command", "cmd"];
const ARGS_KEYS: &[&str] = &["args", "arguments"];
const ENV_KEYS: &[&str] = &["env", "environment"];
const URL_KEYS: &[&str] = &["url", "serverUrl", "httpUrl"];

/// Parse one server definition: `{ command|cmd, args?, env?, url? }`.
///
/// Returns `None` when the name is blank or the entry has neither a command
/// nor a URL.
pub(crate) fn parse_server_entry(
    name: &str,
    def: &JsonValue,
    source: &Path,
    captured_at: DateTime<Utc>,
) -> Option<ServerDraft> {
    let name = name.trim();
    if name.is_empty() {
        tracing::debug!("dropping unnamed server entry in {}", source.display());
        return None;
    }
    let obj = def.as_object()?;
    let command = first_str(obj, COMMAND_KEYS).unwrap_or_default();
    let url = first_str(obj, URL_KEYS);
    if command.is_empty() && url.is_none() {
        tracing::debug!(
            "dropping server '{}' in {}: no command or url",
            name,
            source.display()
        );
        return None;
    }
    let mut rec = ServerDraft::new(name, source, captured_at);
    rec.command = command;
    rec.url = url;
    rec.args = ARGS_KEYS
        .iter()
        .find_map(|k| obj.get(*k))
        .map(string_list)
        .unwrap_or_default();
    rec.env = ENV_KEYS
        .iter()
        .find_map(|k| obj.get(*k))
        .map(string_map)
        .unwrap_or_default();
    Some(rec)
}

/// Records from a server collection: an object keyed by name, or a list of
/// objects carrying their own `name`.
pub(crate) fn collect_servers(
    servers: Option<&JsonValue>,
    source: &Path,
    captured_at: DateTime<Utc>,
) -> Vec<ServerDraft> {
    match servers {
        Some(JsonValue::Object(map)) => map
            .iter()
            .filter_map(|(name, def)| parse_server_entry(name, def, source, captured_at))
            .collect(),
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|def| {
                let name = def.get("name").and_then(|n| n.as_str())?;
                parse_server_entry(name, def, source, captured_at)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn first_str(obj: &serde_json::Map<String, JsonValue>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(|v| v.as_str()))
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

pub(crate) fn string_list(v: &JsonValue) -> Vec<String> {
    v.as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|x| x.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn string_map(v: &JsonValue) -> BTreeMap<String, String> {
    v.as_object()
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}
