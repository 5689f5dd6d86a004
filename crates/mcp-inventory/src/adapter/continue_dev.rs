//! Continue (`~/.continue/config.json` / `config.yaml`).
//!
//! Three places can define MCP servers: a plain `mcpServers` section, the
//! legacy `experimental.modelContextProtocolServers` list whose entries
//! describe a `transport`, and MCP-capable model providers under `models`.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::{SchemaAdapter, collect_servers, string_list, string_map};
use crate::model::{ClientKind, ServerDraft};

pub struct ContinueAdapter;

impl SchemaAdapter for ContinueAdapter {
    fn client(&self) -> ClientKind {
        ClientKind::Continue
    }

    fn adapt(&self, doc: &JsonValue, source: &Path, captured_at: DateTime<Utc>) -> Vec<ServerDraft> {
        let mut out = collect_servers(doc.get("mcpServers"), source, captured_at);

        let legacy = doc
            .get("experimental")
            .and_then(|e| e.get("modelContextProtocolServers"))
            .and_then(|s| s.as_array());
        if let Some(items) = legacy {
            out.extend(
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| transport_server(i, item, source, captured_at)),
            );
        }

        if let Some(models) = doc.get("models").and_then(|m| m.as_array()) {
            out.extend(
                models
                    .iter()
                    .filter(|m| uses_mcp(m))
                    .filter_map(|m| model_server(m, source, captured_at)),
            );
        }
        out
    }
}

fn str_field(v: &JsonValue, key: &str) -> Option<String> {
    v.get(key)
        .and_then(|s| s.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn transport_server(
    index: usize,
    item: &JsonValue,
    source: &Path,
    captured_at: DateTime<Utc>,
) -> Option<ServerDraft> {
    let transport = item.get("transport")?;
    let command = str_field(transport, "command").unwrap_or_default();
    let url = str_field(transport, "url");
    if command.is_empty() && url.is_none() {
        return None;
    }
    let name = str_field(item, "name").unwrap_or_else(|| format!("continue/mcp-{}", index));
    let mut rec = ServerDraft::new(name, source, captured_at);
    rec.command = command;
    rec.url = url;
    rec.args = transport.get("args").map(string_list).unwrap_or_default();
    rec.env = transport.get("env").map(string_map).unwrap_or_default();
    Some(rec)
}

fn uses_mcp(model: &JsonValue) -> bool {
    if model.get("provider").is_none() {
        return false;
    }
    if model.get("useMcp").and_then(|v| v.as_bool()) == Some(true) {
        return true;
    }
    model.to_string().to_lowercase().contains("mcp")
}

fn model_server(model: &JsonValue, source: &Path, captured_at: DateTime<Utc>) -> Option<ServerDraft> {
    let command = str_field(model, "command").unwrap_or_default();
    let url = str_field(model, "apiBase");
    if command.is_empty() && url.is_none() {
        return None;
    }
    let label = str_field(model, "title").or_else(|| str_field(model, "provider"))?;
    let mut rec = ServerDraft::new(format!("continue/{}", label), source, captured_at);
    rec.command = command;
    rec.url = url;
    rec.args = model.get("args").map(string_list).unwrap_or_default();
    rec.env = model.get("env").map(string_map).unwrap_or_default();
    Some(rec)
}
