//! Shared layout for clients without a dedicated schema (Copilot, Codex,
//! Gemini, Hugging Face, Cody, Ollama and the generic `~/.mcp*` locations).

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::{SchemaAdapter, collect_servers, parse_server_entry};
use crate::model::{ClientKind, ServerDraft};

/// Reads every known server section of a document:
/// - `mcpServers` (object or named list)
/// - `mcp_servers` (Codex `config.toml`)
/// - `mcp.servers`
/// - `tools[]` items with `"type": "mcp"`
/// - `extensions.<name>.mcpServers`
pub struct GenericAdapter {
    client: ClientKind,
}

impl GenericAdapter {
    pub const fn new(client: ClientKind) -> Self {
        Self { client }
    }
}

impl SchemaAdapter for GenericAdapter {
    fn client(&self) -> ClientKind {
        self.client
    }

    fn adapt(&self, doc: &JsonValue, source: &Path, captured_at: DateTime<Utc>) -> Vec<ServerDraft> {
        let mut out = collect_servers(doc.get("mcpServers"), source, captured_at);
        out.extend(collect_servers(doc.get("mcp_servers"), source, captured_at));
        out.extend(collect_servers(
            doc.get("mcp").and_then(|m| m.get("servers")),
            source,
            captured_at,
        ));

        if let Some(tools) = doc.get("tools").and_then(|t| t.as_array()) {
            out.extend(
                tools
                    .iter()
                    .filter(|t| t.get("type").and_then(|v| v.as_str()) == Some("mcp"))
                    .filter_map(|t| {
                        let name = t.get("name").and_then(|n| n.as_str())?;
                        parse_server_entry(name, t, source, captured_at)
                    }),
            );
        }

        if let Some(exts) = doc.get("extensions").and_then(|e| e.as_object()) {
            for ext in exts.values() {
                out.extend(collect_servers(ext.get("mcpServers"), source, captured_at));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn adapt(doc: JsonValue) -> Vec<ServerDraft> {
        GenericAdapter::new(ClientKind::Gemini).adapt(&doc, Path::new("/g/settings.json"), Utc::now())
    }

    #[test]
    fn gemini_settings_with_http_url() {
        let recs = adapt(json!({
            "theme": "Default",
            "mcpServers": {"remote": {"httpUrl": "https://mcp.example.com"}}
        }));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].url.as_deref(), Some("https://mcp.example.com"));
    }

    #[test]
    fn codex_toml_table_layout() {
        let recs = adapt(json!({
            "model": "o3",
            "mcp_servers": {"docs": {"command": "npx", "args": ["-y", "docs-mcp"], "env": {"DOCS_API_KEY": "k"}}}
        }));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "docs");
        assert_eq!(recs[0].env["DOCS_API_KEY"], "k");
    }

    #[test]
    fn tools_array_only_takes_named_mcp_items() {
        let recs = adapt(json!({
            "tools": [
                {"type": "mcp", "name": "search", "command": "search-mcp"},
                {"type": "function", "name": "calc", "command": "calc"},
                {"type": "mcp", "command": "anonymous"},
                "junk"
            ]
        }));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "search");
    }

    #[test]
    fn nested_mcp_and_extension_sections() {
        let recs = adapt(json!({
            "mcp": {"servers": {"a": {"command": "x"}}},
            "extensions": {
                "ext-mcp": {"mcpServers": {"b": {"url": "https://b"}}},
                "other": {"enabled": true}
            }
        }));
        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn client_is_the_bound_variant() {
        assert_eq!(GenericAdapter::new(ClientKind::Ollama).client(), ClientKind::Ollama);
    }
}
