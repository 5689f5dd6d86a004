//! Cursor `mcp.json`, `settings.json` and cline extension settings.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::{SchemaAdapter, collect_servers, parse_server_entry};
use crate::model::{ClientKind, ServerDraft};

/// Reads `mcpServers` when present; otherwise treats every top-level object
/// that has a `command` as a server keyed by its property name.
pub struct CursorAdapter;

impl SchemaAdapter for CursorAdapter {
    fn client(&self) -> ClientKind {
        ClientKind::Cursor
    }

    fn adapt(&self, doc: &JsonValue, source: &Path, captured_at: DateTime<Utc>) -> Vec<ServerDraft> {
        if doc.get("mcpServers").is_some() {
            return collect_servers(doc.get("mcpServers"), source, captured_at);
        }
        let Some(map) = doc.as_object() else {
            return Vec::new();
        };
        map.iter()
            .filter(|(_, def)| def.get("command").is_some())
            .filter_map(|(name, def)| parse_server_entry(name, def, source, captured_at))
            .collect()
    }
}
