//! VS Code user settings, `mcp.json`, and extension-bundled MCP configs.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::{SchemaAdapter, collect_servers};
use crate::model::{ClientKind, ServerDraft};

/// Config files looked for inside each installed extension directory.
pub const EXTENSION_CONFIG_FILES: &[&str] = &["mcp.json", "mcp-config.json", "package.json"];

/// VS Code `mcp.json` uses a top-level `servers` table, `settings.json` nests
/// it under `mcp.servers`, and some files reuse the Claude-style
/// `mcpServers`. All three are read.
pub struct VsCodeAdapter;

impl SchemaAdapter for VsCodeAdapter {
    fn client(&self) -> ClientKind {
        ClientKind::VsCode
    }

    fn adapt(&self, doc: &JsonValue, source: &Path, captured_at: DateTime<Utc>) -> Vec<ServerDraft> {
        let mut out = collect_servers(doc.get("servers"), source, captured_at);
        out.extend(collect_servers(
            doc.get("mcp").and_then(|m| m.get("servers")),
            source,
            captured_at,
        ));
        out.extend(collect_servers(doc.get("mcpServers"), source, captured_at));
        out
    }
}

/// MCP configs shipped inside an extension directory. Server names are
/// prefixed with the extension directory name.
pub struct VsCodeExtensionAdapter;

impl SchemaAdapter for VsCodeExtensionAdapter {
    fn client(&self) -> ClientKind {
        ClientKind::VsCodeExtensions
    }

    fn adapt(&self, doc: &JsonValue, source: &Path, captured_at: DateTime<Utc>) -> Vec<ServerDraft> {
        let ext = source
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "extension".to_string());
        collect_servers(doc.get("mcpServers"), source, captured_at)
            .into_iter()
            .map(|mut rec| {
                rec.name = format!("{}/{}", ext, rec.name);
                rec
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn servers_key_is_parsed() {
        let doc = json!({
            "servers": {
                "docs": { "command": "docs-mcp", "args": [], "env": {"RUST_LOG":"info"} }
            },
            "inputs": []
        });
        let recs = VsCodeAdapter.adapt(&doc, Path::new("/ws/.vscode/mcp.json"), Utc::now());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].command, "docs-mcp");
        assert!(recs[0].args.is_empty());
        assert_eq!(recs[0].env.get("RUST_LOG").map(|s| s.as_str()), Some("info"));
    }

    #[test]
    fn settings_nested_and_mcpservers_keys_are_also_parsed() {
        let doc = json!({
            "editor.fontSize": 13,
            "mcp": {"servers": {"remote": {"type": "http", "url": "https://api.example.com/mcp"}}},
            "mcpServers": {"local": {"command": "docs-mcp", "args": ["--flag"]}}
        });
        let recs = VsCodeAdapter.adapt(&doc, Path::new("/u/settings.json"), Utc::now());
        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["remote", "local"]);
        assert_eq!(recs[0].url.as_deref(), Some("https://api.example.com/mcp"));
        assert_eq!(recs[1].args, vec!["--flag".to_string()]);
    }

    #[test]
    fn extension_servers_are_prefixed() {
        let doc = json!({"name": "ext", "mcpServers": {"db": {"command": "node", "args": ["server.js"]}}});
        let src = Path::new("/home/u/.vscode/extensions/acme.dbtools-1.2.0/package.json");
        let recs = VsCodeExtensionAdapter.adapt(&doc, src, Utc::now());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "acme.dbtools-1.2.0/db");
    }

    #[test]
    fn plain_package_json_yields_nothing() {
        let doc = json!({"name": "theme", "contributes": {"themes": []}});
        let src = Path::new("/x/ext/package.json");
        assert!(VsCodeExtensionAdapter.adapt(&doc, src, Utc::now()).is_empty());
    }
}
