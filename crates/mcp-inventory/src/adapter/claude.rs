//! Claude Desktop and Claude Code config files.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::{SchemaAdapter, collect_servers};
use crate::model::{ClientKind, ServerDraft};

/// `claude_desktop_config.json`: a top-level `mcpServers` map.
pub struct ClaudeDesktopAdapter;

impl SchemaAdapter for ClaudeDesktopAdapter {
    fn client(&self) -> ClientKind {
        ClientKind::ClaudeDesktop
    }

    fn adapt(&self, doc: &JsonValue, source: &Path, captured_at: DateTime<Utc>) -> Vec<ServerDraft> {
        collect_servers(doc.get("mcpServers"), source, captured_at)
    }
}

/// `~/.claude.json` and `~/.claude/settings.json`: user-global `mcpServers`
/// plus project-scoped `projects.<dir>.mcpServers`.
///
/// Project-scoped servers are named `<name>@<dir>` so they stay distinct
/// from global ones in the same file.
pub struct ClaudeCodeAdapter;

impl SchemaAdapter for ClaudeCodeAdapter {
    fn client(&self) -> ClientKind {
        ClientKind::ClaudeCode
    }

    fn adapt(&self, doc: &JsonValue, source: &Path, captured_at: DateTime<Utc>) -> Vec<ServerDraft> {
        let mut out = collect_servers(doc.get("mcpServers"), source, captured_at);
        if let Some(projects) = doc.get("projects").and_then(|p| p.as_object()) {
            for (dir, proj) in projects {
                for mut rec in collect_servers(proj.get("mcpServers"), source, captured_at) {
                    rec.name = format!("{}@{}", rec.name, dir);
                    out.push(rec);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn desktop_github_entry() {
        let doc = json!({
            "mcpServers": {
                "github": {
                    "command": "/usr/local/bin/github-mcp",
                    "env": {"GITHUB_TOKEN": "ghp_abcdefghij1234"}
                }
            }
        });
        let recs = ClaudeDesktopAdapter.adapt(&doc, Path::new("/cfg.json"), Utc::now());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].name, "github");
        assert_eq!(recs[0].command, "/usr/local/bin/github-mcp");
        assert_eq!(recs[0].env["GITHUB_TOKEN"], "ghp_abcdefghij1234");
    }

    #[test]
    fn desktop_without_servers_is_empty() {
        let recs = ClaudeDesktopAdapter.adapt(&json!({"theme": "dark"}), Path::new("/c"), Utc::now());
        assert!(recs.is_empty());
        let recs = ClaudeDesktopAdapter.adapt(&json!([1, 2]), Path::new("/c"), Utc::now());
        assert!(recs.is_empty());
    }

    #[test]
    fn code_reads_global_and_project_servers() {
        let doc = json!({
            "mcpServers": {"fetch": {"command": "uvx", "args": ["mcp-server-fetch"]}},
            "projects": {
                "/work/app": {
                    "mcpServers": {
                        "fetch": {"command": "uvx", "args": ["mcp-server-fetch"]},
                        "broken": {}
                    }
                },
                "/work/empty": {}
            }
        });
        let recs = ClaudeCodeAdapter.adapt(&doc, Path::new("/home/u/.claude.json"), Utc::now());
        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["fetch", "fetch@/work/app"]);
        assert_eq!(recs[1].args, vec!["mcp-server-fetch"]);
    }
}
