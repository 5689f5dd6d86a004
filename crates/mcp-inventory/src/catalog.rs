//! Candidate config locations per client and operating system.
//!
//! Pure lookup: nothing here touches the filesystem. Paths are candidates
//! only; existence is checked by the loader.

use std::path::{Path, PathBuf};

use self::Base::{AppData, Home, LocalAppData};
use self::Scope::{Any, Only};
use crate::model::{ClientKind, Platform};

/// Root directories that relative catalog entries hang off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub home: PathBuf,
    /// Windows `%APPDATA%`.
    pub app_data: PathBuf,
    /// Windows `%LOCALAPPDATA%`.
    pub local_app_data: PathBuf,
}

impl Roots {
    /// Roots derived from a home directory with the stock Windows layout.
    pub fn from_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            app_data: home.join("AppData").join("Roaming"),
            local_app_data: home.join("AppData").join("Local"),
            home,
        }
    }

    /// Resolve roots for the running process. Falls back to `.` when no home
    /// directory can be determined so the scan degrades instead of failing.
    pub fn detect(platform: Platform) -> Self {
        let home = dirs::home_dir()
            .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
            .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
            .unwrap_or_else(|| {
                tracing::warn!("cannot determine home directory; using current directory");
                PathBuf::from(".")
            });
        let mut roots = Self::from_home(home);
        if platform == Platform::Windows {
            if let Some(p) = std::env::var_os("APPDATA").filter(|p| !p.is_empty()) {
                roots.app_data = PathBuf::from(p);
            }
            if let Some(p) = std::env::var_os("LOCALAPPDATA").filter(|p| !p.is_empty()) {
                roots.local_app_data = PathBuf::from(p);
            }
        }
        roots
    }
}

#[derive(Debug, Clone, Copy)]
enum Scope {
    Any,
    Only(Platform),
}

#[derive(Debug, Clone, Copy)]
enum Base {
    Home,
    AppData,
    LocalAppData,
}

struct Entry {
    client: ClientKind,
    scope: Scope,
    base: Base,
    rel: &'static str,
}

const fn e(client: ClientKind, scope: Scope, base: Base, rel: &'static str) -> Entry {
    Entry {
        client,
        scope,
        base,
        rel,
    }
}

const MAC: Scope = Only(Platform::MacOs);
const WIN: Scope = Only(Platform::Windows);
const LINUX: Scope = Only(Platform::Linux);

const CLINE_SETTINGS: &str = "User/globalStorage/saoudrizwan.claude-dev/settings/cline_mcp_settings.json";

const ENTRIES: &[Entry] = &[
    // Claude Desktop
    e(
        ClientKind::ClaudeDesktop,
        MAC,
        Home,
        "Library/Application Support/Claude/claude_desktop_config.json",
    ),
    e(ClientKind::ClaudeDesktop, WIN, AppData, "Claude/claude_desktop_config.json"),
    e(ClientKind::ClaudeDesktop, WIN, LocalAppData, "Claude/claude_desktop_config.json"),
    e(ClientKind::ClaudeDesktop, LINUX, Home, ".config/claude/config.json"),
    e(ClientKind::ClaudeDesktop, LINUX, Home, ".config/Claude/claude_desktop_config.json"),
    e(ClientKind::ClaudeDesktop, Any, Home, ".claude/config.json"),
    // Claude Code
    e(ClientKind::ClaudeCode, Any, Home, ".claude/settings.json"),
    e(ClientKind::ClaudeCode, Any, Home, ".claude.json"),
    e(ClientKind::ClaudeCode, Any, Home, ".config/claude-code/config.json"),
    e(ClientKind::ClaudeCode, MAC, Home, "Library/Application Support/Claude Code/config.json"),
    e(ClientKind::ClaudeCode, WIN, AppData, "Claude Code/config.json"),
    // VS Code user settings and mcp.json
    e(ClientKind::VsCode, Any, Home, ".vscode/settings.json"),
    e(ClientKind::VsCode, WIN, AppData, "Code/User/settings.json"),
    e(ClientKind::VsCode, WIN, AppData, "Code/User/mcp.json"),
    e(ClientKind::VsCode, MAC, Home, "Library/Application Support/Code/User/settings.json"),
    e(ClientKind::VsCode, MAC, Home, "Library/Application Support/Code/User/mcp.json"),
    e(ClientKind::VsCode, LINUX, Home, ".config/Code/User/settings.json"),
    e(ClientKind::VsCode, LINUX, Home, ".config/Code/User/mcp.json"),
    // VS Code extensions (directory)
    e(ClientKind::VsCodeExtensions, Any, Home, ".vscode/extensions"),
    // Cursor (the cline settings path is joined below per OS)
    e(ClientKind::Cursor, MAC, Home, "Library/Application Support/Cursor"),
    e(ClientKind::Cursor, WIN, AppData, "Cursor"),
    e(ClientKind::Cursor, LINUX, Home, ".config/Cursor"),
    e(ClientKind::Cursor, Any, Home, ".cursor/mcp.json"),
    e(ClientKind::Cursor, Any, Home, ".cursor/settings.json"),
    // GitHub Copilot
    e(ClientKind::Copilot, Any, Home, ".config/github-copilot/config.json"),
    e(ClientKind::Copilot, Any, Home, ".copilot/config.json"),
    e(ClientKind::Copilot, Any, Home, ".copilot/mcp-config.json"),
    e(ClientKind::Copilot, MAC, Home, "Library/Application Support/GitHub Copilot/config.json"),
    e(ClientKind::Copilot, WIN, AppData, "GitHub Copilot/config.json"),
    e(ClientKind::Copilot, WIN, LocalAppData, "GitHub Copilot/config.json"),
    // OpenAI / Codex
    e(ClientKind::Codex, Any, Home, ".config/openai/config.json"),
    e(ClientKind::Codex, Any, Home, ".openai/config.json"),
    e(ClientKind::Codex, Any, Home, ".config/codex/config.json"),
    e(ClientKind::Codex, Any, Home, ".codex/config.toml"),
    e(ClientKind::Codex, MAC, Home, "Library/Application Support/OpenAI/config.json"),
    e(ClientKind::Codex, WIN, AppData, "OpenAI/config.json"),
    e(ClientKind::Codex, WIN, AppData, "ChatGPT/config.json"),
    // Gemini CLI
    e(ClientKind::Gemini, Any, Home, ".config/gemini/config.json"),
    e(ClientKind::Gemini, Any, Home, ".gemini/config.json"),
    e(ClientKind::Gemini, Any, Home, ".gemini/settings.json"),
    e(ClientKind::Gemini, Any, Home, ".config/google-ai/config.json"),
    e(ClientKind::Gemini, MAC, Home, "Library/Application Support/Gemini/config.json"),
    e(ClientKind::Gemini, WIN, AppData, "Gemini/config.json"),
    e(ClientKind::Gemini, WIN, AppData, "Google/Gemini/config.json"),
    // Hugging Face
    e(ClientKind::HuggingFace, Any, Home, ".cache/huggingface/mcp_config.json"),
    e(ClientKind::HuggingFace, Any, Home, ".config/huggingface/config.json"),
    e(ClientKind::HuggingFace, Any, Home, ".huggingface/config.json"),
    e(ClientKind::HuggingFace, WIN, LocalAppData, "huggingface/config.json"),
    // Continue.dev
    e(ClientKind::Continue, Any, Home, ".continue/config.json"),
    e(ClientKind::Continue, Any, Home, ".continue/config.yaml"),
    e(ClientKind::Continue, Any, Home, ".config/continue/config.json"),
    // Cody
    e(ClientKind::Cody, Any, Home, ".config/cody/config.json"),
    e(ClientKind::Cody, Any, Home, ".cody/config.json"),
    e(ClientKind::Cody, MAC, Home, "Library/Application Support/Cody/config.json"),
    e(ClientKind::Cody, WIN, AppData, "Cody/config.json"),
    // Ollama
    e(ClientKind::Ollama, Any, Home, ".ollama/config.json"),
    e(ClientKind::Ollama, Any, Home, ".config/ollama/config.json"),
    e(ClientKind::Ollama, WIN, LocalAppData, "Ollama/config.json"),
    // Generic locations: files, or directories walked for *.json
    e(ClientKind::Custom, Any, Home, ".config/mcp"),
    e(ClientKind::Custom, Any, Home, ".mcp"),
    e(ClientKind::Custom, Any, Home, ".mcp.json"),
    e(ClientKind::Custom, Any, Home, ".config/ai-tools/mcp.json"),
];

/// Lookup table of candidate config paths.
#[derive(Debug, Clone)]
pub struct PathCatalog {
    roots: Roots,
}

impl PathCatalog {
    pub fn new(roots: Roots) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    /// Candidates for `client` on the platform named by `platform_tag`.
    /// An unrecognized tag yields no candidates.
    pub fn locations_for(&self, client: ClientKind, platform_tag: &str) -> Vec<PathBuf> {
        match Platform::from_tag(platform_tag) {
            Some(platform) => self.locations(client, platform),
            None => Vec::new(),
        }
    }

    /// Candidates for `client` on `platform`, in declaration order.
    /// `Platform::Unknown` keeps only the platform-agnostic entries.
    pub fn locations(&self, client: ClientKind, platform: Platform) -> Vec<PathBuf> {
        ENTRIES
            .iter()
            .filter(|en| en.client == client)
            .filter(|en| match en.scope {
                Scope::Any => true,
                Scope::Only(p) => p == platform,
            })
            .map(|en| self.resolve(en))
            .collect()
    }

    fn resolve(&self, entry: &Entry) -> PathBuf {
        let base = match entry.base {
            Base::Home => &self.roots.home,
            Base::AppData => &self.roots.app_data,
            Base::LocalAppData => &self.roots.local_app_data,
        };
        let path = join_rel(base, entry.rel);
        // Cursor app roots carry the cline extension settings file.
        if entry.client == ClientKind::Cursor && !matches!(entry.scope, Scope::Any) {
            return join_rel(&path, CLINE_SETTINGS);
        }
        path
    }
}

fn join_rel(base: &Path, rel: &str) -> PathBuf {
    rel.split('/')
        .filter(|c| !c.is_empty())
        .fold(base.to_path_buf(), |acc, c| acc.join(c))
}
