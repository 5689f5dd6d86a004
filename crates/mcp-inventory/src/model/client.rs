//! Platform tags and supported client variants.

use std::fmt;

use serde::Serialize;

/// Operating-system family used to select candidate config paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
    /// Detection failed or the OS has no dedicated paths; only
    /// platform-agnostic (home dotfile) locations are scanned.
    Unknown,
}

impl Platform {
    /// Detect the platform of the running process.
    pub fn detect() -> Self {
        Self::from_tag(std::env::consts::OS).unwrap_or(Platform::Unknown)
    }

    /// Parse a platform tag. Returns `None` for unrecognized tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "macos" | "darwin" => Some(Platform::MacOs),
            "linux" => Some(Platform::Linux),
            "windows" => Some(Platform::Windows),
            "unknown" => Some(Platform::Unknown),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Platform::MacOs => "darwin",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Supported assistant clients whose config files may declare MCP servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    ClaudeDesktop,
    ClaudeCode,
    VsCode,
    VsCodeExtensions,
    Cursor,
    Copilot,
    Codex,
    Gemini,
    HuggingFace,
    Continue,
    Cody,
    Ollama,
    Custom,
}

impl ClientKind {
    /// Every client, in scan order.
    pub const ALL: [ClientKind; 13] = [
        ClientKind::ClaudeDesktop,
        ClientKind::ClaudeCode,
        ClientKind::VsCode,
        ClientKind::VsCodeExtensions,
        ClientKind::Cursor,
        ClientKind::Copilot,
        ClientKind::Codex,
        ClientKind::Gemini,
        ClientKind::HuggingFace,
        ClientKind::Continue,
        ClientKind::Cody,
        ClientKind::Ollama,
        ClientKind::Custom,
    ];

    /// Human-readable name used in log lines.
    pub fn display_name(self) -> &'static str {
        match self {
            ClientKind::ClaudeDesktop => "Claude Desktop",
            ClientKind::ClaudeCode => "Claude Code",
            ClientKind::VsCode => "VS Code",
            ClientKind::VsCodeExtensions => "VS Code extensions",
            ClientKind::Cursor => "Cursor",
            ClientKind::Copilot => "GitHub Copilot",
            ClientKind::Codex => "OpenAI/Codex",
            ClientKind::Gemini => "Gemini CLI",
            ClientKind::HuggingFace => "Hugging Face",
            ClientKind::Continue => "Continue.dev",
            ClientKind::Cody => "Cody",
            ClientKind::Ollama => "Ollama",
            ClientKind::Custom => "custom MCP",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_and_reject_unknown_strings() {
        assert_eq!(Platform::from_tag("Darwin"), Some(Platform::MacOs));
        assert_eq!(Platform::from_tag(" linux "), Some(Platform::Linux));
        assert_eq!(Platform::from_tag("unknown"), Some(Platform::Unknown));
        assert_eq!(Platform::from_tag("plan9"), None);
        assert_eq!(Platform::Windows.tag(), "windows");
    }

    #[test]
    fn detect_never_fails() {
        let p = Platform::detect();
        assert!(Platform::from_tag(p.tag()).is_some());
    }
}
