use anyhow::Context as _;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    pub logging: Option<LoggingCfg>,
    pub report: Option<ReportCfg>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingCfg {
    pub to_file: Option<bool>,
    pub dir: Option<String>,
    pub json: Option<bool>,
    pub compact: Option<bool>,
    pub pretty: Option<bool>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportCfg {
    pub output_dir: Option<String>, // `~/` is expanded
    pub csv: Option<bool>,
    pub json: Option<bool>,
}

/// Read `<home>/config.toml`. A missing file is `Ok(None)`.
pub fn load_user_config(inv_home: &Path) -> anyhow::Result<Option<UserConfig>> {
    let path = inv_home.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let cfg: UserConfig =
        toml::from_str(&s).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Default tool home: `$HOME/.mcp-inventory`, else `./.mcp-inventory`.
pub fn default_inventory_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
        .join(".mcp-inventory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_user_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn sections_are_optional() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[report]\noutput_dir = \"/tmp/reports\"\njson = false\n",
        )
        .unwrap();
        let cfg = load_user_config(dir.path()).unwrap().unwrap();
        assert!(cfg.logging.is_none());
        let report = cfg.report.unwrap();
        assert_eq!(report.output_dir.as_deref(), Some("/tmp/reports"));
        assert_eq!(report.json, Some(false));
        assert_eq!(report.csv, None);
    }

    #[test]
    fn logging_section_parses() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[logging]\nlevel = \"debug\"\nto_file = true\njson = true\n",
        )
        .unwrap();
        let cfg = load_user_config(dir.path()).unwrap().unwrap();
        let logging = cfg.logging.unwrap();
        assert_eq!(logging.level.as_deref(), Some("debug"));
        assert_eq!(logging.to_file, Some(true));
        assert_eq!(logging.json, Some(true));
        assert_eq!(logging.pretty, None);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[report\n").unwrap();
        let err = load_user_config(dir.path()).unwrap_err();
        assert!(err.to_string().contains("parsing"));
    }

    #[test]
    fn expand_home_leaves_other_paths() {
        assert_eq!(expand_home("/abs/out"), PathBuf::from("/abs/out"));
        assert_eq!(expand_home("rel/out"), PathBuf::from("rel/out"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/out"), home.join("out"));
        }
    }
}
