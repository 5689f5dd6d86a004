//! Canonical server record and per-run scan metadata.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::client::Platform;
use crate::redact::redact;
use crate::risk::{RiskEngine, RiskFactor};

/// Server entry as extracted by an adapter, before scoring and masking.
///
/// `name` is unique within a single config file only; `(config_path, name)`
/// is the natural key across a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDraft {
    pub name: String,
    /// Launched executable; empty for URL-based entries.
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub url: Option<String>,
    pub config_path: PathBuf,
    pub timestamp: DateTime<Utc>,
}

impl ServerDraft {
    pub fn new(name: impl Into<String>, config_path: impl Into<PathBuf>, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            command: String::new(),
            args: Vec::new(),
            env: BTreeMap::new(),
            url: None,
            config_path: config_path.into(),
            timestamp,
        }
    }

    /// Score against the original values, then mask sensitive env values.
    pub fn finalize(self) -> ServerRecord {
        let assessment = RiskEngine::score(&self);
        ServerRecord {
            env: redact(&self.env),
            name: self.name,
            command: self.command,
            args: self.args,
            url: self.url,
            config_path: self.config_path,
            timestamp: self.timestamp,
            risk_score: assessment.score,
            risk_factors: assessment.factors,
        }
    }
}

/// One discovered MCP server, scored and with sensitive env values masked.
///
/// Only built by [`ServerDraft::finalize`]; fields are read-only so the score
/// always matches the values it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerRecord {
    name: String,
    command: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    url: Option<String>,
    config_path: PathBuf,
    timestamp: DateTime<Utc>,
    risk_score: f64,
    risk_factors: BTreeSet<RiskFactor>,
}

impl ServerRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Environment with sensitive values masked.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn risk_score(&self) -> f64 {
        self.risk_score
    }

    pub fn risk_factors(&self) -> &BTreeSet<RiskFactor> {
        &self.risk_factors
    }
}

/// Run-level metadata shared by every record of one scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanMetadata {
    pub timestamp: DateTime<Utc>,
    pub hostname: String,
    pub user: String,
    pub platform: Platform,
    pub total_servers: usize,
}

impl ScanMetadata {
    /// Capture host and user identity, falling back to `unknown` when unavailable.
    pub fn capture(platform: Platform, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            hostname: detect_hostname(),
            user: detect_user(),
            platform,
            total_servers: 0,
        }
    }
}

fn detect_hostname() -> String {
    sysinfo::System::host_name()
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn detect_user() -> String {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
