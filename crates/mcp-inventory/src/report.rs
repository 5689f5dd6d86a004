//! CSV and JSON inventory reports.
//!
//! Rows are flat views of finalized records; env values are already masked
//! and are written as-is.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::discovery::{Inventory, SkippedFile};
use crate::model::{Platform, ScanMetadata, ServerRecord};

pub const CSV_FILE_NAME: &str = "mcp_inventory.csv";
pub const JSON_FILE_NAME: &str = "mcp_inventory.json";

const FACTOR_DELIMITER: &str = ";";

const CSV_HEADER: [&str; 11] = [
    "timestamp",
    "server_name",
    "command",
    "args",
    "env_vars",
    "config_path",
    "url",
    "risk_score",
    "risk_factors",
    "hostname",
    "user",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// One output row per server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub timestamp: String,
    pub server_name: String,
    pub command: String,
    pub args: String,
    pub env_vars: String,
    pub config_path: String,
    pub url: String,
    pub risk_score: f64,
    pub risk_factors: String,
    pub hostname: String,
    pub user: String,
}

impl ReportRow {
    pub fn new(record: &ServerRecord, metadata: &ScanMetadata) -> Self {
        Self {
            timestamp: format_timestamp(record.timestamp()),
            server_name: record.name().to_string(),
            command: record.command().to_string(),
            args: record.args().join(" "),
            env_vars: serde_json::to_string(record.env()).unwrap_or_else(|_| "{}".to_string()),
            config_path: record.config_path().display().to_string(),
            url: record.url().unwrap_or_default().to_string(),
            risk_score: record.risk_score(),
            risk_factors: record
                .risk_factors()
                .iter()
                .map(|f| f.tag())
                .collect::<Vec<_>>()
                .join(FACTOR_DELIMITER),
            hostname: metadata.hostname.clone(),
            user: metadata.user.clone(),
        }
    }

    fn csv_fields(&self) -> [String; 11] {
        [
            self.timestamp.clone(),
            self.server_name.clone(),
            self.command.clone(),
            self.args.clone(),
            self.env_vars.clone(),
            self.config_path.clone(),
            self.url.clone(),
            format!("{:.2}", self.risk_score),
            self.risk_factors.clone(),
            self.hostname.clone(),
            self.user.clone(),
        ]
    }
}

#[derive(Serialize)]
struct MetadataView<'a> {
    timestamp: String,
    hostname: &'a str,
    user: &'a str,
    platform: Platform,
    total_servers: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    scan_metadata: MetadataView<'a>,
    servers: Vec<ReportRow>,
    skipped_files: &'a [SkippedFile],
}

/// Which report files to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub csv: bool,
    pub json: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            csv: true,
            json: true,
        }
    }
}

/// RFC 3339, microsecond precision, `Z` suffix.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn rows(inventory: &Inventory) -> Vec<ReportRow> {
    inventory
        .servers
        .iter()
        .map(|r| ReportRow::new(r, &inventory.metadata))
        .collect()
}

/// Write the selected reports into `dir`, creating it if needed.
/// Returns the written paths; nothing is written for an empty inventory.
pub fn write_reports(
    dir: &Path,
    inventory: &Inventory,
    options: ReportOptions,
) -> Result<Vec<PathBuf>, ReportError> {
    if inventory.servers.is_empty() {
        tracing::info!("no servers discovered; skipping reports");
        return Ok(Vec::new());
    }
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let rows = rows(inventory);
    let mut written = Vec::new();
    if options.csv {
        let path = dir.join(CSV_FILE_NAME);
        write_csv(&path, &rows)?;
        written.push(path);
    }
    if options.json {
        let path = dir.join(JSON_FILE_NAME);
        write_json(&path, inventory, rows)?;
        written.push(path);
    }
    Ok(written)
}

pub fn write_csv(path: &Path, rows: &[ReportRow]) -> Result<(), ReportError> {
    let io_err = |source: io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    write_csv_line(&mut out, CSV_HEADER.iter().copied()).map_err(io_err)?;
    for row in rows {
        let fields = row.csv_fields();
        write_csv_line(&mut out, fields.iter().map(String::as_str)).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    tracing::debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_json(path: &Path, inventory: &Inventory, rows: Vec<ReportRow>) -> Result<(), ReportError> {
    let meta = &inventory.metadata;
    let report = JsonReport {
        scan_metadata: MetadataView {
            timestamp: format_timestamp(meta.timestamp),
            hostname: &meta.hostname,
            user: &meta.user,
            platform: meta.platform,
            total_servers: meta.total_servers,
        },
        servers: rows,
        skipped_files: &inventory.skipped,
    };
    let body = serde_json::to_string_pretty(&report)?;
    fs::write(path, body).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}

fn write_csv_line<'a, W: Write>(out: &mut W, fields: impl Iterator<Item = &'a str>) -> io::Result<()> {
    let line = fields.map(csv_escape).collect::<Vec<_>>().join(",");
    out.write_all(line.as_bytes())?;
    out.write_all(b"\r\n")
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServerDraft;
    use tempfile::TempDir;

    fn inventory() -> Inventory {
        let at = DateTime::parse_from_rfc3339("2025-03-04T05:06:07.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut draft = ServerDraft::new("github", "/home/u/.claude/config.json", at);
        draft.command = "/usr/local/bin/github-mcp".into();
        draft.args = vec!["--repo".into(), "a,b".into()];
        draft.env.insert("GITHUB_TOKEN".into(), "ghp_abcdefghij1234".into());
        let rec = draft.finalize();
        let metadata = ScanMetadata {
            timestamp: at,
            hostname: "box".into(),
            user: "alice".into(),
            platform: Platform::Linux,
            total_servers: 1,
        };
        Inventory {
            metadata,
            servers: vec![rec],
            skipped: vec![SkippedFile {
                path: PathBuf::from("/home/u/.cursor/mcp.json"),
                reason: "invalid JSON".into(),
            }],
        }
    }

    #[test]
    fn row_uses_canonical_shapes() {
        let inv = inventory();
        let row = ReportRow::new(&inv.servers[0], &inv.metadata);
        assert_eq!(row.timestamp, "2025-03-04T05:06:07.123456Z");
        assert_eq!(row.args, "--repo a,b");
        assert_eq!(row.env_vars, r#"{"GITHUB_TOKEN":"ghp_abcdef..."}"#);
        assert_eq!(row.risk_factors, "CUSTOM_BINARY;SENSITIVE_ENV_VARS");
        assert_eq!(row.url, "");
        assert_eq!(row.hostname, "box");
        assert_eq!(row.user, "alice");
    }

    #[test]
    fn csv_escape_quotes_only_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape(r#"{"K":"v"}"#), r#""{""K"":""v""}""#);
        assert_eq!(csv_escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn writes_both_reports() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        let written = write_reports(&out, &inventory(), ReportOptions::default()).unwrap();
        assert_eq!(written, vec![out.join(CSV_FILE_NAME), out.join(JSON_FILE_NAME)]);

        let csv = fs::read_to_string(out.join(CSV_FILE_NAME)).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert!(lines[1].contains(",0.55,CUSTOM_BINARY;SENSITIVE_ENV_VARS,box,alice"));
        assert!(lines[1].contains("\"--repo a,b\""));
        assert!(!csv.contains("ghp_abcdefghij1234"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(JSON_FILE_NAME)).unwrap()).unwrap();
        assert_eq!(json["scan_metadata"]["total_servers"], 1);
        assert_eq!(json["scan_metadata"]["platform"], "linux");
        assert_eq!(json["servers"][0]["server_name"], "github");
        assert_eq!(json["skipped_files"][0]["reason"], "invalid JSON");
    }

    #[test]
    fn csv_only_when_json_disabled() {
        let dir = TempDir::new().unwrap();
        let opts = ReportOptions {
            csv: true,
            json: false,
        };
        let written = write_reports(dir.path(), &inventory(), opts).unwrap();
        assert_eq!(written, vec![dir.path().join(CSV_FILE_NAME)]);
        assert!(!dir.path().join(JSON_FILE_NAME).exists());
    }

    #[test]
    fn empty_inventory_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("output");
        let mut inv = inventory();
        inv.servers.clear();
        let written = write_reports(&out, &inv, ReportOptions::default()).unwrap();
        assert!(written.is_empty());
        assert!(!out.exists());
    }
}
