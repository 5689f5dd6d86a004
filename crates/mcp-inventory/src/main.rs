use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Utc;
use env_flags::env_flags;
use once_cell::sync::OnceCell;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::MakeWriter;

use mcp_inventory::config::{UserConfig, default_inventory_home, expand_home, load_user_config};
use mcp_inventory::discovery::{Discovery, Inventory};
use mcp_inventory::report::{self, ReportOptions};
use mcp_inventory::risk::RiskLevel;

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogStyle {
    Json,
    Compact,
    Pretty,
    Full,
}

fn env_set(k: &str) -> bool {
    std::env::var_os(k).is_some()
}

fn fmt_layer<W>(writer: W, ansi: bool, style: LogStyle) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    match style {
        LogStyle::Json => base.json().boxed(),
        LogStyle::Compact => base.compact().boxed(),
        LogStyle::Pretty => base.pretty().boxed(),
        LogStyle::Full => base.boxed(),
    }
}

fn init_tracing(inv_home: &Path, user_cfg: Option<&UserConfig>) {
    env_flags! {
        /// Tracing filter, e.g. "info", "debug", or targets format.
        RUST_LOG: &str = "info";
        /// Preferred filter env (alias). If set, overrides RUST_LOG.
        TRACING_FILTER: &str = "";
        /// Pretty formatting for logs (ignored if TRACING_JSON=true).
        TRACING_PRETTY: bool = false;
        /// Compact single-line formatting for logs (ignored if TRACING_JSON=true)
        TRACING_COMPACT: bool = true;
        /// JSON formatting for logs
        TRACING_JSON: bool = false;
        /// If true, also log to file under <MCP_INVENTORY_HOME>/logs or LOG_DIR
        LOG_TO_FILE: bool = false;
        /// Optional explicit log directory (absolute). Defaults to <MCP_INVENTORY_HOME>/logs
        LOG_DIR: &str = "";
    }

    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let mut rust_log = if !(*TRACING_FILTER).is_empty() {
        (*TRACING_FILTER).to_string()
    } else {
        (*RUST_LOG).to_string()
    };
    let mut tracing_json = *TRACING_JSON;
    let mut tracing_compact = *TRACING_COMPACT;
    let mut tracing_pretty = *TRACING_PRETTY;
    let mut log_to_file = *LOG_TO_FILE;
    let mut log_dir: Option<PathBuf> = if !(*LOG_DIR).is_empty() {
        Some(expand_home(*LOG_DIR))
    } else {
        None
    };

    if let Some(cfg) = user_cfg.and_then(|c| c.logging.as_ref()) {
        if !(env_set("TRACING_FILTER") || env_set("RUST_LOG"))
            && let Some(level) = cfg.level.as_ref()
        {
            rust_log = level.clone();
        }
        if !env_set("TRACING_JSON")
            && let Some(v) = cfg.json
        {
            tracing_json = v;
        }
        if !env_set("TRACING_COMPACT")
            && let Some(v) = cfg.compact
        {
            tracing_compact = v;
        }
        if !env_set("TRACING_PRETTY")
            && let Some(v) = cfg.pretty
        {
            tracing_pretty = v;
        }
        if !env_set("LOG_TO_FILE")
            && let Some(v) = cfg.to_file
        {
            log_to_file = v;
        }
        if !env_set("LOG_DIR")
            && let Some(dir) = cfg.dir.as_ref()
        {
            log_dir = Some(expand_home(dir));
        }
    }

    let filter = EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new("info"));
    let style = if tracing_json {
        LogStyle::Json
    } else if tracing_compact {
        LogStyle::Compact
    } else if tracing_pretty {
        LogStyle::Pretty
    } else {
        LogStyle::Full
    };

    // Logs go to stderr; stdout carries the scan summary.
    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(std::io::stderr, true, style)];

    static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
    let mut file_err = None;
    if log_to_file {
        let dir = log_dir.unwrap_or_else(|| inv_home.join("logs"));
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(&dir, "mcp-inventory.log");
                let (nb, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                layers.push(fmt_layer(nb, false, style));
            }
            Err(e) => file_err = Some((dir, e)),
        }
    }

    if let Err(e) = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
    {
        tracing::debug!("tracing already set: {:?}", e);
    }
    if let Some((dir, e)) = file_err {
        tracing::warn!("failed to create log dir {}: {}", dir.display(), e);
    }
}

/// Output directory and report selection: env, then user config, then defaults.
fn report_settings(user_cfg: Option<&UserConfig>) -> (PathBuf, ReportOptions) {
    env_flags! {
        /// Directory that receives mcp_inventory.csv / mcp_inventory.json
        MCP_INVENTORY_OUTPUT_DIR: &str = "output";
        /// Write the CSV report
        MCP_INVENTORY_CSV: bool = true;
        /// Write the JSON report
        MCP_INVENTORY_JSON: bool = true;
    }

    let mut out_dir = expand_home(*MCP_INVENTORY_OUTPUT_DIR);
    let mut options = ReportOptions {
        csv: *MCP_INVENTORY_CSV,
        json: *MCP_INVENTORY_JSON,
    };
    if let Some(cfg) = user_cfg.and_then(|c| c.report.as_ref()) {
        if !env_set("MCP_INVENTORY_OUTPUT_DIR")
            && let Some(dir) = cfg.output_dir.as_ref()
        {
            out_dir = expand_home(dir);
        }
        if !env_set("MCP_INVENTORY_CSV")
            && let Some(v) = cfg.csv
        {
            options.csv = v;
        }
        if !env_set("MCP_INVENTORY_JSON")
            && let Some(v) = cfg.json
        {
            options.json = v;
        }
    }
    (out_dir, options)
}

fn render_summary(inventory: &Inventory) -> String {
    let meta = &inventory.metadata;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Discovered {} MCP server(s) on {} ({}, user {})",
        meta.total_servers, meta.hostname, meta.platform, meta.user
    );
    if inventory.servers.is_empty() {
        return out;
    }

    let count = |level: RiskLevel| {
        inventory
            .servers
            .iter()
            .filter(|s| RiskLevel::from_score(s.risk_score()) == level)
            .count()
    };
    let _ = writeln!(out, "\nRisk distribution:");
    for level in [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low] {
        let _ = writeln!(out, "  {:<6} {}", level.label(), count(level));
    }

    let high: Vec<_> = inventory
        .servers
        .iter()
        .filter(|s| RiskLevel::from_score(s.risk_score()) == RiskLevel::High)
        .collect();
    if !high.is_empty() {
        let _ = writeln!(out, "\nHigh-risk servers:");
        for s in high {
            let factors: Vec<&str> = s.risk_factors().iter().map(|f| f.tag()).collect();
            let _ = writeln!(
                out,
                "  {} ({:.2}) {} [{}]",
                s.name(),
                s.risk_score(),
                factors.join(", "),
                s.config_path().display()
            );
        }
    }

    let _ = writeln!(out, "\nAll servers:");
    for s in &inventory.servers {
        let target = s.url().filter(|_| s.command().is_empty()).unwrap_or(s.command());
        let _ = writeln!(
            out,
            "  {:<6} {:.2}  {}  {}",
            RiskLevel::from_score(s.risk_score()).label(),
            s.risk_score(),
            s.name(),
            target
        );
    }
    if !inventory.skipped.is_empty() {
        let _ = writeln!(out, "\nSkipped {} unreadable config file(s)", inventory.skipped.len());
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_flags! {
        /// Tool home directory (absolute). Defaults to $HOME/.mcp-inventory
        MCP_INVENTORY_HOME: &str = "";
    }

    let inv_home = if !(*MCP_INVENTORY_HOME).is_empty() {
        expand_home(*MCP_INVENTORY_HOME)
    } else {
        default_inventory_home()
    };

    let user_cfg = load_user_config(&inv_home);
    init_tracing(&inv_home, user_cfg.as_ref().ok().and_then(|c| c.as_ref()));
    let user_cfg = user_cfg.unwrap_or_else(|e| {
        tracing::warn!("ignoring user config: {:#}", e);
        None
    });

    let discovery = Discovery::detect();
    tracing::info!("scanning MCP client configs ({})", discovery.platform());
    let inventory = discovery.run(Utc::now()).await;

    print!("{}", render_summary(&inventory));

    let (out_dir, options) = report_settings(user_cfg.as_ref());
    let written = report::write_reports(&out_dir, &inventory, options)
        .with_context(|| format!("writing reports to {}", out_dir.display()))?;
    for path in written {
        println!("Report written: {}", path.display());
    }
    Ok(())
}
