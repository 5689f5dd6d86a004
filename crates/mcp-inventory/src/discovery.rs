//! Scan orchestration: catalog → loader → adapter → score + redact.
//!
//! Planning is sequential and cheap (stat and canonicalize only). Loading and
//! adapting runs one blocking job per planned file; every job returns its own
//! record list and results are merged once, in plan order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use walkdir::WalkDir;

use crate::adapter::{self, vscode::EXTENSION_CONFIG_FILES};
use crate::catalog::{PathCatalog, Roots};
use crate::loader;
use crate::model::{ClientKind, Platform, ScanMetadata, ServerDraft, ServerRecord};

/// One existing config file queued for loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub client: ClientKind,
    /// Canonical absolute path.
    pub path: PathBuf,
}

/// A file that exists but could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one scan.
#[derive(Debug, Clone)]
pub struct Inventory {
    pub metadata: ScanMetadata,
    pub servers: Vec<ServerRecord>,
    pub skipped: Vec<SkippedFile>,
}

enum FileOutcome {
    Absent,
    Records(Vec<ServerRecord>),
    Skipped(SkippedFile),
}

#[derive(Debug, Clone)]
pub struct Discovery {
    catalog: PathCatalog,
    platform: Platform,
}

impl Discovery {
    pub fn new(catalog: PathCatalog, platform: Platform) -> Self {
        Self { catalog, platform }
    }

    /// Discovery for the running host: detected platform and home roots.
    pub fn detect() -> Self {
        let platform = Platform::detect();
        Self::new(PathCatalog::new(Roots::detect(platform)), platform)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Existing config files to load, in catalog order. Directory candidates
    /// are expanded; a file reachable through several aliases is kept once,
    /// under the first client that lists it.
    pub fn plan(&self) -> Vec<PlannedFile> {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut out = Vec::new();
        for client in ClientKind::ALL {
            for candidate in self.catalog.locations(client, self.platform) {
                for file in expand_candidate(client, &candidate) {
                    let Ok(path) = file.canonicalize() else {
                        tracing::trace!("no config at {}", file.display());
                        continue;
                    };
                    if !path.is_file() {
                        continue;
                    }
                    if seen.insert(path.clone()) {
                        out.push(PlannedFile { client, path });
                    } else {
                        tracing::debug!("{} already planned; skipping alias", file.display());
                    }
                }
            }
        }
        out
    }

    /// Run a full scan. Never fails: absent files are ignored, undecodable
    /// ones are reported in `Inventory::skipped`.
    pub async fn run(&self, captured_at: DateTime<Utc>) -> Inventory {
        let mut metadata = ScanMetadata::capture(self.platform, captured_at);
        let plan = self.plan();
        tracing::debug!("scanning {} config files on {}", plan.len(), self.platform);

        let mut slots: Vec<Option<FileOutcome>> = plan.iter().map(|_| None).collect();
        let mut set = JoinSet::new();
        for (idx, planned) in plan.into_iter().enumerate() {
            set.spawn_blocking(move || (idx, scan_file(&planned, captured_at)));
        }
        while let Some(res) = set.join_next().await {
            match res {
                Ok((idx, outcome)) => {
                    if let Some(slot) = slots.get_mut(idx) {
                        *slot = Some(outcome);
                    }
                }
                Err(e) => tracing::warn!("scan task join error: {}", e),
            }
        }

        let mut servers = Vec::new();
        let mut skipped = Vec::new();
        let mut keys: HashSet<(PathBuf, String)> = HashSet::new();
        for outcome in slots.into_iter().flatten() {
            match outcome {
                FileOutcome::Absent => {}
                FileOutcome::Skipped(s) => skipped.push(s),
                FileOutcome::Records(records) => {
                    for rec in records {
                        if !keys.insert((rec.config_path().to_path_buf(), rec.name().to_string())) {
                            tracing::debug!("duplicate server '{}' in {}", rec.name(), rec.config_path().display());
                            continue;
                        }
                        tracing::info!(
                            "discovered server '{}' (risk {:.2}) in {}",
                            rec.name(),
                            rec.risk_score(),
                            rec.config_path().display()
                        );
                        servers.push(rec);
                    }
                }
            }
        }

        metadata.total_servers = servers.len();
        Inventory {
            metadata,
            servers,
            skipped,
        }
    }
}

/// Scan the host for `platform_tag`. An unrecognized tag degrades to
/// `Platform::Unknown`, which still covers the platform-agnostic paths.
pub async fn run(platform_tag: &str, captured_at: DateTime<Utc>) -> Inventory {
    let platform = Platform::from_tag(platform_tag).unwrap_or_else(|| {
        tracing::warn!("unrecognized platform '{}'; scanning common paths only", platform_tag);
        Platform::Unknown
    });
    Discovery::new(PathCatalog::new(Roots::detect(platform)), platform)
        .run(captured_at)
        .await
}

fn scan_file(planned: &PlannedFile, captured_at: DateTime<Utc>) -> FileOutcome {
    match loader::load(&planned.path) {
        Ok(None) => FileOutcome::Absent,
        Ok(Some(doc)) => {
            tracing::info!("found {} config: {}", planned.client, planned.path.display());
            let records = adapter::adapt(planned.client, &doc, &planned.path, captured_at)
                .into_iter()
                .map(ServerDraft::finalize)
                .collect();
            FileOutcome::Records(records)
        }
        Err(e) => {
            tracing::warn!("skipping {}", e);
            FileOutcome::Skipped(SkippedFile {
                path: e.path().to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}

/// Files behind one catalog candidate. Plain paths pass through; directories
/// expand only for clients that keep configs in a directory tree.
fn expand_candidate(client: ClientKind, candidate: &Path) -> Vec<PathBuf> {
    if !candidate.is_dir() {
        return vec![candidate.to_path_buf()];
    }
    match client {
        ClientKind::VsCodeExtensions => extension_configs(candidate),
        ClientKind::Custom => json_files_under(candidate),
        _ => {
            tracing::debug!("{} is a directory; skipping", candidate.display());
            Vec::new()
        }
    }
}

fn extension_configs(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", dir.display(), e);
            return Vec::new();
        }
    };
    let mut ext_dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    ext_dirs.sort();
    ext_dirs
        .iter()
        .flat_map(|d| EXTENSION_CONFIG_FILES.iter().map(move |f| d.join(f)))
        .filter(|p| p.is_file())
        .collect()
}

fn json_files_under(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::warn!("walk error under {}: {}", dir.display(), err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|x| x.to_str())
                .is_some_and(|x| x.eq_ignore_ascii_case("json"))
        })
        .collect()
}
