//! Config file loading.
//!
//! A missing or unreadable file is `Ok(None)`: most candidate paths do not
//! exist on any given machine. A file that exists but does not decode is a
//! `ParseError`, which callers record and skip. Decoding is all-or-nothing.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A config file that exists but could not be decoded.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },
}

impl ParseError {
    pub fn path(&self) -> &Path {
        match self {
            ParseError::Json { path, .. }
            | ParseError::Toml { path, .. }
            | ParseError::Yaml { path, .. }
            | ParseError::Encoding { path } => path,
        }
    }
}

/// On-disk encoding of a config document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());
        match ext.as_deref() {
            Some("toml") => DocumentFormat::Toml,
            Some("yaml" | "yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Load and decode `path` into a JSON document.
pub fn load(path: &Path) -> Result<Option<JsonValue>, ParseError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::trace!("no readable config at {}: {}", path.display(), e);
            return Ok(None);
        }
    };
    decode(path, &bytes).map(Some)
}

/// Decode raw file contents according to the path's format.
pub fn decode(path: &Path, bytes: &[u8]) -> Result<JsonValue, ParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let format = DocumentFormat::from_path(path);
    if format == DocumentFormat::Json {
        return serde_json::from_slice(bytes).map_err(|source| ParseError::Json {
            path: path.to_path_buf(),
            source,
        });
    }
    let text = std::str::from_utf8(bytes).map_err(|_| ParseError::Encoding {
        path: path.to_path_buf(),
    })?;
    match format {
        DocumentFormat::Toml => toml::from_str(text).map_err(|source| ParseError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        _ => serde_yaml::from_str(text).map_err(|source| ParseError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
    }
}
