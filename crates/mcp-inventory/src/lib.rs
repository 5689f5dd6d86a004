//! Inventory of locally configured MCP servers with heuristic risk scoring.
//!
//! Pipeline: [`catalog`] candidate paths → [`loader`] documents →
//! [`adapter`] canonical records → [`risk`] scoring and [`redact`] masking,
//! composed by [`discovery`]. [`report`] writes the CSV/JSON outputs.

pub mod adapter;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod loader;
pub mod model;
pub mod redact;
pub mod report;
pub mod risk;
