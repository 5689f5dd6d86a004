//! Heuristic risk scoring for discovered servers.
//!
//! The score is a sum of fixed weights over independent binary indicators,
//! clamped to `[0.0, 1.0]`. Weights are kept in whole hundredths so sums are
//! exact and two runs over the same record agree bit for bit.

pub mod predicates;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::ServerDraft;

/// Named indicator contributing a fixed weight to a record's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskFactor {
    CustomBinary,
    SensitiveEnvVars,
    FilesystemAccess,
    DatabaseAccess,
    ExternalUrl,
    ScriptExecution,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 6] = [
        RiskFactor::CustomBinary,
        RiskFactor::SensitiveEnvVars,
        RiskFactor::FilesystemAccess,
        RiskFactor::DatabaseAccess,
        RiskFactor::ExternalUrl,
        RiskFactor::ScriptExecution,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            RiskFactor::CustomBinary => "CUSTOM_BINARY",
            RiskFactor::SensitiveEnvVars => "SENSITIVE_ENV_VARS",
            RiskFactor::FilesystemAccess => "FILESYSTEM_ACCESS",
            RiskFactor::DatabaseAccess => "DATABASE_ACCESS",
            RiskFactor::ExternalUrl => "EXTERNAL_URL",
            RiskFactor::ScriptExecution => "SCRIPT_EXECUTION",
        }
    }

    /// Weight in hundredths of a point.
    pub fn weight_points(self) -> u32 {
        match self {
            RiskFactor::CustomBinary => 30,
            RiskFactor::SensitiveEnvVars => 25,
            RiskFactor::FilesystemAccess => 20,
            RiskFactor::DatabaseAccess => 15,
            RiskFactor::ExternalUrl => 10,
            RiskFactor::ScriptExecution => 5,
        }
    }

    pub fn weight(self) -> f64 {
        f64::from(self.weight_points()) / 100.0
    }

    /// Whether this indicator's condition holds for `record`.
    pub fn fires(self, record: &ServerDraft) -> bool {
        match self {
            RiskFactor::CustomBinary => predicates::is_direct_executable_path(&record.command),
            RiskFactor::SensitiveEnvVars => {
                record.env.keys().any(|k| predicates::is_sensitive_env_name(k))
            }
            RiskFactor::FilesystemAccess => {
                predicates::grants_filesystem_access(&record.command, &record.args)
            }
            RiskFactor::DatabaseAccess => predicates::references_database(
                &record.command,
                &record.args,
                record.url.as_deref(),
            ),
            RiskFactor::ExternalUrl => record.url.as_deref().is_some_and(|u| !u.trim().is_empty()),
            RiskFactor::ScriptExecution => predicates::invokes_script_interpreter(&record.command),
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for RiskFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Score plus the indicators that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub factors: BTreeSet<RiskFactor>,
}

/// Pure scoring over a record's fields.
pub struct RiskEngine;

impl RiskEngine {
    pub fn score(record: &ServerDraft) -> RiskAssessment {
        let factors: BTreeSet<RiskFactor> = RiskFactor::ALL
            .into_iter()
            .filter(|f| f.fires(record))
            .collect();
        let points: u32 = factors.iter().map(|f| f.weight_points()).sum();
        // Clamp, don't normalize: normalizing would reorder records with different factor counts.
        RiskAssessment {
            score: f64::from(points.min(100)) / 100.0,
            factors,
        }
    }
}

/// Coarse bucket applied by consumers of the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.5 {
            RiskLevel::High
        } else if score >= 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}
