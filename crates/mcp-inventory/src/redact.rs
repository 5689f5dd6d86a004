//! Masking of sensitive env values before records leave the process.

use std::collections::BTreeMap;

use crate::risk::predicates::is_sensitive_env_name;

/// Number of leading characters kept from a long secret.
pub const VISIBLE_PREFIX_CHARS: usize = 10;

/// Appended to every masked value.
pub const TRUNCATION_MARKER: &str = "...";

/// Mask one value: a fixed-length prefix plus the marker, or only the marker
/// when the value is too short to reveal any of it.
pub fn mask_value(value: &str) -> String {
    if value.chars().count() > VISIBLE_PREFIX_CHARS {
        let prefix: String = value.chars().take(VISIBLE_PREFIX_CHARS).collect();
        format!("{prefix}{TRUNCATION_MARKER}")
    } else {
        TRUNCATION_MARKER.to_string()
    }
}

/// Copy of `env` with values of sensitive keys masked; other entries pass through.
pub fn redact(env: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    env.iter()
        .map(|(k, v)| {
            let value = if is_sensitive_env_name(k) {
                mask_value(v)
            } else {
                v.clone()
            };
            (k.clone(), value)
        })
        .collect()
}
