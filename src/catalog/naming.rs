//! Artifact naming: the grammar grouping dump files into backup sets.
//!
//! Every artifact is named `<prefix>-<timestamp>-<entity>.gz`, where the
//! timestamp is a run of exactly ten decimal digits bounded by hyphens.
//! The token is opaque: it identifies one point-in-time backup and is only
//! ever compared for equality.

use chrono::Utc;

/// Length of the timestamp run inside an artifact name.
pub const TIMESTAMP_LEN: usize = 10;

/// The "now" token, sourced from the system clock.
pub fn current_timestamp() -> String {
    Utc::now().timestamp().to_string()
}

/// Canonical artifact name for one serialized entity.
pub fn artifact_name(prefix: &str, timestamp: &str, entity: &str) -> String {
    format!("{}-{}-{}.gz", prefix, timestamp, entity)
}

/// Extract the grouping timestamp from an artifact name.
///
/// Returns the first hyphen-bounded run of exactly ten decimal digits, or
/// `None` for names that do not conform to the grammar.
pub fn extract_timestamp(name: &str) -> Option<String> {
    let parts: Vec<&str> = name.split('-').collect();
    if parts.len() < 3 {
        return None;
    }
    parts[1..parts.len() - 1]
        .iter()
        .find(|part| part.len() == TIMESTAMP_LEN && part.bytes().all(|b| b.is_ascii_digit()))
        .map(|part| (*part).to_string())
}
