use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

/// How a raw comma-separated profile list is cleaned up before sending.
///
/// Both switches are off by default, which sends every piece exactly as
/// typed (trimmed), empty strings and repeats included.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPolicy {
    pub dedup: bool,
    pub skip_empty: bool,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorRequest {
    pub profiles: Vec<String>,
}

impl MonitorRequest {
    /// Splits `raw` on commas and trims each piece, keeping input order.
    pub fn from_input(raw: &str, policy: ListPolicy) -> Self {
        let mut seen = HashSet::new();
        let profiles = raw
            .split(',')
            .map(str::trim)
            .filter(|p| !(policy.skip_empty && p.is_empty()))
            .filter(|p| !policy.dedup || seen.insert(*p))
            .map(String::from)
            .collect();
        Self { profiles }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}
