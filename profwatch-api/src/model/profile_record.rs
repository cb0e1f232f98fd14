use serde::Deserialize;
use serde::Serialize;

/// Account attributes reported by the detection backend.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub username: String,
    pub followers_count: u64,
    pub following_count: u64,
    pub subscriptions_count: u64,
    pub is_verified: bool,
    pub status: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectRequest {
    pub username: String,
}

impl DetectRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}
