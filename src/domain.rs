use serde::Deserialize;

pub mod classifier;
pub mod removal;

pub use classifier::{classify, ClassificationSignals, Signal};
pub use removal::RemovalEngine;

/// A follower as returned by the platform's v1.1 user object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FollowerProfile {
    pub id: u64,
    pub screen_name: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub friends_count: u64,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub statuses_count: u64,
    /// Platform timestamp, e.g. `Wed Oct 10 20:19:24 +0000 2018`
    pub created_at: String,
}

/// `GET /1.1/followers/list.json`
#[derive(Debug, Clone, Deserialize)]
pub struct FollowerPage {
    pub users: Vec<FollowerProfile>,
}

/// `GET /1.1/friends/ids.json`
#[derive(Debug, Clone, Deserialize)]
pub struct FriendIdPage {
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Remove,
}

impl Decision {
    pub fn from_remove(remove: bool) -> Self {
        if remove {
            Decision::Remove
        } else {
            Decision::Keep
        }
    }

    pub fn is_remove(self) -> bool {
        self == Decision::Remove
    }
}

/// Statistics about one review session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewStatistics {
    /// Followers in the fetched page
    pub fetched: usize,
    /// Followers skipped because the user follows them back
    pub mutuals_skipped: usize,
    /// Followers presented for a decision
    pub reviewed: usize,
    pub kept: usize,
    pub removed: usize,
}
