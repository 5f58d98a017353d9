//! Platform records the town square and import jobs hang off of.

use crate::domain::Network;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A login account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// A public Gitcoin profile, addressed by its handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: i64,
    pub handle: String,
    pub user_id: Option<i64>,
    pub created_on: DateTime<Utc>,
}

/// An activity feed item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: i64,
    pub profile_id: i64,
    pub url: String,

    /// Free-form metadata attached by whatever produced the activity
    pub metadata: serde_json::Value,
    pub created_on: DateTime<Utc>,
}

impl Activity {
    /// Whether comments on this item accept tips.
    pub fn tip_able(&self) -> bool {
        self.metadata
            .get("tip_able")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// A tip payment, optionally attached to a comment through `comments_priv`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tip {
    pub id: i64,
    pub comments_priv: String,
    pub network: Network,
    pub value_in_eth: f64,
    pub created_on: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn activity(metadata: serde_json::Value) -> Activity {
        Activity {
            id: 1,
            profile_id: 1,
            url: "/activity/1".to_string(),
            metadata,
            created_on: Utc::now(),
        }
    }

    #[test]
    fn test_tip_able_reads_metadata() {
        assert!(activity(json!({"tip_able": true})).tip_able());
        assert!(!activity(json!({"tip_able": false})).tip_able());
    }

    #[test]
    fn test_tip_able_defaults_false() {
        assert!(!activity(json!({})).tip_able());
        assert!(!activity(json!({"tip_able": "yes"})).tip_able());
    }
}
