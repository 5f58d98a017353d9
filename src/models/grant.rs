//! Grant record, as far as the conviction-voting import touches it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata key the conviction-voting import writes to.
pub const CONVICTION_METADATA_KEY: &str = "cv";

/// A funding grant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grant {
    pub id: i64,
    pub title: String,

    /// Free-form JSON object of derived values
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub modified_on: DateTime<Utc>,
}

impl Grant {
    /// Conviction voting total last imported for this grant, if any.
    pub fn conviction(&self) -> Option<f64> {
        self.metadata
            .get(CONVICTION_METADATA_KEY)
            .and_then(|v| v.as_f64())
    }

    pub fn set_conviction(&mut self, amount: f64) {
        self.metadata
            .insert(CONVICTION_METADATA_KEY.to_string(), serde_json::json!(amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_conviction_keeps_other_metadata() {
        let mut grant = Grant {
            id: 1,
            title: "Gas Tools".to_string(),
            metadata: serde_json::Map::new(),
            modified_on: Utc::now(),
        };
        grant
            .metadata
            .insert("related".to_string(), serde_json::json!([2, 3]));

        assert_eq!(grant.conviction(), None);
        grant.set_conviction(1.5);

        assert_eq!(grant.conviction(), Some(1.5));
        assert!(grant.metadata.contains_key("related"));
    }
}
