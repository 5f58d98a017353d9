//! Breakdown value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Time-granularity bucket for gas price history.
///
/// # Example
///
/// ```
/// use gitcoin_mcp_server::domain::Breakdown;
///
/// let breakdown: Breakdown = "daily".parse().unwrap();
/// assert_eq!(breakdown.ui_label(), "day");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Breakdown {
    #[default]
    Hourly,
    Daily,
    Weekly,
}

impl Breakdown {
    /// Every breakdown, in the order offered to users.
    pub const ALL: [Breakdown; 3] = [Breakdown::Hourly, Breakdown::Daily, Breakdown::Weekly];

    /// The query-parameter spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// The unit shown next to the chart ("hour", "day", "week").
    pub fn ui_label(&self) -> &'static str {
        match self {
            Self::Hourly => "hour",
            Self::Daily => "day",
            Self::Weekly => "week",
        }
    }
}

impl FromStr for Breakdown {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(ValidationError::InvalidBreakdown(other.to_string())),
        }
    }
}

impl Serialize for Breakdown {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Breakdown {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
