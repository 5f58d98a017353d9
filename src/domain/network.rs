//! Payment network selector.

use crate::domain::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The Ethereum network tips are recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Rinkeby,
}

impl Network {
    /// Development deployments transact on rinkeby.
    pub fn for_debug(debug: bool) -> Self {
        if debug {
            Self::Rinkeby
        } else {
            Self::Mainnet
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Rinkeby => "rinkeby",
        }
    }
}

impl FromStr for Network {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "rinkeby" => Ok(Self::Rinkeby),
            other => Err(ValidationError::InvalidChoice {
                field: "network",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
