//! Initial token distribution claims.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The amount of tokens a profile may claim from the initial distribution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialTokenDistribution {
    pub id: i64,
    pub profile_id: i64,

    /// Claimable amount in wei
    pub claim_total: Decimal,
    pub created_on: DateTime<Utc>,
}
