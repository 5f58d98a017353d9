//! Trust bonus calculation record.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal places kept for APU scores.
pub const APU_SCORE_DECIMAL_PLACES: u32 = 18;

/// Decimal places kept for the trust bonus.
pub const TRUST_BONUS_DECIMAL_PLACES: u32 = 2;

/// Total digits allowed in the trust bonus (so at most 999.99).
pub const TRUST_BONUS_MAX_DIGITS: u32 = 5;

/// Stores the trust bonus calculation for one user.
///
/// At most one record exists per user; the store rejects a second insert
/// with [`StoreError::UniqueViolation`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrustScore {
    pub id: i64,

    /// The owner of the trust bonus
    pub user_id: i64,

    pub last_apu_score: Decimal,
    pub max_apu_score: Decimal,

    /// Percentage bonus derived from the APU scores
    pub trust_bonus: Decimal,

    pub last_apu_calculation_time: DateTime<Utc>,
    pub max_apu_calculation_time: DateTime<Utc>,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl TrustScore {
    /// A record ready to insert; `id` is assigned by the store.
    pub fn new(
        user_id: i64,
        last_apu_score: Decimal,
        max_apu_score: Decimal,
        trust_bonus: Decimal,
        calculated_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id,
            last_apu_score,
            max_apu_score,
            trust_bonus,
            last_apu_calculation_time: calculated_at,
            max_apu_calculation_time: calculated_at,
            created_on: now,
            modified_on: now,
        }
    }

    /// Check the decimal column shapes before writing.
    pub fn validate(&self) -> StoreResult<()> {
        for (field, value) in [
            ("last_apu_score", &self.last_apu_score),
            ("max_apu_score", &self.max_apu_score),
        ] {
            if value.scale() > APU_SCORE_DECIMAL_PLACES {
                return Err(StoreError::Invalid(format!(
                    "{} has more than {} decimal places",
                    field, APU_SCORE_DECIMAL_PLACES
                )));
            }
        }

        if self.trust_bonus.scale() > TRUST_BONUS_DECIMAL_PLACES {
            return Err(StoreError::Invalid(format!(
                "trust_bonus has more than {} decimal places",
                TRUST_BONUS_DECIMAL_PLACES
            )));
        }

        let integer_digits = TRUST_BONUS_MAX_DIGITS - TRUST_BONUS_DECIMAL_PLACES;
        let limit = Decimal::from(10_i64.pow(integer_digits));
        if self.trust_bonus.trunc().abs() >= limit {
            return Err(StoreError::Invalid(format!(
                "trust_bonus has more than {} digits",
                TRUST_BONUS_MAX_DIGITS
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn score(trust_bonus: &str) -> TrustScore {
        TrustScore::new(
            1,
            Decimal::from_str("0.5").unwrap(),
            Decimal::from_str("0.75").unwrap(),
            Decimal::from_str(trust_bonus).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(score("150.00").validate().is_ok());
        assert!(score("999.99").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_too_many_digits() {
        assert!(matches!(
            score("1000").validate(),
            Err(StoreError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_rejects_too_many_places() {
        assert!(matches!(
            score("1.234").validate(),
            Err(StoreError::Invalid(_))
        ));
    }
}
