//! GrantId value object.

use super::errors::ValidationError;
use std::fmt;

/// A grant primary key decoded from the subgraph's hexadecimal entity id.
///
/// # Example
///
/// ```
/// use gitcoin_mcp_server::domain::GrantId;
///
/// let id = GrantId::from_hex("0x1a").unwrap();
/// assert_eq!(id.value(), 26);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrantId(i64);

impl GrantId {
    /// Wrap an already-decoded primary key.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Decode a hexadecimal id, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidGrantId` for empty, non-hex or
    /// out-of-range input.
    pub fn from_hex(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(ValidationError::InvalidGrantId(raw.to_string()));
        }

        i64::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| ValidationError::InvalidGrantId(raw.to_string()))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
