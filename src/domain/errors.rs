//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The breakdown is not one of hourly/daily/weekly.
    InvalidBreakdown(String),

    /// The grant id is not a hexadecimal number.
    InvalidGrantId(String),

    /// The value is not among the choices allowed for the field.
    InvalidChoice { field: &'static str, value: String },

    /// The value exceeds the field's maximum length.
    TooLong { field: &'static str, max: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBreakdown(value) => write!(
                f,
                "Invalid breakdown: {} (expected hourly, daily or weekly)",
                value
            ),
            Self::InvalidGrantId(value) => write!(f, "Invalid grant id: {}", value),
            Self::InvalidChoice { field, value } => {
                write!(f, "Invalid choice for {}: {}", field, value)
            }
            Self::TooLong { field, max } => {
                write!(f, "{} must be at most {} characters", field, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
