//! One-off import jobs.
//!
//! Each job processes its input row by row. A failing row is logged and
//! recorded in the run's [`ImportReport`]; only problems with the input as a
//! whole abort the run.

pub mod conviction_voting;
pub mod report;
pub mod token_distribution;

pub use report::{ImportReport, RowOutcome};
pub use token_distribution::{DistributionRow, ResetMode};
