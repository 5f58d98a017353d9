//! Per-row outcomes of an import run.

use serde::Serialize;

/// What happened to one input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Imported,
    Failed { reason: String },
}

impl RowOutcome {
    pub fn failed(reason: impl ToString) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }

    pub fn is_imported(&self) -> bool {
        matches!(self, Self::Imported)
    }
}

/// Ordered `(row, outcome)` pairs, one per input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport<R> {
    outcomes: Vec<(R, RowOutcome)>,
}

impl<R> Default for ImportReport<R> {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }
}

impl<R> ImportReport<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: R, outcome: RowOutcome) {
        self.outcomes.push((row, outcome));
    }

    pub fn outcomes(&self) -> &[(R, RowOutcome)] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<(R, RowOutcome)> {
        self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of rows written.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_imported()).count()
    }

    /// Number of rows skipped because of an error.
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Failed rows with their reasons, in input order.
    pub fn failures(&self) -> impl Iterator<Item = (&R, &str)> {
        self.outcomes.iter().filter_map(|(row, outcome)| match outcome {
            RowOutcome::Failed { reason } => Some((row, reason.as_str())),
            RowOutcome::Imported => None,
        })
    }
}
