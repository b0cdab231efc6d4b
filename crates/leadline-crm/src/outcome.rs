use crate::error::CrmError;
use tracing::error;

/// Result of an optional workflow stage. Failures are recorded, never raised.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestEffort<T> {
    Applied(T),
    Skipped,
    Failed(String),
}

impl<T> BestEffort<T> {
    pub fn attempt(stage: &'static str, result: Result<T, CrmError>) -> Self {
        match result {
            Ok(value) => BestEffort::Applied(value),
            Err(err) => {
                error!(stage, error = %err, "optional stage failed, continuing");
                BestEffort::Failed(err.to_string())
            }
        }
    }

    pub fn applied(&self) -> Option<&T> {
        match self {
            BestEffort::Applied(value) => Some(value),
            BestEffort::Skipped | BestEffort::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BestEffort::Failed(_))
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            BestEffort::Applied(_) => "applied",
            BestEffort::Skipped => "skipped",
            BestEffort::Failed(_) => "failed",
        }
    }
}
