use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::{LedgerError, NumberWordsError, ProjectionError};
use crate::db::RepositoryError;

/// Required fields that were absent or unreadable on submit.
#[derive(Debug, Clone, Default, Error, PartialEq, Eq)]
#[error("{}", self.describe())]
pub struct ValidationError {
    /// Required fields that were missing or empty, in canonical order.
    pub missing_fields: Vec<String>,
    /// Required numeric fields whose value could not be read.
    pub malformed_fields: Vec<String>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.missing_fields.is_empty() && self.malformed_fields.is_empty()
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.missing_fields.is_empty() {
            parts.push(format!("missing required fields: {}", self.missing_fields.join(", ")));
        }
        if !self.malformed_fields.is_empty() {
            parts.push(format!("malformed fields: {}", self.malformed_fields.join(", ")));
        }
        parts.join("; ")
    }
}

/// Errors surfaced by proposal operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProposalError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid projection input: {0}")]
    InvalidProjectionInput(String),

    #[error("amount must not be negative: {0}")]
    InvalidAmount(Decimal),

    #[error("line item index {index} out of range (ledger has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A quotation amount outside the `Decimal` range.
    #[error("quotation amount overflows")]
    AmountOverflow,

    /// No proposal with this id in the state the operation needs.
    #[error("proposal {0} not found")]
    NotFound(i64),

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl ProposalError {
    /// Maps a repository failure for proposal `id`, turning a missing row
    /// into [`ProposalError::NotFound`].
    pub fn from_repository(
        id: i64,
        err: RepositoryError,
    ) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<LedgerError> for ProposalError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::IndexOutOfRange { index, len } => Self::IndexOutOfRange { index, len },
            LedgerError::InvalidAmount(amount) => Self::InvalidAmount(amount),
            LedgerError::Overflow => Self::AmountOverflow,
            LedgerError::Words(words) => words.into(),
        }
    }
}

impl From<NumberWordsError> for ProposalError {
    fn from(err: NumberWordsError) -> Self {
        match err {
            NumberWordsError::InvalidAmount(amount) => Self::InvalidAmount(amount),
        }
    }
}

impl From<ProjectionError> for ProposalError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::InvalidInput(msg) => Self::InvalidProjectionInput(msg),
        }
    }
}
