use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{LifecycleState, Proposal, ProposalContent};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage for submitted proposals.
///
/// Every write is atomic per proposal. The state-changing calls take the
/// state the row is expected to be in and must check and write in one step,
/// answering [`RepositoryError::NotFound`] when the id is absent or in a
/// different state.
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    /// Stores a new, active proposal and returns it with its assigned id.
    async fn create_proposal(
        &self,
        content: ProposalContent,
    ) -> Result<Proposal, RepositoryError>;

    /// Replaces the content of an active proposal wholesale.
    async fn replace_proposal(
        &self,
        id: i64,
        content: &ProposalContent,
    ) -> Result<Proposal, RepositoryError>;

    async fn get_proposal(&self, id: i64) -> Result<Proposal, RepositoryError>;

    /// Proposals in `state`, oldest first.
    async fn list_proposals(
        &self,
        state: LifecycleState,
    ) -> Result<Vec<Proposal>, RepositoryError>;

    /// Moves proposal `id` from `from` to `to`, recording `deleted_at`.
    async fn transition_state(
        &self,
        id: i64,
        from: LifecycleState,
        to: LifecycleState,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<Proposal, RepositoryError>;

    /// Removes proposal `id` if it is currently in `state`.
    async fn delete_proposal(
        &self,
        id: i64,
        state: LifecycleState,
    ) -> Result<Proposal, RepositoryError>;
}
