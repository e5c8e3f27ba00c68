use chrono::{DateTime, Utc};
use tracing::info;

use crate::db::ProposalRepository;
use crate::error::ProposalError;
use crate::models::{LifecycleState, Proposal};

/// Soft-delete transitions of submitted proposals.
///
/// ```text
/// Active ──recycle──▶ Recycled ──permanently_delete──▶ PermanentlyDeleted
///    ▲                   │
///    └─────restore───────┘
/// ```
///
/// A proposal can only be permanently deleted from the recycle bin. Every
/// transition names its source state to the repository, so a call against a
/// missing id or an id in the wrong state fails with
/// [`ProposalError::NotFound`] without touching anything.
pub struct RecycleBin<'a> {
    repo: &'a dyn ProposalRepository,
}

impl<'a> RecycleBin<'a> {
    pub fn new(repo: &'a dyn ProposalRepository) -> Self {
        Self { repo }
    }

    /// Moves an active proposal to the recycle bin, stamped with the current time.
    pub async fn recycle(
        &self,
        id: i64,
    ) -> Result<Proposal, ProposalError> {
        self.recycle_at(id, Utc::now()).await
    }

    /// Moves an active proposal to the recycle bin, stamped with `at`.
    pub async fn recycle_at(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<Proposal, ProposalError> {
        let proposal = self
            .repo
            .transition_state(id, LifecycleState::Active, LifecycleState::Recycled, Some(at))
            .await
            .map_err(|e| ProposalError::from_repository(id, e))?;

        info!(id, deleted_at = %at, "proposal recycled");
        Ok(proposal)
    }

    /// Returns a recycled proposal to the active list.
    pub async fn restore(
        &self,
        id: i64,
    ) -> Result<Proposal, ProposalError> {
        let proposal = self
            .repo
            .transition_state(id, LifecycleState::Recycled, LifecycleState::Active, None)
            .await
            .map_err(|e| ProposalError::from_repository(id, e))?;

        info!(id, "proposal restored");
        Ok(proposal)
    }

    /// Removes a recycled proposal for good and returns its last state.
    pub async fn permanently_delete(
        &self,
        id: i64,
    ) -> Result<Proposal, ProposalError> {
        let mut proposal = self
            .repo
            .delete_proposal(id, LifecycleState::Recycled)
            .await
            .map_err(|e| ProposalError::from_repository(id, e))?;
        proposal.state = LifecycleState::PermanentlyDeleted;

        info!(id, "proposal permanently deleted");
        Ok(proposal)
    }

    /// Contents of the recycle bin, oldest first.
    pub async fn list(&self) -> Result<Vec<Proposal>, ProposalError> {
        self.repo
            .list_proposals(LifecycleState::Recycled)
            .await
            .map_err(ProposalError::Repository)
    }
}
