use tracing::{info, warn};

use super::fields::build_content;
use super::recycle_bin::RecycleBin;
use crate::db::ProposalRepository;
use crate::error::ProposalError;
use crate::models::{LifecycleState, Proposal, ProposalContent, ProposalDraft};

/// Entry point for submitting and managing proposals against one repository.
pub struct ProposalService<'a> {
    repo: &'a dyn ProposalRepository,
}

impl<'a> ProposalService<'a> {
    pub fn new(repo: &'a dyn ProposalRepository) -> Self {
        Self { repo }
    }

    /// Computes what `draft` would freeze into a proposal without persisting it.
    pub fn preview(
        &self,
        draft: &ProposalDraft,
    ) -> Result<ProposalContent, ProposalError> {
        build_content(draft)
    }

    /// Validates `draft` and persists it.
    ///
    /// A draft without an id creates a new active proposal; a draft opened
    /// with [`ProposalDraft::editing`] replaces that proposal's content in
    /// place. Nothing is written when validation fails.
    pub async fn submit(
        &self,
        draft: &ProposalDraft,
    ) -> Result<Proposal, ProposalError> {
        let content = match build_content(draft) {
            Ok(content) => content,
            Err(err) => {
                warn!(error = %err, "proposal rejected");
                return Err(err);
            }
        };

        let proposal = match draft.id {
            None => self
                .repo
                .create_proposal(content)
                .await
                .map_err(ProposalError::Repository)?,
            Some(id) => self
                .repo
                .replace_proposal(id, &content)
                .await
                .map_err(|e| ProposalError::from_repository(id, e))?,
        };

        info!(
            id = proposal.id,
            replaced = draft.id.is_some(),
            total = %proposal.content.totals.total,
            "proposal submitted"
        );
        Ok(proposal)
    }

    pub async fn get(
        &self,
        id: i64,
    ) -> Result<Proposal, ProposalError> {
        self.repo
            .get_proposal(id)
            .await
            .map_err(|e| ProposalError::from_repository(id, e))
    }

    /// Active proposals, oldest first.
    pub async fn list_active(&self) -> Result<Vec<Proposal>, ProposalError> {
        self.repo
            .list_proposals(LifecycleState::Active)
            .await
            .map_err(ProposalError::Repository)
    }

    pub async fn list_recycled(&self) -> Result<Vec<Proposal>, ProposalError> {
        self.recycle_bin().list().await
    }

    pub async fn recycle(
        &self,
        id: i64,
    ) -> Result<Proposal, ProposalError> {
        self.recycle_bin().recycle(id).await
    }

    pub async fn restore(
        &self,
        id: i64,
    ) -> Result<Proposal, ProposalError> {
        self.recycle_bin().restore(id).await
    }

    pub async fn permanently_delete(
        &self,
        id: i64,
    ) -> Result<Proposal, ProposalError> {
        self.recycle_bin().permanently_delete(id).await
    }

    fn recycle_bin(&self) -> RecycleBin<'a> {
        RecycleBin::new(self.repo)
    }
}
