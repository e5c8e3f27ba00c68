use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::factory::{DbConfig, RepositoryFactory};
use super::repository::{ProposalRepository, RepositoryError};
use crate::models::{LifecycleState, Proposal, ProposalContent};

#[derive(Default)]
struct Store {
    next_id: i64,
    proposals: BTreeMap<i64, Proposal>,
}

/// Process-local [`ProposalRepository`]; contents are lost on drop.
#[derive(Default)]
pub struct InMemoryRepository {
    store: RwLock<Store>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProposalRepository for InMemoryRepository {
    async fn create_proposal(
        &self,
        content: ProposalContent,
    ) -> Result<Proposal, RepositoryError> {
        let mut store = self.store.write().await;
        store.next_id += 1;
        let now = Utc::now();
        let proposal = Proposal {
            id: store.next_id,
            content,
            state: LifecycleState::Active,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        store.proposals.insert(proposal.id, proposal.clone());
        Ok(proposal)
    }

    async fn replace_proposal(
        &self,
        id: i64,
        content: &ProposalContent,
    ) -> Result<Proposal, RepositoryError> {
        let mut store = self.store.write().await;
        let proposal = store
            .proposals
            .get_mut(&id)
            .filter(|p| p.state == LifecycleState::Active)
            .ok_or(RepositoryError::NotFound)?;
        proposal.content = content.clone();
        proposal.updated_at = Utc::now();
        Ok(proposal.clone())
    }

    async fn get_proposal(
        &self,
        id: i64,
    ) -> Result<Proposal, RepositoryError> {
        self.store
            .read()
            .await
            .proposals
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_proposals(
        &self,
        state: LifecycleState,
    ) -> Result<Vec<Proposal>, RepositoryError> {
        Ok(self
            .store
            .read()
            .await
            .proposals
            .values()
            .filter(|p| p.state == state)
            .cloned()
            .collect())
    }

    async fn transition_state(
        &self,
        id: i64,
        from: LifecycleState,
        to: LifecycleState,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<Proposal, RepositoryError> {
        let mut store = self.store.write().await;
        let proposal = store
            .proposals
            .get_mut(&id)
            .filter(|p| p.state == from)
            .ok_or(RepositoryError::NotFound)?;
        proposal.state = to;
        proposal.deleted_at = deleted_at;
        proposal.updated_at = Utc::now();
        Ok(proposal.clone())
    }

    async fn delete_proposal(
        &self,
        id: i64,
        state: LifecycleState,
    ) -> Result<Proposal, RepositoryError> {
        let mut store = self.store.write().await;
        let in_state = store.proposals.get(&id).is_some_and(|p| p.state == state);
        if !in_state {
            return Err(RepositoryError::NotFound);
        }
        store.proposals.remove(&id).ok_or(RepositoryError::NotFound)
    }
}

/// [`RepositoryFactory`] for the `"memory"` backend.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &DbConfig,
    ) -> Result<Box<dyn ProposalRepository>, RepositoryError> {
        Ok(Box::new(InMemoryRepository::new()))
    }
}
