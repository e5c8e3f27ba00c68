use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repository::{ProposalRepository, RepositoryError};

/// Where proposals are stored.
///
/// | backend  | connection_string                                   |
/// |----------|-----------------------------------------------------|
/// | `memory` | ignored; every repository starts empty              |
/// | `sqlite` | file path (`proposals.db`), `:memory:` or `sqlite:` URL |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    /// A throwaway in-memory store, as used by tests and dry runs.
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens a [`ProposalRepository`] for one backend.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Name matched against [`DbConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Returns a repository whose schema is ready for proposals.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn ProposalRepository>, RepositoryError>;
}

/// Picks the proposal store named by a [`DbConfig`].
///
/// The core registers nothing itself; the binary registers the memory and
/// sqlite factories it links.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`, replacing any factory with the same backend name.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the proposal store for `config.backend`.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Configuration`] naming the registered backends when
    /// none matches; otherwise whatever the factory returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn ProposalRepository>, RepositoryError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}
