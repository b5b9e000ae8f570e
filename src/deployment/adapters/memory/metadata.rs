//! In-memory metadata builder recording published manifests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::deployment::{
    domain::{Deployment, Package, RepositoryManifest, RequestContext},
    ports::{MetadataError, RepositoryMetadataBuilder},
};
use crate::inventory::domain::ProjectId;

/// Metadata builder keeping the latest manifest per deployment name.
///
/// Failures can be injected with [`InMemoryMetadataBuilder::fail_next`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadataBuilder {
    state: Arc<RwLock<InMemoryMetadataState>>,
}

#[derive(Debug, Default)]
struct InMemoryMetadataState {
    published: BTreeMap<(ProjectId, String), RepositoryManifest>,
    create_calls: usize,
    remove_calls: usize,
    pending_failures: usize,
}

impl InMemoryMetadataBuilder {
    /// Creates a builder with nothing published.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` calls fail with
    /// [`MetadataError::Unavailable`].
    pub fn fail_next(&self, count: usize) {
        if let Ok(mut state) = self.state.write() {
            state.pending_failures = count;
        }
    }

    /// Returns the manifest published under `name` for `project`.
    #[must_use]
    pub fn published(&self, project: ProjectId, name: &str) -> Option<RepositoryManifest> {
        self.state
            .read()
            .ok()
            .and_then(|state| state.published.get(&(project, name.to_owned())).cloned())
    }

    /// Returns the number of published manifests.
    #[must_use]
    pub fn published_count(&self) -> usize {
        self.state.read().map_or(0, |state| state.published.len())
    }

    /// Returns the number of create calls, including failed ones.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.state.read().map_or(0, |state| state.create_calls)
    }

    /// Returns the number of remove calls, including failed ones.
    #[must_use]
    pub fn remove_calls(&self) -> usize {
        self.state.read().map_or(0, |state| state.remove_calls)
    }
}

fn lock_error(err: impl ToString) -> MetadataError {
    MetadataError::Unavailable(err.to_string())
}

fn take_failure(state: &mut InMemoryMetadataState) -> Result<(), MetadataError> {
    if state.pending_failures == 0 {
        return Ok(());
    }
    state.pending_failures -= 1;
    Err(MetadataError::Unavailable("injected failure".to_owned()))
}

#[async_trait]
impl RepositoryMetadataBuilder for InMemoryMetadataBuilder {
    async fn create_repository_metadata(
        &self,
        deployment: &Deployment,
        packages: &[Package],
        _context: &RequestContext,
    ) -> Result<RepositoryManifest, MetadataError> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.create_calls += 1;
        take_failure(&mut state)?;
        let manifest = RepositoryManifest::build(deployment, packages);
        state.published.insert(
            (deployment.project(), deployment.name().to_owned()),
            manifest.clone(),
        );
        Ok(manifest)
    }

    async fn remove_repository_metadata(
        &self,
        _context: &RequestContext,
        deployment: &Deployment,
        old_name: &str,
    ) -> Result<(), MetadataError> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.remove_calls += 1;
        take_failure(&mut state)?;
        state
            .published
            .remove(&(deployment.project(), old_name.to_owned()));
        Ok(())
    }
}
