//! In-memory deployment repository for tests and embedded use.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::deployment::{
    domain::{Deployment, DeploymentId, Package, PackageId},
    ports::{DeploymentRepository, DeploymentRepositoryError, DeploymentRepositoryResult},
};
use crate::inventory::domain::ProjectId;

/// Thread-safe in-memory deployment repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeploymentRepository {
    state: Arc<RwLock<InMemoryDeploymentState>>,
}

#[derive(Debug, Default)]
struct InMemoryDeploymentState {
    packages: HashMap<PackageId, Package>,
    deployments: HashMap<DeploymentId, Deployment>,
}

impl InMemoryDeploymentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> DeploymentRepositoryError {
    DeploymentRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DeploymentRepository for InMemoryDeploymentRepository {
    async fn store_package(&self, package: &Package) -> DeploymentRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.packages.insert(package.id(), package.clone());
        Ok(())
    }

    async fn find_packages(&self, ids: &BTreeSet<PackageId>) -> DeploymentRepositoryResult<Vec<Package>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.packages.get(id).cloned())
            .collect())
    }

    async fn list_packages(&self, project: Option<ProjectId>) -> DeploymentRepositoryResult<Vec<Package>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut packages: Vec<Package> = state
            .packages
            .values()
            .filter(|package| project.is_none_or(|wanted| package.project() == wanted))
            .cloned()
            .collect();
        packages.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(packages)
    }

    async fn save(&self, deployment: &Deployment) -> DeploymentRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let name_taken = state.deployments.values().any(|stored| {
            stored.id() != deployment.id()
                && stored.project() == deployment.project()
                && stored.name() == deployment.name()
        });
        if name_taken {
            return Err(DeploymentRepositoryError::DuplicateName(
                deployment.name().to_owned(),
            ));
        }
        state.deployments.insert(deployment.id(), deployment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: DeploymentId) -> DeploymentRepositoryResult<Option<Deployment>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.deployments.get(&id).cloned())
    }

    async fn list(&self, project: Option<ProjectId>) -> DeploymentRepositoryResult<Vec<Deployment>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut deployments: Vec<Deployment> = state
            .deployments
            .values()
            .filter(|stored| project.is_none_or(|wanted| stored.project() == wanted))
            .cloned()
            .collect();
        deployments.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(deployments)
    }
}
