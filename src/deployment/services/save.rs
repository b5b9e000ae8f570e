//! Deployment save, matching, and metadata orchestration.

use super::{DeploymentSaveOutcome, MetadataStatus, SaveDeploymentRequest};
use crate::config::EngineConfig;
use crate::deployment::{
    domain::{Deployment, DeploymentId, Package, RequestContext, matches},
    ports::{DeploymentRepository, DeploymentRepositoryError, RepositoryMetadataBuilder},
};
use crate::event::{domain::EventRecord, ports::EventRepository};
use crate::inventory::{
    domain::{Computer, ComputerId},
    ports::{InventoryRepository, InventoryRepositoryError},
    services::{AttributeStoreService, InventoryServiceError},
};
use crate::scope::{
    domain::{Domain, DomainId, ScopeSnapshot, UserProfile},
    ports::{ScopeRepository, ScopeRepositoryError},
};
use crate::validation::{ValidationError, ValidationErrors};
use minijinja::{Environment, context};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for deployment operations.
#[derive(Debug, Error)]
pub enum DeploymentServiceError {
    /// Input validation failed; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Deployment repository operation failed.
    #[error(transparent)]
    Repository(#[from] DeploymentRepositoryError),
    /// Inventory repository operation failed.
    #[error(transparent)]
    Inventory(#[from] InventoryRepositoryError),
    /// Attribute validation failed to run.
    #[error(transparent)]
    AttributeStore(#[from] InventoryServiceError),
    /// Scope repository operation failed.
    #[error(transparent)]
    Scope(#[from] ScopeRepositoryError),
    /// The deployment does not exist.
    #[error("deployment not found: {0}")]
    NotFound(DeploymentId),
}

/// Result type for deployment service operations.
pub type DeploymentServiceResult<T> = Result<T, DeploymentServiceError>;

/// Deployment orchestration service.
#[derive(Clone)]
pub struct DeploymentService<D, I, S, M, E, C>
where
    D: DeploymentRepository,
    I: InventoryRepository,
    S: ScopeRepository,
    M: RepositoryMetadataBuilder,
    E: EventRepository,
    C: Clock + Send + Sync,
{
    deployments: Arc<D>,
    inventory: Arc<I>,
    scopes: Arc<S>,
    metadata: Arc<M>,
    events: Arc<E>,
    clock: Arc<C>,
    config: EngineConfig,
}

impl<D, I, S, M, E, C> DeploymentService<D, I, S, M, E, C>
where
    D: DeploymentRepository,
    I: InventoryRepository,
    S: ScopeRepository,
    M: RepositoryMetadataBuilder,
    E: EventRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new deployment service.
    #[must_use]
    pub const fn new(
        deployments: Arc<D>,
        inventory: Arc<I>,
        scopes: Arc<S>,
        metadata: Arc<M>,
        events: Arc<E>,
        clock: Arc<C>,
        config: EngineConfig,
    ) -> Self {
        Self {
            deployments,
            inventory,
            scopes,
            metadata,
            events,
            clock,
            config,
        }
    }

    /// Stores a new package.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentServiceError::Repository`] on persistence
    /// failures.
    pub async fn register_package(&self, package: Package) -> DeploymentServiceResult<Package> {
        self.deployments.store_package(&package).await?;
        Ok(package)
    }

    /// Finds a deployment by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentServiceError::NotFound`] for an unknown
    /// deployment.
    pub async fn find(&self, id: DeploymentId) -> DeploymentServiceResult<Deployment> {
        self.deployments
            .find_by_id(id)
            .await?
            .ok_or(DeploymentServiceError::NotFound(id))
    }

    /// Validates and stores a deployment, then regenerates its repository
    /// metadata when needed.
    ///
    /// Metadata is regenerated when the deployment is new, its packages,
    /// matching computers, or name changed. A rename also removes the
    /// metadata published under the old name. Metadata failures are
    /// retried and then reported on the outcome; the save itself stands.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentServiceError::Validation`] with every failure
    /// found; nothing is written in that case. Once the deployment is
    /// stored, later failures only add warnings to the outcome.
    pub async fn save(
        &self,
        request: SaveDeploymentRequest,
        user: &UserProfile,
        context: &RequestContext,
    ) -> DeploymentServiceResult<DeploymentSaveOutcome> {
        let stored = self.load_stored(request.id).await?;
        let bound_domain = self.find_domain(request.domain).await?;
        let built = Deployment::new(&request.name, request.project, request.start_date, &*self.clock);

        let mut errors = Vec::new();
        if let Err(err) = &built {
            errors.push(ValidationError::InvalidName(err.to_string()));
        }
        let (packages, package_errors) = self.validate_packages(&request).await?;
        errors.extend(package_errors);
        errors.extend(self.validate_domain(&request, bound_domain.as_ref(), user).await?);
        errors.extend(
            AttributeStoreService::new(Arc::clone(&self.inventory))
                .validate_references(&request.referenced_attributes())
                .await?,
        );
        ValidationErrors::check(errors)?;

        let mut deployment = built
            .map_err(|err| ValidationErrors::single(ValidationError::InvalidName(err.to_string())))?
            .with_enabled(request.enabled)
            .with_comment(request.comment)
            .with_available_packages(request.available_packages)
            .with_packages_to_install(request.packages_to_install)
            .with_packages_to_remove(request.packages_to_remove)
            .with_attributes(request.included, request.excluded)
            .with_domain(request.domain)
            .with_schedule(request.schedule);
        if let Some(previous) = &stored {
            deployment.continue_from(previous);
        }
        if self.config.prefix_deployment_names
            && let Some(domain) = &bound_domain
            && user.domain_preference() == Some(domain.id())
        {
            deployment.apply_prefix(&domain.deployment_prefix());
        }

        let previous_matching = self.previous_matching(stored.as_ref()).await?;
        let current_matching = self.matching_ids(&deployment).await?;

        self.deployments.save(&deployment).await?;
        info!(
            deployment_id = %deployment.id(),
            name = deployment.name(),
            user = context.username(),
            created = stored.is_none(),
            "saved deployment"
        );

        let mut warnings = Vec::new();
        if let Some(warning) = self.notify_change(&deployment, context).await {
            warnings.push(warning);
        }

        let old_name = stored
            .as_ref()
            .filter(|previous| previous.name() != deployment.name())
            .map(|previous| previous.name().to_owned());
        let needs_metadata = stored.as_ref().is_none_or(|previous| {
            previous.packages_differ(&deployment)
                || previous_matching.as_ref() != Some(&current_matching)
                || old_name.is_some()
        });

        let metadata = if needs_metadata {
            self.publish(&deployment, &packages, context).await
        } else {
            MetadataStatus::Unchanged
        };
        if let MetadataStatus::Failed { warning, .. } = &metadata {
            warnings.push(format!(
                "repository metadata for {} was not regenerated: {warning}",
                deployment.name()
            ));
        }
        if let Some(previous_name) = old_name
            && let Some(warning) = self.remove_old_metadata(&deployment, &previous_name, context).await
        {
            warnings.push(warning);
        }

        Ok(DeploymentSaveOutcome {
            deployment,
            metadata,
            warnings,
        })
    }

    /// Regenerates the repository metadata of the selected deployments.
    ///
    /// Regenerating unchanged deployments republishes identical manifests.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentServiceError::NotFound`] when a deployment does
    /// not exist; earlier deployments keep their regenerated metadata.
    pub async fn regenerate_metadata(
        &self,
        ids: &[DeploymentId],
        context: &RequestContext,
    ) -> DeploymentServiceResult<Vec<(DeploymentId, MetadataStatus)>> {
        let mut statuses = Vec::with_capacity(ids.len());
        for id in ids {
            let deployment = self.find(*id).await?;
            let packages = self
                .deployments
                .find_packages(deployment.available_packages())
                .await?;
            let status = self.publish(&deployment, &packages, context).await;
            statuses.push((*id, status));
        }
        Ok(statuses)
    }

    /// Returns the visible computers `deployment` targets, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentServiceError`] on persistence failures.
    pub async fn matching_computers(
        &self,
        deployment: &Deployment,
        snapshot: &ScopeSnapshot,
    ) -> DeploymentServiceResult<Vec<Computer>> {
        let domain = self.find_domain(deployment.domain()).await?;
        let computers = self
            .inventory
            .list_computers(Some(deployment.project()))
            .await?;
        Ok(computers
            .into_iter()
            .filter(|computer| {
                snapshot.computers().allows(&computer.id())
                    && matches(deployment, computer, domain.as_ref())
            })
            .collect())
    }

    async fn matching_ids(&self, deployment: &Deployment) -> DeploymentServiceResult<BTreeSet<ComputerId>> {
        let domain = self.find_domain(deployment.domain()).await?;
        let computers = self
            .inventory
            .list_computers(Some(deployment.project()))
            .await?;
        Ok(computers
            .iter()
            .filter(|computer| matches(deployment, computer, domain.as_ref()))
            .map(Computer::id)
            .collect())
    }

    async fn previous_matching(
        &self,
        stored: Option<&Deployment>,
    ) -> DeploymentServiceResult<Option<BTreeSet<ComputerId>>> {
        let Some(previous) = stored else {
            return Ok(None);
        };
        self.matching_ids(previous).await.map(Some)
    }

    async fn load_stored(&self, id: Option<DeploymentId>) -> DeploymentServiceResult<Option<Deployment>> {
        let Some(wanted) = id else {
            return Ok(None);
        };
        self.find(wanted).await.map(Some)
    }

    async fn find_domain(&self, id: Option<DomainId>) -> DeploymentServiceResult<Option<Domain>> {
        let Some(wanted) = id else {
            return Ok(None);
        };
        Ok(self.scopes.find_domain(wanted).await?)
    }

    async fn validate_packages(
        &self,
        request: &SaveDeploymentRequest,
    ) -> DeploymentServiceResult<(Vec<Package>, Vec<ValidationError>)> {
        let packages = self
            .deployments
            .find_packages(&request.available_packages)
            .await?;
        let mut errors: Vec<ValidationError> = request
            .available_packages
            .iter()
            .filter(|id| !packages.iter().any(|package| package.id() == **id))
            .map(|id| ValidationError::UnknownPackage(*id))
            .collect();
        errors.extend(
            packages
                .iter()
                .filter(|package| package.project() != request.project)
                .map(|package| ValidationError::PackageProjectMismatch {
                    package: package.id(),
                    project: request.project,
                }),
        );
        Ok((packages, errors))
    }

    async fn validate_domain(
        &self,
        request: &SaveDeploymentRequest,
        bound_domain: Option<&Domain>,
        user: &UserProfile,
    ) -> DeploymentServiceResult<Vec<ValidationError>> {
        let mut errors = Vec::new();
        if let Some(preferred) = user.domain_preference()
            && request.domain.is_none()
        {
            let name = self
                .scopes
                .find_domain(preferred)
                .await?
                .map_or_else(|| preferred.to_string(), |domain| domain.name().to_owned());
            errors.push(ValidationError::DomainRequired { domain: name });
        }
        if let Some(requested) = request.domain {
            if bound_domain.is_none() {
                errors.push(ValidationError::UnknownDomain(requested));
            } else if !user.is_assigned(requested) && !user.has_view_all_privilege() {
                errors.push(ValidationError::DomainNotAssigned(requested));
            }
        }
        Ok(errors)
    }

    async fn notify_change(&self, deployment: &Deployment, request: &RequestContext) -> Option<String> {
        self.append_notification(deployment, request).await.err()
    }

    async fn append_notification(
        &self,
        deployment: &Deployment,
        request: &RequestContext,
    ) -> Result<(), String> {
        let message = Environment::new()
            .render_str(
                &self.config.notification_template,
                context! { deployment => deployment.name(), user => request.username() },
            )
            .map_err(|err| {
                warn!(deployment = deployment.name(), error = %err, "notification template failed");
                format!("change notification was not recorded: {err}")
            })?;
        let record = EventRecord::notification(message, &*self.clock);
        self.events.append(&record).await.map_err(|err| {
            warn!(deployment = deployment.name(), error = %err, "notification append failed");
            format!("change notification was not recorded: {err}")
        })
    }

    async fn publish(
        &self,
        deployment: &Deployment,
        packages: &[Package],
        context: &RequestContext,
    ) -> MetadataStatus {
        let limit = self.config.metadata_retry_attempts.saturating_add(1);
        let mut last_error = String::new();
        for attempt in 1..=limit {
            match self
                .metadata
                .create_repository_metadata(deployment, packages, context)
                .await
            {
                Ok(manifest) => {
                    info!(
                        deployment = deployment.name(),
                        attempt,
                        packages = manifest.packages().len(),
                        "regenerated repository metadata"
                    );
                    return MetadataStatus::Regenerated {
                        attempts: attempt,
                        manifest,
                    };
                }
                Err(err) => {
                    warn!(
                        deployment = deployment.name(),
                        attempt,
                        error = %err,
                        "repository metadata generation failed"
                    );
                    last_error = err.to_string();
                }
            }
        }
        MetadataStatus::Failed {
            attempts: limit,
            warning: last_error,
        }
    }

    async fn remove_old_metadata(
        &self,
        deployment: &Deployment,
        old_name: &str,
        context: &RequestContext,
    ) -> Option<String> {
        let limit = self.config.metadata_retry_attempts.saturating_add(1);
        let mut last_error = String::new();
        for attempt in 1..=limit {
            match self
                .metadata
                .remove_repository_metadata(context, deployment, old_name)
                .await
            {
                Ok(()) => return None,
                Err(err) => {
                    warn!(old_name, attempt, error = %err, "repository metadata removal failed");
                    last_error = err.to_string();
                }
            }
        }
        Some(format!(
            "repository metadata under the old name {old_name} was not removed: {last_error}"
        ))
    }
}
