//! Shared world state for deployment matching BDD scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use fleetscope::config::EngineConfig;
use fleetscope::deployment::{
    adapters::memory::{InMemoryDeploymentRepository, InMemoryMetadataBuilder},
    services::{DeploymentSaveOutcome, DeploymentService, DeploymentServiceError, SaveDeploymentRequest},
};
use fleetscope::event::adapters::memory::InMemoryEventRepository;
use fleetscope::inventory::{
    adapters::memory::InMemoryInventoryRepository,
    domain::{Attribute, AttributeKind, Computer, ProjectId, PropertyPrefix},
    ports::InventoryRepository,
};
use fleetscope::schedule::{
    adapters::memory::InMemoryScheduleRepository, services::RolloutService,
};
use fleetscope::scope::adapters::memory::InMemoryScopeRepository;
use mockable::DefaultClock;
use rstest::fixture;

/// Deployment service type used by the BDD world.
pub type TestDeploymentService = DeploymentService<
    InMemoryDeploymentRepository,
    InMemoryInventoryRepository,
    InMemoryScopeRepository,
    InMemoryMetadataBuilder,
    InMemoryEventRepository,
    DefaultClock,
>;

/// Rollout service type used by the BDD world.
pub type TestRolloutService = RolloutService<
    InMemoryDeploymentRepository,
    InMemoryInventoryRepository,
    InMemoryScopeRepository,
    InMemoryScheduleRepository,
>;

/// Scenario world for deployment matching behaviour tests.
pub struct MatchingWorld {
    pub deployments: TestDeploymentService,
    pub rollout: TestRolloutService,
    pub inventory: Arc<InMemoryInventoryRepository>,
    pub metadata: Arc<InMemoryMetadataBuilder>,
    pub project: ProjectId,
    pub attributes: BTreeMap<String, Attribute>,
    pub computers: BTreeMap<String, Computer>,
    pub pending_request: Option<SaveDeploymentRequest>,
    pub last_outcome: Option<Result<DeploymentSaveOutcome, DeploymentServiceError>>,
}

impl MatchingWorld {
    /// Creates a world with an empty fleet.
    #[must_use]
    pub fn new() -> Self {
        let inventory = Arc::new(InMemoryInventoryRepository::new());
        let scopes = Arc::new(InMemoryScopeRepository::new());
        let deployments = Arc::new(InMemoryDeploymentRepository::new());
        let metadata = Arc::new(InMemoryMetadataBuilder::new());

        Self {
            deployments: DeploymentService::new(
                Arc::clone(&deployments),
                Arc::clone(&inventory),
                Arc::clone(&scopes),
                Arc::clone(&metadata),
                Arc::new(InMemoryEventRepository::new()),
                Arc::new(DefaultClock),
                EngineConfig::default(),
            ),
            rollout: RolloutService::new(
                deployments,
                Arc::clone(&inventory),
                scopes,
                Arc::new(InMemoryScheduleRepository::new()),
                EngineConfig::default(),
            ),
            inventory,
            metadata,
            project: ProjectId::new(),
            attributes: BTreeMap::new(),
            computers: BTreeMap::new(),
            pending_request: None,
            last_outcome: None,
        }
    }

    /// Returns the attribute named `PROPERTY-value`, creating it on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns an error when the name has no property prefix or the
    /// attribute cannot be stored.
    pub fn attribute(&mut self, key: &str) -> Result<Attribute, eyre::Report> {
        if let Some(known) = self.attributes.get(key) {
            return Ok(known.clone());
        }
        let (property, value) = key
            .split_once('-')
            .ok_or_else(|| eyre::eyre!("attribute '{key}' must read PROPERTY-value"))?;
        let attribute = Attribute::new(PropertyPrefix::new(property)?, value, AttributeKind::Sync)?;
        run_async(self.inventory.store_attribute(&attribute))?;
        self.attributes.insert(key.to_owned(), attribute.clone());
        Ok(attribute)
    }

    /// Returns a computer registered by an earlier step.
    ///
    /// # Errors
    ///
    /// Returns an error when no step registered the computer.
    pub fn computer(&self, name: &str) -> Result<&Computer, eyre::Report> {
        self.computers
            .get(name)
            .ok_or_else(|| eyre::eyre!("computer '{name}' was not registered"))
    }

    /// Returns the deployment stored by the `When` step.
    ///
    /// # Errors
    ///
    /// Returns an error when the save has not run or failed.
    pub fn saved(&self) -> Result<&DeploymentSaveOutcome, eyre::Report> {
        match self.last_outcome.as_ref() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(err)) => Err(eyre::eyre!("deployment save failed: {err}")),
            None => Err(eyre::eyre!("deployment was not saved")),
        }
    }

    /// Parses an ISO-8601 date from a step.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed dates.
    pub fn date(raw: &str) -> Result<NaiveDate, eyre::Report> {
        Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?)
    }
}

impl Default for MatchingWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MatchingWorld {
    MatchingWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
