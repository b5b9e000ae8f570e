//! Shared fixtures wiring every service over one set of in-memory
//! repositories.

use std::sync::Arc;

use fleetscope::config::EngineConfig;
use fleetscope::deployment::{
    adapters::memory::{InMemoryDeploymentRepository, InMemoryMetadataBuilder},
    services::DeploymentService,
};
use fleetscope::event::{adapters::memory::InMemoryEventRepository, services::EventService};
use fleetscope::inventory::{
    adapters::memory::InMemoryInventoryRepository,
    domain::{Attribute, AttributeId, AttributeKind, Computer, ProjectId, PropertyPrefix},
    services::AttributeStoreService,
};
use fleetscope::schedule::{
    adapters::memory::InMemoryScheduleRepository, services::RolloutService,
};
use fleetscope::scope::{adapters::memory::InMemoryScopeRepository, services::ScopeService};
use mockable::DefaultClock;
use rstest::fixture;
use tracing_subscriber::EnvFilter;

/// Attribute store over the shared inventory.
pub type Inventory = AttributeStoreService<InMemoryInventoryRepository>;

/// Scope service over the shared inventory.
pub type Scopes = ScopeService<InMemoryScopeRepository, InMemoryInventoryRepository, DefaultClock>;

/// Deployment service publishing to an in-memory metadata builder.
pub type Deployments = DeploymentService<
    InMemoryDeploymentRepository,
    InMemoryInventoryRepository,
    InMemoryScopeRepository,
    InMemoryMetadataBuilder,
    InMemoryEventRepository,
    DefaultClock,
>;

/// Rollout service over the shared repositories.
pub type Rollout = RolloutService<
    InMemoryDeploymentRepository,
    InMemoryInventoryRepository,
    InMemoryScopeRepository,
    InMemoryScheduleRepository,
>;

/// Event service over the shared event log.
pub type Events = EventService<InMemoryEventRepository, DefaultClock>;

/// Every service of one fleet.
pub struct Fleet {
    pub inventory: Inventory,
    pub scopes: Scopes,
    pub deployments: Deployments,
    pub rollout: Rollout,
    pub events: Events,
    pub metadata: Arc<InMemoryMetadataBuilder>,
    pub store: Arc<InMemoryInventoryRepository>,
    pub project: ProjectId,
}

/// Routes service logs to the test output; `RUST_LOG` selects the level.
fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    drop(installed);
}

/// Provides a fleet with nothing registered.
#[fixture]
pub fn fleet() -> Fleet {
    init_tracing();
    let config = EngineConfig::default();
    let inventory = Arc::new(InMemoryInventoryRepository::new());
    let scopes = Arc::new(InMemoryScopeRepository::new());
    let deployments = Arc::new(InMemoryDeploymentRepository::new());
    let events = Arc::new(InMemoryEventRepository::new());
    let metadata = Arc::new(InMemoryMetadataBuilder::new());
    let clock = Arc::new(DefaultClock);
    Fleet {
        inventory: AttributeStoreService::new(Arc::clone(&inventory)),
        scopes: ScopeService::new(Arc::clone(&scopes), Arc::clone(&inventory), Arc::clone(&clock)),
        deployments: DeploymentService::new(
            Arc::clone(&deployments),
            Arc::clone(&inventory),
            Arc::clone(&scopes),
            Arc::clone(&metadata),
            Arc::clone(&events),
            Arc::clone(&clock),
            config.clone(),
        ),
        rollout: RolloutService::new(
            deployments,
            Arc::clone(&inventory),
            scopes,
            Arc::new(InMemoryScheduleRepository::new()),
            config,
        ),
        events: EventService::new(events, clock),
        metadata,
        store: inventory,
        project: ProjectId::new(),
    }
}

impl Fleet {
    /// Creates a sync attribute.
    ///
    /// # Errors
    ///
    /// Returns an error when the attribute is invalid or already exists.
    pub async fn attribute(&self, property: &str, value: &str) -> Result<Attribute, eyre::Report> {
        let attribute = Attribute::new(PropertyPrefix::new(property)?, value, AttributeKind::Sync)?;
        Ok(self.inventory.create_attribute(attribute).await?)
    }

    /// Registers a computer of the fleet's project carrying `attributes`.
    ///
    /// # Errors
    ///
    /// Returns an error when the computer cannot be registered.
    pub async fn computer(&self, name: &str, attributes: &[AttributeId]) -> Result<Computer, eyre::Report> {
        let computer = Computer::new(name, self.project)?.with_sync_attributes(attributes.iter().copied());
        Ok(self.inventory.register_computer(computer).await?)
    }
}
