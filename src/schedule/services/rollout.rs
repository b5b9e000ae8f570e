//! Schedule maintenance and per-computer rollout decisions.

use crate::config::EngineConfig;
use crate::deployment::{
    domain::{Deployment, DeploymentId, matches},
    ports::{DeploymentRepository, DeploymentRepositoryError},
};
use crate::inventory::{
    domain::{Computer, ComputerId},
    ports::{InventoryRepository, InventoryRepositoryError},
};
use crate::schedule::{
    domain::{Schedule, ScheduleDelay, ScheduleId, Timeline},
    ports::{ScheduleRepository, ScheduleRepositoryError},
};
use crate::scope::{
    domain::{Domain, DomainId, ScopeSnapshot},
    ports::{ScopeRepository, ScopeRepositoryError},
};
use crate::validation::ValidationErrors;
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for rollout operations.
#[derive(Debug, Error)]
pub enum RolloutServiceError {
    /// Schedule validation failed; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// Schedule repository operation failed.
    #[error(transparent)]
    Repository(#[from] ScheduleRepositoryError),
    /// Deployment repository operation failed.
    #[error(transparent)]
    Deployment(#[from] DeploymentRepositoryError),
    /// Inventory repository operation failed.
    #[error(transparent)]
    Inventory(#[from] InventoryRepositoryError),
    /// Scope repository operation failed.
    #[error(transparent)]
    Scope(#[from] ScopeRepositoryError),
    /// The schedule does not exist.
    #[error("schedule not found: {0}")]
    ScheduleNotFound(ScheduleId),
    /// The deployment does not exist.
    #[error("deployment not found: {0}")]
    DeploymentNotFound(DeploymentId),
    /// The computer does not exist.
    #[error("computer not found: {0}")]
    ComputerNotFound(ComputerId),
}

/// Result type for rollout service operations.
pub type RolloutServiceResult<T> = Result<T, RolloutServiceError>;

/// Per-tier view of a scheduled deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSummary {
    /// The tier.
    pub tier: ScheduleDelay,
    /// First day of the tier.
    pub opens: NaiveDate,
    /// First day after the tier.
    pub closes: NaiveDate,
    /// Whether the tier is open on the requested day.
    pub open: bool,
    /// Visible matching computers assigned to the tier.
    pub computers: u64,
}

/// Staged rollout service.
#[derive(Clone)]
pub struct RolloutService<D, I, S, R>
where
    D: DeploymentRepository,
    I: InventoryRepository,
    S: ScopeRepository,
    R: ScheduleRepository,
{
    deployments: Arc<D>,
    inventory: Arc<I>,
    scopes: Arc<S>,
    schedules: Arc<R>,
    config: EngineConfig,
}

impl<D, I, S, R> RolloutService<D, I, S, R>
where
    D: DeploymentRepository,
    I: InventoryRepository,
    S: ScopeRepository,
    R: ScheduleRepository,
{
    /// Creates a new rollout service.
    #[must_use]
    pub const fn new(
        deployments: Arc<D>,
        inventory: Arc<I>,
        scopes: Arc<S>,
        schedules: Arc<R>,
        config: EngineConfig,
    ) -> Self {
        Self {
            deployments,
            inventory,
            scopes,
            schedules,
            config,
        }
    }

    /// Validates and stores a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`RolloutServiceError::Validation`] for zero-day tiers,
    /// repeated delays, and, when configured, overlapping tiers.
    pub async fn save_schedule(&self, schedule: Schedule) -> RolloutServiceResult<Schedule> {
        ValidationErrors::check(schedule.validate(self.config.reject_overlapping_tiers))?;
        self.schedules.save(&schedule).await?;
        info!(
            schedule_id = %schedule.id(),
            name = schedule.name(),
            tiers = schedule.delays().len(),
            "saved schedule"
        );
        Ok(schedule)
    }

    /// Finds a schedule by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RolloutServiceError::ScheduleNotFound`] for an unknown
    /// schedule.
    pub async fn find_schedule(&self, id: ScheduleId) -> RolloutServiceResult<Schedule> {
        self.schedules
            .find(id)
            .await?
            .ok_or(RolloutServiceError::ScheduleNotFound(id))
    }

    /// Returns the tier through which `computer` receives `deployment` on
    /// `today`.
    ///
    /// Unscheduled deployments and computers the deployment does not match
    /// have no tier.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown deployment, computer, or
    /// schedule.
    pub async fn tier_for(
        &self,
        computer: ComputerId,
        deployment: DeploymentId,
        today: NaiveDate,
    ) -> RolloutServiceResult<Option<ScheduleDelay>> {
        let found = self.load_deployment(deployment).await?;
        let target = self.load_computer(computer).await?;
        let Some(schedule_id) = found.schedule() else {
            return Ok(None);
        };
        let schedule = self.find_schedule(schedule_id).await?;
        let domain = self.find_domain(found.domain()).await?;
        if !matches(&found, &target, domain.as_ref()) {
            return Ok(None);
        }
        Ok(schedule
            .tier_for(&target, found.start_date(), today)
            .cloned())
    }

    /// Returns `true` when `computer` receives `deployment` on `today`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown deployment, computer, or
    /// schedule.
    pub async fn has_reached(
        &self,
        computer: ComputerId,
        deployment: DeploymentId,
        today: NaiveDate,
    ) -> RolloutServiceResult<bool> {
        let found = self.load_deployment(deployment).await?;
        let target = self.load_computer(computer).await?;
        let domain = self.find_domain(found.domain()).await?;
        if !found.is_enabled() || !matches(&found, &target, domain.as_ref()) {
            return Ok(false);
        }
        self.schedule_reached(&found, &target, today).await
    }

    /// Returns the enabled deployments that target `computer` and whose
    /// schedule has reached it on `today`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`RolloutServiceError::ComputerNotFound`] for an unknown
    /// computer.
    pub async fn deployments_for_computer(
        &self,
        computer: ComputerId,
        today: NaiveDate,
    ) -> RolloutServiceResult<Vec<Deployment>> {
        let target = self.load_computer(computer).await?;
        let candidates = self.deployments.list(Some(target.project())).await?;
        let mut available = Vec::new();
        for deployment in candidates {
            if !deployment.is_enabled() {
                continue;
            }
            let domain = self.find_domain(deployment.domain()).await?;
            if !matches(&deployment, &target, domain.as_ref()) {
                continue;
            }
            if self.schedule_reached(&deployment, &target, today).await? {
                available.push(deployment);
            }
        }
        available.sort_by(|left, right| left.name().cmp(right.name()));
        debug!(
            computer_id = %computer,
            deployments = available.len(),
            %today,
            "resolved deployments for computer"
        );
        Ok(available)
    }

    /// Counts the visible matching computers assigned to each tier of the
    /// deployment's schedule.
    ///
    /// Every computer counts toward the lowest-delay tier that applies to
    /// it. Unscheduled deployments have no tiers.
    ///
    /// # Errors
    ///
    /// Returns [`RolloutServiceError::ScheduleNotFound`] when the
    /// deployment refers to an unknown schedule.
    pub async fn computers_per_tier(
        &self,
        deployment: &Deployment,
        snapshot: &ScopeSnapshot,
        today: NaiveDate,
    ) -> RolloutServiceResult<Vec<TierSummary>> {
        let Some(schedule_id) = deployment.schedule() else {
            return Ok(Vec::new());
        };
        let schedule = self.find_schedule(schedule_id).await?;
        let domain = self.find_domain(deployment.domain()).await?;
        let computers = self
            .inventory
            .list_computers(Some(deployment.project()))
            .await?;
        let start = deployment.start_date();
        let mut summaries: Vec<TierSummary> = schedule
            .delays()
            .iter()
            .map(|tier| TierSummary {
                tier: tier.clone(),
                opens: tier.opens(start),
                closes: tier.closes(start),
                open: tier.is_open(start, today),
                computers: 0,
            })
            .collect();
        for computer in computers.iter().filter(|computer| {
            snapshot.computers().allows(&computer.id())
                && matches(deployment, computer, domain.as_ref())
        }) {
            let Some(position) = schedule
                .delays()
                .iter()
                .position(|tier| tier.admits(computer))
            else {
                continue;
            };
            if let Some(summary) = summaries.get_mut(position) {
                summary.computers = summary.computers.saturating_add(1);
            }
        }
        Ok(summaries)
    }

    /// Returns the calendar window of the deployment's schedule.
    ///
    /// # Errors
    ///
    /// Returns [`RolloutServiceError::ScheduleNotFound`] when the
    /// deployment refers to an unknown schedule.
    pub async fn timeline(&self, deployment: &Deployment) -> RolloutServiceResult<Option<Timeline>> {
        let Some(schedule_id) = deployment.schedule() else {
            return Ok(None);
        };
        let schedule = self.find_schedule(schedule_id).await?;
        Ok(schedule.timeline(deployment.start_date()))
    }

    async fn schedule_reached(
        &self,
        deployment: &Deployment,
        computer: &Computer,
        today: NaiveDate,
    ) -> RolloutServiceResult<bool> {
        let Some(schedule_id) = deployment.schedule() else {
            return Ok(deployment.start_date() <= today);
        };
        let schedule = self.find_schedule(schedule_id).await?;
        Ok(schedule.has_reached(computer, deployment.start_date(), today))
    }

    async fn load_deployment(&self, id: DeploymentId) -> RolloutServiceResult<Deployment> {
        self.deployments
            .find_by_id(id)
            .await?
            .ok_or(RolloutServiceError::DeploymentNotFound(id))
    }

    async fn load_computer(&self, id: ComputerId) -> RolloutServiceResult<Computer> {
        self.inventory
            .find_computer(id)
            .await?
            .ok_or(RolloutServiceError::ComputerNotFound(id))
    }

    async fn find_domain(&self, id: Option<DomainId>) -> RolloutServiceResult<Option<Domain>> {
        let Some(wanted) = id else {
            return Ok(None);
        };
        Ok(self.scopes.find_domain(wanted).await?)
    }
}
