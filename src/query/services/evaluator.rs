//! Saved query storage and evaluation.

use crate::config::EngineConfig;
use crate::deployment::ports::{DeploymentRepository, DeploymentRepositoryError};
use crate::inventory::{
    domain::{Attribute, PropertyPrefix},
    ports::{InventoryRepository, InventoryRepositoryError},
};
use crate::query::{
    domain::{
        FilterValue, QueryDefinition, QueryDomainError, QueryFilter, QueryResult, QuerySubject,
        SavedQuery, SavedQueryId,
    },
    ports::{SavedQueryRepository, SavedQueryRepositoryError},
};
use crate::scope::domain::ScopeSnapshot;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for saved query operations.
#[derive(Debug, Error)]
pub enum QueryServiceError {
    /// The definition is invalid.
    #[error(transparent)]
    Domain(#[from] QueryDomainError),
    /// Saved query repository operation failed.
    #[error(transparent)]
    Repository(#[from] SavedQueryRepositoryError),
    /// Inventory repository operation failed.
    #[error(transparent)]
    Inventory(#[from] InventoryRepositoryError),
    /// Deployment repository operation failed.
    #[error(transparent)]
    Deployment(#[from] DeploymentRepositoryError),
    /// The saved query does not exist.
    #[error("query not found: {0}")]
    NotFound(SavedQueryId),
    /// A parameter used by a filter was not supplied.
    #[error("missing query parameter: {0}")]
    MissingParameter(String),
    /// A supplied parameter is not used by any filter.
    #[error("unknown query parameter: {0}")]
    UnknownParameter(String),
}

/// Result type for saved query operations.
pub type QueryServiceResult<T> = Result<T, QueryServiceError>;

type Record = BTreeMap<&'static str, Value>;

/// Saved query service.
#[derive(Clone)]
pub struct QueryService<Q, I, D>
where
    Q: SavedQueryRepository,
    I: InventoryRepository,
    D: DeploymentRepository,
{
    queries: Arc<Q>,
    inventory: Arc<I>,
    deployments: Arc<D>,
    config: EngineConfig,
}

impl<Q, I, D> QueryService<Q, I, D>
where
    Q: SavedQueryRepository,
    I: InventoryRepository,
    D: DeploymentRepository,
{
    /// Creates a new saved query service.
    #[must_use]
    pub const fn new(queries: Arc<Q>, inventory: Arc<I>, deployments: Arc<D>, config: EngineConfig) -> Self {
        Self {
            queries,
            inventory,
            deployments,
            config,
        }
    }

    /// Stores a saved query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryServiceError::Repository`] when the name is taken or
    /// persistence fails.
    pub async fn save_query(&self, query: SavedQuery) -> QueryServiceResult<SavedQuery> {
        self.queries.save(&query).await?;
        info!(query_id = %query.id(), name = query.name(), "saved query");
        Ok(query)
    }

    /// Returns every saved query, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`QueryServiceError::Repository`] on persistence failures.
    pub async fn list_queries(&self) -> QueryServiceResult<Vec<SavedQuery>> {
        Ok(self.queries.list().await?)
    }

    /// Runs a saved query within the caller's visibility.
    ///
    /// # Errors
    ///
    /// Returns [`QueryServiceError::NotFound`] for an unknown query and the
    /// errors of [`QueryService::run_definition`].
    pub async fn run(
        &self,
        id: SavedQueryId,
        parameters: &BTreeMap<String, String>,
        snapshot: &ScopeSnapshot,
    ) -> QueryServiceResult<QueryResult> {
        let query = self
            .queries
            .find(id)
            .await?
            .ok_or(QueryServiceError::NotFound(id))?;
        self.run_definition(query.definition(), parameters, snapshot)
            .await
    }

    /// Evaluates a definition within the caller's visibility.
    ///
    /// Computers outside the snapshot are never listed; deployments and
    /// packages are listed only for visible projects; attribute counts only
    /// include visible computers. At most `max_query_rows` rows are
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`QueryServiceError::MissingParameter`] or
    /// [`QueryServiceError::UnknownParameter`] when `parameters` does not
    /// match the parameters the filters use.
    pub async fn run_definition(
        &self,
        definition: &QueryDefinition,
        parameters: &BTreeMap<String, String>,
        snapshot: &ScopeSnapshot,
    ) -> QueryServiceResult<QueryResult> {
        definition.validate()?;
        let conditions = bind_parameters(definition, parameters)?;
        let records = self.load_records(definition.subject(), snapshot).await?;

        let limit = self.config.max_query_rows;
        let mut matching = records
            .into_iter()
            .filter(|record| conditions.iter().all(|(filter, value)| accepts(record, filter, value)));
        let selected: Vec<Record> = matching.by_ref().take(limit).collect();
        let truncated = matching.next().is_some();

        let projection = definition.projection();
        let rows = selected
            .iter()
            .map(|record| {
                projection
                    .iter()
                    .map(|projected| {
                        record
                            .get(projected.field.as_str())
                            .cloned()
                            .unwrap_or(Value::Null)
                    })
                    .collect()
            })
            .collect();
        debug!(
            subject = %definition.subject(),
            rows = selected.len(),
            truncated,
            "evaluated query"
        );
        Ok(QueryResult {
            titles: projection
                .iter()
                .map(|projected| projected.title().to_owned())
                .collect(),
            rows,
            truncated,
        })
    }

    async fn load_records(
        &self,
        subject: QuerySubject,
        snapshot: &ScopeSnapshot,
    ) -> QueryServiceResult<Vec<Record>> {
        match subject {
            QuerySubject::Computers => self.computer_records(snapshot).await,
            QuerySubject::Attributes => self.attribute_records(snapshot).await,
            QuerySubject::Deployments => self.deployment_records(snapshot).await,
            QuerySubject::Packages => self.package_records(snapshot).await,
        }
    }

    async fn computer_records(&self, snapshot: &ScopeSnapshot) -> QueryServiceResult<Vec<Record>> {
        let computers = self.inventory.list_computers(None).await?;
        Ok(computers
            .iter()
            .filter(|computer| snapshot.computers().allows(&computer.id()))
            .map(|computer| {
                Record::from([
                    ("id", Value::from(computer.id().to_string())),
                    ("name", Value::from(computer.name())),
                    ("project", Value::from(computer.project().to_string())),
                    ("status", Value::from(computer.status().as_str())),
                ])
            })
            .collect())
    }

    async fn attribute_records(&self, snapshot: &ScopeSnapshot) -> QueryServiceResult<Vec<Record>> {
        let attributes = self.inventory.list_attributes().await?;
        let properties: BTreeSet<&PropertyPrefix> =
            attributes.iter().map(Attribute::property).collect();
        let mut totals = BTreeMap::new();
        for property in properties {
            totals.extend(
                self.inventory
                    .count_computers_by_attribute(property, snapshot.computers().restriction())
                    .await?,
            );
        }
        Ok(attributes
            .iter()
            .map(|attribute| {
                let total = totals.get(&attribute.id()).copied().unwrap_or(0);
                Record::from([
                    ("id", Value::from(attribute.id().to_string())),
                    ("property", Value::from(attribute.property().as_str())),
                    ("value", Value::from(attribute.value())),
                    ("kind", Value::from(attribute.kind().as_str())),
                    ("description", attribute.description().map_or(Value::Null, Value::from)),
                    ("computers", Value::from(total)),
                ])
            })
            .collect())
    }

    async fn deployment_records(&self, snapshot: &ScopeSnapshot) -> QueryServiceResult<Vec<Record>> {
        let deployments = self.deployments.list(None).await?;
        Ok(deployments
            .iter()
            .filter(|deployment| snapshot.projects().allows(&deployment.project()))
            .map(|deployment| {
                Record::from([
                    ("id", Value::from(deployment.id().to_string())),
                    ("name", Value::from(deployment.name())),
                    ("project", Value::from(deployment.project().to_string())),
                    ("enabled", Value::from(deployment.is_enabled())),
                    ("start_date", Value::from(deployment.start_date().to_string())),
                    ("domain", optional_id(deployment.domain())),
                    ("schedule", optional_id(deployment.schedule())),
                    ("comment", deployment.comment().map_or(Value::Null, Value::from)),
                ])
            })
            .collect())
    }

    async fn package_records(&self, snapshot: &ScopeSnapshot) -> QueryServiceResult<Vec<Record>> {
        let packages = self.deployments.list_packages(None).await?;
        Ok(packages
            .iter()
            .filter(|package| snapshot.projects().allows(&package.project()))
            .map(|package| {
                Record::from([
                    ("id", Value::from(package.id().to_string())),
                    ("name", Value::from(package.name())),
                    ("project", Value::from(package.project().to_string())),
                ])
            })
            .collect())
    }
}

fn bind_parameters<'a>(
    definition: &'a QueryDefinition,
    parameters: &'a BTreeMap<String, String>,
) -> QueryServiceResult<Vec<(&'a QueryFilter, &'a str)>> {
    let used = definition.parameters();
    if let Some(unknown) = parameters.keys().find(|name| !used.contains(name.as_str())) {
        return Err(QueryServiceError::UnknownParameter(unknown.clone()));
    }
    definition
        .filters()
        .iter()
        .map(|filter| match &filter.value {
            FilterValue::Literal(value) => Ok((filter, value.as_str())),
            FilterValue::Parameter(name) => parameters
                .get(name)
                .map(|value| (filter, value.as_str()))
                .ok_or_else(|| QueryServiceError::MissingParameter(name.clone())),
        })
        .collect()
}

fn accepts(record: &Record, filter: &QueryFilter, value: &str) -> bool {
    let text = record.get(filter.field.as_str()).map_or_else(String::new, value_text);
    filter.operator.accepts(&text, value)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn optional_id<T: ToString + Copy>(id: Option<T>) -> Value {
    id.map_or(Value::Null, |inner| Value::from(inner.to_string()))
}
