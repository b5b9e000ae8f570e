//! `PostgreSQL` repository implementation for inventory storage.

use super::{
    models::{
        AttributeCountRow, AttributeRow, AttributeSetRow, ComputerRow, CountRow, MembershipRow,
        NewAttributeRow,
    },
    schema::{attribute_sets, attributes, computer_attributes, computers},
};
use crate::inventory::{
    domain::{
        Attribute, AttributeFilter, AttributeId, AttributeKind, AttributeSet, AttributeSetId,
        Computer, ComputerId, ComputerStatus, PersistedAttributeData, PersistedAttributeSetData,
        PersistedComputerData, ProjectId, PropertyPrefix,
    },
    ports::{InventoryRepository, InventoryRepositoryError, InventoryRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{Array, Bool, Text};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// `PostgreSQL` connection pool type used by inventory adapters.
pub type InventoryPgPool = Pool<ConnectionManager<PgConnection>>;

const SYNC_MEMBERSHIP: &str = "sync";
const TAG_MEMBERSHIP: &str = "tag";
const COMPUTERS_TABLE: &str = "computers";

/// Binds: attribute id, unrestricted flag, allowed computer ids.
const COUNT_WITH_ATTRIBUTE: &str = concat!(
    "SELECT COUNT(DISTINCT computer_id) AS count FROM computer_attributes ",
    "WHERE attribute_id = $1 AND membership = 'sync' ",
    "AND ($2 OR computer_id = ANY($3))",
);

/// Binds: property prefix, unrestricted flag, allowed computer ids.
const COUNT_BY_ATTRIBUTE: &str = concat!(
    "SELECT a.id AS attribute_id, COUNT(DISTINCT ca.computer_id) AS count ",
    "FROM attributes a LEFT JOIN computer_attributes ca ",
    "ON ca.attribute_id = a.id AND ca.membership = 'sync' ",
    "AND ($2 OR ca.computer_id = ANY($3)) ",
    "WHERE a.property = $1 GROUP BY a.id",
);

/// `PostgreSQL`-backed inventory repository.
#[derive(Debug, Clone)]
pub struct PostgresInventoryRepository {
    pool: InventoryPgPool,
}

impl PostgresInventoryRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: InventoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> InventoryRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> InventoryRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(InventoryRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(InventoryRepositoryError::persistence)?
    }
}

#[async_trait]
impl InventoryRepository for PostgresInventoryRepository {
    async fn store_attribute(&self, attribute: &Attribute) -> InventoryRepositoryResult<()> {
        let row = to_attribute_row(attribute);
        self.run_blocking(move |connection| {
            diesel::insert_into(attributes::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match unique_violation_table(&err) {
                    Some(_) => duplicate_attribute(&row),
                    None => InventoryRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_attributes(
        &self,
        ids: &BTreeSet<AttributeId>,
    ) -> InventoryRepositoryResult<Vec<Attribute>> {
        let lookup: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            attributes::table
                .filter(attributes::id.eq_any(lookup))
                .select(AttributeRow::as_select())
                .load::<AttributeRow>(connection)
                .map_err(InventoryRepositoryError::persistence)?
                .into_iter()
                .map(row_to_attribute)
                .collect()
        })
        .await
    }

    async fn list_attributes(&self) -> InventoryRepositoryResult<Vec<Attribute>> {
        self.run_blocking(move |connection| {
            attributes::table
                .order((attributes::property.asc(), attributes::value.asc()))
                .select(AttributeRow::as_select())
                .load::<AttributeRow>(connection)
                .map_err(InventoryRepositoryError::persistence)?
                .into_iter()
                .map(row_to_attribute)
                .collect()
        })
        .await
    }

    async fn store_computer(
        &self,
        computer: &Computer,
        identity: &Attribute,
    ) -> InventoryRepositoryResult<()> {
        let computer_id = computer.id();
        let row = to_computer_row(computer);
        let memberships = to_membership_rows(computer);
        let identity_row = to_attribute_row(identity);
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(computers::table).values(&row).execute(tx)?;
                    diesel::insert_into(attributes::table)
                        .values(&identity_row)
                        .execute(tx)?;
                    insert_memberships(tx, &memberships)
                })
                .map_err(|err| match unique_violation_table(&err) {
                    Some(table) if table == COMPUTERS_TABLE => {
                        InventoryRepositoryError::DuplicateComputer(computer_id)
                    }
                    Some(_) => duplicate_attribute(&identity_row),
                    None => InventoryRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn update_computer(&self, computer: &Computer) -> InventoryRepositoryResult<()> {
        let computer_id = computer.id();
        let row = to_computer_row(computer);
        let memberships = to_membership_rows(computer);
        self.run_blocking(move |connection| {
            let updated = connection
                .transaction::<_, DieselError, _>(|tx| {
                    let rows_updated = diesel::update(computers::table.find(row.id))
                        .set(&row)
                        .execute(tx)?;
                    if rows_updated == 0 {
                        return Ok(false);
                    }
                    diesel::delete(
                        computer_attributes::table
                            .filter(computer_attributes::computer_id.eq(row.id)),
                    )
                    .execute(tx)?;
                    insert_memberships(tx, &memberships)?;
                    Ok(true)
                })
                .map_err(InventoryRepositoryError::persistence)?;
            if updated {
                Ok(())
            } else {
                Err(InventoryRepositoryError::ComputerNotFound(computer_id))
            }
        })
        .await
    }

    async fn find_computer(&self, id: ComputerId) -> InventoryRepositoryResult<Option<Computer>> {
        self.run_blocking(move |connection| {
            let rows = computers::table
                .filter(computers::id.eq(id.into_inner()))
                .select(ComputerRow::as_select())
                .load::<ComputerRow>(connection)
                .map_err(InventoryRepositoryError::persistence)?;
            Ok(assemble_computers(connection, rows)?.into_iter().next())
        })
        .await
    }

    async fn list_computers(
        &self,
        project: Option<ProjectId>,
    ) -> InventoryRepositoryResult<Vec<Computer>> {
        self.run_blocking(move |connection| {
            let mut query = computers::table
                .select(ComputerRow::as_select())
                .order(computers::name.asc())
                .into_boxed();
            if let Some(project_id) = project {
                query = query.filter(computers::project_id.eq(project_id.into_inner()));
            }
            let rows = query
                .load::<ComputerRow>(connection)
                .map_err(InventoryRepositoryError::persistence)?;
            assemble_computers(connection, rows)
        })
        .await
    }

    async fn count_computers_with_attribute(
        &self,
        attribute: AttributeId,
        within: Option<&BTreeSet<ComputerId>>,
    ) -> InventoryRepositoryResult<u64> {
        let (unrestricted, allowed) = restriction_binds(within);
        self.run_blocking(move |connection| {
            let row = diesel::sql_query(COUNT_WITH_ATTRIBUTE)
                .bind::<diesel::sql_types::Uuid, _>(attribute.into_inner())
                .bind::<Bool, _>(unrestricted)
                .bind::<Array<diesel::sql_types::Uuid>, _>(allowed)
                .get_result::<CountRow>(connection)
                .map_err(InventoryRepositoryError::persistence)?;
            u64::try_from(row.count).map_err(InventoryRepositoryError::persistence)
        })
        .await
    }

    async fn count_computers_by_attribute(
        &self,
        property: &PropertyPrefix,
        within: Option<&BTreeSet<ComputerId>>,
    ) -> InventoryRepositoryResult<BTreeMap<AttributeId, u64>> {
        let (unrestricted, allowed) = restriction_binds(within);
        let lookup_property = property.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(COUNT_BY_ATTRIBUTE)
                .bind::<Text, _>(lookup_property)
                .bind::<Bool, _>(unrestricted)
                .bind::<Array<diesel::sql_types::Uuid>, _>(allowed)
                .load::<AttributeCountRow>(connection)
                .map_err(InventoryRepositoryError::persistence)?;
            rows.into_iter()
                .map(|row| {
                    let count =
                        u64::try_from(row.count).map_err(InventoryRepositoryError::persistence)?;
                    Ok((AttributeId::from_uuid(row.attribute_id), count))
                })
                .collect()
        })
        .await
    }

    async fn store_attribute_set(
        &self,
        set: &AttributeSet,
        representative: &Attribute,
    ) -> InventoryRepositoryResult<()> {
        let row = to_attribute_set_row(set)?;
        let representative_row = to_attribute_row(representative);
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|tx| {
                    diesel::insert_into(attributes::table)
                        .values(&representative_row)
                        .execute(tx)?;
                    diesel::insert_into(attribute_sets::table)
                        .values(&row)
                        .execute(tx)?;
                    Ok(())
                })
                .map_err(|err| match unique_violation_table(&err) {
                    Some(_) => duplicate_attribute(&representative_row),
                    None => InventoryRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn save_attribute_set(&self, set: &AttributeSet) -> InventoryRepositoryResult<()> {
        let row = to_attribute_set_row(set)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(attribute_sets::table)
                .values(&row)
                .on_conflict(attribute_sets::id)
                .do_update()
                .set(&row)
                .execute(connection)
                .map_err(InventoryRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn list_attribute_sets(&self) -> InventoryRepositoryResult<Vec<AttributeSet>> {
        self.run_blocking(move |connection| {
            attribute_sets::table
                .order(attribute_sets::name.asc())
                .select(AttributeSetRow::as_select())
                .load::<AttributeSetRow>(connection)
                .map_err(InventoryRepositoryError::persistence)?
                .into_iter()
                .map(row_to_attribute_set)
                .collect()
        })
        .await
    }
}

fn restriction_binds(within: Option<&BTreeSet<ComputerId>>) -> (bool, Vec<uuid::Uuid>) {
    within.map_or_else(
        || (true, Vec::new()),
        |ids| (false, ids.iter().map(|id| id.into_inner()).collect()),
    )
}

fn unique_violation_table(err: &DieselError) -> Option<String> {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.table_name().unwrap_or_default().to_owned())
        }
        _ => None,
    }
}

fn duplicate_attribute(row: &NewAttributeRow) -> InventoryRepositoryError {
    InventoryRepositoryError::DuplicateAttribute {
        property: row.property.clone(),
        value: row.value.clone(),
    }
}

fn to_attribute_row(attribute: &Attribute) -> NewAttributeRow {
    NewAttributeRow {
        id: attribute.id().into_inner(),
        property: attribute.property().as_str().to_owned(),
        value: attribute.value().to_owned(),
        description: attribute.description().map(str::to_owned),
        kind: attribute.kind().as_str().to_owned(),
        identifies: attribute.identifies().map(ComputerId::into_inner),
    }
}

fn row_to_attribute(row: AttributeRow) -> InventoryRepositoryResult<Attribute> {
    let property = PropertyPrefix::new(row.property).map_err(InventoryRepositoryError::persistence)?;
    let kind =
        AttributeKind::try_from(row.kind.as_str()).map_err(InventoryRepositoryError::persistence)?;
    Ok(Attribute::from_persisted(PersistedAttributeData {
        id: AttributeId::from_uuid(row.id),
        property,
        value: row.value,
        description: row.description,
        kind,
        identifies: row.identifies.map(ComputerId::from_uuid),
    }))
}

fn to_computer_row(computer: &Computer) -> ComputerRow {
    ComputerRow {
        id: computer.id().into_inner(),
        name: computer.name().to_owned(),
        project_id: computer.project().into_inner(),
        status: computer.status().as_str().to_owned(),
    }
}

fn to_membership_rows(computer: &Computer) -> Vec<MembershipRow> {
    let memberships = |attributes: &BTreeSet<AttributeId>, membership: &str| {
        attributes
            .iter()
            .map(|attribute| MembershipRow {
                computer_id: computer.id().into_inner(),
                attribute_id: attribute.into_inner(),
                membership: membership.to_owned(),
            })
            .collect::<Vec<_>>()
    };
    let mut rows = memberships(computer.sync_attributes(), SYNC_MEMBERSHIP);
    rows.extend(memberships(computer.tags(), TAG_MEMBERSHIP));
    rows
}

fn insert_memberships(
    connection: &mut PgConnection,
    memberships: &[MembershipRow],
) -> Result<(), DieselError> {
    if memberships.is_empty() {
        return Ok(());
    }
    diesel::insert_into(computer_attributes::table)
        .values(memberships)
        .execute(connection)?;
    Ok(())
}

fn assemble_computers(
    connection: &mut PgConnection,
    rows: Vec<ComputerRow>,
) -> InventoryRepositoryResult<Vec<Computer>> {
    let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();
    let memberships = computer_attributes::table
        .filter(computer_attributes::computer_id.eq_any(ids))
        .select(MembershipRow::as_select())
        .load::<MembershipRow>(connection)
        .map_err(InventoryRepositoryError::persistence)?;

    let mut grouped: HashMap<uuid::Uuid, (BTreeSet<AttributeId>, BTreeSet<AttributeId>)> =
        HashMap::new();
    for membership in memberships {
        let entry = grouped.entry(membership.computer_id).or_default();
        let attribute = AttributeId::from_uuid(membership.attribute_id);
        if membership.membership == TAG_MEMBERSHIP {
            entry.1.insert(attribute);
        } else {
            entry.0.insert(attribute);
        }
    }

    rows.into_iter()
        .map(|row| {
            let status = ComputerStatus::try_from(row.status.as_str())
                .map_err(InventoryRepositoryError::persistence)?;
            let (sync_attributes, tags) = grouped.remove(&row.id).unwrap_or_default();
            Ok(Computer::from_persisted(PersistedComputerData {
                id: ComputerId::from_uuid(row.id),
                name: row.name,
                project: ProjectId::from_uuid(row.project_id),
                status,
                sync_attributes,
                tags,
            }))
        })
        .collect()
}

fn to_attribute_set_row(set: &AttributeSet) -> InventoryRepositoryResult<AttributeSetRow> {
    let filter = serde_json::to_value(set.filter()).map_err(InventoryRepositoryError::persistence)?;
    Ok(AttributeSetRow {
        id: set.id().into_inner(),
        name: set.name().to_owned(),
        description: set.description().map(str::to_owned),
        enabled: set.is_enabled(),
        attribute_id: set.attribute().into_inner(),
        filter,
    })
}

fn row_to_attribute_set(row: AttributeSetRow) -> InventoryRepositoryResult<AttributeSet> {
    let filter = serde_json::from_value::<AttributeFilter>(row.filter)
        .map_err(InventoryRepositoryError::persistence)?;
    Ok(AttributeSet::from_persisted(PersistedAttributeSetData {
        id: AttributeSetId::from_uuid(row.id),
        name: row.name,
        description: row.description,
        enabled: row.enabled,
        attribute: AttributeId::from_uuid(row.attribute_id),
        filter,
    }))
}
