//! Diesel row models for inventory persistence.

use super::schema::{attribute_sets, attributes, computer_attributes, computers};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for attributes.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attributes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttributeRow {
    pub id: uuid::Uuid,
    pub property: String,
    pub value: String,
    pub description: Option<String>,
    pub kind: String,
    pub identifies: Option<uuid::Uuid>,
}

/// Insert model for attributes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attributes)]
pub struct NewAttributeRow {
    pub id: uuid::Uuid,
    pub property: String,
    pub value: String,
    pub description: Option<String>,
    pub kind: String,
    pub identifies: Option<uuid::Uuid>,
}

/// Query result and insert model for computers.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = computers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ComputerRow {
    pub id: uuid::Uuid,
    pub name: String,
    pub project_id: uuid::Uuid,
    pub status: String,
}

/// Attribute membership of a computer.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = computer_attributes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MembershipRow {
    pub computer_id: uuid::Uuid,
    pub attribute_id: uuid::Uuid,
    pub membership: String,
}

/// Query result and upsert model for attribute sets.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = attribute_sets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttributeSetRow {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub attribute_id: uuid::Uuid,
    pub filter: Value,
}

/// Result row of a `COUNT` query.
#[derive(Debug, Clone, QueryableByName)]
pub struct CountRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub count: i64,
}

/// Result row of a per-attribute `COUNT` query.
#[derive(Debug, Clone, QueryableByName)]
pub struct AttributeCountRow {
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub attribute_id: uuid::Uuid,
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub count: i64,
}
