//! Declarative query definitions.

use super::QueryDomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of record a query lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuerySubject {
    /// Managed computers.
    Computers,
    /// Attributes, with the number of visible computers carrying each.
    Attributes,
    /// Deployments.
    Deployments,
    /// Packages.
    Packages,
}

impl QuerySubject {
    /// Returns the fields records of this subject expose, in default
    /// display order.
    #[must_use]
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Computers => &["id", "name", "project", "status"],
            Self::Attributes => &["id", "property", "value", "kind", "description", "computers"],
            Self::Deployments => &[
                "id",
                "name",
                "project",
                "enabled",
                "start_date",
                "domain",
                "schedule",
                "comment",
            ],
            Self::Packages => &["id", "name", "project"],
        }
    }

    /// Returns `true` when records of this subject expose `field`.
    #[must_use]
    pub fn has_field(self, field: &str) -> bool {
        self.fields().iter().any(|known| *known == field)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Computers => "computers",
            Self::Attributes => "attributes",
            Self::Deployments => "deployments",
            Self::Packages => "packages",
        }
    }
}

impl fmt::Display for QuerySubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// The field's text equals the value.
    Equals,
    /// The field's text differs from the value.
    NotEquals,
    /// The field's text contains the value, ignoring case.
    Contains,
}

impl FilterOperator {
    /// Applies the comparison to a field's text.
    #[must_use]
    pub fn accepts(self, field: &str, value: &str) -> bool {
        match self {
            Self::Equals => field == value,
            Self::NotEquals => field != value,
            Self::Contains => field.to_lowercase().contains(&value.to_lowercase()),
        }
    }
}

/// Right-hand side of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// A fixed value.
    Literal(String),
    /// A value supplied by name when the query runs.
    Parameter(String),
}

/// One condition every listed record must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Field compared.
    pub field: String,
    /// Comparison.
    pub operator: FilterOperator,
    /// Compared value.
    pub value: FilterValue,
}

impl QueryFilter {
    /// Creates a filter.
    #[must_use]
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// A displayed field and its column title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedField {
    /// Field shown.
    pub field: String,
    /// Column title; the field name when absent.
    pub title: Option<String>,
}

impl ProjectedField {
    /// Shows `field` under its own name.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            title: None,
        }
    }

    /// Shows the field under `title`.
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns the column title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.field)
    }
}

/// What a query lists and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDefinition {
    subject: QuerySubject,
    filters: Vec<QueryFilter>,
    fields: Vec<ProjectedField>,
}

impl QueryDefinition {
    /// Creates a definition listing every field of `subject` unfiltered.
    #[must_use]
    pub const fn new(subject: QuerySubject) -> Self {
        Self {
            subject,
            filters: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Adds a filter.
    #[must_use]
    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replaces the displayed fields.
    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = ProjectedField>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Returns the subject.
    #[must_use]
    pub const fn subject(&self) -> QuerySubject {
        self.subject
    }

    /// Returns the filters.
    #[must_use]
    pub fn filters(&self) -> &[QueryFilter] {
        &self.filters
    }

    /// Returns the displayed fields; every subject field when none were
    /// chosen.
    #[must_use]
    pub fn projection(&self) -> Vec<ProjectedField> {
        if self.fields.is_empty() {
            return self
                .subject
                .fields()
                .iter()
                .map(|field| ProjectedField::new(*field))
                .collect();
        }
        self.fields.clone()
    }

    /// Returns the names of the parameters the filters use.
    #[must_use]
    pub fn parameters(&self) -> BTreeSet<&str> {
        self.filters
            .iter()
            .filter_map(|filter| match &filter.value {
                FilterValue::Parameter(name) => Some(name.as_str()),
                FilterValue::Literal(_) => None,
            })
            .collect()
    }

    /// Checks that every filter and projection names a subject field.
    ///
    /// # Errors
    ///
    /// Returns [`QueryDomainError::UnknownField`] for the first unknown
    /// field, or [`QueryDomainError::EmptyParameterName`] for a blank
    /// parameter.
    pub fn validate(&self) -> Result<(), QueryDomainError> {
        let named = self
            .filters
            .iter()
            .map(|filter| filter.field.as_str())
            .chain(self.fields.iter().map(|projected| projected.field.as_str()));
        for field in named {
            if !self.subject.has_field(field) {
                return Err(QueryDomainError::UnknownField {
                    subject: self.subject,
                    field: field.to_owned(),
                });
            }
        }
        if self.parameters().iter().any(|name| name.trim().is_empty()) {
            return Err(QueryDomainError::EmptyParameterName);
        }
        Ok(())
    }
}
