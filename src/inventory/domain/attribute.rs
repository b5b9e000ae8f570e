//! Attributes: `(property, value)` tags describing computers.

use super::{AttributeId, ComputerId, InventoryDomainError, ParseAttributeKindError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Discovered by the client at check-in.
    Sync,
    /// Assigned by an administrator on the server.
    Tag,
}

impl AttributeKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Tag => "tag",
        }
    }
}

impl TryFrom<&str> for AttributeKind {
    type Error = ParseAttributeKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sync" => Ok(Self::Sync),
            "tag" => Ok(Self::Tag),
            _ => Err(ParseAttributeKindError(value.to_owned())),
        }
    }
}

/// Namespace of an attribute, such as `CID`, `PLT`, or `SET`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyPrefix(String);

impl PropertyPrefix {
    /// Prefix of attributes identifying a single computer.
    pub const COMPUTER: &'static str = "CID";

    /// Prefix of attributes representing an attribute set.
    pub const ATTRIBUTE_SET: &'static str = "SET";

    /// Creates a validated property prefix.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::InvalidProperty`] when the value is
    /// empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, InventoryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(InventoryDomainError::InvalidProperty(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the prefix as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A computer characteristic, unique by `(property, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    id: AttributeId,
    property: PropertyPrefix,
    value: String,
    description: Option<String>,
    kind: AttributeKind,
    identifies: Option<ComputerId>,
}

/// Parameter object for reconstructing a persisted attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttributeData {
    /// Persisted identifier.
    pub id: AttributeId,
    /// Persisted property prefix.
    pub property: PropertyPrefix,
    /// Persisted value.
    pub value: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted kind.
    pub kind: AttributeKind,
    /// Computer identified by this attribute, if any.
    pub identifies: Option<ComputerId>,
}

impl Attribute {
    /// Creates a new attribute.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::EmptyAttributeValue`] when the value
    /// is blank.
    pub fn new(
        property: PropertyPrefix,
        value: impl Into<String>,
        kind: AttributeKind,
    ) -> Result<Self, InventoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InventoryDomainError::EmptyAttributeValue);
        }
        Ok(Self {
            id: AttributeId::new(),
            property,
            value: trimmed.to_owned(),
            description: None,
            kind,
            identifies: None,
        })
    }

    /// Creates the `CID` attribute identifying `computer`.
    #[must_use]
    pub fn for_computer(computer: ComputerId, name: &str) -> Self {
        Self {
            id: AttributeId::new(),
            property: PropertyPrefix(PropertyPrefix::COMPUTER.to_owned()),
            value: computer.to_string(),
            description: Some(name.to_owned()),
            kind: AttributeKind::Sync,
            identifies: Some(computer),
        }
    }

    /// Creates the `SET` attribute representing an attribute set.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryDomainError::EmptyAttributeValue`] when the set
    /// name is blank.
    pub fn for_attribute_set(name: &str) -> Result<Self, InventoryDomainError> {
        Self::new(
            PropertyPrefix(PropertyPrefix::ATTRIBUTE_SET.to_owned()),
            name,
            AttributeKind::Sync,
        )
    }

    /// Reconstructs an attribute from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttributeData) -> Self {
        Self {
            id: data.id,
            property: data.property,
            value: data.value,
            description: data.description,
            kind: data.kind,
            identifies: data.identifies,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the attribute identifier.
    #[must_use]
    pub const fn id(&self) -> AttributeId {
        self.id
    }

    /// Returns the property prefix.
    #[must_use]
    pub const fn property(&self) -> &PropertyPrefix {
        &self.property
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the attribute kind.
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Returns the computer this attribute identifies, if any.
    #[must_use]
    pub const fn identifies(&self) -> Option<ComputerId> {
        self.identifies
    }

    /// Returns `true` for administrator-assigned tags.
    #[must_use]
    pub fn is_tag(&self) -> bool {
        self.kind == AttributeKind::Tag
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.property, self.value)
    }
}
