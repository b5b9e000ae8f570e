//! Identifier types for the inventory domain.

use crate::identifier::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for an attribute row.
    AttributeId
}

uuid_identifier! {
    /// Unique identifier for a managed computer.
    ComputerId
}

uuid_identifier! {
    /// Unique identifier for a project (platform release a computer runs).
    ProjectId
}

uuid_identifier! {
    /// Unique identifier for an attribute set.
    AttributeSetId
}
