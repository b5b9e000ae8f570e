//! Identifier types for the scope bounded context.

use crate::identifier::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for an administrator profile.
    UserId
}

uuid_identifier! {
    /// Unique identifier for a domain.
    DomainId
}

uuid_identifier! {
    /// Unique identifier for a user-owned scope.
    ScopeId
}
