//! Identifier types for the query bounded context.

use crate::identifier::uuid_identifier;

uuid_identifier! {
    /// Unique identifier for a saved query.
    SavedQueryId
}
