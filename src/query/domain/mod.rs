//! Domain model for saved query definitions and results.

mod definition;
mod error;
mod ids;
mod result;
mod saved;

pub use definition::{FilterOperator, FilterValue, ProjectedField, QueryDefinition, QueryFilter, QuerySubject};
pub use error::QueryDomainError;
pub use ids::SavedQueryId;
pub use result::QueryResult;
pub use saved::SavedQuery;
