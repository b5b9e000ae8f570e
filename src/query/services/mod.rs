//! Application services for saved queries.

mod evaluator;

pub use evaluator::{QueryService, QueryServiceError, QueryServiceResult};
