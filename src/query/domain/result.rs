//! Tabular query results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rows produced by a query run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column titles.
    pub titles: Vec<String>,
    /// One value per column for each listed record.
    pub rows: Vec<Vec<Value>>,
    /// Whether rows were dropped to honour the row limit.
    pub truncated: bool,
}
