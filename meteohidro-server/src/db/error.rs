//! Database error type shared by repositories and probes

use super::pool::PoolError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("row has {actual} columns, expected {expected}")]
    ColumnCount { expected: usize, actual: usize },

    #[error("column '{column}' has unsupported type {type_name}")]
    UnsupportedColumn { column: String, type_name: String },
}

impl DbError {
    /// Pool exhausted or closed: the request may succeed later.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Pool(e) if e.is_unavailable())
    }
}
