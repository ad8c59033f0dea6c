//! AnalysisStore trait - the seam between the HTTP layer and the database

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{AnalysisRecord, AnalysisStatus};

/// Access to the analyses collection.
///
/// Implementations hold no cached copy of the data; every call goes to the
/// source of truth. A single instance is shared by all request handlers.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Short name for logs (e.g. "postgrest", "memory")
    fn name(&self) -> &str;

    /// All records with the given status, newest first
    /// (see [`AnalysisRecord::newest_first`]).
    async fn list_by_status(&self, status: &AnalysisStatus) -> StoreResult<Vec<AnalysisRecord>>;

    /// Delete the record with `id` and return the removed row as stored.
    ///
    /// Exactly one row must match. When zero (or several) rows match the
    /// store fails with [`StoreError::NoSingleRow`](crate::StoreError::NoSingleRow)
    /// and nothing is removed. `Ok(None)` means the store reported success
    /// but returned no row.
    ///
    /// The row is returned as raw JSON: a delete that went through must not
    /// be reported as failed because a column no longer fits
    /// [`AnalysisRecord`].
    async fn delete_single(&self, id: &str) -> StoreResult<Option<serde_json::Value>>;
}
