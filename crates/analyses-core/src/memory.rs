//! In-process analysis store
//!
//! Backs `analysesd --memory` and the test suites. Same ordering and
//! single-row semantics as the REST store.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::{AnalysisRecord, AnalysisStatus};
use crate::store::AnalysisStore;

/// `AnalysisStore` held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = AnalysisRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
        }
    }

    /// Add a record. Ids are not checked for uniqueness.
    pub fn insert(&self, record: AnalysisRecord) {
        self.records.write().push(record);
    }

    pub fn get(&self, id: &str) -> Option<AnalysisRecord> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_by_status(&self, status: &AnalysisStatus) -> StoreResult<Vec<AnalysisRecord>> {
        let mut rows: Vec<AnalysisRecord> = self
            .records
            .read()
            .iter()
            .filter(|r| &r.status == status)
            .cloned()
            .collect();
        rows.sort_by(AnalysisRecord::newest_first);
        Ok(rows)
    }

    async fn delete_single(&self, id: &str) -> StoreResult<Option<serde_json::Value>> {
        let mut records = self.records.write();
        let matches = records.iter().filter(|r| r.id == id).count();
        if matches != 1 {
            return Err(StoreError::NoSingleRow {
                message: format!("{} rows matched id '{}'", matches, id),
            });
        }

        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::Internal(format!("record '{}' vanished", id)))?;
        let removed = records.remove(pos);
        tracing::debug!(id = %removed.id, "Removed analysis from memory store");
        serde_json::to_value(removed)
            .map(Some)
            .map_err(|e| StoreError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn record(id: &str, status: AnalysisStatus, day: u32) -> AnalysisRecord {
        AnalysisRecord::new(
            id,
            status,
            Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        )
    }

    fn sample_store() -> MemoryStore {
        MemoryStore::with_records(vec![
            record("B", AnalysisStatus::Active, 1),
            record("C", AnalysisStatus::Deleted, 3),
            record("A", AnalysisStatus::Active, 2),
        ])
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let store = sample_store();
        let rows = store.list_by_status(&AnalysisStatus::Active).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        let rows = store.list_by_status(&AnalysisStatus::Active).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_once() {
        let store = sample_store();

        let removed = store.delete_single("A").await.unwrap().unwrap();
        assert_eq!(removed["id"], "A");
        assert_eq!(removed["created_at"], "2024-01-02T00:00:00Z");
        assert_eq!(store.len(), 2);
        assert!(store.get("A").is_none());

        let err = store.delete_single("A").await.unwrap_err();
        assert!(err.is_no_single_row());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_refuses_duplicate_ids() {
        let store = sample_store();
        store.insert(record("B", AnalysisStatus::Archived, 5));

        let err = store.delete_single("B").await.unwrap_err();
        assert!(err.is_no_single_row());
        assert_eq!(store.len(), 4);
    }

    #[tokio::test]
    async fn test_undated_records_list_last_and_delete() {
        let store = sample_store();
        let mut undated = record("D", AnalysisStatus::Active, 9);
        undated.created_at = None;
        store.insert(undated);

        let rows = store.list_by_status(&AnalysisStatus::Active).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "D"]);

        let removed = store.delete_single("D").await.unwrap().unwrap();
        assert_eq!(removed["created_at"], serde_json::Value::Null);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_delete_missing_is_no_single_row() {
        let store = sample_store();
        let err = tokio_test::block_on(store.delete_single("nope")).unwrap_err();
        assert!(matches!(err, StoreError::NoSingleRow { .. }));
        assert_eq!(store.len(), 3);
    }
}
