use async_trait::async_trait;
use indexmap::IndexMap;
use model::record::{LocationRecord, RecordKey};
use tokio::sync::RwLock;

use crate::{RecordStore, Result, StoreError};

/// Process local store, keeps records in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<IndexMap<RecordKey, LocationRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = LocationRecord>) -> Self {
        Self {
            records: RwLock::new(
                records
                    .into_iter()
                    .map(|record| (record.key.clone(), record))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put(&self, record: &LocationRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, key: &RecordKey) -> Result<LocationRecord> {
        self.records
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    async fn fetch_all(&self) -> Result<Vec<LocationRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use model::{rating::Rating, ExampleData};

    use super::*;

    #[tokio::test]
    async fn put_then_fetch_returns_the_record() {
        let store = MemoryRecordStore::new();
        let record = LocationRecord::example_data();
        store.put(&record).await.unwrap();

        assert_eq!(store.fetch_all().await.unwrap(), vec![record.clone()]);
        assert_eq!(store.get(&record.key).await.unwrap(), record);
    }

    #[tokio::test]
    async fn put_with_existing_key_overwrites() {
        let first = LocationRecord::example_data();
        let store = MemoryRecordStore::with_records([first.clone()]);

        let mut second = first.clone();
        second.rating = Rating::new(5).unwrap();
        second.comment = String::new();
        second.period = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        store.put(&second).await.unwrap();

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all, vec![second]);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let store = MemoryRecordStore::new();
        let key = RecordKey::new("2023-05-01_Nowhere");
        assert!(matches!(
            store.get(&key).await,
            Err(StoreError::NotFound(missing)) if missing == key
        ));
        assert!(crate::not_found_to_none(store.get(&key).await)
            .unwrap()
            .is_none());
    }
}
