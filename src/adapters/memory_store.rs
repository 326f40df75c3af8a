use crate::core::{CollectionStore, MappedEntity, TargetEntity};
use crate::utils::error::{IngestError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-process collections. Clones share the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<TargetEntity, Vec<MappedEntity>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, entity: TargetEntity) -> usize {
        let collections = self.collections.lock().await;
        collections.get(&entity).map(Vec::len).unwrap_or(0)
    }
}

/// Checks kind and unique-key constraints the way a unique index would.
pub(crate) fn check_insert(
    entity: TargetEntity,
    existing: &[MappedEntity],
    records: &[MappedEntity],
) -> Result<()> {
    let mut keys: HashSet<&str> = existing.iter().map(MappedEntity::dedup_key).collect();

    for record in records {
        if record.entity() != entity {
            return Err(IngestError::StoreError {
                message: format!(
                    "cannot insert a {} record into {}",
                    record.entity(),
                    entity.collection_name()
                ),
            });
        }
        if !keys.insert(record.dedup_key()) {
            return Err(IngestError::StoreError {
                message: format!(
                    "duplicate key \"{}\" in {}",
                    record.dedup_key(),
                    entity.collection_name()
                ),
            });
        }
    }
    Ok(())
}

impl CollectionStore for MemoryStore {
    async fn find_all(&self, entity: TargetEntity) -> Result<Vec<MappedEntity>> {
        let collections = self.collections.lock().await;
        Ok(collections.get(&entity).cloned().unwrap_or_default())
    }

    async fn delete_all(&self, entity: TargetEntity) -> Result<usize> {
        let mut collections = self.collections.lock().await;
        Ok(collections.remove(&entity).map(|records| records.len()).unwrap_or(0))
    }

    async fn bulk_insert(&self, entity: TargetEntity, records: Vec<MappedEntity>) -> Result<usize> {
        let mut collections = self.collections.lock().await;
        let collection = collections.entry(entity).or_default();
        check_insert(entity, collection, &records)?;

        let inserted = records.len();
        collection.extend(records);
        Ok(inserted)
    }
}
