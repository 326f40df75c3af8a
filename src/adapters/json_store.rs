use crate::adapters::memory_store::check_insert;
use crate::core::{CollectionStore, MappedEntity, TargetEntity};
use crate::domain::model::{AssemblyRecord, ProductRecord, TestDocumentRecord};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// One JSON array per collection, stored as `<base>/<collection>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn collection_path(&self, entity: TargetEntity) -> PathBuf {
        self.base_path
            .join(format!("{}.json", entity.collection_name()))
    }

    /// Creates the store directory and an empty file for every collection that
    /// does not exist yet. Must run before the first import.
    pub async fn ensure_collections(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.base_path).await?;
        for entity in TargetEntity::ALL {
            let path = self.collection_path(entity);
            if !tokio::fs::try_exists(&path).await? {
                tracing::info!("Creating empty collection {}", path.display());
                self.write_collection(entity, &[]).await?;
            }
        }
        Ok(())
    }

    async fn read_collection(&self, entity: TargetEntity) -> Result<Vec<MappedEntity>> {
        let path = self.collection_path(entity);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }

        let data = tokio::fs::read(&path).await?;
        let records: Vec<MappedEntity> = match entity {
            TargetEntity::Assembly => serde_json::from_slice::<Vec<AssemblyRecord>>(&data)?
                .into_iter()
                .map(MappedEntity::Assembly)
                .collect(),
            TargetEntity::Product => serde_json::from_slice::<Vec<ProductRecord>>(&data)?
                .into_iter()
                .map(MappedEntity::Product)
                .collect(),
            TargetEntity::TestDocument => {
                serde_json::from_slice::<Vec<TestDocumentRecord>>(&data)?
                    .into_iter()
                    .map(MappedEntity::TestDocument)
                    .collect()
            }
        };
        Ok(records)
    }

    async fn write_collection(&self, entity: TargetEntity, records: &[MappedEntity]) -> Result<()> {
        let path = self.collection_path(entity);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 先寫暫存檔再改名，避免留下寫到一半的集合
        let json = serde_json::to_vec_pretty(records)?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

impl CollectionStore for JsonFileStore {
    async fn find_all(&self, entity: TargetEntity) -> Result<Vec<MappedEntity>> {
        self.read_collection(entity).await
    }

    async fn delete_all(&self, entity: TargetEntity) -> Result<usize> {
        let removed = self.read_collection(entity).await?.len();
        self.write_collection(entity, &[]).await?;
        Ok(removed)
    }

    async fn bulk_insert(&self, entity: TargetEntity, records: Vec<MappedEntity>) -> Result<usize> {
        let mut existing = self.read_collection(entity).await?;
        check_insert(entity, &existing, &records)?;

        let inserted = records.len();
        existing.extend(records);
        self.write_collection(entity, &existing).await?;
        Ok(inserted)
    }
}
