use crate::domain::model::{ImportResult, MappedEntity, RawRecord, TargetEntity, Warning};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Document-store collections, one per target entity.
pub trait CollectionStore: Send + Sync {
    fn find_all(
        &self,
        entity: TargetEntity,
    ) -> impl std::future::Future<Output = Result<Vec<MappedEntity>>> + Send;

    /// Returns the number of removed documents.
    fn delete_all(&self, entity: TargetEntity)
        -> impl std::future::Future<Output = Result<usize>> + Send;

    /// Returns the number of inserted documents.
    fn bulk_insert(
        &self,
        entity: TargetEntity,
        records: Vec<MappedEntity>,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn store_path(&self) -> &str;
    fn header_scan_lines(&self) -> usize;
    fn header_min_keyword_matches(&self) -> usize;
    fn monitoring_enabled(&self) -> bool;
}

/// Output of the extract stage: header resolution plus raw rows.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub header_index: usize,
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    pub warnings: Vec<Warning>,
}

/// Output of the transform stage.
#[derive(Debug, Clone)]
pub struct MappedBatch {
    pub total_count: usize,
    pub records: Vec<MappedEntity>,
    pub warnings: Vec<Warning>,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ParsedCsv>;
    async fn transform(&self, parsed: ParsedCsv) -> Result<MappedBatch>;
    async fn load(&self, batch: MappedBatch) -> Result<ImportResult>;
}
