use crate::core::engine::ImportEngine;
use crate::core::export::export_csv;
use crate::core::header::HeaderLocator;
use crate::core::pipeline::CsvImportPipeline;
use crate::core::{CollectionStore, ConfigProvider, ImportResult, TargetEntity};
use crate::utils::error::{IngestError, Result};
use chrono::NaiveDate;
use std::sync::Arc;

/// Entry point used by the transport layer: `import(targetEntity, csvText)`.
///
/// The import is a destructive whole-collection replace. Callers are expected
/// to have prepared the store (collections and indexes) beforehand; nothing is
/// seeded here. Concurrent imports of the same entity are not serialized.
pub struct Importer<S: CollectionStore> {
    store: Arc<S>,
    locator: HeaderLocator,
    monitoring: bool,
    today: Option<NaiveDate>,
}

impl<S: CollectionStore> Importer<S> {
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            locator: HeaderLocator::default(),
            monitoring: false,
            today: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(store: S, config: &C) -> Self {
        Self::new(store)
            .with_header_locator(HeaderLocator::new(
                config.header_scan_lines(),
                config.header_min_keyword_matches(),
            ))
            .with_monitoring(config.monitoring_enabled())
    }

    pub fn with_header_locator(mut self, locator: HeaderLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitoring = enabled;
        self
    }

    /// Pins the date substituted for missing assembly dates.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn import(&self, target_entity: &str, csv_text: &str) -> Result<ImportResult> {
        if csv_text.is_empty() {
            return Err(IngestError::NoData);
        }
        let entity: TargetEntity = target_entity.parse()?;
        self.import_entity(entity, csv_text).await
    }

    pub async fn import_entity(&self, entity: TargetEntity, csv_text: &str) -> Result<ImportResult> {
        tracing::info!(
            "=== CSV import into {} ({} bytes) ===",
            entity.collection_name(),
            csv_text.len()
        );

        let pipeline = CsvImportPipeline::new(Arc::clone(&self.store), entity, csv_text)
            .with_locator(self.locator)
            .with_today(self.today);
        let engine = ImportEngine::new_with_monitoring(pipeline, self.monitoring);

        match engine.run().await {
            Ok(result) => {
                if !result.warnings.is_empty() {
                    tracing::warn!("Import finished with {} warnings", result.warnings.len());
                }
                Ok(result)
            }
            Err(e) => {
                tracing::error!("CSV import into {} failed: {}", entity.collection_name(), e);
                Err(e)
            }
        }
    }

    /// Serializes the current contents of a collection with the canonical headers.
    pub async fn export(&self, entity: TargetEntity) -> Result<String> {
        let records = self.store.find_all(entity).await?;
        export_csv(entity, &records)
    }
}
