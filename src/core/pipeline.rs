use crate::core::header::HeaderLocator;
use crate::core::mapper::SchemaMapper;
use crate::core::parser::{parse_records, split_lines};
use crate::core::{CollectionStore, ImportResult, MappedBatch, ParsedCsv, Pipeline, TargetEntity};
use crate::utils::error::{IngestError, Result};
use chrono::NaiveDate;
use std::sync::Arc;

/// Extract = locate header + parse, transform = map, load = replace the collection.
pub struct CsvImportPipeline<S: CollectionStore> {
    store: Arc<S>,
    entity: TargetEntity,
    csv_text: String,
    locator: HeaderLocator,
    today: Option<NaiveDate>,
}

impl<S: CollectionStore> CsvImportPipeline<S> {
    pub fn new(store: Arc<S>, entity: TargetEntity, csv_text: impl Into<String>) -> Self {
        Self {
            store,
            entity,
            csv_text: csv_text.into(),
            locator: HeaderLocator::default(),
            today: None,
        }
    }

    pub fn with_locator(mut self, locator: HeaderLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_today(mut self, today: Option<NaiveDate>) -> Self {
        self.today = today;
        self
    }

    fn summary_message(&self, imported: usize, skipped: usize) -> String {
        let collection = self.entity.collection_name();
        if imported == 0 {
            format!("No valid records found to import to {}", collection)
        } else if skipped == 0 {
            format!("Successfully imported {} records to {}", imported, collection)
        } else {
            format!(
                "Successfully imported {} records to {} ({} records skipped due to missing critical fields or duplicates)",
                imported, collection, skipped
            )
        }
    }
}

#[async_trait::async_trait]
impl<S: CollectionStore> Pipeline for CsvImportPipeline<S> {
    async fn extract(&self) -> Result<ParsedCsv> {
        if self.csv_text.is_empty() {
            return Err(IngestError::NoData);
        }

        let lines = split_lines(&self.csv_text);
        if lines.len() < 2 {
            return Err(IngestError::TooFewLines { found: lines.len() });
        }

        let header_index = self.locator.locate(&lines, self.entity);
        tracing::debug!("Using line {} as header row for {}", header_index, self.entity);

        let parsed = parse_records(&lines, header_index)?;
        Ok(ParsedCsv {
            header_index,
            headers: parsed.headers,
            records: parsed.records,
            warnings: parsed.warnings,
        })
    }

    async fn transform(&self, parsed: ParsedCsv) -> Result<MappedBatch> {
        let mut mapper = SchemaMapper::new(self.entity);
        if let Some(today) = self.today {
            mapper = mapper.with_today(today);
        }

        let outcome = mapper.map_records(&parsed.records);

        // 寬度警告在前，逐列對應警告在後
        let mut warnings = parsed.warnings;
        warnings.extend(outcome.warnings);

        Ok(MappedBatch {
            total_count: parsed.records.len(),
            records: outcome.records,
            warnings,
        })
    }

    async fn load(&self, batch: MappedBatch) -> Result<ImportResult> {
        let collection = self.entity.collection_name();

        let removed = self.store.delete_all(self.entity).await?;
        tracing::info!("Cleared {} existing records from {}", removed, collection);

        let imported_count = if batch.records.is_empty() {
            0
        } else {
            let inserted = self.store.bulk_insert(self.entity, batch.records).await?;
            tracing::info!("Inserted {} records into {}", inserted, collection);
            inserted
        };

        let skipped_count = batch.total_count.saturating_sub(imported_count);
        Ok(ImportResult {
            entity: self.entity,
            imported_count,
            skipped_count,
            total_count: batch.total_count,
            warnings: batch.warnings,
            message: self.summary_message(imported_count, skipped_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_store::MemoryStore;

    fn pipeline(csv: &str) -> CsvImportPipeline<MemoryStore> {
        CsvImportPipeline::new(Arc::new(MemoryStore::new()), TargetEntity::Product, csv)
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_input() {
        assert!(matches!(pipeline("").extract().await, Err(IngestError::NoData)));
    }

    #[tokio::test]
    async fn test_extract_rejects_single_line() {
        let result = pipeline("Product Code,Product Group\n\n  \n").extract().await;
        assert!(matches!(result, Err(IngestError::TooFewLines { found: 1 })));
    }

    #[tokio::test]
    async fn test_extract_skips_preamble() {
        let parsed = pipeline("Stock export\nProduct Code,Product Description\nP1,Bolt")
            .extract()
            .await
            .unwrap();
        assert_eq!(parsed.header_index, 1);
        assert_eq!(parsed.records.len(), 1);
    }

    #[tokio::test]
    async fn test_transform_orders_width_warnings_first() {
        let p = pipeline("Product Code,Product Description\nP1\nP1,Bolt");
        let parsed = p.extract().await.unwrap();
        let batch = p.transform(parsed).await.unwrap();

        assert_eq!(batch.total_count, 2);
        assert_eq!(batch.records.len(), 1);
        assert!(batch.warnings[0].to_string().starts_with("Row 2 has 1 values"));
        assert!(batch.warnings[1].to_string().starts_with("Record 1:"));
        assert!(batch.warnings[2].to_string().starts_with("Record 2: Duplicate"));
    }

    #[test]
    fn test_summary_messages() {
        let p = pipeline("x");
        assert_eq!(
            p.summary_message(3, 0),
            "Successfully imported 3 records to UL_Product"
        );
        assert_eq!(
            p.summary_message(3, 2),
            "Successfully imported 3 records to UL_Product (2 records skipped due to missing critical fields or duplicates)"
        );
        assert_eq!(
            p.summary_message(0, 4),
            "No valid records found to import to UL_Product"
        );
    }
}
