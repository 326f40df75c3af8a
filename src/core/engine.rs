use crate::core::{ImportResult, Pipeline};
use crate::utils::error::{IngestError, Result};
use crate::utils::monitor::StageMonitor;
use std::time::Instant;

pub struct ImportEngine<P: Pipeline> {
    pipeline: P,
    monitor: StageMonitor,
}

impl<P: Pipeline> ImportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: StageMonitor::new(monitor_enabled),
        }
    }

    pub fn monitor(&self) -> &StageMonitor {
        &self.monitor
    }

    /// Runs extract, transform and load in order. Any structural error
    /// surfaces before `load`, so the collection stays untouched.
    pub async fn run(&self) -> Result<ImportResult> {
        tracing::info!("Starting CSV import...");

        // Extract
        let started = Instant::now();
        let parsed = self.pipeline.extract().await.inspect_err(log_failure)?;
        tracing::info!(
            "Parsed {} records (header at line {})",
            parsed.records.len(),
            parsed.header_index
        );
        self.monitor.record_stage("extract", started);

        // Transform
        let started = Instant::now();
        let batch = self.pipeline.transform(parsed).await.inspect_err(log_failure)?;
        tracing::info!(
            "Mapped {} valid records out of {}",
            batch.records.len(),
            batch.total_count
        );
        self.monitor.record_stage("transform", started);

        // Load
        let started = Instant::now();
        let result = self.pipeline.load(batch).await.inspect_err(log_failure)?;
        self.monitor.record_stage("load", started);

        tracing::info!("{}", result.message);
        self.monitor.log_final_stats();
        Ok(result)
    }
}

fn log_failure(error: &IngestError) {
    if error.is_structural() {
        tracing::warn!("⛔ Import rejected, collection left untouched: {}", error);
    } else {
        tracing::error!("❌ Import failed: {}", error);
    }
}
