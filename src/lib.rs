pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::{JsonFileStore, MemoryStore};
pub use crate::core::{
    engine::ImportEngine, export::export_csv, importer::Importer, pipeline::CsvImportPipeline,
};
pub use domain::model::{ImportResult, MappedEntity, TargetEntity, Warning};
pub use domain::ports::{CollectionStore, ConfigProvider};
pub use utils::error::{IngestError, Result};
