pub mod engine;
pub mod export;
pub mod header;
pub mod importer;
pub mod mapper;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod schema;

pub use crate::domain::model::{
    ImportResult, MappedEntity, RawRecord, TargetEntity, Warning, WarningScope,
};
pub use crate::domain::ports::{
    CollectionStore, ConfigProvider, MappedBatch, ParsedCsv, Pipeline,
};
pub use crate::utils::error::Result;
