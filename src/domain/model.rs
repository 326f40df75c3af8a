use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::IngestError;

/// The reference tables a CSV upload can replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetEntity {
    Assembly,
    Product,
    TestDocument,
}

impl TargetEntity {
    pub const ALL: [TargetEntity; 3] = [
        TargetEntity::Assembly,
        TargetEntity::Product,
        TargetEntity::TestDocument,
    ];

    /// Name of the backing collection in the document store.
    pub fn collection_name(&self) -> &'static str {
        match self {
            TargetEntity::Assembly => "UL_ASM",
            TargetEntity::Product => "UL_Product",
            TargetEntity::TestDocument => "Test_Document_List",
        }
    }
}

impl fmt::Display for TargetEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetEntity::Assembly => "Assembly",
            TargetEntity::Product => "Product",
            TargetEntity::TestDocument => "TestDocument",
        };
        f.write_str(name)
    }
}

impl FromStr for TargetEntity {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assembly" | "ul_asm" => Ok(TargetEntity::Assembly),
            "product" | "ul_product" => Ok(TargetEntity::Product),
            "testdocument" | "test_document_list" => Ok(TargetEntity::TestDocument),
            _ => Err(IngestError::UnsupportedEntity {
                name: s.to_string(),
            }),
        }
    }
}

/// One data line, keyed by canonical header. Values are always raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub values: HashMap<String, String>,
}

impl RawRecord {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }

    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.values.insert(header.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningScope {
    /// Physical line position among the non-blank input lines.
    Line,
    /// 1-based position among parsed data records.
    Record,
}

/// Non-fatal, row-scoped diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub row_index: usize,
    pub scope: WarningScope,
    pub message: String,
}

impl Warning {
    pub fn line(row_index: usize, message: impl Into<String>) -> Self {
        Self {
            row_index,
            scope: WarningScope::Line,
            message: message.into(),
        }
    }

    pub fn record(row_index: usize, message: impl Into<String>) -> Self {
        Self {
            row_index,
            scope: WarningScope::Record,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            WarningScope::Line => write!(f, "Row {} {}", self.row_index, self.message),
            WarningScope::Record => write!(f, "Record {}: {}", self.row_index, self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyRecord {
    pub assembly_number: String,
    pub assembly_date: String,
    pub assemble_by: String,
    pub status: String,
    pub product_code: String,
    pub product_description: String,
    pub source_warehouse: String,
    pub destination_warehouse: String,
    pub assembly_type: String,
    pub auto: String,
    pub assembled_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_code: String,
    pub product_description: String,
    pub product_group: String,
    pub bin_location: String,
    pub base_pack: i64,
    pub allocated: i64,
    pub on_hand: i64,
    pub base_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDocumentRecord {
    pub product_code: String,
    pub document_description: String,
    pub document_number: String,
    pub version: String,
    #[serde(rename = "type")]
    pub doc_type: String,
}

/// A validated, normalized row ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappedEntity {
    Assembly(AssemblyRecord),
    Product(ProductRecord),
    TestDocument(TestDocumentRecord),
}

impl MappedEntity {
    pub fn entity(&self) -> TargetEntity {
        match self {
            MappedEntity::Assembly(_) => TargetEntity::Assembly,
            MappedEntity::Product(_) => TargetEntity::Product,
            MappedEntity::TestDocument(_) => TargetEntity::TestDocument,
        }
    }

    pub fn dedup_key(&self) -> &str {
        match self {
            MappedEntity::Assembly(record) => &record.assembly_number,
            MappedEntity::Product(record) => &record.product_code,
            MappedEntity::TestDocument(record) => &record.document_number,
        }
    }
}

/// Serialized warnings are the rendered `Row N ...` / `Record N: ...` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub entity: TargetEntity,
    pub imported_count: usize,
    pub skipped_count: usize,
    pub total_count: usize,
    #[serde(serialize_with = "serialize_warnings")]
    pub warnings: Vec<Warning>,
    pub message: String,
}

impl ImportResult {
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

fn serialize_warnings<S: serde::Serializer>(
    warnings: &[Warning],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(warnings.iter().map(ToString::to_string))
}
