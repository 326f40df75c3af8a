use crate::core::normalize::{
    normalize_date, normalize_enum_value, normalize_number, normalize_string,
};
use crate::core::schema::{schema_for, DefaultValue, EntitySchema, FieldKind, FieldSpec};
use crate::domain::model::{
    AssemblyRecord, MappedEntity, ProductRecord, RawRecord, TargetEntity, TestDocumentRecord,
    Warning,
};
use chrono::{Local, NaiveDate};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Text(String),
    Number(i64),
}

#[derive(Debug, Default)]
struct NormalizedRow {
    values: HashMap<&'static str, FieldValue>,
}

impl NormalizedRow {
    fn text(&self, name: &str) -> String {
        match self.values.get(name) {
            Some(FieldValue::Text(value)) => value.clone(),
            Some(FieldValue::Number(value)) => value.to_string(),
            None => String::new(),
        }
    }

    fn number(&self, name: &str) -> i64 {
        match self.values.get(name) {
            Some(FieldValue::Number(value)) => *value,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MappingOutcome {
    pub records: Vec<MappedEntity>,
    pub warnings: Vec<Warning>,
}

/// Turns raw records into typed entities for one target entity.
pub struct SchemaMapper {
    schema: &'static EntitySchema,
    today: NaiveDate,
}

impl SchemaMapper {
    pub fn new(entity: TargetEntity) -> Self {
        Self {
            schema: schema_for(entity),
            today: Local::now().date_naive(),
        }
    }

    /// Overrides the date used for missing assembly dates.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn map_records(&self, records: &[RawRecord]) -> MappingOutcome {
        let mut outcome = MappingOutcome::default();
        let mut seen_keys: HashSet<String> = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            let record_number = index + 1;
            let mut row_warnings = Vec::new();

            if let Some(row) = self.map_row(record, &mut seen_keys, &mut row_warnings) {
                outcome.records.push(build_entity(self.schema.entity, &row));
            } else {
                tracing::debug!("Record {} skipped: {}", record_number, row_warnings.join(", "));
            }

            if !row_warnings.is_empty() {
                outcome
                    .warnings
                    .push(Warning::record(record_number, row_warnings.join(", ")));
            }
        }

        outcome
    }

    fn map_row(
        &self,
        record: &RawRecord,
        seen_keys: &mut HashSet<String>,
        warnings: &mut Vec<String>,
    ) -> Option<NormalizedRow> {
        let schema = self.schema;

        let missing_critical = schema.critical_fields.iter().any(|name| {
            schema
                .field(name)
                .map(|field| first_present(record, field.aliases).is_none())
                .unwrap_or(true)
        });
        if missing_critical {
            let labels: Vec<&str> = schema
                .critical_fields
                .iter()
                .map(|name| schema.label(name))
                .collect();
            warnings.push(format!("Missing {} - SKIPPING", labels.join(" or ")));
            return None;
        }

        let key_field = schema.field(schema.dedup_field)?;
        let key = normalize_string(first_present(record, key_field.aliases));
        if !seen_keys.insert(key.clone()) {
            warnings.push(format!(
                "Duplicate {} \"{}\" - SKIPPING",
                key_field.label, key
            ));
            return None;
        }

        let mut row = NormalizedRow::default();
        for field in schema.fields {
            let value = self.extract_field(record, field, warnings);
            row.values.insert(field.name, value);
        }
        Some(row)
    }

    fn extract_field(
        &self,
        record: &RawRecord,
        field: &FieldSpec,
        warnings: &mut Vec<String>,
    ) -> FieldValue {
        let raw = first_present(record, field.aliases);

        let text = match field.kind {
            FieldKind::Number => return FieldValue::Number(normalize_number(raw, 0)),
            FieldKind::Text => normalize_string(raw),
            FieldKind::Enum(enum_type) => normalize_enum_value(raw, enum_type),
            FieldKind::Date => {
                let date = normalize_date(raw);
                warnings.extend(date.warnings);
                date.value
            }
        };

        if !text.is_empty() {
            return FieldValue::Text(text);
        }

        match field.default {
            Some(DefaultValue::Fixed(default)) => {
                warnings.push(format!("Missing {}, using {}", field.label, default));
                FieldValue::Text(default.to_string())
            }
            Some(DefaultValue::Today) => {
                warnings.push(format!("Missing {}, using current date", field.label));
                FieldValue::Text(self.today.format("%Y-%m-%d").to_string())
            }
            Some(DefaultValue::Zero) | None => FieldValue::Text(text),
        }
    }
}

/// First alias in the chain whose value is non-blank.
fn first_present<'a>(record: &'a RawRecord, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| record.get(alias))
        .find(|value| !value.trim().is_empty())
}

fn build_entity(entity: TargetEntity, row: &NormalizedRow) -> MappedEntity {
    match entity {
        TargetEntity::Assembly => MappedEntity::Assembly(AssemblyRecord {
            assembly_number: row.text("assemblyNumber"),
            assembly_date: row.text("assemblyDate"),
            assemble_by: row.text("assembleBy"),
            status: row.text("status"),
            product_code: row.text("productCode"),
            product_description: row.text("productDescription"),
            source_warehouse: row.text("sourceWarehouse"),
            destination_warehouse: row.text("destinationWarehouse"),
            assembly_type: row.text("assemblyType"),
            auto: row.text("auto"),
            assembled_quantity: row.number("assembledQuantity"),
        }),
        TargetEntity::Product => MappedEntity::Product(ProductRecord {
            product_code: row.text("productCode"),
            product_description: row.text("productDescription"),
            product_group: row.text("productGroup"),
            bin_location: row.text("binLocation"),
            base_pack: row.number("basePack"),
            allocated: row.number("allocated"),
            on_hand: row.number("onHand"),
            base_unit: row.text("baseUnit"),
        }),
        TargetEntity::TestDocument => MappedEntity::TestDocument(TestDocumentRecord {
            product_code: row.text("productCode"),
            document_description: row.text("documentDescription"),
            document_number: row.text("documentNumber"),
            version: row.text("version"),
            doc_type: row.text("type"),
        }),
    }
}

pub fn map_records(records: &[RawRecord], entity: TargetEntity) -> MappingOutcome {
    SchemaMapper::new(entity).map_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_assembly_fully_specified_row_has_no_warnings() {
        let rows = vec![record(&[
            ("Assembly Number", "ASM1"),
            ("Assembly Date", "15/01/2024"),
            ("Assemble By", "Dana"),
            ("Status", "in progress"),
            ("Product Code", "P1"),
            ("Product Description", "Pump"),
            ("Source Warehouse", "WH002"),
            ("Destination Warehouse", "WH003"),
            ("Assembly Type", "sub"),
            ("Auto", "y"),
            ("Assembled Quantity", "1,200"),
        ])];

        let outcome = SchemaMapper::new(TargetEntity::Assembly)
            .with_today(fixed_day())
            .map_records(&rows);

        assert!(outcome.warnings.is_empty());
        let MappedEntity::Assembly(asm) = &outcome.records[0] else {
            panic!("expected assembly");
        };
        assert_eq!(asm.assembly_date, "2024-01-15");
        assert_eq!(asm.status, "In Progress");
        assert_eq!(asm.assembly_type, "Sub Assembly");
        assert_eq!(asm.auto, "Yes");
        assert_eq!(asm.assembled_quantity, 1200);
    }

    #[test]
    fn test_assembly_defaults_are_warned_once_per_field() {
        let rows = vec![record(&[("Assembly Number", "ASM1"), ("Assembled Quantity", "3")])];
        let outcome = SchemaMapper::new(TargetEntity::Assembly)
            .with_today(fixed_day())
            .map_records(&rows);

        let MappedEntity::Assembly(asm) = &outcome.records[0] else {
            panic!("expected assembly");
        };
        assert_eq!(asm.assembly_date, "2024-06-30");
        assert_eq!(asm.assemble_by, "Unknown");
        assert_eq!(asm.status, "Active");
        assert_eq!(asm.product_code, "UNKNOWN");
        assert_eq!(asm.product_description, "Unknown Product");
        assert_eq!(asm.source_warehouse, "WH001");
        assert_eq!(asm.destination_warehouse, "WH001");
        assert_eq!(asm.assembly_type, "Main Assembly");
        assert_eq!(asm.auto, "No");

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(
            outcome.warnings[0].to_string(),
            "Record 1: Missing assembly date, using current date, \
             Missing assembler name, using Unknown, \
             Missing status, using Active, \
             Missing product code, using UNKNOWN, \
             Missing product description, using Unknown Product, \
             Missing source warehouse, using WH001, \
             Missing destination warehouse, using WH001, \
             Missing assembly type, using Main Assembly, \
             Missing auto field, using No"
        );
    }

    #[test]
    fn test_alias_chain_skips_blank_values() {
        let rows = vec![record(&[
            ("Product Code", "P1"),
            ("Product Description", "  "),
            ("Description", "Gearbox"),
            ("Group", "Drives"),
            ("Stock", "14 pcs"),
        ])];
        let outcome = map_records(&rows, TargetEntity::Product);

        let MappedEntity::Product(product) = &outcome.records[0] else {
            panic!("expected product");
        };
        assert_eq!(product.product_description, "Gearbox");
        assert_eq!(product.product_group, "Drives");
        assert_eq!(product.on_hand, 14);
        assert_eq!(product.base_pack, 0);
    }

    #[test]
    fn test_duplicate_keys_keep_first_occurrence() {
        let rows = vec![
            record(&[("Product Code", "P1"), ("Product Description", "First")]),
            record(&[("Product Code", "P1"), ("Product Description", "Second")]),
        ];
        let outcome = map_records(&rows, TargetEntity::Product);

        assert_eq!(outcome.records.len(), 1);
        let MappedEntity::Product(product) = &outcome.records[0] else {
            panic!("expected product");
        };
        assert_eq!(product.product_description, "First");

        let duplicates: Vec<_> = outcome
            .warnings
            .iter()
            .filter(|w| w.message.contains("Duplicate"))
            .collect();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(
            duplicates[0].to_string(),
            "Record 2: Duplicate product code \"P1\" - SKIPPING"
        );
    }

    #[test]
    fn test_missing_key_is_skipped_without_defaults() {
        let rows = vec![record(&[("Product Code", ""), ("Product Group", "Tools")])];
        let outcome = map_records(&rows, TargetEntity::Product);

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(
            outcome.warnings[0].to_string(),
            "Record 1: Missing product code - SKIPPING"
        );
    }

    #[test]
    fn test_test_document_needs_product_code_and_number() {
        let rows = vec![
            record(&[("Document Number", "TD-1")]),
            record(&[("Product Code", "P1"), ("Doc Number", "TD-2"), ("Ver", "2.1")]),
        ];
        let outcome = map_records(&rows, TargetEntity::TestDocument);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            outcome.warnings[0].to_string(),
            "Record 1: Missing product code or document number - SKIPPING"
        );
        let MappedEntity::TestDocument(doc) = &outcome.records[0] else {
            panic!("expected test document");
        };
        assert_eq!(doc.document_number, "TD-2");
        assert_eq!(doc.version, "2.1");
        assert_eq!(doc.document_description, "Test Document");
        assert_eq!(doc.doc_type, "General");
    }

    #[test]
    fn test_serial_date_is_warned_then_defaulted() {
        let rows = vec![record(&[("Assembly Number", "ASM9"), ("Date", "45678")])];
        let outcome = SchemaMapper::new(TargetEntity::Assembly)
            .with_today(fixed_day())
            .map_records(&rows);

        let MappedEntity::Assembly(asm) = &outcome.records[0] else {
            panic!("expected assembly");
        };
        assert_eq!(asm.assembly_date, "2024-06-30");
        let message = &outcome.warnings[0].message;
        assert!(message.starts_with("Numeric value passed to date parser"));
        assert!(message.contains("Missing assembly date, using current date"));
    }

    #[test]
    fn test_mapped_entities_have_no_empty_text_fields() {
        let rows = vec![
            record(&[("Assembly Number", "A1")]),
            record(&[("Assembly Number", "A2"), ("Status", "weird value")]),
        ];
        let outcome = map_records(&rows, TargetEntity::Assembly);
        for entity in outcome.records {
            let json = serde_json::to_value(&entity).unwrap();
            for (field, value) in json.as_object().unwrap() {
                if let Some(text) = value.as_str() {
                    assert!(!text.is_empty(), "{} is empty", field);
                }
            }
        }
    }
}
