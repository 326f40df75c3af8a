use crate::core::schema::schema_for;
use crate::core::{MappedEntity, TargetEntity};
use crate::utils::error::{IngestError, Result};

fn row_values(entity: &MappedEntity) -> Vec<String> {
    match entity {
        MappedEntity::Assembly(r) => vec![
            r.assembly_number.clone(),
            r.assembly_date.clone(),
            r.assemble_by.clone(),
            r.status.clone(),
            r.product_code.clone(),
            r.product_description.clone(),
            r.source_warehouse.clone(),
            r.destination_warehouse.clone(),
            r.assembly_type.clone(),
            r.auto.clone(),
            r.assembled_quantity.to_string(),
        ],
        MappedEntity::Product(r) => vec![
            r.product_code.clone(),
            r.product_description.clone(),
            r.product_group.clone(),
            r.bin_location.clone(),
            r.base_pack.to_string(),
            r.allocated.to_string(),
            r.on_hand.to_string(),
            r.base_unit.clone(),
        ],
        MappedEntity::TestDocument(r) => vec![
            r.product_code.clone(),
            r.document_description.clone(),
            r.document_number.clone(),
            r.version.clone(),
            r.doc_type.clone(),
        ],
    }
}

/// One header line plus one line per record of `entity`; records of other kinds are ignored.
///
/// Embedded `"` are written doubled, but the import tokenizer treats every `"` as a
/// quote toggle, so they are dropped on re-import (`Pipe 3/4" brass` comes back as
/// `Pipe 3/4 brass`).
pub fn export_csv(entity: TargetEntity, records: &[MappedEntity]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(schema_for(entity).export_headers)?;
    for record in records.iter().filter(|r| r.entity() == entity) {
        writer.write_record(row_values(record))?;
    }

    let bytes = writer.into_inner().map_err(|e| IngestError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| IngestError::StoreError {
        message: format!("exported CSV is not valid UTF-8: {}", e),
    })
}
