//! Declarative per-entity import descriptors.
//!
//! Each target entity is described by data only: which canonical headers feed
//! each field, how the field is coerced, what default fills it, and which
//! fields make up the dedup key. The mapper is a single generic function over
//! these tables.

use crate::core::normalize::EnumType;
use crate::domain::model::TargetEntity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Enum(EnumType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Substituted silently; numbers fall back to zero.
    Zero,
    Fixed(&'static str),
    Today,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Human wording used in warnings, e.g. "assembly date".
    pub label: &'static str,
    /// Alias-fallback chain, checked in order.
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    pub default: Option<DefaultValue>,
}

#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    pub entity: TargetEntity,
    pub header_keywords: &'static [&'static str],
    /// Fields that must be present for the row to be kept.
    pub critical_fields: &'static [&'static str],
    pub dedup_field: &'static str,
    pub fields: &'static [FieldSpec],
    pub export_headers: &'static [&'static str],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn label(&self, name: &str) -> &'static str {
        self.field(name).map(|field| field.label).unwrap_or("field")
    }
}

/// Header synonyms applied to every header cell before title-casing.
pub const HEADER_SYNONYMS: &[(&str, &str)] = &[
    ("assembly no", "Assembly Number"),
    ("assembly num", "Assembly Number"),
    ("asm number", "Assembly Number"),
    ("asm no", "Assembly Number"),
    ("product desc", "Product Description"),
    ("prod code", "Product Code"),
    ("prod desc", "Product Description"),
    ("qty", "Assembled Quantity"),
    ("quantity", "Assembled Quantity"),
    ("assembled qty", "Assembled Quantity"),
];

const fn text(
    name: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
    default: Option<DefaultValue>,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        aliases,
        kind: FieldKind::Text,
        default,
    }
}

const fn number(name: &'static str, label: &'static str, aliases: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        name,
        label,
        aliases,
        kind: FieldKind::Number,
        default: Some(DefaultValue::Zero),
    }
}

const fn enumerated(
    name: &'static str,
    label: &'static str,
    aliases: &'static [&'static str],
    enum_type: EnumType,
    default: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        aliases,
        kind: FieldKind::Enum(enum_type),
        default: Some(DefaultValue::Fixed(default)),
    }
}

pub const ASSEMBLY_SCHEMA: EntitySchema = EntitySchema {
    entity: TargetEntity::Assembly,
    header_keywords: &["assembly number", "product code", "assembly date"],
    critical_fields: &["assemblyNumber"],
    dedup_field: "assemblyNumber",
    fields: &[
        text(
            "assemblyNumber",
            "assembly number",
            &["Assembly Number", "Assembly No", "Asm Number"],
            None,
        ),
        FieldSpec {
            name: "assemblyDate",
            label: "assembly date",
            aliases: &["Assembly Date", "Date"],
            kind: FieldKind::Date,
            default: Some(DefaultValue::Today),
        },
        text(
            "assembleBy",
            "assembler name",
            &["Assemble By", "Assembled By", "Assembler"],
            Some(DefaultValue::Fixed("Unknown")),
        ),
        enumerated("status", "status", &["Status"], EnumType::Status, "Active"),
        text(
            "productCode",
            "product code",
            &["Product Code", "Prod Code"],
            Some(DefaultValue::Fixed("UNKNOWN")),
        ),
        text(
            "productDescription",
            "product description",
            &["Product Description", "Prod Desc", "Description"],
            Some(DefaultValue::Fixed("Unknown Product")),
        ),
        text(
            "sourceWarehouse",
            "source warehouse",
            &["Source Warehouse", "Source"],
            Some(DefaultValue::Fixed("WH001")),
        ),
        text(
            "destinationWarehouse",
            "destination warehouse",
            &["Destination Warehouse", "Destination"],
            Some(DefaultValue::Fixed("WH001")),
        ),
        enumerated(
            "assemblyType",
            "assembly type",
            &["Assembly Type", "Type"],
            EnumType::AssemblyType,
            "Main Assembly",
        ),
        enumerated("auto", "auto field", &["Auto", "Automatic"], EnumType::Auto, "No"),
        number(
            "assembledQuantity",
            "assembled quantity",
            &["Assembled Quantity", "Quantity", "Qty"],
        ),
    ],
    export_headers: &[
        "Assembly Number",
        "Assembly Date",
        "Assemble By",
        "Status",
        "Product Code",
        "Product Description",
        "Source Warehouse",
        "Destination Warehouse",
        "Assembly Type",
        "Auto",
        "Assembled Quantity",
    ],
};

pub const PRODUCT_SCHEMA: EntitySchema = EntitySchema {
    entity: TargetEntity::Product,
    header_keywords: &["product code", "product description", "product group"],
    critical_fields: &["productCode"],
    dedup_field: "productCode",
    fields: &[
        text("productCode", "product code", &["Product Code", "Prod Code"], None),
        text(
            "productDescription",
            "product description",
            &["Product Description", "Description"],
            Some(DefaultValue::Fixed("Unknown Product")),
        ),
        text(
            "productGroup",
            "product group",
            &["Product Group", "Group"],
            Some(DefaultValue::Fixed("General")),
        ),
        text(
            "binLocation",
            "bin location",
            &["Bin Location", "Location"],
            Some(DefaultValue::Fixed("A1-B1")),
        ),
        number("basePack", "base pack", &["Base Pack", "Pack Size"]),
        number("allocated", "allocated", &["Allocated"]),
        number("onHand", "on hand", &["On Hand", "Stock"]),
        text(
            "baseUnit",
            "base unit",
            &["Base Unit", "Unit"],
            Some(DefaultValue::Fixed("PCS")),
        ),
    ],
    export_headers: &[
        "Product Code",
        "Product Description",
        "Product Group",
        "Bin Location",
        "Base Pack",
        "Allocated",
        "On Hand",
        "Base Unit",
    ],
};

pub const TEST_DOCUMENT_SCHEMA: EntitySchema = EntitySchema {
    entity: TargetEntity::TestDocument,
    header_keywords: &["product code", "document description", "document number"],
    critical_fields: &["productCode", "documentNumber"],
    dedup_field: "documentNumber",
    fields: &[
        text("productCode", "product code", &["Product Code", "Prod Code"], None),
        text(
            "documentDescription",
            "document description",
            &["Document Description", "Description"],
            Some(DefaultValue::Fixed("Test Document")),
        ),
        text(
            "documentNumber",
            "document number",
            &["Document Number", "Doc Number"],
            None,
        ),
        text("version", "version", &["Version", "Ver"], Some(DefaultValue::Fixed("1.0"))),
        text("type", "type", &["Type"], Some(DefaultValue::Fixed("General"))),
    ],
    export_headers: &[
        "Product Code",
        "Document Description",
        "Document Number",
        "Version",
        "Type",
    ],
};

pub fn schema_for(entity: TargetEntity) -> &'static EntitySchema {
    match entity {
        TargetEntity::Assembly => &ASSEMBLY_SCHEMA,
        TargetEntity::Product => &PRODUCT_SCHEMA,
        TargetEntity::TestDocument => &TEST_DOCUMENT_SCHEMA,
    }
}

/// Static header keyword fragments used to recognise an entity's header row.
pub fn header_keywords(entity: TargetEntity) -> &'static [&'static str] {
    schema_for(entity).header_keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_critical_field_is_declared() {
        for entity in TargetEntity::ALL {
            let schema = schema_for(entity);
            assert_eq!(schema.entity, entity);
            assert!(schema.field(schema.dedup_field).is_some());
            assert!(schema.critical_fields.contains(&schema.dedup_field));
            for critical in schema.critical_fields {
                let field = schema.field(critical).unwrap();
                assert!(field.default.is_none(), "{} must not be defaulted", critical);
            }
        }
    }

    #[test]
    fn test_export_headers_match_field_count() {
        for entity in TargetEntity::ALL {
            let schema = schema_for(entity);
            assert_eq!(schema.export_headers.len(), schema.fields.len());
        }
    }

    #[test]
    fn test_header_keywords() {
        assert_eq!(
            header_keywords(TargetEntity::Assembly),
            &["assembly number", "product code", "assembly date"]
        );
    }
}
