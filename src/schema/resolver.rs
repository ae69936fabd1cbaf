use tracing::debug;

use super::Schema;
use crate::errors::{MappingError, MappingResult};
use crate::field_registry::FieldRegistry;
use crate::models::CellValue;

/// Remap `schema` onto the physical layout of `header`.
///
/// Each header cell is looked up in the field registry by its exact label;
/// the first cell naming a column decides its position. Unknown headers are
/// ignored. Unmatched columns get position 0; unmatched mandatory columns
/// fail the whole worksheet, naming every missing label at once.
pub fn resolve_columns(schema: &Schema, header: &[CellValue]) -> MappingResult<Schema> {
    let registry = FieldRegistry::global();
    let mut resolved = schema.clone();
    for column in &mut resolved.columns {
        column.position = 0;
    }

    for (index, cell) in header.iter().enumerate() {
        let Some(label) = cell.as_text() else {
            continue;
        };
        let Ok(field) = registry.label_to_identity(schema.kind, label) else {
            debug!("Ignoring unknown column '{}' in worksheet {}", label, schema.kind);
            continue;
        };
        if let Some(column) = resolved.columns.iter_mut().find(|c| c.field == field && !c.is_resolved()) {
            column.position = index + 1;
        }
    }

    let missing: Vec<String> = resolved
        .columns
        .iter()
        .filter(|column| !column.optional && !column.is_resolved())
        .map(|column| column.label.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(MappingError::MissingMandatoryColumns {
            sheet: schema.kind.to_string(),
            labels: missing,
        });
    }

    debug!(
        "Resolved {} of {} columns for worksheet {}",
        resolved.resolved_columns().count(),
        resolved.columns.len(),
        schema.kind
    );

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_registry::{FieldColumn, FieldId, OptionSetColumn, RecordKind};
    use crate::schema::build_schema;

    fn header(labels: &[&str]) -> Vec<CellValue> {
        labels.iter().map(|label| CellValue::from(*label)).collect()
    }

    #[test]
    fn declared_header_keeps_declared_positions() {
        let schema = build_schema(RecordKind::Field);
        let labels: Vec<&str> = schema.columns.iter().map(|c| c.label).collect();
        let resolved = resolve_columns(&schema, &header(&labels)).unwrap();
        assert_eq!(resolved, schema);
    }

    #[test]
    fn reordered_header_is_followed() {
        let schema = build_schema(RecordKind::OptionSet);
        let mut labels: Vec<&str> = schema.columns.iter().map(|c| c.label).collect();
        labels.reverse();
        let resolved = resolve_columns(&schema, &header(&labels)).unwrap();

        let options = resolved
            .column(FieldId::OptionSet(OptionSetColumn::Options))
            .unwrap();
        assert_eq!(options.position, 1);
        let solution = resolved
            .column(FieldId::OptionSet(OptionSetColumn::SolutionUniqueName))
            .unwrap();
        assert_eq!(solution.position, labels.len());
    }

    #[test]
    fn missing_optional_columns_resolve_to_zero() {
        let schema = build_schema(RecordKind::OptionSet);
        let resolved = resolve_columns(
            &schema,
            &header(&[
                "Schema Name (eg. new_OptionSet)",
                "Display Name",
                "Options (Format: Label|Value;Label|Value;...)",
            ]),
        )
        .unwrap();
        let description = resolved
            .column(FieldId::OptionSet(OptionSetColumn::Description))
            .unwrap();
        assert_eq!(description.position, 0);
        assert_eq!(resolved.resolved_columns().count(), 3);
    }

    #[test]
    fn missing_mandatory_columns_are_reported_together() {
        let schema = build_schema(RecordKind::Field);
        let err = resolve_columns(&schema, &header(&["Display Name", "Description"])).unwrap_err();
        match err {
            MappingError::MissingMandatoryColumns { sheet, labels } => {
                assert_eq!(sheet, "Fields");
                assert_eq!(
                    labels,
                    vec![
                        "Record Type Logical Name (eg. new_record)",
                        "Field Schema Name (eg. new_Field)",
                        "Data Type",
                    ]
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_and_repeated_headers_do_not_move_columns() {
        let schema = build_schema(RecordKind::OptionSet);
        let resolved = resolve_columns(
            &schema,
            &header(&[
                "Notes",
                "Schema Name (eg. new_OptionSet)",
                "Display Name",
                "Schema Name (eg. new_OptionSet)",
                "Options (Format: Label|Value;Label|Value;...)",
            ]),
        )
        .unwrap();

        let name = resolved
            .column(FieldId::OptionSet(OptionSetColumn::SchemaName))
            .unwrap();
        assert_eq!(name.position, 2);
        let options = resolved
            .column(FieldId::OptionSet(OptionSetColumn::Options))
            .unwrap();
        assert_eq!(options.position, 5);
        assert_eq!(resolved.resolved_columns().count(), 3);
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let schema = build_schema(RecordKind::Field);
        let mut labels: Vec<String> = schema.columns.iter().map(|c| c.label.to_string()).collect();
        labels[9] = "data type".to_string();
        let cells: Vec<CellValue> = labels.into_iter().map(CellValue::from).collect();
        assert!(schema.column(FieldId::Field(FieldColumn::DataType)).is_some());
        assert!(matches!(
            resolve_columns(&schema, &cells),
            Err(MappingError::MissingMandatoryColumns { .. })
        ));
    }
}
