//! Delete mappers read only the identifying columns of a row.

use super::{logical_name, MappingContext};
use crate::errors::MappingResult;
use crate::field_registry::{FieldColumn, ManyToManyColumn, OneToManyColumn, OptionSetColumn, RecordTypeColumn};
use crate::models::{
    CellValue, ChangeRequest, DeleteField, DeleteOptionSet, DeleteRecordType, DeleteRelationship,
};

pub(super) fn map_record_type(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let name = ctx.required_cell(row, RecordTypeColumn::SchemaName)?;
    Ok(ChangeRequest::DeleteRecordType(DeleteRecordType {
        logical_name: logical_name(name),
    }))
}

pub(super) fn map_field(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let record_type = ctx.required_cell(row, FieldColumn::RecordTypeLogicalName)?;
    let name = ctx.required_cell(row, FieldColumn::SchemaName)?;
    Ok(ChangeRequest::DeleteField(DeleteField {
        record_type_logical_name: logical_name(record_type),
        logical_name: logical_name(name),
    }))
}

pub(super) fn map_one_to_many(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let name = ctx.required_cell(row, OneToManyColumn::SchemaName)?;
    Ok(ChangeRequest::DeleteRelationship(DeleteRelationship {
        name: logical_name(name),
    }))
}

pub(super) fn map_many_to_many(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let name = ctx.required_cell(row, ManyToManyColumn::SchemaName)?;
    Ok(ChangeRequest::DeleteRelationship(DeleteRelationship {
        name: logical_name(name),
    }))
}

pub(super) fn map_option_set(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let name = ctx.required_cell(row, OptionSetColumn::SchemaName)?;
    Ok(ChangeRequest::DeleteOptionSet(DeleteOptionSet {
        name: logical_name(name),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{map, row};
    use super::super::Operation;
    use super::*;
    use crate::errors::MappingError;
    use crate::field_registry::RecordKind;

    #[test]
    fn identifiers_are_lowercased() {
        let request = map(
            RecordKind::Field,
            Operation::Delete,
            &row(
                RecordKind::Field,
                &[
                    ("Record Type Logical Name (eg. new_record)", "new_Project".into()),
                    ("Field Schema Name (eg. new_Field)", "new_Budget".into()),
                ],
            ),
        )
        .unwrap();
        assert_eq!(
            request,
            ChangeRequest::DeleteField(DeleteField {
                record_type_logical_name: "new_project".to_string(),
                logical_name: "new_budget".to_string(),
            })
        );
    }

    #[test]
    fn other_columns_are_not_required() {
        // No display name and no data type, which a create would reject.
        let request = map(
            RecordKind::RecordType,
            Operation::Delete,
            &row(
                RecordKind::RecordType,
                &[("Record Type Schema Name (eg. new_Record)", "new_Project".into())],
            ),
        )
        .unwrap();
        assert_eq!(
            request,
            ChangeRequest::DeleteRecordType(DeleteRecordType {
                logical_name: "new_project".to_string()
            })
        );
    }

    #[test]
    fn relationships_delete_by_schema_name() {
        for kind in [RecordKind::OneToMany, RecordKind::ManyToMany] {
            let request = map(
                kind,
                Operation::Delete,
                &row(kind, &[("Relationship Schema Name (eg. new_Record_Contact)", "new_A_B".into())]),
            )
            .unwrap();
            assert_eq!(
                request,
                ChangeRequest::DeleteRelationship(DeleteRelationship {
                    name: "new_a_b".to_string()
                })
            );
        }
    }

    #[test]
    fn missing_identifier_fails() {
        let err = map(RecordKind::OptionSet, Operation::Delete, &row(RecordKind::OptionSet, &[])).unwrap_err();
        assert_eq!(
            err,
            MappingError::missing_field(RecordKind::OptionSet, "Schema Name (eg. new_OptionSet)")
        );
    }
}
