use super::{field_types, logical_name, values, MappingContext};
use crate::errors::MappingResult;
use crate::field_registry::FieldColumn as Col;
use crate::models::{CellValue, ChangeRequest, CreateField, DataType, FieldMetadata, RequiredLevel};

/// Field rows first pick a datatype builder from "Data Type", then apply the
/// columns every field shares.
pub(super) fn map_create(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let data_type: DataType = ctx.option(Col::DataType, ctx.required_cell(row, Col::DataType)?)?;
    let type_spec = field_types::build(ctx, data_type, row)?;

    let mut request = CreateField {
        solution_unique_name: None,
        record_type_logical_name: String::new(),
        field: FieldMetadata {
            schema_name: String::new(),
            display_name: None,
            description: None,
            required_level: RequiredLevel::None,
            is_valid_for_advanced_find: ctx.default_or(Col::IsValidForAdvancedFind, true),
            is_secured: ctx.default_or(Col::IsSecured, false),
            is_audit_enabled: ctx.default_or(Col::IsAuditEnabled, false),
            type_spec,
        },
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        let field = &mut request.field;
        match column {
            Col::SolutionUniqueName => request.solution_unique_name = Some(values::text(cell)),
            Col::RecordTypeLogicalName => request.record_type_logical_name = logical_name(cell),
            Col::SchemaName => field.schema_name = values::text(cell),
            Col::DisplayName => field.display_name = Some(ctx.label(cell)),
            Col::Description => field.description = Some(ctx.label(cell)),
            Col::RequiredLevel => field.required_level = ctx.option(column, cell)?,
            Col::IsValidForAdvancedFind => field.is_valid_for_advanced_find = ctx.flag(column, cell)?,
            Col::IsSecured => field.is_secured = ctx.flag(column, cell)?,
            Col::IsAuditEnabled => field.is_audit_enabled = ctx.flag(column, cell)?,
            // Consumed by the datatype builders.
            _ => {}
        }
        Ok(())
    })?;

    Ok(ChangeRequest::CreateField(request))
}
