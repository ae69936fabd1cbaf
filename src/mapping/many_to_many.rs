use super::{logical_name, values, MappingContext};
use crate::errors::MappingResult;
use crate::field_registry::ManyToManyColumn as Col;
use crate::models::{
    AssociatedMenu, CellValue, ChangeRequest, CreateManyToMany, ManyToManyMetadata, MenuBehavior,
    MenuGroup,
};

fn seeded_menu(ctx: &MappingContext<'_>, behavior: Col, group: Col, order: Col) -> AssociatedMenu {
    AssociatedMenu {
        behavior: ctx.default_or(behavior, MenuBehavior::DoNotDisplay),
        group: ctx.default_or(group, MenuGroup::Details),
        label: None,
        order: i32::try_from(ctx.default_int(order, 10000)).unwrap_or(10000),
    }
}

pub(super) fn map_create(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let mut request = CreateManyToMany {
        solution_unique_name: None,
        intersect_record_type_schema_name: String::new(),
        relationship: ManyToManyMetadata {
            schema_name: String::new(),
            record_type_1_logical_name: String::new(),
            record_type_1_menu: seeded_menu(
                ctx,
                Col::RecordType1MenuBehavior,
                Col::RecordType1MenuGroup,
                Col::RecordType1MenuOrder,
            ),
            record_type_2_logical_name: String::new(),
            record_type_2_menu: seeded_menu(
                ctx,
                Col::RecordType2MenuBehavior,
                Col::RecordType2MenuGroup,
                Col::RecordType2MenuOrder,
            ),
            is_valid_for_advanced_find: ctx.default_or(Col::Searchable, true),
        },
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        let relationship = &mut request.relationship;
        match column {
            Col::SolutionUniqueName => request.solution_unique_name = Some(values::text(cell)),
            Col::RecordType1LogicalName => relationship.record_type_1_logical_name = logical_name(cell),
            Col::RecordType1MenuBehavior => relationship.record_type_1_menu.behavior = ctx.option(column, cell)?,
            Col::RecordType1MenuGroup => relationship.record_type_1_menu.group = ctx.option(column, cell)?,
            Col::RecordType1MenuCustomLabel => relationship.record_type_1_menu.label = Some(ctx.label(cell)),
            Col::RecordType1MenuOrder => relationship.record_type_1_menu.order = ctx.int32(column, cell)?,
            Col::RecordType2LogicalName => relationship.record_type_2_logical_name = logical_name(cell),
            Col::RecordType2MenuBehavior => relationship.record_type_2_menu.behavior = ctx.option(column, cell)?,
            Col::RecordType2MenuGroup => relationship.record_type_2_menu.group = ctx.option(column, cell)?,
            Col::RecordType2MenuCustomLabel => relationship.record_type_2_menu.label = Some(ctx.label(cell)),
            Col::RecordType2MenuOrder => relationship.record_type_2_menu.order = ctx.int32(column, cell)?,
            Col::SchemaName => relationship.schema_name = values::text(cell),
            Col::IntersectRecordTypeSchemaName => {
                request.intersect_record_type_schema_name = values::text(cell)
            }
            Col::Searchable => relationship.is_valid_for_advanced_find = ctx.flag(column, cell)?,
        }
        Ok(())
    })?;

    Ok(ChangeRequest::CreateManyToMany(request))
}
