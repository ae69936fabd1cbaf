use super::{logical_name, values, MappingContext};
use crate::errors::MappingResult;
use crate::field_registry::OneToManyColumn as Col;
use crate::models::{
    AssociatedMenu, CascadeConfiguration, CascadeType, CellValue, ChangeRequest, CreateOneToMany,
    LookupMetadata, MenuBehavior, MenuGroup, OneToManyMetadata, RequiredLevel,
};

pub(super) fn map_create(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let mut request = CreateOneToMany {
        solution_unique_name: None,
        relationship: OneToManyMetadata {
            schema_name: String::new(),
            referencing_record_type: String::new(),
            referenced_record_type: String::new(),
            menu: AssociatedMenu {
                behavior: ctx.default_or(Col::MenuBehavior, MenuBehavior::UseCollectionName),
                group: ctx.default_or(Col::MenuGroup, MenuGroup::Details),
                label: None,
                order: i32::try_from(ctx.default_int(Col::MenuOrder, 10000)).unwrap_or(10000),
            },
            cascade: CascadeConfiguration {
                assign: ctx.default_or(Col::CascadeAssign, CascadeType::NoCascade),
                share: ctx.default_or(Col::CascadeShare, CascadeType::NoCascade),
                unshare: ctx.default_or(Col::CascadeUnshare, CascadeType::NoCascade),
                reparent: ctx.default_or(Col::CascadeReparent, CascadeType::NoCascade),
                delete: ctx.default_or(Col::CascadeDelete, CascadeType::RemoveLink),
                merge: ctx.default_or(Col::CascadeMerge, CascadeType::Cascade),
            },
        },
        lookup: LookupMetadata {
            schema_name: String::new(),
            display_name: None,
            description: None,
            required_level: ctx.default_or(Col::RequiredLevel, RequiredLevel::None),
        },
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        let relationship = &mut request.relationship;
        let lookup = &mut request.lookup;
        match column {
            Col::SolutionUniqueName => request.solution_unique_name = Some(values::text(cell)),
            Col::RecordTypeLogicalName => relationship.referencing_record_type = logical_name(cell),
            Col::RelatedRecordTypeLogicalName => relationship.referenced_record_type = logical_name(cell),
            Col::SchemaName => relationship.schema_name = values::text(cell),
            Col::LookupDisplayName => lookup.display_name = Some(ctx.label(cell)),
            Col::LookupSchemaName => lookup.schema_name = values::text(cell),
            Col::RequiredLevel => lookup.required_level = ctx.option(column, cell)?,
            Col::LookupDescription => lookup.description = Some(ctx.label(cell)),
            Col::MenuBehavior => relationship.menu.behavior = ctx.option(column, cell)?,
            Col::MenuGroup => relationship.menu.group = ctx.option(column, cell)?,
            Col::MenuCustomLabel => relationship.menu.label = Some(ctx.label(cell)),
            Col::MenuOrder => relationship.menu.order = ctx.int32(column, cell)?,
            Col::CascadeAssign => relationship.cascade.assign = ctx.option(column, cell)?,
            Col::CascadeShare => relationship.cascade.share = ctx.option(column, cell)?,
            Col::CascadeUnshare => relationship.cascade.unshare = ctx.option(column, cell)?,
            Col::CascadeReparent => relationship.cascade.reparent = ctx.option(column, cell)?,
            Col::CascadeDelete => relationship.cascade.delete = ctx.option(column, cell)?,
            Col::CascadeMerge => relationship.cascade.merge = ctx.option(column, cell)?,
        }
        Ok(())
    })?;

    Ok(ChangeRequest::CreateOneToMany(request))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{map, row};
    use super::super::Operation;
    use super::*;
    use crate::errors::MappingError;
    use crate::field_registry::RecordKind;

    fn create(extra: &[(&str, CellValue)]) -> MappingResult<CreateOneToMany> {
        let mut cells: Vec<(&str, CellValue)> = vec![
            ("Primary Record Type Logical Name (eg. new_record)", "New_Project".into()),
            ("Related Record Type Logical Name (eg. contact)", "Contact".into()),
            ("Relationship Schema Name (eg. new_Record_Contact)", "new_Project_Contact".into()),
            ("Lookup Field Display Name", "Contact".into()),
            ("Lookup Field Schema Name (eg. new_Parent_ContactId)", "new_ContactId".into()),
        ];
        cells.extend(extra.iter().cloned());
        map(RecordKind::OneToMany, Operation::Create, &row(RecordKind::OneToMany, &cells)).map(
            |request| match request {
                ChangeRequest::CreateOneToMany(request) => request,
                other => panic!("unexpected request {other:?}"),
            },
        )
    }

    #[test]
    fn defaults_follow_the_registry() {
        let request = create(&[]).unwrap();
        let relationship = &request.relationship;
        assert_eq!(relationship.referencing_record_type, "new_project");
        assert_eq!(relationship.referenced_record_type, "contact");
        assert_eq!(relationship.menu.behavior, MenuBehavior::UseCollectionName);
        assert_eq!(relationship.menu.group, MenuGroup::Details);
        assert_eq!(relationship.menu.order, 10000);
        assert_eq!(relationship.cascade.assign, CascadeType::NoCascade);
        assert_eq!(relationship.cascade.delete, CascadeType::RemoveLink);
        assert_eq!(relationship.cascade.merge, CascadeType::Cascade);
        assert_eq!(request.lookup.required_level, RequiredLevel::None);
        assert_eq!(request.lookup.schema_name, "new_ContactId");
    }

    #[test]
    fn menu_and_cascade_columns_are_applied() {
        let request = create(&[
            ("Display Option", "Use Custom Label".into()),
            ("Custom Label", "Team".into()),
            ("Display Area", "Sales".into()),
            ("Display Order", CellValue::Number(5.0)),
            ("Cascade Delete", "Restrict".into()),
            ("Cascade Assign", "cascade all".into()),
            ("Field Requirement", "Business Recommended".into()),
        ])
        .unwrap();
        let relationship = &request.relationship;
        assert_eq!(relationship.menu.behavior, MenuBehavior::UseLabel);
        assert_eq!(relationship.menu.label.as_ref().map(|l| l.text.as_str()), Some("Team"));
        assert_eq!(relationship.menu.group, MenuGroup::Sales);
        assert_eq!(relationship.menu.order, 5);
        assert_eq!(relationship.cascade.delete, CascadeType::Restrict);
        assert_eq!(relationship.cascade.assign, CascadeType::Cascade);
        assert_eq!(request.lookup.required_level, RequiredLevel::Recommended);
    }

    #[test]
    fn delete_only_options_are_not_valid_elsewhere() {
        let err = create(&[("Cascade Share", "Remove Link".into())]).unwrap_err();
        assert!(matches!(err, MappingError::UnknownOptionLabel { .. }));
    }
}
