use super::{values, MappingContext};
use crate::errors::MappingResult;
use crate::field_registry::OptionSetColumn as Col;
use crate::models::{CellValue, ChangeRequest, CreateOptionSet, OptionItem, OptionSetMetadata};

/// Option set rows always create global option sets.
pub(super) fn map_create(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let locale = ctx.locale();
    let mut request = CreateOptionSet {
        solution_unique_name: None,
        option_set: OptionSetMetadata {
            name: String::new(),
            display_name: None,
            description: None,
            is_global: true,
            options: Vec::new(),
        },
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        let option_set = &mut request.option_set;
        match column {
            Col::SolutionUniqueName => request.solution_unique_name = Some(values::text(cell)),
            Col::SchemaName => option_set.name = values::text(cell),
            Col::DisplayName => option_set.display_name = Some(ctx.label(cell)),
            Col::Description => option_set.description = Some(ctx.label(cell)),
            Col::Options => {
                let raw = values::text(cell);
                option_set.options.extend(
                    values::parse_options(ctx.column_label(column), &raw)?
                        .into_iter()
                        .map(|(label, value)| OptionItem { label: locale.label(label), value }),
                );
            }
        }
        Ok(())
    })?;

    Ok(ChangeRequest::CreateOptionSet(request))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{map, row};
    use super::super::Operation;
    use super::*;
    use crate::field_registry::RecordKind;

    #[test]
    fn options_are_parsed_in_file_order() {
        let cells: Vec<(&str, CellValue)> = vec![
            ("Solution Unique Name", "core".into()),
            ("Schema Name (eg. new_OptionSet)", "new_Colour".into()),
            ("Display Name", "Colour".into()),
            ("Options (Format: Label|Value;Label|Value;...)", "Red|100;Green|200;Blue|300".into()),
        ];
        let request = match map(RecordKind::OptionSet, Operation::Create, &row(RecordKind::OptionSet, &cells))
            .unwrap()
        {
            ChangeRequest::CreateOptionSet(request) => request,
            other => panic!("unexpected request {other:?}"),
        };

        assert!(request.option_set.is_global);
        assert_eq!(request.option_set.name, "new_Colour");
        assert_eq!(request.solution_unique_name.as_deref(), Some("core"));
        let values: Vec<i32> = request.option_set.options.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![100, 200, 300]);
        assert_eq!(request.option_set.options[1].label.text, "Green");
    }
}
