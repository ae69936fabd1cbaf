//! Row mappers: raw worksheet rows to typed change requests.
//!
//! Every record kind has one create mapper and one delete mapper, selected
//! through [`mapper`]. Create mappers seed the request with the registry
//! defaults and then make one pass over the resolved columns, switching on
//! the column identity. Unresolved columns are never read.

pub mod values;

mod delete;
mod field;
mod field_types;
mod many_to_many;
mod one_to_many;
mod option_set;
mod record_type;

use tracing::debug;

use crate::errors::{MappingError, MappingResult};
use crate::events::EventSink;
use crate::field_registry::{DefaultValue, FieldRegistry, FromOptionValue, KindColumn, RecordKind};
use crate::models::{CellValue, ChangeRequest, Label, Locale};
use crate::schema::{Schema, Worksheet};

pub use field_types::{builder_for, BuilderFn};

/// Signature shared by every row mapper.
pub type MapperFn = fn(&MappingContext<'_>, &[CellValue]) -> MappingResult<ChangeRequest>;

/// Which pipeline a mapper serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Delete,
}

/// Mapper of `kind` for `operation`.
pub fn mapper(kind: RecordKind, operation: Operation) -> MapperFn {
    match (operation, kind) {
        (Operation::Create, RecordKind::RecordType) => record_type::map_create,
        (Operation::Create, RecordKind::Field) => field::map_create,
        (Operation::Create, RecordKind::OneToMany) => one_to_many::map_create,
        (Operation::Create, RecordKind::ManyToMany) => many_to_many::map_create,
        (Operation::Create, RecordKind::OptionSet) => option_set::map_create,
        (Operation::Delete, RecordKind::RecordType) => delete::map_record_type,
        (Operation::Delete, RecordKind::Field) => delete::map_field,
        (Operation::Delete, RecordKind::OneToMany) => delete::map_one_to_many,
        (Operation::Delete, RecordKind::ManyToMany) => delete::map_many_to_many,
        (Operation::Delete, RecordKind::OptionSet) => delete::map_option_set,
    }
}

static ABSENT: CellValue = CellValue::Null;

/// Everything a mapper may read besides the row itself.
pub struct MappingContext<'a> {
    registry: &'static FieldRegistry,
    schema: &'a Schema,
    locale: Locale,
}

impl<'a> MappingContext<'a> {
    pub fn new(schema: &'a Schema, locale: Locale) -> Self {
        Self {
            registry: FieldRegistry::global(),
            schema,
            locale,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.schema.kind
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Visit every resolved column of kind `C` that holds a value.
    ///
    /// An absent value in a mandatory column fails the row; absent optional
    /// values are skipped so the seeded default stays in place.
    pub(crate) fn for_each_cell<C, F>(&self, row: &[CellValue], mut apply: F) -> MappingResult<()>
    where
        C: KindColumn,
        F: FnMut(C, &CellValue) -> MappingResult<()>,
    {
        for column in self.schema.resolved_columns() {
            let Some(field) = C::from_field_id(column.field) else {
                continue;
            };
            let cell = row.get(column.position - 1).unwrap_or(&ABSENT);
            if cell.is_absent() {
                if !column.optional {
                    return Err(MappingError::missing_field(self.kind(), column.label));
                }
                continue;
            }
            apply(field, cell)?;
        }
        Ok(())
    }

    /// The cell of one column, if resolved and present.
    pub(crate) fn cell<'r, C: KindColumn>(&self, row: &'r [CellValue], column: C) -> Option<&'r CellValue> {
        self.schema
            .column(column.field_id())
            .filter(|c| c.is_resolved())
            .and_then(|c| row.get(c.position - 1))
            .filter(|cell| !cell.is_absent())
    }

    /// Like [`cell`](Self::cell) but failing when the value is absent.
    pub(crate) fn required_cell<'r, C: KindColumn>(
        &self,
        row: &'r [CellValue],
        column: C,
    ) -> MappingResult<&'r CellValue> {
        self.cell(row, column)
            .ok_or_else(|| MappingError::missing_field(self.kind(), self.registry.label(column.field_id())))
    }

    pub(crate) fn column_label<C: KindColumn>(&self, column: C) -> &'static str {
        self.registry.label(column.field_id())
    }

    /// Resolve an enumerated cell through the registry.
    pub(crate) fn option<T: FromOptionValue, C: KindColumn>(
        &self,
        column: C,
        cell: &CellValue,
    ) -> MappingResult<T> {
        let text = values::text(cell);
        let value = self.registry.resolve(column.field_id(), &text)?;
        T::from_option_value(value).ok_or_else(|| {
            MappingError::invalid_value(self.column_label(column), std::any::type_name::<T>(), text)
        })
    }

    /// Yes/No column; native boolean cells are taken as they are.
    pub(crate) fn flag<C: KindColumn>(&self, column: C, cell: &CellValue) -> MappingResult<bool> {
        match cell {
            CellValue::Bool(value) => Ok(*value),
            _ => self.option(column, cell),
        }
    }

    /// Declared option default of a column, or `fallback` when none is declared.
    pub(crate) fn default_or<T: FromOptionValue, C: KindColumn>(&self, column: C, fallback: T) -> T {
        match self.registry.default_value(column.field_id()) {
            Some(DefaultValue::Option(value)) => T::from_option_value(value).unwrap_or(fallback),
            _ => fallback,
        }
    }

    pub(crate) fn default_int<C: KindColumn>(&self, column: C, fallback: i64) -> i64 {
        match self.registry.default_value(column.field_id()) {
            Some(DefaultValue::Integer(value)) => value,
            _ => fallback,
        }
    }

    pub(crate) fn default_text<C: KindColumn>(&self, column: C, fallback: &str) -> String {
        match self.registry.default_value(column.field_id()) {
            Some(DefaultValue::Text(value)) => value.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub(crate) fn int32<C: KindColumn>(&self, column: C, cell: &CellValue) -> MappingResult<i32> {
        values::int32(self.column_label(column), cell)
    }

    /// Localised label from the cell text.
    pub(crate) fn label(&self, cell: &CellValue) -> Label {
        self.locale.label(values::text(cell))
    }
}

/// Map every data row of `worksheet`.
///
/// A failing row is reported to `events` and skipped; later rows are still
/// mapped. Rows with no value at all are ignored.
pub fn map_worksheet(
    worksheet: &Worksheet,
    operation: Operation,
    locale: Locale,
    events: &dyn EventSink,
) -> Vec<ChangeRequest> {
    let context = MappingContext::new(&worksheet.schema, locale);
    let map_row = mapper(worksheet.kind(), operation);
    let mut requests = Vec::with_capacity(worksheet.rows.len());

    for (index, row) in worksheet.rows.iter().enumerate() {
        if row.iter().all(CellValue::is_absent) {
            debug!("Skipping blank row {} of worksheet {}", index + 2, worksheet.kind());
            continue;
        }
        match map_row(&context, row) {
            Ok(request) => requests.push(request),
            // Row numbers count the header row.
            Err(err) => events.error(format!("{} row {}: {}", worksheet.kind(), index + 2, err)),
        }
    }

    debug!(
        "Mapped {} of {} rows from worksheet {}",
        requests.len(),
        worksheet.rows.len(),
        worksheet.kind()
    );
    requests
}

/// Lowercase identifier text, as the service stores logical names.
pub(crate) fn logical_name(cell: &CellValue) -> String {
    values::text(cell).to_lowercase()
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::schema::{build_schema, resolve_columns};
    use strum::IntoEnumIterator;

    /// Every non-optional column, when left empty, fails with its own label.
    #[test]
    fn absent_mandatory_values_name_their_column() {
        let registry = FieldRegistry::global();
        for kind in RecordKind::iter() {
            let filled: Vec<(&str, CellValue)> = registry
                .fields_of(kind)
                .iter()
                .filter(|d| !d.optional)
                .map(|d| (d.label, sample_value(d.label)))
                .collect();
            assert!(map(kind, Operation::Create, &row(kind, &filled)).is_ok(), "{kind}");

            for (label, _) in &filled {
                let partial: Vec<(&str, CellValue)> = filled
                    .iter()
                    .filter(|(l, _)| l != label)
                    .cloned()
                    .collect();
                let err = map(kind, Operation::Create, &row(kind, &partial)).unwrap_err();
                assert_eq!(err, MappingError::missing_field(kind, *label), "{kind}");
            }
        }
    }

    fn sample_value(label: &str) -> CellValue {
        match label {
            "Data Type" => "Single Line of Text".into(),
            "Options (Format: Label|Value;Label|Value;...)" => "A|1".into(),
            _ => "new_value".into(),
        }
    }

    #[test]
    fn failing_rows_are_reported_and_skipped() {
        let schema = build_schema(RecordKind::OptionSet);
        let labels: Vec<CellValue> = schema.columns.iter().map(|c| CellValue::from(c.label)).collect();
        let resolved = resolve_columns(&schema, &labels).unwrap();
        let worksheet = Worksheet {
            schema: resolved,
            rows: vec![
                vec![CellValue::Null, "new_a".into(), "A".into(), CellValue::Null, "X|1".into()],
                vec![CellValue::Null, "new_b".into(), CellValue::Null, CellValue::Null, "X|1".into()],
                vec![CellValue::Null; 5],
                vec![CellValue::Null, "new_c".into(), "C".into(), CellValue::Null, "Y|2".into()],
            ],
        };

        let sink = CollectingEventSink::new();
        let requests = map_worksheet(&worksheet, Operation::Create, LOCALE, &sink);

        assert_eq!(requests.len(), 2);
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Option Sets row 3: "), "{}", errors[0]);
        assert!(errors[0].contains("'Display Name'"));
    }

    #[test]
    fn short_rows_treat_missing_cells_as_absent() {
        let schema = build_schema(RecordKind::OptionSet);
        let context = MappingContext::new(&schema, LOCALE);
        let err = mapper(RecordKind::OptionSet, Operation::Create)(&context, &[CellValue::Null, "new_a".into()])
            .unwrap_err();
        assert_eq!(err, MappingError::missing_field(RecordKind::OptionSet, "Display Name"));
    }
}
