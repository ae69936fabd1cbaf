//! Worksheet schemas built from the field registry.
//!
//! A [`Schema`] is the ordered column list of one record kind. The declared
//! schema numbers columns 1, 2, 3, ...; [`resolve_columns`] remaps those
//! positions onto the physical layout of an imported header row.

mod resolver;

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::field_registry::{FieldId, FieldRegistry, RecordKind};
use crate::models::Row;

pub use resolver::resolve_columns;

/// One column of a worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field: FieldId,
    pub label: &'static str,
    /// 1-based physical position; 0 when the column was not found in the header.
    pub position: usize,
    pub optional: bool,
}

impl Column {
    pub fn is_resolved(&self) -> bool {
        self.position > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub kind: RecordKind,
    pub columns: Vec<Column>,
}

impl Schema {
    /// Columns that map onto a physical cell.
    pub fn resolved_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| column.is_resolved())
    }

    pub fn column(&self, field: FieldId) -> Option<&Column> {
        self.columns.iter().find(|column| column.field == field)
    }
}

/// Ordered column list of `kind` with dense positions starting at 1.
pub fn build_schema(kind: RecordKind) -> Schema {
    let registry = FieldRegistry::global();
    let columns = registry
        .fields_of(kind)
        .iter()
        .enumerate()
        .map(|(index, descriptor)| Column {
            field: descriptor.id,
            label: descriptor.label,
            position: index + 1,
            optional: descriptor.optional,
        })
        .collect();

    Schema { kind, columns }
}

/// A schema plus the raw rows read for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl Worksheet {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.schema.kind
    }

    pub fn name(&self) -> String {
        self.schema.kind.to_string()
    }
}

/// Exactly one worksheet per record kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSet {
    sheets: BTreeMap<RecordKind, Worksheet>,
}

impl ConfigurationSet {
    /// Every kind with its declared schema and no rows.
    pub fn new() -> Self {
        let sheets = RecordKind::iter()
            .map(|kind| (kind, Worksheet::new(build_schema(kind))))
            .collect();
        Self { sheets }
    }

    pub fn worksheet(&self, kind: RecordKind) -> &Worksheet {
        // Every kind is inserted by `new` and `replace` never removes one.
        &self.sheets[&kind]
    }

    /// Replace the worksheet of its kind.
    pub fn replace(&mut self, worksheet: Worksheet) {
        self.sheets.insert(worksheet.kind(), worksheet);
    }

    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.sheets.values()
    }

    pub fn row_count(&self) -> usize {
        self.sheets.values().map(|sheet| sheet.rows.len()).sum()
    }
}

impl Default for ConfigurationSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_dense_and_one_based() {
        for kind in RecordKind::iter() {
            let schema = build_schema(kind);
            let positions: Vec<usize> = schema.columns.iter().map(|c| c.position).collect();
            let expected: Vec<usize> = (1..=schema.columns.len()).collect();
            assert_eq!(positions, expected, "{kind}");
        }
    }

    #[test]
    fn building_twice_is_identical() {
        for kind in RecordKind::iter() {
            assert_eq!(build_schema(kind), build_schema(kind));
        }
    }

    #[test]
    fn configuration_set_holds_every_kind() {
        let set = ConfigurationSet::new();
        assert_eq!(set.worksheets().count(), 5);
        for kind in RecordKind::iter() {
            assert_eq!(set.worksheet(kind).kind(), kind);
        }
        assert_eq!(set.row_count(), 0);
    }
}
