//! JSON workbook reader and template exporter.
//!
//! A workbook is a list of named sheets, each with a header row and data
//! rows of raw cells. Sheet names follow the record kinds ("Record Types",
//! "Fields", ...). The exported template is itself a valid, empty workbook
//! whose sheets additionally describe every column.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult, MappingError};
use crate::field_registry::{FieldRegistry, RecordKind};
use crate::models::{CellValue, Row};
use crate::schema::{build_schema, resolve_columns, ConfigurationSet, Worksheet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub header: Vec<CellValue>,
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Column guide written into templates; ignored on import.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnGuide>,
}

/// What the template tells the user about one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnGuide {
    pub label: String,
    pub position: usize,
    pub required: bool,
    pub hint: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Resolve every known sheet of `workbook` into a configuration set.
///
/// A sheet whose header lacks mandatory columns is reported and left empty;
/// the other sheets are still imported. Unknown sheet names are ignored.
pub fn import(workbook: &Workbook) -> (ConfigurationSet, Vec<MappingError>) {
    let mut set = ConfigurationSet::new();
    let mut errors = Vec::new();

    for sheet in &workbook.sheets {
        let Some(kind) = RecordKind::from_sheet_name(&sheet.name) else {
            debug!("Ignoring unknown worksheet '{}'", sheet.name);
            continue;
        };

        match resolve_columns(&build_schema(kind), &sheet.header) {
            Ok(schema) => {
                debug!("Imported {} rows from worksheet {}", sheet.rows.len(), kind);
                set.replace(Worksheet {
                    schema,
                    rows: sheet.rows.clone(),
                });
            }
            Err(err) => {
                warn!("{}", err);
                errors.push(err);
            }
        }
    }

    (set, errors)
}

/// Blank workbook with one sheet per record kind.
pub fn export_template() -> Workbook {
    let registry = FieldRegistry::global();
    let sheets = [
        RecordKind::RecordType,
        RecordKind::Field,
        RecordKind::OneToMany,
        RecordKind::ManyToMany,
        RecordKind::OptionSet,
    ]
    .into_iter()
    .map(|kind| {
        let schema = build_schema(kind);
        let columns = schema
            .columns
            .iter()
            .map(|column| {
                let default = registry.default_label(column.field);
                let hint = match (column.optional, default) {
                    (false, _) => "Required".to_string(),
                    (true, Some(default)) => format!("Optional (Default: {default})"),
                    (true, None) => "Optional".to_string(),
                };
                ColumnGuide {
                    label: column.label.to_string(),
                    position: column.position,
                    required: !column.optional,
                    hint,
                    options: registry
                        .options(column.field)
                        .iter()
                        .map(|option| option.label.to_string())
                        .collect(),
                }
            })
            .collect();

        Sheet {
            name: kind.to_string(),
            header: schema.columns.iter().map(|c| CellValue::from(c.label)).collect(),
            rows: Vec::new(),
            columns,
        }
    })
    .collect();

    Workbook { sheets }
}

pub async fn read(path: &Path) -> AppResult<Workbook> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::workbook(format!("Unable to read workbook {}: {}", path.display(), e))
    })?;
    let workbook: Workbook = serde_json::from_str(&contents)?;
    info!("Loaded workbook {} with {} sheets", path.display(), workbook.sheets.len());
    Ok(workbook)
}

pub async fn write(path: &Path, workbook: &Workbook) -> AppResult<()> {
    let contents = serde_json::to_string_pretty(workbook)?;
    tokio::fs::write(path, contents).await?;
    info!("Wrote workbook {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn template_round_trips_into_an_empty_configuration() {
        let template = export_template();
        assert_eq!(template.sheets.len(), 5);

        let (set, errors) = import(&template);
        assert!(errors.is_empty());
        assert_eq!(set.row_count(), 0);
        for kind in RecordKind::iter() {
            assert_eq!(set.worksheet(kind).schema, build_schema(kind));
        }
    }

    #[test]
    fn template_describes_defaults_and_options() {
        let template = export_template();
        let fields = template.sheets.iter().find(|s| s.name == "Fields").unwrap();

        let data_type = fields.columns.iter().find(|c| c.label == "Data Type").unwrap();
        assert!(data_type.required);
        assert_eq!(data_type.hint, "Required");
        assert_eq!(data_type.options.len(), 9);

        let searchable = fields.columns.iter().find(|c| c.label == "Searchable?").unwrap();
        assert_eq!(searchable.hint, "Optional (Default: Yes)");
        assert_eq!(searchable.options, vec!["Yes", "No"]);

        let description = fields.columns.iter().find(|c| c.label == "Description").unwrap();
        assert_eq!(description.hint, "Optional");
    }

    #[test]
    fn broken_sheet_is_reported_and_others_still_import() {
        let option_sets = export_template()
            .sheets
            .into_iter()
            .find(|s| s.name == "Option Sets")
            .unwrap();
        let workbook = Workbook {
            sheets: vec![
                Sheet {
                    name: "Fields".to_string(),
                    header: vec!["Display Name".into()],
                    rows: vec![vec!["x".into()]],
                    columns: Vec::new(),
                },
                Sheet {
                    rows: vec![vec![
                        CellValue::Null,
                        "new_colour".into(),
                        "Colour".into(),
                        CellValue::Null,
                        "Red|1".into(),
                    ]],
                    ..option_sets
                },
                Sheet {
                    name: "Notes".to_string(),
                    header: Vec::new(),
                    rows: Vec::new(),
                    columns: Vec::new(),
                },
            ],
        };

        let (set, errors) = import(&workbook);

        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], MappingError::MissingMandatoryColumns { sheet, .. } if sheet == "Fields"));
        assert!(set.worksheet(RecordKind::Field).rows.is_empty());
        assert_eq!(set.worksheet(RecordKind::OptionSet).rows.len(), 1);
    }

    #[tokio::test]
    async fn workbook_files_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("template.json");
        let template = export_template();

        write(&path, &template).await.unwrap();
        let loaded = read(&path).await.unwrap();

        assert_eq!(loaded, template);
    }

    #[tokio::test]
    async fn missing_file_is_a_workbook_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read(&dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, AppError::Workbook { .. }));
    }
}
