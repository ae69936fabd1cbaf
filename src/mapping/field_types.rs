//! Per-datatype field builders.
//!
//! Each builder seeds the settings of its datatype and then applies only the
//! columns that datatype understands; other columns in the row are ignored.
//! Numeric settings outside the supported range leave the seed in place.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;

use super::{logical_name, values, MappingContext};
use crate::errors::{MappingError, MappingResult};
use crate::field_registry::FieldColumn as Col;
use crate::models::{
    BooleanSpec, CellValue, DataType, DateTimeBehavior, DateTimeFormat, DateTimeSpec, DecimalSpec,
    FieldTypeSpec, ImeMode, IntegerFormat, IntegerSpec, MemoSpec, MoneySpec, OptionItem, PicklistSpec,
    StringFormat, StringSpec,
};

pub type BuilderFn = fn(&MappingContext<'_>, &[CellValue]) -> MappingResult<FieldTypeSpec>;

static DATA_TYPE_BUILDERS: &[(DataType, BuilderFn)] = &[
    (DataType::Boolean, boolean),
    (DataType::DateTime, date_time),
    (DataType::Decimal, decimal),
    (DataType::Integer, integer),
    (DataType::Memo, memo),
    (DataType::Money, money),
    (DataType::Picklist, picklist),
    (DataType::String, string),
    (DataType::Image, image),
];

pub const DECIMAL_PRECISION: RangeInclusive<u32> = 0..=10;
pub const DECIMAL_LIMIT: i64 = 100_000_000_000;
pub const MONEY_PRECISION: RangeInclusive<u32> = 0..=4;
pub const MONEY_LIMIT: f64 = 922_337_203_685_477.0;

const STRING_MAX_LENGTH: i32 = 100;
const MEMO_MAX_LENGTH: i32 = 2000;

pub fn builder_for(data_type: DataType) -> Option<BuilderFn> {
    DATA_TYPE_BUILDERS
        .iter()
        .find(|(tag, _)| *tag == data_type)
        .map(|(_, builder)| *builder)
}

pub(super) fn build(
    ctx: &MappingContext<'_>,
    data_type: DataType,
    row: &[CellValue],
) -> MappingResult<FieldTypeSpec> {
    let builder = builder_for(data_type).ok_or_else(|| {
        MappingError::invalid_value(ctx.column_label(Col::DataType), "supported data type", data_type.to_string())
    })?;
    builder(ctx, row)
}

/// Precision from the cell if it lies in `range`.
fn precision_in(ctx: &MappingContext<'_>, cell: &CellValue, range: &RangeInclusive<u32>) -> MappingResult<Option<u32>> {
    let value = values::integer(ctx.column_label(Col::Precision), cell)?;
    Ok(u32::try_from(value).ok().filter(|p| range.contains(p)))
}

fn default_precision(ctx: &MappingContext<'_>, range: &RangeInclusive<u32>) -> u32 {
    u32::try_from(ctx.default_int(Col::Precision, 2))
        .ok()
        .filter(|p| range.contains(p))
        .unwrap_or(*range.start())
}

/// Decimal bound of a cell; `None` for a finite number too large for a
/// `Decimal`, which is out of range either way.
fn decimal_bound(label: &str, cell: &CellValue) -> MappingResult<Option<Decimal>> {
    match values::decimal(label, cell) {
        Ok(value) => Ok(Some(value)),
        Err(err) => values::float(label, cell).map(|_| None).map_err(|_| err),
    }
}

fn boolean(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<FieldTypeSpec> {
    let locale = ctx.locale();
    let mut spec = BooleanSpec {
        true_option: OptionItem { label: locale.label("Yes"), value: 1 },
        false_option: OptionItem { label: locale.label("No"), value: 0 },
        default_value: false,
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        match column {
            Col::DefaultValue => spec.default_value = values::boolean(ctx.column_label(column), cell)?,
            Col::Options => {
                let raw = values::text(cell);
                for (label, value) in values::parse_options(ctx.column_label(column), &raw)? {
                    match value {
                        0 => spec.false_option.label = locale.label(label),
                        1 => spec.true_option.label = locale.label(label),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(())
    })?;

    Ok(FieldTypeSpec::Boolean(spec))
}

fn date_time(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<FieldTypeSpec> {
    let mut spec = DateTimeSpec {
        format: ctx.default_or(Col::DateTimeFormat, DateTimeFormat::DateOnly),
        behavior: ctx.default_or(Col::DateTimeBehavior, DateTimeBehavior::UserLocal),
        ime_mode: ctx.default_or(Col::ImeMode, ImeMode::Auto),
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        match column {
            Col::DateTimeFormat => spec.format = ctx.option(column, cell)?,
            Col::DateTimeBehavior => spec.behavior = ctx.option(column, cell)?,
            Col::ImeMode => spec.ime_mode = ctx.option(column, cell)?,
            _ => {}
        }
        Ok(())
    })?;

    Ok(FieldTypeSpec::DateTime(spec))
}

fn decimal(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<FieldTypeSpec> {
    let limit = Decimal::from(DECIMAL_LIMIT);
    let mut spec = DecimalSpec {
        precision: default_precision(ctx, &DECIMAL_PRECISION),
        min_value: -limit,
        max_value: limit,
        ime_mode: ctx.default_or(Col::ImeMode, ImeMode::Auto),
    };
    let in_range = |value: &Decimal| (-limit..=limit).contains(value);

    ctx.for_each_cell(row, |column: Col, cell| {
        match column {
            Col::Precision => {
                if let Some(precision) = precision_in(ctx, cell, &DECIMAL_PRECISION)? {
                    spec.precision = precision;
                }
            }
            Col::MinimumValue => {
                if let Some(value) = decimal_bound(ctx.column_label(column), cell)?.filter(|v| in_range(v)) {
                    spec.min_value = value;
                }
            }
            Col::MaximumValue => {
                if let Some(value) = decimal_bound(ctx.column_label(column), cell)?.filter(|v| in_range(v)) {
                    spec.max_value = value;
                }
            }
            Col::ImeMode => spec.ime_mode = ctx.option(column, cell)?,
            _ => {}
        }
        Ok(())
    })?;

    Ok(FieldTypeSpec::Decimal(spec))
}

fn integer(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<FieldTypeSpec> {
    let mut spec = IntegerSpec {
        format: ctx.default_or(Col::IntegerFormat, IntegerFormat::None),
        min_value: i32::MIN,
        max_value: i32::MAX,
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        match column {
            Col::IntegerFormat => spec.format = ctx.option(column, cell)?,
            Col::MinimumValue => {
                let value = values::integer(ctx.column_label(column), cell)?;
                if let Ok(value) = i32::try_from(value) {
                    spec.min_value = value;
                }
            }
            Col::MaximumValue => {
                let value = values::integer(ctx.column_label(column), cell)?;
                if let Ok(value) = i32::try_from(value) {
                    spec.max_value = value;
                }
            }
            _ => {}
        }
        Ok(())
    })?;

    Ok(FieldTypeSpec::Integer(spec))
}

fn memo(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<FieldTypeSpec> {
    let mut spec = MemoSpec {
        max_length: MEMO_MAX_LENGTH,
        ime_mode: ctx.default_or(Col::ImeMode, ImeMode::Auto),
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        match column {
            Col::MaxLength => spec.max_length = ctx.int32(column, cell)?,
            Col::ImeMode => spec.ime_mode = ctx.option(column, cell)?,
            _ => {}
        }
        Ok(())
    })?;

    Ok(FieldTypeSpec::Memo(spec))
}

fn money(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<FieldTypeSpec> {
    let mut spec = MoneySpec {
        precision: default_precision(ctx, &MONEY_PRECISION),
        min_value: -MONEY_LIMIT,
        max_value: MONEY_LIMIT,
        ime_mode: ctx.default_or(Col::ImeMode, ImeMode::Auto),
    };
    let in_range = |value: f64| (-MONEY_LIMIT..=MONEY_LIMIT).contains(&value);

    ctx.for_each_cell(row, |column: Col, cell| {
        match column {
            Col::Precision => {
                if let Some(precision) = precision_in(ctx, cell, &MONEY_PRECISION)? {
                    spec.precision = precision;
                }
            }
            Col::MinimumValue => {
                let value = values::float(ctx.column_label(column), cell)?;
                if in_range(value) {
                    spec.min_value = value;
                }
            }
            Col::MaximumValue => {
                let value = values::float(ctx.column_label(column), cell)?;
                if in_range(value) {
                    spec.max_value = value;
                }
            }
            Col::ImeMode => spec.ime_mode = ctx.option(column, cell)?,
            _ => {}
        }
        Ok(())
    })?;

    Ok(FieldTypeSpec::Money(spec))
}

fn picklist(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<FieldTypeSpec> {
    let locale = ctx.locale();
    let mut spec = PicklistSpec {
        is_global: false,
        option_set_name: None,
        options: Vec::new(),
        default_form_value: None,
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        match column {
            Col::DefaultValue => spec.default_form_value = Some(ctx.int32(column, cell)?),
            Col::Options => {
                let raw = values::text(cell);
                spec.options.extend(
                    values::parse_options(ctx.column_label(column), &raw)?
                        .into_iter()
                        .map(|(label, value)| OptionItem { label: locale.label(label), value }),
                );
            }
            Col::GlobalOptionSet => {
                spec.is_global = true;
                spec.option_set_name = Some(logical_name(cell));
            }
            _ => {}
        }
        Ok(())
    })?;

    Ok(FieldTypeSpec::Picklist(spec))
}

fn string(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<FieldTypeSpec> {
    let mut spec = StringSpec {
        format: ctx.default_or(Col::StringFormat, StringFormat::Text),
        max_length: STRING_MAX_LENGTH,
        ime_mode: ctx.default_or(Col::ImeMode, ImeMode::Auto),
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        match column {
            Col::StringFormat => spec.format = ctx.option(column, cell)?,
            Col::MaxLength => spec.max_length = ctx.int32(column, cell)?,
            Col::ImeMode => spec.ime_mode = ctx.option(column, cell)?,
            _ => {}
        }
        Ok(())
    })?;

    Ok(FieldTypeSpec::String(spec))
}

fn image(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<FieldTypeSpec> {
    // Nothing to configure, but mandatory columns still have to be present.
    ctx.for_each_cell(row, |_: Col, _| Ok(()))?;
    Ok(FieldTypeSpec::Image)
}
