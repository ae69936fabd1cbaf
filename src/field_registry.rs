/*!
 Field Registry

 Central authoritative definition of every column of every worksheet:
  - Record kinds and their per-kind column identities
  - Column metadata (label, optionality, default, enumerated options)
  - Label → value resolution for enumerated columns
  - Header label → column identity lookup

 The declared order of each kind's table is the column order of the blank
 template and of the schema built from it, so new columns are appended at
 the position they should appear in the workbook.

 Usage pattern (high-level):
   let reg = FieldRegistry::global();
   let id = reg.label_to_identity(RecordKind::Field, "Data Type")?;
   let value = reg.resolve(id, "whole number")?; // -> OptionValue::DataType(Integer)
*/

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::errors::{MappingError, MappingResult};
use crate::models::{
    CascadeType, DataType, DateTimeBehavior, DateTimeFormat, ImeMode, IntegerFormat, MenuBehavior,
    MenuGroup, OwnershipType, RequiredLevel, StringFormat,
};

/// The five worksheet categories. Display form is the worksheet name.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize, Deserialize,
)]
pub enum RecordKind {
    #[strum(serialize = "Record Types")]
    RecordType,
    #[strum(serialize = "Fields")]
    Field,
    #[strum(serialize = "1-N Relationships")]
    OneToMany,
    #[strum(serialize = "N-M Relationships")]
    ManyToMany,
    #[strum(serialize = "Option Sets")]
    OptionSet,
}

impl RecordKind {
    /// Look up a kind by its worksheet name (exact match).
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.to_string() == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum RecordTypeColumn {
    SolutionUniqueName,
    SchemaName,
    DisplayName,
    DisplayCollectionName,
    Description,
    OwnershipType,
    Color,
    PrimaryFieldSchemaName,
    PrimaryFieldDisplayName,
    PrimaryFieldMaxLength,
    PrimaryFieldDescription,
    IsBusinessProcessEnabled,
    HasNotes,
    HasActivities,
    IsConnectionsEnabled,
    IsMailMergeEnabled,
    IsDocumentManagementEnabled,
    IsValidForQueue,
    IsKnowledgeManagementEnabled,
    IsQuickCreateEnabled,
    IsDuplicateDetectionEnabled,
    IsAuditEnabled,
    ChangeTrackingEnabled,
    IsVisibleInMobile,
    IsVisibleInMobileClient,
    IsReadOnlyInMobileClient,
    IsAvailableOffline,
    HelpUrlEnabled,
    HelpUrl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum FieldColumn {
    SolutionUniqueName,
    RecordTypeLogicalName,
    SchemaName,
    DisplayName,
    RequiredLevel,
    IsValidForAdvancedFind,
    IsSecured,
    IsAuditEnabled,
    Description,
    DataType,
    MaxLength,
    StringFormat,
    IntegerFormat,
    DateTimeFormat,
    DateTimeBehavior,
    MinimumValue,
    MaximumValue,
    Precision,
    ImeMode,
    GlobalOptionSet,
    Options,
    DefaultValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum OneToManyColumn {
    SolutionUniqueName,
    RecordTypeLogicalName,
    RelatedRecordTypeLogicalName,
    SchemaName,
    LookupDisplayName,
    LookupSchemaName,
    RequiredLevel,
    LookupDescription,
    MenuBehavior,
    MenuGroup,
    MenuCustomLabel,
    MenuOrder,
    CascadeAssign,
    CascadeShare,
    CascadeUnshare,
    CascadeReparent,
    CascadeDelete,
    CascadeMerge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum ManyToManyColumn {
    SolutionUniqueName,
    RecordType1LogicalName,
    RecordType1MenuBehavior,
    RecordType1MenuGroup,
    RecordType1MenuCustomLabel,
    RecordType1MenuOrder,
    RecordType2LogicalName,
    RecordType2MenuBehavior,
    RecordType2MenuGroup,
    RecordType2MenuCustomLabel,
    RecordType2MenuOrder,
    SchemaName,
    IntersectRecordTypeSchemaName,
    Searchable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum OptionSetColumn {
    SolutionUniqueName,
    SchemaName,
    DisplayName,
    Description,
    Options,
}

/// Identity of one column: its record kind plus the column within that kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldId {
    RecordType(RecordTypeColumn),
    Field(FieldColumn),
    OneToMany(OneToManyColumn),
    ManyToMany(ManyToManyColumn),
    OptionSet(OptionSetColumn),
}

impl FieldId {
    pub fn kind(&self) -> RecordKind {
        match self {
            FieldId::RecordType(_) => RecordKind::RecordType,
            FieldId::Field(_) => RecordKind::Field,
            FieldId::OneToMany(_) => RecordKind::OneToMany,
            FieldId::ManyToMany(_) => RecordKind::ManyToMany,
            FieldId::OptionSet(_) => RecordKind::OptionSet,
        }
    }

    /// Index of the column within its kind's declared table.
    fn index(&self) -> usize {
        match self {
            FieldId::RecordType(c) => *c as usize,
            FieldId::Field(c) => *c as usize,
            FieldId::OneToMany(c) => *c as usize,
            FieldId::ManyToMany(c) => *c as usize,
            FieldId::OptionSet(c) => *c as usize,
        }
    }
}

/// Per-kind column enums, so mappers can switch on their own columns only.
pub trait KindColumn: Copy + Sized {
    const KIND: RecordKind;

    fn from_field_id(id: FieldId) -> Option<Self>;

    fn field_id(self) -> FieldId;
}

macro_rules! kind_column {
    ($column:ty, $variant:ident) => {
        impl KindColumn for $column {
            const KIND: RecordKind = RecordKind::$variant;

            fn from_field_id(id: FieldId) -> Option<Self> {
                match id {
                    FieldId::$variant(column) => Some(column),
                    _ => None,
                }
            }

            fn field_id(self) -> FieldId {
                FieldId::$variant(self)
            }
        }
    };
}

kind_column!(RecordTypeColumn, RecordType);
kind_column!(FieldColumn, Field);
kind_column!(OneToManyColumn, OneToMany);
kind_column!(ManyToManyColumn, ManyToMany);
kind_column!(OptionSetColumn, OptionSet);

/// Typed value behind an option label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Ownership(OwnershipType),
    RequiredLevel(RequiredLevel),
    MenuBehavior(MenuBehavior),
    MenuGroup(MenuGroup),
    Cascade(CascadeType),
    DataType(DataType),
    StringFormat(StringFormat),
    IntegerFormat(IntegerFormat),
    DateTimeFormat(DateTimeFormat),
    DateTimeBehavior(DateTimeBehavior),
    ImeMode(ImeMode),
}

/// Extraction of a concrete type from an [`OptionValue`].
pub trait FromOptionValue: Sized {
    fn from_option_value(value: OptionValue) -> Option<Self>;
}

macro_rules! from_option_value {
    ($ty:ty, $variant:ident) => {
        impl FromOptionValue for $ty {
            fn from_option_value(value: OptionValue) -> Option<Self> {
                match value {
                    OptionValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

from_option_value!(bool, Bool);
from_option_value!(OwnershipType, Ownership);
from_option_value!(RequiredLevel, RequiredLevel);
from_option_value!(MenuBehavior, MenuBehavior);
from_option_value!(MenuGroup, MenuGroup);
from_option_value!(CascadeType, Cascade);
from_option_value!(DataType, DataType);
from_option_value!(StringFormat, StringFormat);
from_option_value!(IntegerFormat, IntegerFormat);
from_option_value!(DateTimeFormat, DateTimeFormat);
from_option_value!(DateTimeBehavior, DateTimeBehavior);
from_option_value!(ImeMode, ImeMode);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldOption {
    pub label: &'static str,
    pub value: OptionValue,
}

const fn opt(label: &'static str, value: OptionValue) -> FieldOption {
    FieldOption { label, value }
}

/// Declared default of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldDefault {
    /// Label of one of the column's options.
    Option(&'static str),
    Integer(i64),
    Text(&'static str),
}

/// A declared default with option labels already resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultValue {
    Option(OptionValue),
    Integer(i64),
    Text(&'static str),
}

/// Descriptor for a single column.
#[derive(Debug)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub label: &'static str,
    pub optional: bool,
    pub default: Option<FieldDefault>,
    pub options: &'static [FieldOption],
}

/// Convenience macro to define a FieldDescriptor.
macro_rules! fd {
    (
        id: $id:expr,
        label: $label:expr,
        optional: $optional:expr
        $(, default: $default:expr)?
        $(, options: $options:expr)?
    ) => {
        FieldDescriptor {
            id: $id,
            label: $label,
            optional: $optional,
            default: fd!(@default $($default)?),
            options: fd!(@options $($options)?),
        }
    };
    (@default) => { None };
    (@default $default:expr) => { Some($default) };
    (@options) => { &[] };
    (@options $options:expr) => { $options };
}

// ---------------------------
// Shared option lists
// ---------------------------

const YES_NO: &[FieldOption] = &[
    opt("Yes", OptionValue::Bool(true)),
    opt("No", OptionValue::Bool(false)),
];

const REQUIRED_LEVELS: &[FieldOption] = &[
    opt("Optional", OptionValue::RequiredLevel(RequiredLevel::None)),
    opt(
        "Business Recommended",
        OptionValue::RequiredLevel(RequiredLevel::Recommended),
    ),
    opt(
        "Business Required",
        OptionValue::RequiredLevel(RequiredLevel::ApplicationRequired),
    ),
];

const MENU_BEHAVIORS: &[FieldOption] = &[
    opt("Do not Display", OptionValue::MenuBehavior(MenuBehavior::DoNotDisplay)),
    opt("Use Custom Label", OptionValue::MenuBehavior(MenuBehavior::UseLabel)),
    opt(
        "Use Plural Name",
        OptionValue::MenuBehavior(MenuBehavior::UseCollectionName),
    ),
];

const MENU_GROUPS: &[FieldOption] = &[
    opt("Details", OptionValue::MenuGroup(MenuGroup::Details)),
    opt("Marketing", OptionValue::MenuGroup(MenuGroup::Marketing)),
    opt("Sales", OptionValue::MenuGroup(MenuGroup::Sales)),
    opt("Service", OptionValue::MenuGroup(MenuGroup::Service)),
];

const CASCADES: &[FieldOption] = &[
    opt("Cascade All", OptionValue::Cascade(CascadeType::Cascade)),
    opt("Cascade Active", OptionValue::Cascade(CascadeType::Active)),
    opt("Cascade User-Owned", OptionValue::Cascade(CascadeType::UserOwned)),
    opt("Cascade None", OptionValue::Cascade(CascadeType::NoCascade)),
];

const CASCADE_DELETES: &[FieldOption] = &[
    opt("Cascade All", OptionValue::Cascade(CascadeType::Cascade)),
    opt("Remove Link", OptionValue::Cascade(CascadeType::RemoveLink)),
    opt("Restrict", OptionValue::Cascade(CascadeType::Restrict)),
];

const IME_MODES: &[FieldOption] = &[
    opt("Auto", OptionValue::ImeMode(ImeMode::Auto)),
    opt("Inactive", OptionValue::ImeMode(ImeMode::Inactive)),
    opt("Active", OptionValue::ImeMode(ImeMode::Active)),
    opt("Disabled", OptionValue::ImeMode(ImeMode::Disabled)),
];

const DATA_TYPES: &[FieldOption] = &[
    opt("Single Line of Text", OptionValue::DataType(DataType::String)),
    opt("Option Set", OptionValue::DataType(DataType::Picklist)),
    opt("Two Options", OptionValue::DataType(DataType::Boolean)),
    opt("Image", OptionValue::DataType(DataType::Image)),
    opt("Whole Number", OptionValue::DataType(DataType::Integer)),
    opt("Decimal Number", OptionValue::DataType(DataType::Decimal)),
    opt("Currency", OptionValue::DataType(DataType::Money)),
    opt("Multiple Lines of Text", OptionValue::DataType(DataType::Memo)),
    opt("Date and Time", OptionValue::DataType(DataType::DateTime)),
];

const OPTIONS_LABEL: &str = "Options (Format: Label|Value;Label|Value;...)";

// ---------------------------
// Record Type Columns
// ---------------------------

macro_rules! record_type_flag {
    ($column:ident, $label:expr) => {
        fd! {
            id: FieldId::RecordType(RecordTypeColumn::$column),
            label: $label,
            optional: true,
            default: FieldDefault::Option("No"),
            options: YES_NO
        }
    };
}

static RECORD_TYPE_FIELDS: &[FieldDescriptor] = &[
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::SolutionUniqueName),
        label: "Solution Unique Name",
        optional: true
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::SchemaName),
        label: "Record Type Schema Name (eg. new_Record)",
        optional: false
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::DisplayName),
        label: "Display Name",
        optional: false
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::DisplayCollectionName),
        label: "Plural Name",
        optional: false
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::Description),
        label: "Description",
        optional: true
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::OwnershipType),
        label: "Ownership (User/Organization)",
        optional: true,
        default: FieldDefault::Option("User or Team"),
        options: &[
            opt("User or Team", OptionValue::Ownership(OwnershipType::UserOwned)),
            opt("Organization", OptionValue::Ownership(OwnershipType::OrganizationOwned)),
        ]
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::Color),
        label: "Color",
        optional: true
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::PrimaryFieldSchemaName),
        label: "Primary Field Schema Name",
        optional: true,
        default: FieldDefault::Text("new_Name")
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::PrimaryFieldDisplayName),
        label: "Primary Field Display Name",
        optional: true,
        default: FieldDefault::Text("Name")
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::PrimaryFieldMaxLength),
        label: "Primary Field Max Length",
        optional: true,
        default: FieldDefault::Integer(100)
    },
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::PrimaryFieldDescription),
        label: "Primary Field Description",
        optional: true
    },
    record_type_flag!(IsBusinessProcessEnabled, "Business Process Flows?"),
    record_type_flag!(HasNotes, "Notes?"),
    record_type_flag!(HasActivities, "Activities?"),
    record_type_flag!(IsConnectionsEnabled, "Connections?"),
    record_type_flag!(IsMailMergeEnabled, "Mail Merge?"),
    record_type_flag!(IsDocumentManagementEnabled, "Document Management?"),
    record_type_flag!(IsValidForQueue, "Queues?"),
    record_type_flag!(IsKnowledgeManagementEnabled, "Knowledge Management?"),
    record_type_flag!(IsQuickCreateEnabled, "Allow Quick Create?"),
    record_type_flag!(IsDuplicateDetectionEnabled, "Duplicate Detection?"),
    record_type_flag!(IsAuditEnabled, "Auditing?"),
    record_type_flag!(ChangeTrackingEnabled, "Change Tracking?"),
    record_type_flag!(IsVisibleInMobile, "Enable for phone express?"),
    record_type_flag!(IsVisibleInMobileClient, "Enable for mobile?"),
    record_type_flag!(IsReadOnlyInMobileClient, "Read-only in mobile?"),
    record_type_flag!(IsAvailableOffline, "Offline Capability?"),
    record_type_flag!(HelpUrlEnabled, "Use Custom Help?"),
    fd! {
        id: FieldId::RecordType(RecordTypeColumn::HelpUrl),
        label: "Custom Help URL",
        optional: true
    },
];

// ---------------------------
// Field Columns
// ---------------------------

static FIELD_FIELDS: &[FieldDescriptor] = &[
    fd! {
        id: FieldId::Field(FieldColumn::SolutionUniqueName),
        label: "Solution Unique Name",
        optional: true
    },
    fd! {
        id: FieldId::Field(FieldColumn::RecordTypeLogicalName),
        label: "Record Type Logical Name (eg. new_record)",
        optional: false
    },
    fd! {
        id: FieldId::Field(FieldColumn::SchemaName),
        label: "Field Schema Name (eg. new_Field)",
        optional: false
    },
    fd! {
        id: FieldId::Field(FieldColumn::DisplayName),
        label: "Display Name",
        optional: false
    },
    fd! {
        id: FieldId::Field(FieldColumn::RequiredLevel),
        label: "Field Requirement",
        optional: true,
        default: FieldDefault::Option("Optional"),
        options: REQUIRED_LEVELS
    },
    fd! {
        id: FieldId::Field(FieldColumn::IsValidForAdvancedFind),
        label: "Searchable?",
        optional: true,
        default: FieldDefault::Option("Yes"),
        options: YES_NO
    },
    fd! {
        id: FieldId::Field(FieldColumn::IsSecured),
        label: "Field Security?",
        optional: true,
        default: FieldDefault::Option("No"),
        options: YES_NO
    },
    fd! {
        id: FieldId::Field(FieldColumn::IsAuditEnabled),
        label: "Auditing?",
        optional: true,
        default: FieldDefault::Option("No"),
        options: YES_NO
    },
    fd! {
        id: FieldId::Field(FieldColumn::Description),
        label: "Description",
        optional: true
    },
    fd! {
        id: FieldId::Field(FieldColumn::DataType),
        label: "Data Type",
        optional: false,
        options: DATA_TYPES
    },
    fd! {
        id: FieldId::Field(FieldColumn::MaxLength),
        label: "Text - Maximum Length",
        optional: true
    },
    fd! {
        id: FieldId::Field(FieldColumn::StringFormat),
        label: "Single Line of Text - Format",
        optional: true,
        default: FieldDefault::Option("Text"),
        options: &[
            opt("Email", OptionValue::StringFormat(StringFormat::Email)),
            opt("Text", OptionValue::StringFormat(StringFormat::Text)),
            opt("Text Area", OptionValue::StringFormat(StringFormat::TextArea)),
            opt("URL", OptionValue::StringFormat(StringFormat::Url)),
            opt("Ticker Symbol", OptionValue::StringFormat(StringFormat::TickerSymbol)),
            opt("Phone", OptionValue::StringFormat(StringFormat::Phone)),
        ]
    },
    fd! {
        id: FieldId::Field(FieldColumn::IntegerFormat),
        label: "Whole Number - Format",
        optional: true,
        default: FieldDefault::Option("None"),
        options: &[
            opt("None", OptionValue::IntegerFormat(IntegerFormat::None)),
            opt("Duration", OptionValue::IntegerFormat(IntegerFormat::Duration)),
            opt("Time Zone", OptionValue::IntegerFormat(IntegerFormat::TimeZone)),
            opt("Language", OptionValue::IntegerFormat(IntegerFormat::Language)),
        ]
    },
    fd! {
        id: FieldId::Field(FieldColumn::DateTimeFormat),
        label: "Date and Time - Format",
        optional: true,
        default: FieldDefault::Option("Date Only"),
        options: &[
            opt("Date Only", OptionValue::DateTimeFormat(DateTimeFormat::DateOnly)),
            opt("Date and Time", OptionValue::DateTimeFormat(DateTimeFormat::DateAndTime)),
        ]
    },
    fd! {
        id: FieldId::Field(FieldColumn::DateTimeBehavior),
        label: "Date and Time - Behavior",
        optional: true,
        default: FieldDefault::Option("User Local"),
        options: &[
            opt("User Local", OptionValue::DateTimeBehavior(DateTimeBehavior::UserLocal)),
            opt("Date Only", OptionValue::DateTimeBehavior(DateTimeBehavior::DateOnly)),
            opt(
                "Time-Zone Independent",
                OptionValue::DateTimeBehavior(DateTimeBehavior::TimeZoneIndependent),
            ),
        ]
    },
    fd! {
        id: FieldId::Field(FieldColumn::MinimumValue),
        label: "Numbers - Minimum Value",
        optional: true
    },
    fd! {
        id: FieldId::Field(FieldColumn::MaximumValue),
        label: "Numbers - Maximum Value",
        optional: true
    },
    fd! {
        id: FieldId::Field(FieldColumn::Precision),
        label: "Decimal / Money - Precision",
        optional: true,
        default: FieldDefault::Integer(2)
    },
    fd! {
        id: FieldId::Field(FieldColumn::ImeMode),
        label: "IME Mode",
        optional: true,
        default: FieldDefault::Option("Auto"),
        options: IME_MODES
    },
    fd! {
        id: FieldId::Field(FieldColumn::GlobalOptionSet),
        label: "Existing Option Set Logical Name",
        optional: true
    },
    fd! {
        id: FieldId::Field(FieldColumn::Options),
        label: OPTIONS_LABEL,
        optional: true
    },
    fd! {
        id: FieldId::Field(FieldColumn::DefaultValue),
        label: "Default Value",
        optional: true
    },
];

// ---------------------------
// One-to-Many Relationship Columns
// ---------------------------

macro_rules! cascade {
    ($column:ident, $label:expr, $default:expr, $options:expr) => {
        fd! {
            id: FieldId::OneToMany(OneToManyColumn::$column),
            label: $label,
            optional: true,
            default: FieldDefault::Option($default),
            options: $options
        }
    };
}

static ONE_TO_MANY_FIELDS: &[FieldDescriptor] = &[
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::SolutionUniqueName),
        label: "Solution Unique Name",
        optional: true
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::RecordTypeLogicalName),
        label: "Primary Record Type Logical Name (eg. new_record)",
        optional: false
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::RelatedRecordTypeLogicalName),
        label: "Related Record Type Logical Name (eg. contact)",
        optional: false
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::SchemaName),
        label: "Relationship Schema Name (eg. new_Record_Contact)",
        optional: false
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::LookupDisplayName),
        label: "Lookup Field Display Name",
        optional: false
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::LookupSchemaName),
        label: "Lookup Field Schema Name (eg. new_Parent_ContactId)",
        optional: false
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::RequiredLevel),
        label: "Field Requirement",
        optional: true,
        default: FieldDefault::Option("Optional"),
        options: REQUIRED_LEVELS
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::LookupDescription),
        label: "Lookup Field Description",
        optional: true
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::MenuBehavior),
        label: "Display Option",
        optional: true,
        default: FieldDefault::Option("Use Plural Name"),
        options: MENU_BEHAVIORS
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::MenuGroup),
        label: "Display Area",
        optional: true,
        default: FieldDefault::Option("Details"),
        options: MENU_GROUPS
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::MenuCustomLabel),
        label: "Custom Label",
        optional: true
    },
    fd! {
        id: FieldId::OneToMany(OneToManyColumn::MenuOrder),
        label: "Display Order",
        optional: true,
        default: FieldDefault::Integer(10000)
    },
    cascade!(CascadeAssign, "Cascade Assign", "Cascade None", CASCADES),
    cascade!(CascadeShare, "Cascade Share", "Cascade None", CASCADES),
    cascade!(CascadeUnshare, "Cascade Unshare", "Cascade None", CASCADES),
    cascade!(CascadeReparent, "Cascade Reparent", "Cascade None", CASCADES),
    cascade!(CascadeDelete, "Cascade Delete", "Remove Link", CASCADE_DELETES),
    cascade!(CascadeMerge, "Cascade Merge", "Cascade All", CASCADES),
];

// ---------------------------
// Many-to-Many Relationship Columns
// ---------------------------

static MANY_TO_MANY_FIELDS: &[FieldDescriptor] = &[
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::SolutionUniqueName),
        label: "Solution Unique Name",
        optional: true
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType1LogicalName),
        label: "Primary Record Type Logical Name (eg. new_record)",
        optional: false
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType1MenuBehavior),
        label: "Primary Record Type Display Option",
        optional: true,
        default: FieldDefault::Option("Do not Display"),
        options: MENU_BEHAVIORS
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType1MenuGroup),
        label: "Primary Record Type Display Area",
        optional: true,
        default: FieldDefault::Option("Details"),
        options: MENU_GROUPS
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType1MenuCustomLabel),
        label: "Primary Record Type Custom Label",
        optional: true
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType1MenuOrder),
        label: "Primary Record Type Display Order",
        optional: true,
        default: FieldDefault::Integer(10000)
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType2LogicalName),
        label: "Related Record Type Logical Name (eg. new_record)",
        optional: false
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType2MenuBehavior),
        label: "Related Record Type Display Option",
        optional: true,
        default: FieldDefault::Option("Do not Display"),
        options: MENU_BEHAVIORS
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType2MenuGroup),
        label: "Related Record Type Display Area",
        optional: true,
        default: FieldDefault::Option("Details"),
        options: MENU_GROUPS
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType2MenuCustomLabel),
        label: "Related Record Type Custom Label",
        optional: true
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::RecordType2MenuOrder),
        label: "Related Record Type Display Order",
        optional: true,
        default: FieldDefault::Integer(10000)
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::SchemaName),
        label: "Relationship Schema Name (eg. new_Record_Contact)",
        optional: false
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::IntersectRecordTypeSchemaName),
        label: "Intersect Record Type Schema Name (eg. new_Record_Contact)",
        optional: false
    },
    fd! {
        id: FieldId::ManyToMany(ManyToManyColumn::Searchable),
        label: "Searchable?",
        optional: true,
        default: FieldDefault::Option("Yes"),
        options: YES_NO
    },
];

// ---------------------------
// Option Set Columns
// ---------------------------

static OPTION_SET_FIELDS: &[FieldDescriptor] = &[
    fd! {
        id: FieldId::OptionSet(OptionSetColumn::SolutionUniqueName),
        label: "Solution Unique Name",
        optional: true
    },
    fd! {
        id: FieldId::OptionSet(OptionSetColumn::SchemaName),
        label: "Schema Name (eg. new_OptionSet)",
        optional: false
    },
    fd! {
        id: FieldId::OptionSet(OptionSetColumn::DisplayName),
        label: "Display Name",
        optional: false
    },
    fd! {
        id: FieldId::OptionSet(OptionSetColumn::Description),
        label: "Description",
        optional: true
    },
    fd! {
        id: FieldId::OptionSet(OptionSetColumn::Options),
        label: OPTIONS_LABEL,
        optional: false
    },
];

/// Central registry object (immutable after init).
pub struct FieldRegistry {
    tables: HashMap<RecordKind, &'static [FieldDescriptor]>,
    labels: HashMap<(RecordKind, &'static str), FieldId>,
}

impl FieldRegistry {
    fn new() -> Self {
        let tables: HashMap<RecordKind, &'static [FieldDescriptor]> = HashMap::from([
            (RecordKind::RecordType, RECORD_TYPE_FIELDS),
            (RecordKind::Field, FIELD_FIELDS),
            (RecordKind::OneToMany, ONE_TO_MANY_FIELDS),
            (RecordKind::ManyToMany, MANY_TO_MANY_FIELDS),
            (RecordKind::OptionSet, OPTION_SET_FIELDS),
        ]);

        let mut labels = HashMap::new();
        for (kind, table) in &tables {
            for descriptor in table.iter() {
                // Labels are unique per kind; first declaration wins.
                labels.entry((*kind, descriptor.label)).or_insert(descriptor.id);
            }
        }

        Self { tables, labels }
    }

    /// Global singleton accessor.
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<FieldRegistry> = OnceLock::new();
        REGISTRY.get_or_init(FieldRegistry::new)
    }

    /// Descriptors of `kind` in declared order.
    pub fn fields_of(&self, kind: RecordKind) -> &'static [FieldDescriptor] {
        self.tables.get(&kind).copied().unwrap_or(&[])
    }

    /// Descriptor of a column. Tables are declared in enum order, which the
    /// tests below pin down.
    pub fn descriptor(&self, id: FieldId) -> &'static FieldDescriptor {
        &self.fields_of(id.kind())[id.index()]
    }

    pub fn label(&self, id: FieldId) -> &'static str {
        self.descriptor(id).label
    }

    pub fn is_optional(&self, id: FieldId) -> bool {
        self.descriptor(id).optional
    }

    pub fn options(&self, id: FieldId) -> &'static [FieldOption] {
        self.descriptor(id).options
    }

    /// Declared default with option labels resolved to their values.
    pub fn default_value(&self, id: FieldId) -> Option<DefaultValue> {
        match self.descriptor(id).default? {
            FieldDefault::Option(label) => self.resolve(id, label).ok().map(DefaultValue::Option),
            FieldDefault::Integer(value) => Some(DefaultValue::Integer(value)),
            FieldDefault::Text(value) => Some(DefaultValue::Text(value)),
        }
    }

    /// Default as it appears in the blank template.
    pub fn default_label(&self, id: FieldId) -> Option<String> {
        self.descriptor(id).default.map(|default| match default {
            FieldDefault::Option(label) | FieldDefault::Text(label) => label.to_string(),
            FieldDefault::Integer(value) => value.to_string(),
        })
    }

    /// Resolve an option label (case-insensitive) to its value.
    pub fn resolve(&self, id: FieldId, label: &str) -> MappingResult<OptionValue> {
        let descriptor = self.descriptor(id);
        let wanted = label.trim();
        descriptor
            .options
            .iter()
            .find(|option| option.label.eq_ignore_ascii_case(wanted))
            .map(|option| option.value)
            .ok_or_else(|| MappingError::UnknownOptionLabel {
                label: descriptor.label.to_string(),
                value: label.to_string(),
                expected: descriptor
                    .options
                    .iter()
                    .map(|option| option.label.to_string())
                    .collect(),
            })
    }

    /// Header label to column identity (exact match).
    pub fn label_to_identity(&self, kind: RecordKind, label: &str) -> MappingResult<FieldId> {
        self.labels
            .get(&(kind, label))
            .copied()
            .ok_or_else(|| MappingError::UnknownField {
                kind,
                label: label.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_ids() -> Vec<FieldId> {
        RecordTypeColumn::iter()
            .map(FieldId::RecordType)
            .chain(FieldColumn::iter().map(FieldId::Field))
            .chain(OneToManyColumn::iter().map(FieldId::OneToMany))
            .chain(ManyToManyColumn::iter().map(FieldId::ManyToMany))
            .chain(OptionSetColumn::iter().map(FieldId::OptionSet))
            .collect()
    }

    #[test]
    fn tables_are_declared_in_enum_order() {
        let reg = FieldRegistry::global();
        for kind in RecordKind::iter() {
            for (index, descriptor) in reg.fields_of(kind).iter().enumerate() {
                assert_eq!(descriptor.id.kind(), kind);
                assert_eq!(descriptor.id.index(), index, "{:?} out of order", descriptor.id);
            }
        }
        let total: usize = RecordKind::iter().map(|k| reg.fields_of(k).len()).sum();
        assert_eq!(total, all_ids().len());
    }

    #[test]
    fn labels_are_unique_per_kind() {
        let reg = FieldRegistry::global();
        for kind in RecordKind::iter() {
            let mut seen = HashSet::new();
            for descriptor in reg.fields_of(kind) {
                assert!(seen.insert(descriptor.label), "duplicate label {}", descriptor.label);
            }
        }
    }

    #[test]
    fn every_option_label_round_trips() {
        let reg = FieldRegistry::global();
        for id in all_ids() {
            for option in reg.options(id) {
                assert_eq!(reg.resolve(id, option.label).unwrap(), option.value);
                assert_eq!(
                    reg.resolve(id, &option.label.to_uppercase()).unwrap(),
                    option.value
                );
            }
        }
    }

    #[test]
    fn every_option_default_resolves() {
        let reg = FieldRegistry::global();
        for id in all_ids() {
            if let Some(FieldDefault::Option(label)) = reg.descriptor(id).default {
                assert!(reg.resolve(id, label).is_ok(), "{id:?} default {label}");
                assert!(matches!(reg.default_value(id), Some(DefaultValue::Option(_))));
            }
        }
    }

    #[test]
    fn mandatory_columns_have_no_default() {
        let reg = FieldRegistry::global();
        for id in all_ids() {
            if !reg.is_optional(id) {
                assert!(reg.descriptor(id).default.is_none(), "{id:?}");
            }
        }
    }

    #[test]
    fn header_labels_map_back_to_identity() {
        let reg = FieldRegistry::global();
        for id in all_ids() {
            assert_eq!(reg.label_to_identity(id.kind(), reg.label(id)).unwrap(), id);
        }
        assert!(matches!(
            reg.label_to_identity(RecordKind::Field, "data type"),
            Err(MappingError::UnknownField { .. })
        ));
    }

    #[test]
    fn unknown_option_lists_expected_labels() {
        let reg = FieldRegistry::global();
        let err = reg
            .resolve(FieldId::Field(FieldColumn::ImeMode), "Sometimes")
            .unwrap_err();
        match err {
            MappingError::UnknownOptionLabel { expected, .. } => {
                assert_eq!(expected, vec!["Auto", "Inactive", "Active", "Disabled"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn data_type_labels_cover_every_data_type() {
        let reg = FieldRegistry::global();
        let covered: HashSet<DataType> = reg
            .options(FieldId::Field(FieldColumn::DataType))
            .iter()
            .filter_map(|option| DataType::from_option_value(option.value))
            .collect();
        assert_eq!(covered.len(), DataType::iter().count());
    }

    #[test]
    fn sheet_names_round_trip() {
        for kind in RecordKind::iter() {
            assert_eq!(RecordKind::from_sheet_name(&kind.to_string()), Some(kind));
        }
        assert_eq!(RecordKind::from_sheet_name("Entities"), None);
    }
}
