//! Change requests: fully typed create/delete instructions for the remote
//! metadata service. A request is built once from one worksheet row and
//! never mutated afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::{
    CascadeType, DataType, DateTimeBehavior, DateTimeFormat, ImeMode, IntegerFormat, Label,
    MenuBehavior, MenuGroup, OptionItem, OwnershipType, RequiredLevel, StringFormat,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeRequest {
    CreateRecordType(CreateRecordType),
    CreateField(CreateField),
    CreateOneToMany(CreateOneToMany),
    CreateManyToMany(CreateManyToMany),
    CreateOptionSet(CreateOptionSet),
    DeleteRecordType(DeleteRecordType),
    DeleteField(DeleteField),
    DeleteRelationship(DeleteRelationship),
    DeleteOptionSet(DeleteOptionSet),
}

/// Discriminant of [`ChangeRequest`], used to key response rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RequestKind {
    CreateRecordType,
    CreateField,
    CreateOneToMany,
    CreateManyToMany,
    CreateOptionSet,
    DeleteRecordType,
    DeleteField,
    DeleteRelationship,
    DeleteOptionSet,
}

impl ChangeRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            ChangeRequest::CreateRecordType(_) => RequestKind::CreateRecordType,
            ChangeRequest::CreateField(_) => RequestKind::CreateField,
            ChangeRequest::CreateOneToMany(_) => RequestKind::CreateOneToMany,
            ChangeRequest::CreateManyToMany(_) => RequestKind::CreateManyToMany,
            ChangeRequest::CreateOptionSet(_) => RequestKind::CreateOptionSet,
            ChangeRequest::DeleteRecordType(_) => RequestKind::DeleteRecordType,
            ChangeRequest::DeleteField(_) => RequestKind::DeleteField,
            ChangeRequest::DeleteRelationship(_) => RequestKind::DeleteRelationship,
            ChangeRequest::DeleteOptionSet(_) => RequestKind::DeleteOptionSet,
        }
    }
}

// ---------------------------
// Record types
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordType {
    pub solution_unique_name: Option<String>,
    pub record_type: RecordTypeMetadata,
    pub primary_field: PrimaryFieldMetadata,
    pub has_notes: bool,
    pub has_activities: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTypeMetadata {
    pub schema_name: String,
    pub display_name: Option<Label>,
    pub display_collection_name: Option<Label>,
    pub description: Option<Label>,
    pub ownership: OwnershipType,
    pub color: Option<String>,
    pub is_business_process_enabled: bool,
    pub is_connections_enabled: bool,
    pub is_mail_merge_enabled: bool,
    pub is_document_management_enabled: bool,
    pub is_valid_for_queue: bool,
    pub is_knowledge_management_enabled: bool,
    pub is_quick_create_enabled: bool,
    pub is_duplicate_detection_enabled: bool,
    pub is_audit_enabled: bool,
    pub change_tracking_enabled: bool,
    pub is_visible_in_mobile: bool,
    pub is_visible_in_mobile_client: bool,
    pub is_read_only_in_mobile_client: bool,
    pub is_available_offline: bool,
    pub help_url_enabled: bool,
    pub help_url: Option<String>,
}

/// The text field every record type is created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryFieldMetadata {
    pub schema_name: String,
    pub display_name: Label,
    pub description: Option<Label>,
    pub max_length: i32,
    pub format: StringFormat,
    pub required_level: RequiredLevel,
}

// ---------------------------
// Fields
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateField {
    pub solution_unique_name: Option<String>,
    pub record_type_logical_name: String,
    pub field: FieldMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub schema_name: String,
    pub display_name: Option<Label>,
    pub description: Option<Label>,
    pub required_level: RequiredLevel,
    pub is_valid_for_advanced_find: bool,
    pub is_secured: bool,
    pub is_audit_enabled: bool,
    pub type_spec: FieldTypeSpec,
}

/// Datatype-specific part of a field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "data_type", rename_all = "snake_case")]
pub enum FieldTypeSpec {
    Boolean(BooleanSpec),
    DateTime(DateTimeSpec),
    Decimal(DecimalSpec),
    Integer(IntegerSpec),
    Memo(MemoSpec),
    Money(MoneySpec),
    Picklist(PicklistSpec),
    String(StringSpec),
    Image,
}

impl FieldTypeSpec {
    pub fn data_type(&self) -> DataType {
        match self {
            FieldTypeSpec::Boolean(_) => DataType::Boolean,
            FieldTypeSpec::DateTime(_) => DataType::DateTime,
            FieldTypeSpec::Decimal(_) => DataType::Decimal,
            FieldTypeSpec::Integer(_) => DataType::Integer,
            FieldTypeSpec::Memo(_) => DataType::Memo,
            FieldTypeSpec::Money(_) => DataType::Money,
            FieldTypeSpec::Picklist(_) => DataType::Picklist,
            FieldTypeSpec::String(_) => DataType::String,
            FieldTypeSpec::Image => DataType::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanSpec {
    pub true_option: OptionItem,
    pub false_option: OptionItem,
    pub default_value: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTimeSpec {
    pub format: DateTimeFormat,
    pub behavior: DateTimeBehavior,
    pub ime_mode: ImeMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecimalSpec {
    pub precision: u32,
    pub min_value: Decimal,
    pub max_value: Decimal,
    pub ime_mode: ImeMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegerSpec {
    pub format: IntegerFormat,
    pub min_value: i32,
    pub max_value: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoSpec {
    pub max_length: i32,
    pub ime_mode: ImeMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneySpec {
    pub precision: u32,
    pub min_value: f64,
    pub max_value: f64,
    pub ime_mode: ImeMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PicklistSpec {
    pub is_global: bool,
    /// Logical name of an existing global option set, when reused.
    pub option_set_name: Option<String>,
    pub options: Vec<OptionItem>,
    pub default_form_value: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringSpec {
    pub format: StringFormat,
    pub max_length: i32,
    pub ime_mode: ImeMode,
}

// ---------------------------
// Relationships
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedMenu {
    pub behavior: MenuBehavior,
    pub group: MenuGroup,
    pub label: Option<Label>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfiguration {
    pub assign: CascadeType,
    pub share: CascadeType,
    pub unshare: CascadeType,
    pub reparent: CascadeType,
    pub delete: CascadeType,
    pub merge: CascadeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOneToMany {
    pub solution_unique_name: Option<String>,
    pub relationship: OneToManyMetadata,
    pub lookup: LookupMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneToManyMetadata {
    pub schema_name: String,
    /// Record type that receives the lookup field.
    pub referencing_record_type: String,
    /// Record type the lookup points at.
    pub referenced_record_type: String,
    pub menu: AssociatedMenu,
    pub cascade: CascadeConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupMetadata {
    pub schema_name: String,
    pub display_name: Option<Label>,
    pub description: Option<Label>,
    pub required_level: RequiredLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateManyToMany {
    pub solution_unique_name: Option<String>,
    pub intersect_record_type_schema_name: String,
    pub relationship: ManyToManyMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManyToManyMetadata {
    pub schema_name: String,
    pub record_type_1_logical_name: String,
    pub record_type_1_menu: AssociatedMenu,
    pub record_type_2_logical_name: String,
    pub record_type_2_menu: AssociatedMenu,
    pub is_valid_for_advanced_find: bool,
}

// ---------------------------
// Option sets
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOptionSet {
    pub solution_unique_name: Option<String>,
    pub option_set: OptionSetMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSetMetadata {
    pub name: String,
    pub display_name: Option<Label>,
    pub description: Option<Label>,
    pub is_global: bool,
    pub options: Vec<OptionItem>,
}

// ---------------------------
// Deletes
// ---------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRecordType {
    pub logical_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteField {
    pub record_type_logical_name: String,
    pub logical_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRelationship {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOptionSet {
    pub name: String,
}
