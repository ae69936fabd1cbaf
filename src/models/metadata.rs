//! Enumerated metadata settings understood by the remote metadata service.
//!
//! These are the typed values behind the option labels of the configuration
//! workbook; the field registry maps each label onto one of them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipType {
    UserOwned,
    OrganizationOwned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum RequiredLevel {
    None,
    Recommended,
    ApplicationRequired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum MenuBehavior {
    UseCollectionName,
    UseLabel,
    DoNotDisplay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum MenuGroup {
    Details,
    Sales,
    Service,
    Marketing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum CascadeType {
    NoCascade,
    Cascade,
    Active,
    UserOwned,
    RemoveLink,
    Restrict,
}

/// The nine kinds of field the service can create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    DateTime,
    Decimal,
    Integer,
    Memo,
    Money,
    Picklist,
    String,
    Image,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    Email,
    Text,
    TextArea,
    Url,
    TickerSymbol,
    Phone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum IntegerFormat {
    None,
    Duration,
    TimeZone,
    Language,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum DateTimeFormat {
    DateOnly,
    DateAndTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum DateTimeBehavior {
    UserLocal,
    DateOnly,
    TimeZoneIndependent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ImeMode {
    Auto,
    Inactive,
    Active,
    Disabled,
}
