//! Error type definitions for the schema provisioner
//!
//! Errors are split by the layer that raises them: row mapping and column
//! resolution produce [`MappingError`], the remote metadata service produces
//! [`ServiceError`], and [`AppError`] ties both together with configuration
//! and I/O failures for the pipelines and the binary.

use thiserror::Error;

use crate::field_registry::RecordKind;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Column resolution or row mapping errors
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Remote metadata service errors
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Workbook file errors
    #[error("Workbook error: {message}")]
    Workbook { message: String },

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while resolving worksheet headers or mapping a data row
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    /// One or more mandatory columns are absent from the header row
    #[error("Unable to process worksheet {sheet}. Missing mandatory columns: {}.", labels.join(", "))]
    MissingMandatoryColumns { sheet: String, labels: Vec<String> },

    /// A mandatory cell is empty
    #[error("{kind}: mandatory data field '{label}' does not contain a value.")]
    MissingMandatoryField { kind: RecordKind, label: String },

    /// The cell text does not match any declared option label
    #[error("'{value}' is not a valid option for '{label}'. Expected one of: {}.", expected.join(", "))]
    UnknownOptionLabel {
        label: String,
        value: String,
        expected: Vec<String>,
    },

    /// A header label does not match any field of the record kind
    #[error("{kind} has no field labelled '{label}'.")]
    UnknownField { kind: RecordKind, label: String },

    /// The cell could not be coerced to the field's primitive type
    #[error("Value '{value}' for '{label}' is not a valid {expected}.")]
    InvalidValue {
        label: String,
        expected: &'static str,
        value: String,
    },
}

/// Errors reported by the remote metadata service at call level
///
/// Per-item faults inside a batch reply are not errors; they travel back in
/// the batch response and surface as events.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The batch holds more requests than the service accepts in one call
    #[error("Batch size exceeded: {message} (maximum batch size {max_batch_size})")]
    BatchSizeExceeded {
        max_batch_size: usize,
        message: String,
    },

    /// The service rejected the call
    #[error("Service fault: {message}")]
    Fault { message: String },

    /// The call never reached the service or its reply was lost
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service replied with something that does not follow the protocol
    #[error("Protocol error: {message}")]
    Protocol { message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a workbook error
    pub fn workbook<S: Into<String>>(message: S) -> Self {
        Self::Workbook {
            message: message.into(),
        }
    }
}

impl MappingError {
    /// Create a missing mandatory field error
    pub fn missing_field<L: Into<String>>(kind: RecordKind, label: L) -> Self {
        Self::MissingMandatoryField {
            kind,
            label: label.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value<L: Into<String>, V: Into<String>>(
        label: L,
        expected: &'static str,
        value: V,
    ) -> Self {
        Self::InvalidValue {
            label: label.into(),
            expected,
            value: value.into(),
        }
    }
}

impl ServiceError {
    /// Create a fault error
    pub fn fault<S: Into<String>>(message: S) -> Self {
        Self::Fault {
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol<S: Into<String>>(message: S) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Maximum batch size reported by the service, if this is a size fault
    pub fn max_batch_size(&self) -> Option<usize> {
        match self {
            Self::BatchSizeExceeded { max_batch_size, .. } => Some(*max_batch_size),
            _ => None,
        }
    }
}
