//! Centralized error handling for the schema provisioner
//!
//! # Error Categories
//!
//! - **Mapping Errors**: header resolution and per-row translation failures
//! - **Service Errors**: call-level failures of the remote metadata service
//! - **Application Errors**: configuration, workbook and I/O failures
//!
//! # Usage
//!
//! ```rust
//! use schema_provisioner::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for mapping Results
pub type MappingResult<T> = Result<T, MappingError>;

/// Convenience type alias for remote service Results
pub type ServiceResult<T> = Result<T, ServiceError>;
