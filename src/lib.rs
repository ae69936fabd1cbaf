//! Bulk provisioning of schema metadata.
//!
//! Worksheets describing record types, fields, relationships and option sets
//! are resolved against the [`field_registry`], mapped into typed change
//! requests and submitted to a remote [`client::MetadataService`] in batches.

pub mod client;
pub mod config;
pub mod errors;
pub mod events;
pub mod executor;
pub mod field_registry;
pub mod mapping;
pub mod models;
pub mod orchestrator;
pub mod schema;
pub mod workbook;
