//! The static program catalog: which programs exist and how many
//! registrations each is meant to take. Built once at startup from
//! configuration and injected wherever program lookups are needed;
//! immutable for the lifetime of the process.

pub mod errors;
pub mod program;

pub use errors::CatalogError;
pub use program::{Catalog, Program};
