//! Service layer owning the counter state and the registration rules on top
//! of it.
//! - Separates counting/persistence from the HTTP surface.
//! - `storage`/`file` provide the file-backed store, `counter` the contract
//!   the rest of the system programs against.
//! - Provides clear error types surfaced unchanged to the API layer.

pub mod counter;
pub mod errors;
pub mod file;
pub mod registration;
pub mod runtime;
pub mod storage;
