//! Storage abstractions for the service layer
//!
//! Contains the reusable file-backed map store that the counter store is
//! built on, so persistence details stay out of the domain code.

pub mod json_map_store;
