use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::ServiceError;

/// Trait abstraction for the registration counter state.
/// Implementations can be file-backed or swap in a real key-value store
/// without the registration layer noticing.
///
/// Mutating operations are atomic read-modify-write-persist cycles: two
/// concurrent calls never interleave and never lose an update.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Current count; 0 when the program has no entry. Never fails.
    async fn get(&self, program_id: &str) -> u64;
    /// Add one and persist; returns the new count.
    async fn increment(&self, program_id: &str) -> Result<u64, ServiceError>;
    /// Subtract one, floored at zero, and persist; returns the new count.
    async fn decrement(&self, program_id: &str) -> Result<u64, ServiceError>;
    /// Overwrite with `value` and persist; returns the new count.
    async fn set_exact(&self, program_id: &str, value: u64) -> Result<u64, ServiceError>;
    /// Ensure every known program has an explicit entry (existing counts are
    /// kept, missing ones start at zero). Idempotent.
    async fn initialize_missing(&self, known_ids: &[String]) -> Result<(), ServiceError>;
    /// Consistent point-in-time copy of all counters.
    async fn snapshot(&self) -> HashMap<String, u64>;
}
