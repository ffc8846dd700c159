use std::sync::Arc;

use catalog::{Catalog, Program};

use crate::counter::store::CounterStore;
use crate::errors::ServiceError;

/// Result of a limit check: the current count, the configured limit, and
/// whether the program is at or past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitStatus {
    pub full: bool,
    pub count: u64,
    pub limit: u64,
}

/// One row of the status view, in catalog order.
#[derive(Debug, Clone)]
pub struct ProgramStatus {
    pub id: String,
    pub display_name: Option<String>,
    pub count: u64,
    pub limit: u64,
    pub full: bool,
}

/// Manual adjustment requested through the admin surface. `Set` carries the
/// raw submitted value; validation happens here, not in the HTTP layer.
#[derive(Debug, Clone)]
pub enum AdminAction {
    Increment,
    Decrement,
    Set(String),
}

/// Stateless rules layer between the HTTP surface and the counter store:
/// validates program identifiers against the catalog, checks the admin
/// credential, and translates actions into store operations.
pub struct RegistrationService {
    catalog: Arc<Catalog>,
    counters: Arc<dyn CounterStore>,
    admin_key: String,
}

impl RegistrationService {
    pub fn new(catalog: Arc<Catalog>, counters: Arc<dyn CounterStore>, admin_key: String) -> Self {
        Self { catalog, counters, admin_key }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Give every cataloged program an explicit persisted entry. Idempotent;
    /// called once at startup.
    pub async fn initialize(&self) -> Result<(), ServiceError> {
        self.counters.initialize_missing(&self.catalog.ids()).await
    }

    fn require_program(&self, program_id: &str) -> Result<&Program, ServiceError> {
        self.catalog
            .get(program_id)
            .ok_or_else(|| ServiceError::UnknownProgram(program_id.to_string()))
    }

    /// Read-only capacity check. `full` means count >= limit.
    pub async fn check_limit(&self, program_id: &str) -> Result<LimitStatus, ServiceError> {
        let program = self.require_program(program_id)?;
        let count = self.counters.get(program_id).await;
        Ok(LimitStatus { full: count >= program.limit, count, limit: program.limit })
    }

    /// Count a registration and return the new total. The limit is advisory:
    /// registrations past capacity are counted, not rejected — callers are
    /// expected to consult `check_limit` first.
    pub async fn register(&self, program_id: &str) -> Result<u64, ServiceError> {
        self.require_program(program_id)?;
        self.counters.increment(program_id).await
    }

    /// Constant-time admin credential check.
    pub fn authorize_admin(&self, credential: &str) -> Result<(), ServiceError> {
        if constant_time_eq(credential.as_bytes(), self.admin_key.as_bytes()) {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized)
        }
    }

    /// Apply a manual adjustment. Check order: credential, then catalog, then
    /// (for `Set`) the submitted value — a failed check never mutates state.
    pub async fn admin_adjust(
        &self,
        program_id: &str,
        action: AdminAction,
        credential: &str,
    ) -> Result<u64, ServiceError> {
        self.authorize_admin(credential)?;
        self.require_program(program_id)?;
        match action {
            AdminAction::Increment => self.counters.increment(program_id).await,
            AdminAction::Decrement => self.counters.decrement(program_id).await,
            AdminAction::Set(raw) => {
                let value = parse_count(&raw)?;
                self.counters.set_exact(program_id, value).await
            }
        }
    }

    /// All programs with their counts, in catalog order, from one consistent
    /// counter snapshot.
    pub async fn status_snapshot(&self) -> Vec<ProgramStatus> {
        let counts = self.counters.snapshot().await;
        self.catalog
            .iter()
            .map(|p| {
                let count = counts.get(&p.id).copied().unwrap_or(0);
                ProgramStatus {
                    id: p.id.clone(),
                    display_name: p.display_name.clone(),
                    count,
                    limit: p.limit,
                    full: count >= p.limit,
                }
            })
            .collect()
    }
}

fn parse_count(raw: &str) -> Result<u64, ServiceError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| ServiceError::InvalidValue(trimmed.to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
