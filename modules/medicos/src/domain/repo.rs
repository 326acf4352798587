use async_trait::async_trait;
use modkit::{Direction, Page, PageRequest};

use crate::contract::model::{Medico, NewMedico};

/// Properties the list operation can be ordered by (JSON names).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    DocumentId,
    Email,
    Specialty,
}

impl SortField {
    pub fn from_property(property: &str) -> Option<Self> {
        match property {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "documentId" => Some(Self::DocumentId),
            "email" => Some(Self::Email),
            "specialty" => Some(Self::Specialty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: Direction,
}

/// Raised by adapters when an insert or update hits a unique constraint.
/// Travels inside `anyhow::Error`; the service downcasts it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unique constraint violated on {field}")]
pub struct UniqueViolation {
    /// JSON name of the offending field, e.g. `email`.
    pub field: String,
}

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait MedicosRepository: Send + Sync {
    /// Insert with `active = true`; the store assigns the id.
    async fn create(&self, new_medico: NewMedico) -> anyhow::Result<Medico>;
    /// Load a physician by id, active or not.
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Medico>>;
    /// Persist every column of an existing record (by primary key in `m.id`).
    async fn save(&self, m: &Medico) -> anyhow::Result<()>;
    /// One page of active rows in `order`, plus the count of all active rows.
    async fn find_active_page(
        &self,
        request: &PageRequest,
        order: &[SortKey],
    ) -> anyhow::Result<Page<Medico>>;
}

/// Repository that can open transactions.
#[async_trait]
pub trait MedicosStore: MedicosRepository {
    async fn begin(&self) -> anyhow::Result<Box<dyn MedicosTransaction>>;
}

/// Repository bound to one open transaction.
/// Dropping it without `commit` rolls the transaction back.
#[async_trait]
pub trait MedicosTransaction: MedicosRepository {
    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
}
