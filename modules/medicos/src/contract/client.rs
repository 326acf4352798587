use async_trait::async_trait;
use modkit::{Page, PageRequest};

use crate::contract::{
    error::MedicosError,
    model::{Medico, MedicoPatch, NewMedico},
};

/// Public API of the medicos module for in-process callers
#[async_trait]
pub trait MedicosApi: Send + Sync {
    /// Register a physician; the record starts active.
    async fn register(&self, new_medico: NewMedico) -> Result<Medico, MedicosError>;

    /// Apply a partial update to the mutable fields.
    async fn update(&self, id: i64, patch: MedicoPatch) -> Result<Medico, MedicosError>;

    /// Soft-delete a physician.
    async fn deactivate(&self, id: i64) -> Result<(), MedicosError>;

    /// One page of active physicians.
    async fn list_active(&self, request: PageRequest) -> Result<Page<Medico>, MedicosError>;
}
