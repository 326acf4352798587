use std::sync::Arc;

use modkit::{Direction, Page, PageParams, PageRequest};
use tracing::{debug, info, instrument};

use crate::contract::model::{Medico, MedicoPatch, NewMedico};
use crate::domain::error::DomainError;
use crate::domain::repo::{MedicosStore, SortField, SortKey, UniqueViolation};
use crate::domain::validation;

/// Domain service with business rules for physician management.
/// Depends only on the store port, not on infra types.
#[derive(Clone)]
pub struct Service {
    store: Arc<dyn MedicosStore>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 2,
            max_page_size: 2000,
        }
    }
}

/// Storage failures: unique violations become `DuplicateMedico`, the rest `Database`.
fn storage_error(e: anyhow::Error) -> DomainError {
    match e.downcast_ref::<UniqueViolation>() {
        Some(v) => DomainError::duplicate_medico(v.field.clone()),
        None => DomainError::database(format!("{e:#}")),
    }
}

impl Service {
    pub fn new(store: Arc<dyn MedicosStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Resolve raw query parameters with the configured default and maximum size.
    pub fn page_request(&self, params: PageParams) -> PageRequest {
        params.resolve(self.config.default_page_size, self.config.max_page_size)
    }

    #[instrument(
        name = "medicos.service.register",
        skip(self, new_medico),
        fields(document_id = %new_medico.document_id)
    )]
    pub async fn register(&self, new_medico: NewMedico) -> Result<Medico, DomainError> {
        info!("Registering medico");

        let violations = validation::validate_new_medico(&new_medico);
        if !violations.is_empty() {
            return Err(DomainError::validation(violations));
        }

        let tx = self.store.begin().await.map_err(storage_error)?;
        let medico = tx.create(new_medico).await.map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        info!(id = medico.id, "Registered medico");
        Ok(medico)
    }

    #[instrument(name = "medicos.service.update", skip(self, patch), fields(medico_id = id))]
    pub async fn update(&self, id: i64, patch: MedicoPatch) -> Result<Medico, DomainError> {
        info!("Updating medico");

        let tx = self.store.begin().await.map_err(storage_error)?;
        let mut current = tx
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| DomainError::medico_not_found(id))?;

        current.apply_update(&patch);

        tx.save(&current).await.map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        info!("Updated medico");
        Ok(current)
    }

    #[instrument(name = "medicos.service.deactivate", skip(self), fields(medico_id = id))]
    pub async fn deactivate(&self, id: i64) -> Result<(), DomainError> {
        info!("Deactivating medico");

        let tx = self.store.begin().await.map_err(storage_error)?;
        let mut current = tx
            .find_by_id(id)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| DomainError::medico_not_found(id))?;

        current.deactivate();

        tx.save(&current).await.map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        info!("Deactivated medico");
        Ok(())
    }

    #[instrument(
        name = "medicos.service.list_active",
        skip(self, request),
        fields(page = request.page, size = request.size)
    )]
    pub async fn list_active(&self, request: PageRequest) -> Result<Page<Medico>, DomainError> {
        debug!("Listing active medicos");

        let order = sort_keys(&request)?;
        let page = self
            .store
            .find_active_page(&request, &order)
            .await
            .map_err(storage_error)?;

        debug!(
            "Listed {} of {} active medicos",
            page.items.len(),
            page.total
        );
        Ok(page)
    }
}

/// Requested order, defaulting to id ascending. Id is appended as a tie-breaker
/// so pages are stable.
fn sort_keys(request: &PageRequest) -> Result<Vec<SortKey>, DomainError> {
    let mut keys = request
        .sort
        .iter()
        .map(|s| {
            SortField::from_property(&s.property)
                .map(|field| SortKey {
                    field,
                    direction: s.direction,
                })
                .ok_or_else(|| DomainError::invalid_sort(&s.property))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !keys.iter().any(|k| k.field == SortField::Id) {
        keys.push(SortKey {
            field: SortField::Id,
            direction: Direction::Asc,
        });
    }
    Ok(keys)
}
