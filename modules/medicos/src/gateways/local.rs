use async_trait::async_trait;
use modkit::{Page, PageRequest};
use std::sync::Arc;

use crate::contract::{
    client::MedicosApi,
    error::MedicosError,
    model::{Medico, MedicoPatch, NewMedico},
};
use crate::domain::service::Service;

/// Local implementation of the MedicosApi trait that delegates to the domain service
pub struct MedicosLocalClient {
    service: Arc<Service>,
}

impl MedicosLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl MedicosApi for MedicosLocalClient {
    async fn register(&self, new_medico: NewMedico) -> Result<Medico, MedicosError> {
        self.service.register(new_medico).await.map_err(Into::into)
    }

    async fn update(&self, id: i64, patch: MedicoPatch) -> Result<Medico, MedicosError> {
        self.service.update(id, patch).await.map_err(Into::into)
    }

    async fn deactivate(&self, id: i64) -> Result<(), MedicosError> {
        self.service.deactivate(id).await.map_err(Into::into)
    }

    async fn list_active(&self, request: PageRequest) -> Result<Page<Medico>, MedicosError> {
        self.service.list_active(request).await.map_err(Into::into)
    }
}
