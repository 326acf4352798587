use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::MedicosConfig;
use crate::contract::client::MedicosApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::MedicosLocalClient;
use crate::infra::storage::{migrations::Migrator, SeaOrmMedicosRepository};

/// Name of the module's entry in the `modules` configuration bag.
pub const MODULE_NAME: &str = "medicos";

/// Physician registry module: storage adapter, domain service and REST surface,
/// wired explicitly from one database connection.
#[derive(Clone)]
pub struct MedicosModule {
    db: DatabaseConnection,
    service: Arc<Service>,
}

impl MedicosModule {
    pub fn new(db: DatabaseConnection, cfg: MedicosConfig) -> Self {
        info!("Initializing medicos module");
        debug!(
            "Loaded medicos config: default_page_size={}, max_page_size={}",
            cfg.default_page_size, cfg.max_page_size
        );

        // Wire repository (infra) to domain service (port)
        let repo = SeaOrmMedicosRepository::new(db.clone());
        let service_config = ServiceConfig {
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
        };
        let service = Arc::new(Service::new(Arc::new(repo), service_config));

        Self { db, service }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running medicos database migrations");
        Migrator::up(&self.db, None).await?;
        info!("Medicos database migrations completed successfully");
        Ok(())
    }

    /// The `/medicos` routes; merged into the application router by the host.
    pub fn router(&self) -> Router {
        info!("Registering medicos REST routes");
        routes::register_routes(Router::new(), self.service.clone())
    }

    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        routes::openapi()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn MedicosApi> {
        Arc::new(MedicosLocalClient::new(self.service.clone()))
    }
}
