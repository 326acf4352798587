use std::sync::Arc;

use axum::{
    routing::{delete, post},
    Extension, Router,
};
use modkit::api::problem::{Problem, ValidationError};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register_medico,
        handlers::update_medico,
        handlers::deactivate_medico,
        handlers::list_medicos,
    ),
    components(schemas(
        dto::RegisterMedicoReq,
        dto::UpdateMedicoReq,
        dto::AddressDto,
        dto::SpecialtyDto,
        dto::MedicoSummaryDto,
        Problem,
        ValidationError,
    )),
    tags((name = "medicos", description = "Physician registry"))
)]
pub struct MedicosApiDoc;

/// `/medicos` routes with the service attached as an extension.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let routes = Router::new()
        .route(
            "/medicos",
            post(handlers::register_medico)
                .put(handlers::update_medico)
                .get(handlers::list_medicos),
        )
        .route("/medicos/{id}", delete(handlers::deactivate_medico))
        .layer(Extension(service));

    router.merge(routes)
}

pub fn openapi() -> utoipa::openapi::OpenApi {
    MedicosApiDoc::openapi()
}
