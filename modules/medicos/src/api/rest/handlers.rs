use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, RawQuery,
    },
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{from_json_rejection, Problem, ProblemResponse};
use modkit::api::request_id::XRequestId;
use modkit::api::response::{no_content, JsonPage};
use modkit::{PageDto, PageParams};
use tracing::{error, info};

use crate::api::rest::dto::{MedicoSummaryDto, RegisterMedicoReq, UpdateMedicoReq};
use crate::api::rest::error::{from_parts, map_domain_error, ProblemCtx};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Request id comes from the ingress middleware; absent when routes run bare.
fn problem_ctx(uri: &Uri, rid: Option<Extension<XRequestId>>) -> ProblemCtx {
    ProblemCtx::new(uri.path(), rid.map(|Extension(XRequestId(id))| id))
}

fn fail(e: &DomainError, ctx: &ProblemCtx) -> ProblemResponse {
    error!("Medicos request failed: {}", e);
    map_domain_error(e, ctx)
}

/// Register a new physician
#[utoipa::path(
    post,
    path = "/medicos",
    tag = "medicos",
    operation_id = "medicos.register",
    request_body = RegisterMedicoReq,
    responses(
        (status = 204, description = "Medico registered"),
        (status = 400, description = "Malformed body or invalid fields", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Document id or email already registered", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn register_medico(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    rid: Option<Extension<XRequestId>>,
    body: Result<Json<RegisterMedicoReq>, JsonRejection>,
) -> Result<StatusCode, ProblemResponse> {
    let ctx = problem_ctx(&uri, rid);
    let Json(req_body) = body.map_err(|rejection| {
        error!("Rejected register body: {}", rejection);
        ctx.attach(from_json_rejection(&rejection, &ctx.instance))
    })?;
    info!("Registering medico: {:?}", req_body);

    let new_medico = req_body.into_new_medico().map_err(|e| fail(&e, &ctx))?;

    match svc.register(new_medico).await {
        Ok(_) => Ok(no_content()),
        Err(e) => Err(fail(&e, &ctx)),
    }
}

/// Update name, phone and address of a physician
#[utoipa::path(
    put,
    path = "/medicos",
    tag = "medicos",
    operation_id = "medicos.update",
    request_body = UpdateMedicoReq,
    responses(
        (status = 204, description = "Medico updated"),
        (status = 400, description = "Malformed body or missing id", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_medico(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    rid: Option<Extension<XRequestId>>,
    body: Result<Json<UpdateMedicoReq>, JsonRejection>,
) -> Result<StatusCode, ProblemResponse> {
    let ctx = problem_ctx(&uri, rid);
    let Json(req_body) = body.map_err(|rejection| {
        error!("Rejected update body: {}", rejection);
        ctx.attach(from_json_rejection(&rejection, &ctx.instance))
    })?;
    info!("Updating medico with: {:?}", req_body);

    let (id, patch) = req_body.into_parts().map_err(|e| fail(&e, &ctx))?;

    match svc.update(id, patch).await {
        Ok(_) => Ok(no_content()),
        Err(e) => Err(fail(&e, &ctx)),
    }
}

/// Soft-delete a physician
#[utoipa::path(
    delete,
    path = "/medicos/{id}",
    tag = "medicos",
    operation_id = "medicos.deactivate",
    params(("id" = i64, Path, description = "Medico id")),
    responses(
        (status = 204, description = "Medico deactivated"),
        (status = 400, description = "Non-numeric id", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn deactivate_medico(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    rid: Option<Extension<XRequestId>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ProblemResponse> {
    let ctx = problem_ctx(&uri, rid);
    let Path(id) = id.map_err(|rejection| {
        error!("Rejected medico id: {}", rejection);
        from_parts(
            StatusCode::BAD_REQUEST,
            "MEDICOS_INVALID_ID",
            "Invalid id",
            rejection.body_text(),
            &ctx,
        )
    })?;
    info!("Deactivating medico: {}", id);

    match svc.deactivate(id).await {
        Ok(()) => Ok(no_content()),
        Err(e) => Err(fail(&e, &ctx)),
    }
}

/// List active physicians, one page at a time
#[utoipa::path(
    get,
    path = "/medicos",
    tag = "medicos",
    operation_id = "medicos.list",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page index (default 0)"),
        ("size" = Option<u64>, Query, description = "Page size (default 2)"),
        ("sort" = Option<Vec<String>>, Query, description = "`property[,asc|desc]`, repeatable; properties: id, name, documentId, email, specialty"),
    ),
    responses(
        (status = 200, description = "Page of active medicos", body = PageDto<MedicoSummaryDto>),
        (status = 400, description = "Unknown sort property", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_medicos(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    rid: Option<Extension<XRequestId>>,
    RawQuery(query): RawQuery,
) -> Result<JsonPage<MedicoSummaryDto>, ProblemResponse> {
    let ctx = problem_ctx(&uri, rid);
    let request = svc.page_request(PageParams::from_query(query.as_deref()));
    info!("Listing medicos: {:?}", request);

    match svc.list_active(request).await {
        Ok(page) => Ok(Json(page.map(MedicoSummaryDto::from).into())),
        Err(e) => Err(fail(&e, &ctx)),
    }
}
