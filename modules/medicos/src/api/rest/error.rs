use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse, ValidationError};

use crate::domain::error::DomainError;

/// Where a problem happened: request path and, when known, the request id.
#[derive(Debug, Clone, Default)]
pub struct ProblemCtx {
    pub instance: String,
    pub request_id: Option<String>,
}

impl ProblemCtx {
    pub fn new(instance: impl Into<String>, request_id: Option<String>) -> Self {
        Self {
            instance: instance.into(),
            request_id,
        }
    }

    /// Stamp instance and request id onto a problem built elsewhere.
    pub fn attach(&self, mut problem: ProblemResponse) -> ProblemResponse {
        if problem.0.instance.is_empty() {
            problem.0.instance = self.instance.clone();
        }
        if let Some(id) = &self.request_id {
            problem.0.request_id = Some(id.clone());
        }
        problem
    }
}

/// Helper to create a ProblemResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    title: &str,
    detail: impl Into<String>,
    ctx: &ProblemCtx,
) -> ProblemResponse {
    let problem = Problem::new(status, title, detail)
        .with_type(format!("https://errors.vollmed.med/{code}"))
        .with_code(code)
        .with_instance(ctx.instance.as_str());
    ctx.attach(ProblemResponse(problem))
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, ctx: &ProblemCtx) -> ProblemResponse {
    match e {
        DomainError::Validation { violations } => {
            let mut resp = from_parts(
                StatusCode::BAD_REQUEST,
                "MEDICOS_VALIDATION",
                "Validation error",
                format!("{} invalid field(s)", violations.len()),
                ctx,
            );
            resp.0.errors = Some(
                violations
                    .iter()
                    .map(|v| ValidationError::for_field(&v.field, v.message.clone()))
                    .collect(),
            );
            resp
        }
        DomainError::MedicoNotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "MEDICOS_NOT_FOUND",
            "Medico not found",
            format!("Medico with id {id} was not found"),
            ctx,
        ),
        DomainError::DuplicateMedico { field } => from_parts(
            StatusCode::CONFLICT,
            "MEDICOS_CONFLICT",
            "Medico already exists",
            format!("A medico with the same {field} is already registered"),
            ctx,
        ),
        DomainError::InvalidSort { property } => from_parts(
            StatusCode::BAD_REQUEST,
            "MEDICOS_INVALID_SORT",
            "Invalid sort",
            format!("Cannot sort by '{property}'"),
            ctx,
        ),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                ctx,
            )
        }
    }
}
