use axum::http::HeaderName;

/// Request id as stored in request extensions by the ingress middleware.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XRequestId(pub String);

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}
