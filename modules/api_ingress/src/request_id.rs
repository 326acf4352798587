use axum::http::Request;
use axum::{body::Body, middleware::Next, response::Response};
use tower_http::request_id::{MakeRequestId, RequestId};
use std::time::Duration;
use tracing::field::Empty;

pub use modkit::api::request_id::{header, XRequestId};

#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

fn request_id_of<B>(req: &Request<B>) -> String {
    req.headers()
        .get(header())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("n/a")
        .to_owned()
}

/// Stores the request id in request extensions and records it on the current span.
pub async fn push_req_id_to_extensions(mut req: Request<Body>, next: Next) -> Response {
    let rid = request_id_of(&req);
    tracing::Span::current().record("request_id", tracing::field::display(&rid));
    req.extensions_mut().insert(XRequestId(rid));
    next.run(req).await
}

/// Span for one HTTP exchange; `status` and `latency_ms` are filled by [`on_response`].
pub fn make_span(req: &Request<Body>) -> tracing::Span {
    let rid = request_id_of(req);
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        uri = %req.uri().path(),
        request_id = %rid,
        status = Empty,
        latency_ms = Empty
    )
}

pub fn on_response(res: &Response, latency: Duration, span: &tracing::Span) {
    let status = res.status().as_u16();
    span.record("status", status);
    span.record("latency_ms", latency.as_millis() as u64);
    tracing::debug!(parent: span, status, "response sent");
}
