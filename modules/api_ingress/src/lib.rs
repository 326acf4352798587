//! HTTP host: global middleware, health endpoints, OpenAPI document and the serve loop.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{http::StatusCode, middleware::from_fn, response::Json, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::openapi::OpenApi;

mod config;
pub mod openapi;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// Name of the ingress entry in the `modules` configuration bag.
pub const MODULE_NAME: &str = "api_ingress";

pub struct ApiIngress {
    config: ApiIngressConfig,
    openapi: Option<OpenApi>,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self {
            config,
            openapi: None,
        }
    }

    /// Document served at `/openapi.json` when `enable_docs` is set.
    #[must_use]
    pub fn with_openapi(mut self, doc: OpenApi) -> Self {
        self.openapi = Some(doc);
        self
    }

    /// Wrap the application routes with health endpoints and the global middleware.
    ///
    /// Request order (outermost first): SetRequestId -> PropagateRequestId -> Trace
    /// -> request id into extensions -> Timeout -> CORS -> BodyLimit -> handler.
    pub fn build_router(&self, app: Router) -> Router {
        let mut router = app
            .route("/health", get(web::health_check))
            .route("/healthz", get(web::liveness));

        if self.config.enable_docs {
            match &self.openapi {
                Some(doc) => {
                    let doc = doc.clone();
                    router = router.route(
                        "/openapi.json",
                        get(move || {
                            let doc = doc.clone();
                            async move { Json(doc) }
                        }),
                    );
                }
                None => tracing::warn!("enable_docs is set but no OpenAPI document was provided"),
            }
        }

        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        // 0 disables the request timeout
        if self.config.request_timeout_sec > 0 {
            router = router.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(self.config.request_timeout_sec),
            ));
        }

        let x_request_id = request_id::header();
        router
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_id::make_span)
                    .on_response(request_id::on_response),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// `bind_addr` from the module config, falling back to `host:port`.
    pub fn bind_addr(&self, host: &str, port: u16) -> Result<SocketAddr> {
        let raw = if self.config.bind_addr.trim().is_empty() {
            format!("{host}:{port}")
        } else {
            self.config.bind_addr.clone()
        };
        raw.parse()
            .with_context(|| format!("invalid bind address '{raw}'"))
    }

    /// Bind and serve until `shutdown` resolves; in-flight requests are drained.
    pub async fn serve<F>(&self, addr: SocketAddr, router: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
            .context("HTTP server failed")
    }
}
