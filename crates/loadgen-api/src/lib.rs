//! HTTP facet surface: routing, shared state, metrics and the OpenAPI sketch.

mod context;
mod envelope;
mod error;
mod facets;

pub use context::RequestContext;
pub use envelope::{FacetBody, NumberResult, StatusResult, StringResult};
pub use error::ApiError;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use once_cell::sync::Lazy;
use prometheus::{Encoder, Histogram, IntCounter, TextEncoder};

use loadgen_common::config::LoadTestConfig;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<LoadTestConfig>,
    pub http: reqwest::Client,
    pub propagated_headers: Arc<Vec<String>>,
}

static ENCODER: Lazy<TextEncoder> = Lazy::new(TextEncoder::new);
static REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    prometheus::register_int_counter!("loadgen_requests_total", "Total facet requests handled")
        .expect("counter")
});
static REQUEST_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    prometheus::register_histogram!("loadgen_request_seconds", "Facet request handling time")
        .expect("histogram")
});

pub fn app(cfg: LoadTestConfig) -> Router {
    loadgen_obs::init();
    loadgen_obs::spawn_system_polling();

    // Outbound calls get a connect bound only; an overall deadline would cap
    // the depth of the recursive fan-out facets.
    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .build()
        .expect("default reqwest client");

    let state = AppState {
        propagated_headers: Arc::new(cfg.propagated_header_list()),
        cfg: Arc::new(cfg),
        http,
    };

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(metrics))
        .route("/openapi.json", get(openapi))
        .nest("/api/test", facet_routes())
        .with_state(state)
}

fn facet_routes() -> Router<AppState> {
    Router::new()
        .route("/sleep", get(facets::sleep))
        .route("/fib", get(facets::fib))
        .route("/remote-fib", get(facets::remote_fib))
        .route("/remote", get(facets::remote))
        .route("/return", get(facets::return_string))
        .route("/return-blocks", get(facets::return_blocks))
        .route("/return-blocks-streamed", get(facets::return_blocks_streamed))
        .route("/receive", post(facets::receive))
        .route("/memory", get(facets::memory))
        .route("/sse-time-by-second", get(facets::sse_time_by_second))
        .route("/echo-url", get(facets::echo_url))
        .route("/echo-header", get(facets::echo_header))
        .route("/system-info", get(facets::system_info))
        .layer(middleware::from_fn(track_request))
}

async fn track_request(request: Request, next: Next) -> Response {
    REQUESTS_TOTAL.inc();
    let start = Instant::now();
    let response = next.run(request).await;
    REQUEST_SECONDS.observe(start.elapsed().as_secs_f64());
    response
}

async fn metrics() -> impl IntoResponse {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    ENCODER.encode(&metric_families, &mut buffer).expect("text encoding");
    ([("content-type", ENCODER.format_type().to_string())], buffer)
}

async fn openapi() -> Json<serde_json::Value> {
    let spec = serde_json::json!({
        "openapi": "3.0.0",
        "info": {"title": "Loadgen API", "version": env!("CARGO_PKG_VERSION")},
        "paths": {
            "/api/test/sleep": {"get": {"summary": "Sleep for ms milliseconds"}},
            "/api/test/fib": {"get": {"summary": "Recursive fibonacci (CPU burn)"}},
            "/api/test/remote-fib": {"get": {"summary": "Fibonacci fanned out over HTTP"}},
            "/api/test/remote": {"get": {"summary": "Proxy a templated target URL"}},
            "/api/test/return": {"get": {"summary": "String payload of a given size"}},
            "/api/test/return-blocks": {"get": {"summary": "Raw KB blocks, buffered"}},
            "/api/test/return-blocks-streamed": {"get": {"summary": "Raw KB blocks, streamed"}},
            "/api/test/receive": {"post": {"summary": "Length of a posted StringResult"}},
            "/api/test/memory": {"get": {"summary": "Serialized size of a large object"}},
            "/api/test/sse-time-by-second": {"get": {"summary": "One SSE event per second"}},
            "/api/test/echo-url": {"get": {"summary": "Echo the observed request URL"}},
            "/api/test/echo-header": {"get": {"summary": "Echo the inbound headers"}},
            "/api/test/system-info": {"get": {"summary": "Host and OS facts"}},
            "/metrics": {"get": {"summary": "Prometheus metrics"}},
            "/healthz": {"get": {"summary": "health"}}
        }
    });
    Json(spec)
}
