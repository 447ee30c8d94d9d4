//! Facet handlers. Every facet resolves its parameters as explicit query
//! value or configured default, performs its load synthesis, and answers
//! with one of the envelope types.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::sse::{Event, Sse};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use sysinfo::System;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use url::Url;

use loadgen_common::LoadgenError;
use loadgen_core::facet::{FacetKind, ResultShape};
use loadgen_core::{blocks, compute, urltmpl};

use crate::context::RequestContext;
use crate::envelope::{FacetBody, NumberResult, StatusResult, StringResult};
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
pub struct SleepParams {
    ms: Option<u64>,
}

#[derive(Deserialize)]
pub struct FibParams {
    input: Option<i64>,
}

#[derive(Deserialize)]
pub struct RemoteParams {
    url: Option<String>,
}

#[derive(Deserialize)]
pub struct ReturnParams {
    size: Option<usize>,
}

#[derive(Deserialize)]
pub struct BlocksParams {
    #[serde(rename = "numberOfKiloByteBlocks")]
    number_of_kilo_byte_blocks: Option<usize>,
}

#[derive(Deserialize)]
pub struct MemoryParams {
    factor: Option<usize>,
}

#[derive(Deserialize)]
pub struct SseParams {
    #[serde(rename = "nrOfEvents")]
    nr_of_events: Option<u32>,
}

pub async fn sleep(
    State(state): State<AppState>,
    Query(params): Query<SleepParams>,
) -> Json<StringResult> {
    let ms = params.ms.unwrap_or(state.cfg.default_sleep_ms);
    tracing::debug!(target: "facet", "sleep: ms={}", ms);
    // Occupies a blocking-pool thread for the full duration, mirroring a
    // thread-per-request stack. An aborted wait degrades to a normal result.
    let slept =
        tokio::task::spawn_blocking(move || std::thread::sleep(Duration::from_millis(ms))).await;
    match slept {
        Ok(()) => Json(StringResult::new("OK")),
        Err(_) => Json(StringResult::new("Interrupted")),
    }
}

pub async fn fib(
    State(state): State<AppState>,
    Query(params): Query<FibParams>,
) -> Result<Json<NumberResult>, ApiError> {
    let input = params.input.unwrap_or(state.cfg.default_fib_input);
    tracing::debug!(target: "facet", "fib: input={}", input);
    let input = check_fib_domain(input)?;
    let result = tokio::task::spawn_blocking(move || compute::fibonacci(input)).await?;
    Ok(Json(NumberResult::new(result as i64)))
}

/// Like `fib`, but the recursion tree is distributed over HTTP: each level
/// calls this same facet twice at the URL the client used to reach us. Base
/// cases short-circuit locally.
pub async fn remote_fib(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<FibParams>,
) -> Result<Json<NumberResult>, ApiError> {
    let input = params.input.unwrap_or(state.cfg.default_fib_input);
    tracing::debug!(target: "facet", "remote-fib: input={}", input);
    let input = check_fib_domain(input)?;
    if input <= 1 {
        return Ok(Json(NumberResult::new(input as i64)));
    }

    let mut target = ctx.url.clone();
    if state.cfg.force_ssl {
        target = target.replace("http:", "https:");
    }
    let minus1 = fetch_number(&state, &ctx, format!("{}?input={}", target, input - 1)).await?;
    let minus2 = fetch_number(&state, &ctx, format!("{}?input={}", target, input - 2)).await?;
    Ok(Json(NumberResult::new(minus1 + minus2)))
}

async fn fetch_number(
    state: &AppState,
    ctx: &RequestContext,
    url: String,
) -> Result<i64, ApiError> {
    let request = propagate_headers(state.http.get(url), state, ctx);
    let body: NumberResult = request.send().await?.json().await?;
    Ok(body.result)
}

pub async fn remote(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<RemoteParams>,
) -> Result<Json<StatusResult<FacetBody>>, ApiError> {
    let url = match params.url {
        Some(url) if !url.trim().is_empty() => url,
        _ => state.cfg.default_remote_url.clone(),
    };
    let target = urltmpl::resolve(
        &url,
        &ctx.url,
        state.cfg.url_replacement_base.as_deref(),
        state.cfg.force_ssl,
    );
    tracing::debug!(target: "facet", "remote: url={}, target={}", url, target);

    let target_url = match Url::parse(&target) {
        Ok(url) => url,
        Err(err) => {
            // A malformed target is data, not a transport failure.
            return Ok(Json(StatusResult {
                status: -1,
                result: FacetBody::Opaque(serde_json::Value::String(err.to_string())),
            }));
        }
    };
    let shape = FacetKind::from_last_segment(target_url.path()).result_shape();

    let request = propagate_headers(state.http.get(target_url), &state, &ctx);
    let response = request.send().await?;
    let status = response.status().as_u16() as i64;
    let result = match shape {
        ResultShape::Number => FacetBody::Number(response.json().await?),
        ResultShape::Text => FacetBody::Text(response.json().await?),
        ResultShape::Status => FacetBody::Status(response.json().await?),
        ResultShape::Opaque => FacetBody::Opaque(response.json().await?),
    };
    Ok(Json(StatusResult { status, result }))
}

/// Copies allowlisted inbound headers onto an outbound request.
fn propagate_headers(
    mut request: reqwest::RequestBuilder,
    state: &AppState,
    ctx: &RequestContext,
) -> reqwest::RequestBuilder {
    for name in state.propagated_headers.iter() {
        if let Some(value) = ctx.headers.get(name.as_str()) {
            if let Ok(value) = value.to_str() {
                request = request.header(name.as_str(), value);
            }
        }
    }
    request
}

pub async fn return_string(
    State(state): State<AppState>,
    Query(params): Query<ReturnParams>,
) -> Json<StringResult> {
    let size = params.size.unwrap_or(state.cfg.default_return_size);
    tracing::debug!(target: "facet", "return: size={}", size);
    Json(StringResult::new(blocks::string_of_size(size)))
}

pub async fn return_blocks(
    State(state): State<AppState>,
    Query(params): Query<BlocksParams>,
) -> Result<Response, ApiError> {
    let count = params
        .number_of_kilo_byte_blocks
        .unwrap_or(state.cfg.default_kilobyte_blocks);
    let mut buf = Vec::with_capacity(count * 1024);
    let written = blocks::stream_blocks(&mut buf, count).map_err(LoadgenError::from)?;
    tracing::debug!(target: "facet", "return-blocks: blocks={}, contentLength={}", count, written);
    Ok(block_response(written, Body::from(buf)))
}

pub async fn return_blocks_streamed(
    State(state): State<AppState>,
    Query(params): Query<BlocksParams>,
) -> Response {
    let count = params
        .number_of_kilo_byte_blocks
        .unwrap_or(state.cfg.default_kilobyte_blocks);
    let content_length = 1024 * count as u64;
    tracing::debug!(
        target: "facet",
        "return-blocks-streamed: blocks={}, contentLength={}", count, content_length
    );
    let chunks = tokio_stream::iter(
        blocks::block_stream(count).map(|block| Ok::<_, Infallible>(Bytes::from_static(block))),
    );
    block_response(content_length, Body::from_stream(chunks))
}

/// The declared length must match what the block generator writes exactly;
/// clients validate the download against it.
fn block_response(content_length: u64, body: Body) -> Response {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::CONTENT_DISPOSITION, "attachment;filename=download.txt")
        .body(body)
        .expect("static headers are valid")
}

pub async fn receive(Json(body): Json<StringResult>) -> Json<NumberResult> {
    Json(NumberResult::new(body.result.chars().count() as i64))
}

pub async fn memory(
    State(state): State<AppState>,
    Query(params): Query<MemoryParams>,
) -> Result<Json<NumberResult>, ApiError> {
    let factor = params.factor.unwrap_or(state.cfg.default_memory_factor);
    let size = tokio::task::spawn_blocking(move || {
        let object = compute::large_object(factor);
        compute::size_of_large_object(&object)
    })
    .await??;
    tracing::debug!(target: "facet", "memory: factor={}, size={}", factor, size);
    Ok(Json(NumberResult::new(size as i64)))
}

pub async fn sse_time_by_second(
    Query(params): Query<SseParams>,
) -> Sse<ReceiverStream<Result<Event, Infallible>>> {
    let nr_of_events = params.nr_of_events.unwrap_or(10);
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        for i in 0..nr_of_events {
            let event = Event::default()
                .data(chrono::Local::now().time().to_string())
                .id(i.to_string())
                .event("sse-time-by-second");
            if tx.send(Ok(event)).await.is_err() {
                // Subscriber went away; stop emitting.
                tracing::debug!(target: "facet", "sse subscriber disconnected after {} events", i);
                return;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    });
    Sse::new(ReceiverStream::new(rx))
}

pub async fn echo_url(ctx: RequestContext) -> Json<StringResult> {
    tracing::debug!(target: "facet", "echo-url: url={}", ctx.url);
    Json(StringResult::new(ctx.url))
}

pub async fn echo_header(ctx: RequestContext) -> Json<BTreeMap<String, String>> {
    let mut ret = BTreeMap::new();
    for (name, value) in ctx.headers.iter() {
        ret.insert(
            name.as_str().to_string(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    Json(ret)
}

pub async fn system_info() -> Json<BTreeMap<String, String>> {
    let mut sys = System::new_all();
    sys.refresh_all();
    let mut ret = BTreeMap::new();
    ret.insert("host.name".into(), System::host_name().unwrap_or_default());
    ret.insert("os.name".into(), System::name().unwrap_or_default());
    ret.insert("os.kernel".into(), System::kernel_version().unwrap_or_default());
    ret.insert("os.version".into(), System::os_version().unwrap_or_default());
    ret.insert("cpu.count".into(), sys.cpus().len().to_string());
    ret.insert("memory.total_bytes".into(), sys.total_memory().to_string());
    ret.insert("memory.used_bytes".into(), sys.used_memory().to_string());
    ret.insert("service.version".into(), env!("CARGO_PKG_VERSION").to_string());
    Json(ret)
}

fn check_fib_domain(input: i64) -> Result<u32, LoadgenError> {
    if !(0..=100).contains(&input) {
        tracing::warn!(target: "facet", "fib input was bad (0 <= input <= 100): {}", input);
        return Err(LoadgenError::InputOutOfRange(input));
    }
    Ok(input as u32)
}

#[cfg(test)]
mod tests {
    use super::check_fib_domain;

    #[test]
    fn fib_domain_is_zero_to_one_hundred_inclusive() {
        assert!(check_fib_domain(-1).is_err());
        assert!(check_fib_domain(101).is_err());
        assert_eq!(check_fib_domain(0).unwrap(), 0);
        assert_eq!(check_fib_domain(100).unwrap(), 100);
    }
}
