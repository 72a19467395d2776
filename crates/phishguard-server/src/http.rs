use bytes::{Bytes, BytesMut};
use hyper::body::HttpBody;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use phishguard_analysis::ai::AiProvider;
use phishguard_analysis::analysis::analyze;
use phishguard_analysis::snapshot::PageSnapshot;
use phishguard_analysis::verdict::VerdictEnvelope;
use phishguard_core::{AppError, AppResult};
use phishguard_quantum::random::verified_random_bit;
use phishguard_quantum::simulator::QuantumBackend;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const ANALYZE_PATH: &str = "/analyze";
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 1024 * 1024;

const ALLOW_ORIGIN: &str = "access-control-allow-origin";
const ALLOW_METHODS: &str = "access-control-allow-methods";
const ALLOW_HEADERS: &str = "access-control-allow-headers";

#[derive(Clone)]
pub struct HttpState {
    provider: Arc<dyn AiProvider + Send + Sync>,
    backend: Arc<dyn QuantumBackend + Send + Sync>,
    max_request_bytes: usize,
}

impl HttpState {
    pub fn new(
        provider: Arc<dyn AiProvider + Send + Sync>,
        backend: Arc<dyn QuantumBackend + Send + Sync>,
        max_request_bytes: usize,
    ) -> Self {
        Self {
            provider,
            backend,
            max_request_bytes,
        }
    }
}

pub async fn handle_request(state: HttpState, req: Request<Body>) -> Response<Body> {
    if req.method() == Method::OPTIONS {
        return preflight_response();
    }
    if req.uri().path() != ANALYZE_PATH {
        return empty_response(StatusCode::NOT_FOUND);
    }
    if req.method() != Method::POST {
        return empty_response(StatusCode::METHOD_NOT_ALLOWED);
    }

    let body = match read_body_limited(req.into_body(), state.max_request_bytes).await {
        Ok(body) => body,
        Err(status) => return empty_response(status),
    };

    let snapshot = match parse_snapshot(&body) {
        Some(snapshot) => snapshot,
        None => return error_response(StatusCode::BAD_REQUEST, "No data provided"),
    };

    match run_verdict(&state, snapshot).await {
        Ok(envelope) => json_response(StatusCode::OK, &envelope),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.message()),
    }
}

fn parse_snapshot(body: &[u8]) -> Option<PageSnapshot> {
    let value: Value = serde_json::from_slice(body).ok()?;
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Both external steps are blocking (network I/O and CPU-bound simulation),
/// so they run on the blocking pool. Neither depends on the other's result;
/// the response waits for both.
async fn run_verdict(state: &HttpState, snapshot: PageSnapshot) -> AppResult<VerdictEnvelope> {
    let provider = state.provider.clone();
    let analysis_task =
        tokio::task::spawn_blocking(move || analyze(provider.as_ref(), &snapshot));
    let backend = state.backend.clone();
    let quantum_task = tokio::task::spawn_blocking(move || verified_random_bit(backend.as_ref()));

    let (analysis, quantum) = tokio::join!(analysis_task, quantum_task);
    let analysis =
        analysis.map_err(|e| AppError::internal(format!("analysis task join error: {e}")))?;
    let quantum_verified =
        quantum.map_err(|e| AppError::internal(format!("quantum task join error: {e}")))??;

    Ok(VerdictEnvelope::new(analysis, quantum_verified))
}

async fn read_body_limited(body: Body, max: usize) -> Result<Bytes, StatusCode> {
    let mut body = body;
    let mut buf = BytesMut::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk.map_err(|_| StatusCode::BAD_REQUEST)?;
        if buf.len() + chunk.len() > max {
            return Err(StatusCode::PAYLOAD_TOO_LARGE);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

fn preflight_response() -> Response<Body> {
    let builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW_ORIGIN, "*")
        .header(ALLOW_METHODS, "POST, OPTIONS")
        .header(ALLOW_HEADERS, "content-type");
    builder
        .body(Body::empty())
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

fn empty_response(status: StatusCode) -> Response<Body> {
    with_cors(
        Response::builder()
            .status(status)
            .body(Body::empty())
            .unwrap_or_else(|_| Response::new(Body::empty())),
    )
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    let body = serde_json::to_vec(value).unwrap_or_default();
    with_cors(
        Response::builder()
            .status(status)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap_or_else(|_| Response::new(Body::empty())),
    )
}

fn error_response(status: StatusCode, message: &str) -> Response<Body> {
    json_response(status, &json!({ "error": message }))
}

/// Cross-origin requests are permitted from any origin.
fn with_cors(mut response: Response<Body>) -> Response<Body> {
    response
        .headers_mut()
        .insert(ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}
