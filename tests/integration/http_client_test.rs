//! HTTP Client Integration Tests
//!
//! Runs the real `AnalysisClient` against a local axum backend that streams
//! NDJSON bodies chunk by chunk.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agentic_studio::{
    AgentRole, AnalysisClient, AnalysisClientConfig, AnalysisInputs, AnalysisMode,
    AnalysisOrchestrator, AppConfig, SessionOutcome, SessionPhase, TransportError,
};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::net::TcpListener;

// ============================================================================
// Mock Backend
// ============================================================================

/// A request the backend received.
#[derive(Debug, Clone)]
struct CapturedRequest {
    content_type: Option<String>,
    body: serde_json::Value,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockState {
    fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

/// Streams `chunks` as separate body frames, pausing `gap` before each one
/// after the first.
fn ndjson_response(chunks: Vec<Vec<u8>>, gap: Duration) -> Response {
    let frames = futures_util::stream::iter(chunks.into_iter().enumerate()).then(
        move |(index, chunk)| async move {
            if index > 0 {
                tokio::time::sleep(gap).await;
            }
            Ok::<_, Infallible>(Bytes::from(chunk))
        },
    );
    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(frames),
    )
        .into_response()
}

/// Backend whose `path` records the request and answers with NDJSON chunks.
fn streaming_backend(path: &str, chunks: Vec<Vec<u8>>, gap: Duration) -> (Router, MockState) {
    let state = MockState::default();
    let handler = move |State(state): State<MockState>,
                        headers: HeaderMap,
                        Json(body): Json<serde_json::Value>| {
        let chunks = chunks.clone();
        async move {
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            state
                .requests
                .lock()
                .expect("requests lock")
                .push(CapturedRequest { content_type, body });
            ndjson_response(chunks, gap)
        }
    };
    let router = Router::new()
        .route(path, post(handler))
        .with_state(state.clone());
    (router, state)
}

/// Backend answering every analysis endpoint with a fixed response.
fn fixed_backend(status: StatusCode, body: &'static str) -> Router {
    let reply = move || async move { (status, body) };
    Router::new()
        .route("/analyze/fix", post(reply))
        .route("/analyze/optimize", post(reply))
        .route("/analyze/security", post(reply))
}

async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend listener");
    let address = listener.local_addr().expect("mock backend local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("run mock backend");
    });
    format!("http://{address}")
}

fn client(base_url: &str) -> AnalysisClient {
    AnalysisClient::with_config(AnalysisClientConfig {
        base_url: base_url.to_string(),
        request_timeout: Some(Duration::from_secs(10)),
        connect_timeout: Duration::from_secs(2),
    })
    .unwrap()
}

fn records(lines: &[&str]) -> Vec<Vec<u8>> {
    lines.iter().map(|l| format!("{l}\n").into_bytes()).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_streamed_fix_run_over_http() {
    let body = concat!(
        r#"{"developer":{"developer_thought":"Patching the sign","current_patch":"def add(a,b): return a+b","iterations":1}}"#,
        "\n",
        r#"{"critic":{"critique_feedback":"Looks correct ✅","status":"approved"}}"#,
        "\n",
        r#"{"tester":{"test_feedback":"2 passed","status":"passed"}}"#,
        "\n",
    )
    .as_bytes();
    // Split mid-record and inside the multi-byte check mark.
    let check = body.windows(3).position(|w| w == "✅".as_bytes()).unwrap();
    let chunks = vec![
        body[..40].to_vec(),
        body[40..check + 1].to_vec(),
        body[check + 1..].to_vec(),
    ];
    let (router, backend) =
        streaming_backend("/analyze/fix", chunks, Duration::from_millis(5));
    let base_url = spawn_backend(router).await;

    let mut orchestrator = AnalysisOrchestrator::new(Arc::new(client(&base_url)));
    let inputs = AnalysisInputs {
        description: "add subtracts".to_string(),
        code: "def add(a,b): return a-b".to_string(),
        ..AnalysisInputs::default()
    };
    let state = orchestrator.run(AnalysisMode::Fix, &inputs).await;

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].content_type.as_deref(),
        Some("application/json")
    );
    assert_eq!(
        requests[0].body,
        serde_json::json!({"description": "add subtracts", "code": "def add(a,b): return a-b"})
    );

    assert_eq!(state.outcome, Some(SessionOutcome::Completed));
    let roles: Vec<AgentRole> = state.events.iter().map(|e| e.role()).collect();
    assert_eq!(
        roles,
        vec![AgentRole::Developer, AgentRole::Critic, AgentRole::Tester]
    );
    assert_eq!(state.events[1].message(), Some("Looks correct ✅"));
    assert_eq!(
        state.latest_code.unwrap().code,
        "def add(a,b): return a+b"
    );
}

#[tokio::test]
async fn test_security_run_counts_vulnerabilities() {
    let body = concat!(
        r#"{"security_engineer":{"security_thought":"Found injection","current_patch":"cursor.execute(q, (uid,))","vulnerabilities":[{"severity":"high","type":"SQL Injection","description":"string formatting in query"}]}}"#,
        "\n",
        r#"{"critic":{"critique_feedback":"Fixed","status":"approved"}}"#,
    );
    let (router, backend) = streaming_backend(
        "/analyze/security",
        vec![body.as_bytes().to_vec()],
        Duration::ZERO,
    );
    let base_url = spawn_backend(router).await;

    let mut orchestrator = AnalysisOrchestrator::new(Arc::new(client(&base_url)));
    let state = orchestrator
        .run(
            AnalysisMode::Security,
            &AnalysisInputs::with_code("cursor.execute(f\"... {uid}\")"),
        )
        .await;

    assert_eq!(backend.requests().len(), 1);
    assert_eq!(state.events.len(), 2);
    assert_eq!(state.vulnerability_count(), 1);
    assert_eq!(state.events[0].vulnerabilities()[0].kind, "SQL Injection");
}

#[tokio::test]
async fn test_slow_stream_completes_with_default_timeouts() {
    let chunks = records(&[
        r#"{"optimizer":{"optimizer_thought":"Profiling","current_optimized_code":"v1"}}"#,
        r#"{"benchmarker":{"benchmark_results":{"original":1.2,"optimized":0.4}}}"#,
        r#"{"optimization_critic":{"critique_feedback":"Good","status":"approved"}}"#,
        r#"{"optimizer":{"optimizer_thought":"Done","current_optimized_code":"v2"}}"#,
    ]);
    let (router, _backend) =
        streaming_backend("/analyze/optimize", chunks, Duration::from_millis(500));
    let base_url = spawn_backend(router).await;

    // The stream outlives the connect timeout, and the defaults set no
    // overall deadline.
    let app_config = AppConfig {
        backend_url: base_url,
        connect_timeout_secs: 1,
        ..AppConfig::default()
    };
    let config = AnalysisClientConfig::from(&app_config);
    assert!(config.request_timeout.is_none());
    let client = AnalysisClient::with_config(config).unwrap();

    let mut orchestrator = AnalysisOrchestrator::new(Arc::new(client));
    let state = orchestrator
        .run(AnalysisMode::Optimize, &AnalysisInputs::with_code("x"))
        .await;

    assert_eq!(state.outcome, Some(SessionOutcome::Completed));
    assert_eq!(state.events.len(), 4);
    assert_eq!(state.latest_code.unwrap().code, "v2");
}

#[tokio::test]
async fn test_explicit_request_timeout_cuts_stream() {
    let chunks = records(&[
        r#"{"developer":{"developer_thought":"Step 1","current_patch":"a"}}"#,
        r#"{"developer":{"developer_thought":"Step 2","current_patch":"b"}}"#,
        r#"{"developer":{"developer_thought":"Step 3","current_patch":"c"}}"#,
    ]);
    let (router, _backend) =
        streaming_backend("/analyze/fix", chunks, Duration::from_millis(800));
    let base_url = spawn_backend(router).await;

    let client = AnalysisClient::with_config(AnalysisClientConfig {
        base_url,
        request_timeout: Some(Duration::from_millis(400)),
        connect_timeout: Duration::from_secs(2),
    })
    .unwrap();

    let mut orchestrator = AnalysisOrchestrator::new(Arc::new(client));
    let state = orchestrator
        .run(AnalysisMode::Fix, &AnalysisInputs::with_code("x"))
        .await;

    assert!(matches!(state.outcome, Some(SessionOutcome::Failed { .. })));
    assert!(state.events.last().unwrap().is_error());
    assert!(state.events.len() < 4);
}

#[tokio::test]
async fn test_server_error_status_fails_session() {
    let base_url = spawn_backend(fixed_backend(StatusCode::INTERNAL_SERVER_ERROR, "boom")).await;

    let mut orchestrator = AnalysisOrchestrator::new(Arc::new(client(&base_url)));
    let state = orchestrator
        .run(AnalysisMode::Security, &AnalysisInputs::with_code("x"))
        .await;

    assert_eq!(state.phase, SessionPhase::Settled);
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.events[0].label(), "System Error");
    assert_eq!(
        state.outcome,
        Some(SessionOutcome::Failed {
            message: "Connection failed: HTTP error 500: boom".to_string()
        })
    );
}

#[tokio::test]
async fn test_no_content_is_missing_body() {
    let base_url = spawn_backend(fixed_backend(StatusCode::NO_CONTENT, "")).await;

    let mut orchestrator = AnalysisOrchestrator::new(Arc::new(client(&base_url)));
    let state = orchestrator
        .run(AnalysisMode::Fix, &AnalysisInputs::with_code("x"))
        .await;

    assert_eq!(state.events.len(), 1);
    assert_eq!(
        state.events[0].message(),
        Some("Connection failed: No response body")
    );
}

#[tokio::test]
async fn test_empty_body_is_missing_body() {
    let base_url = spawn_backend(fixed_backend(StatusCode::OK, "")).await;

    let mut orchestrator = AnalysisOrchestrator::new(Arc::new(client(&base_url)));
    let state = orchestrator
        .run(AnalysisMode::Optimize, &AnalysisInputs::with_code("x"))
        .await;

    assert_eq!(
        state.outcome,
        Some(SessionOutcome::Failed {
            message: "Connection failed: No response body".to_string()
        })
    );
}

#[tokio::test]
async fn test_connection_refused_settles_session() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut orchestrator = AnalysisOrchestrator::new(Arc::new(client(&base_url)));
    let state = orchestrator
        .run(AnalysisMode::Optimize, &AnalysisInputs::with_code("x"))
        .await;

    assert_eq!(state.phase, SessionPhase::Settled);
    assert_eq!(state.events.len(), 1);
    assert!(state.events[0].is_error());
    let message = state.events[0].message().unwrap();
    assert!(message.starts_with("Connection failed: Network error: "));
    assert_eq!(message.matches("Connection failed").count(), 1);
    assert!(matches!(state.outcome, Some(SessionOutcome::Failed { .. })));
}

#[tokio::test]
async fn test_health_check() {
    let router = Router::new().route(
        "/",
        get(|| async {
            Json(serde_json::json!({"message": "Agentic Code Studio API is running"}))
        }),
    );
    let base_url = spawn_backend(router).await;

    let message = client(&base_url).health_check().await.unwrap();
    assert_eq!(message, "Agentic Code Studio API is running");
}

#[tokio::test]
async fn test_health_check_bad_status() {
    let router = Router::new().route(
        "/",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "starting") }),
    );
    let base_url = spawn_backend(router).await;

    let result = client(&base_url).health_check().await;
    assert_eq!(
        result.unwrap_err(),
        TransportError::HttpStatus {
            status: 503,
            body: "starting".to_string()
        }
    );
}
