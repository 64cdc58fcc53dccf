use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use futures_util::{stream, FutureExt, StreamExt};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Notify;
use tower::ServiceExt;

use backend_application::AppState;
use backend_domain::{
    DirectoryStats, DiskSpace, HealthCheckService, LaunchError, ProcessExit, ProcessHandle,
    RuntimeConfig, StorageInspector, SyncTool,
};
use backend_interfaces_http::build_router;

const GIB: u64 = 1024 * 1024 * 1024;

struct GatedTool {
    available: AtomicBool,
    gate: Arc<Notify>,
}

#[async_trait]
impl SyncTool for GatedTool {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn launch(
        &self,
        _source: &Path,
        _destination: &Path,
    ) -> Result<ProcessHandle, LaunchError> {
        let lines = ["docs/a.txt", "Number of regular files transferred: 1"];
        let stdout = stream::iter(lines.into_iter().map(|line| Ok(line.to_string()))).boxed();
        let gate = self.gate.clone();
        let exit = async move {
            gate.notified().await;
            Ok(ProcessExit {
                code: 0,
                stderr: String::new(),
            })
        }
        .boxed();
        Ok(ProcessHandle::new(stdout, exit))
    }
}

struct StaticStorage {
    source_exists: bool,
}

#[async_trait]
impl StorageInspector for StaticStorage {
    async fn exists(&self, _path: &Path) -> bool {
        self.source_exists
    }

    async fn count_files(&self, _path: &Path) -> u64 {
        1
    }

    async fn is_empty_dir(&self, _path: &Path) -> io::Result<bool> {
        Ok(false)
    }

    async fn ensure_dir(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    async fn probe_write(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    async fn disk_space(&self, _path: &Path) -> DiskSpace {
        DiskSpace::new(100 * GIB, 40 * GIB)
    }

    async fn directory_stats(&self, path: &Path) -> DirectoryStats {
        if path.ends_with("source") && !self.source_exists {
            return DirectoryStats::missing();
        }
        DirectoryStats::new(3, 1, 2048)
    }
}

struct StaticHealth {
    tool: bool,
    source: bool,
}

#[async_trait]
impl HealthCheckService for StaticHealth {
    fn check_tool(&self) -> bool {
        self.tool
    }

    async fn check_source(&self) -> bool {
        self.source
    }

    async fn check_destination(&self) -> bool {
        true
    }

    async fn disk_space(&self) -> DiskSpace {
        DiskSpace::new(100 * GIB, 40 * GIB)
    }
}

struct Harness {
    router: Router,
    state: AppState,
    gate: Arc<Notify>,
}

fn harness(token: Option<&str>, tool: bool, source: bool) -> Harness {
    let config = RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: token.map(str::to_string),
        source_dir: PathBuf::from("/data/source"),
        destination_dir: PathBuf::from("/data/destination"),
        rsync_binary: "rsync".to_string(),
        min_free_gb: 0.5,
        max_body_bytes: 1024,
        request_timeout_seconds: 30,
    };
    let gate = Arc::new(Notify::new());
    let state = AppState::new(
        config,
        Arc::new(GatedTool {
            available: AtomicBool::new(tool),
            gate: gate.clone(),
        }),
        Arc::new(StaticStorage {
            source_exists: source,
        }),
        Arc::new(StaticHealth { tool, source }),
    );
    Harness {
        router: build_router(state.clone()),
        state,
        gate,
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = builder.body(Body::empty()).expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec();
    (status, bytes)
}

async fn send_json(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(router, method, uri, token).await;
    let body = serde_json::from_slice(&bytes).expect("json body");
    (status, body)
}

async fn wait_until_idle(state: &AppState) {
    for _ in 0..200 {
        if !state.job_state.is_running().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job did not finish");
}

#[tokio::test]
async fn root_lists_endpoints() {
    let h = harness(None, true, true);
    let (status, body) = send_json(&h.router, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Delta Migration API");
    assert!(body["endpoints"]["/sync"].is_string());
}

#[tokio::test]
async fn start_then_conflict_then_finish() {
    let h = harness(None, true, true);

    let (status, body) = send_json(&h.router, Method::POST, "/sync", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "started");
    assert_eq!(body["message"], "Sync started in background");
    assert_eq!(body["source_path"], "/data/source");
    assert!(body["job_id"].is_string());

    let (status, body) = send_json(&h.router, Method::POST, "/sync", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Sync already in progress");

    let (status, body) = send_json(&h.router, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sync"]["is_running"], true);

    h.gate.notify_one();
    wait_until_idle(&h.state).await;

    let (_, body) = send_json(&h.router, Method::GET, "/status", None).await;
    assert_eq!(body["sync"]["is_running"], false);
    assert!(body["sync"]["progress"].is_null());
    assert_eq!(body["sync"]["last_sync"]["status"], "success");
    assert_eq!(body["sync"]["last_sync"]["files_transferred"], 1);
}

#[tokio::test]
async fn missing_tool_is_service_unavailable() {
    let h = harness(None, false, true);
    let (status, body) = send_json(&h.router, Method::POST, "/sync", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "rsync not installed");
}

#[tokio::test]
async fn missing_source_is_not_found() {
    let h = harness(None, true, false);
    let (status, body) = send_json(&h.router, Method::POST, "/sync", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Source not found: /data/source");
}

#[tokio::test]
async fn token_guards_start_but_not_reads() {
    let h = harness(Some("secret"), true, true);

    let (status, body) = send_json(&h.router, Method::POST, "/sync", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert!(!h.state.job_state.is_running().await);

    let (status, _) = send_json(&h.router, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&h.router, Method::POST, "/sync", Some("secret")).await;
    assert_eq!(status, StatusCode::OK);
    h.gate.notify_one();
    wait_until_idle(&h.state).await;
}

#[tokio::test]
async fn status_reports_locations_and_disk() {
    let h = harness(None, true, false);
    let (status, body) = send_json(&h.router, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"]["path"], "/data/source");
    assert_eq!(body["source"]["exists"], false);
    assert_eq!(body["destination"]["exists"], true);
    assert_eq!(body["destination"]["files"], 3);
    assert_eq!(body["disk_space"]["free_gb"], 40.0);
    assert_eq!(body["rsync_available"], true);
    assert!(body["sync"]["last_sync"].is_null());
}

#[tokio::test]
async fn health_is_always_ok_with_verdict_in_body() {
    let h = harness(None, false, true);
    let (status, body) = send_json(&h.router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["error"], "rsync not installed");

    let h = harness(None, true, false);
    let (status, body) = send_json(&h.router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["warning"], "source directory not found");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn liveness_and_metrics() {
    let h = harness(None, true, false);
    let (status, body) = send(&h.router, Method::GET, "/health/live", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    send(&h.router, Method::POST, "/sync", None).await;
    let (status, body) = send(&h.router, Method::GET, "/metrics/prometheus", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).expect("utf8");
    assert!(text.contains("delta_sync_rejected_total 1"));
    assert!(text.contains("delta_sync_started_total 0"));
}
