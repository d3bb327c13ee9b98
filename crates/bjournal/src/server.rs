//! Read-only status endpoint exposing today's entries as JSON

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{Router, extract::State, response::Json, routing::get};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::signal;

use bjournal_core::config::Config;
use bjournal_core::date::{self, day_key};
use bjournal_core::fs::RealFileSystem;
use bjournal_core::{Category, DailyLog, Log, LogStore};

/// Shared state for the status handlers
#[derive(Clone)]
pub struct StatusState {
    pub journal_dir: Arc<PathBuf>,
}

/// Response of `GET /api/log/today`
#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub date: String,
    pub logs: Vec<LogView>,
}

/// One entry of a day as served over HTTP
#[derive(Debug, Serialize)]
pub struct LogView {
    pub name: String,
    pub mark: Category,
    pub important: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_logs: Vec<LogView>,
}

impl From<&Log> for LogView {
    fn from(log: &Log) -> Self {
        Self {
            name: log.name.clone(),
            mark: log.mark,
            important: log.important,
            url: log.url.clone(),
            sub_logs: log.sub_logs().iter().map(LogView::from).collect(),
        }
    }
}

impl From<&DailyLog> for TodayResponse {
    fn from(day: &DailyLog) -> Self {
        Self {
            date: day.key().to_string(),
            logs: day.logs().iter().map(LogView::from).collect(),
        }
    }
}

/// Build the response for `today` through a fresh store, so the endpoint
/// never shares the TUI's cache. Read errors are logged and answered with
/// an empty day.
pub fn today_response(journal_dir: &Path, today: NaiveDate) -> TodayResponse {
    let mut store = LogStore::new(RealFileSystem, journal_dir);
    match store.read_day(today) {
        Ok(day) => TodayResponse::from(day),
        Err(e) => {
            log::error!("Error reading {} for the status endpoint: {}", day_key(&today), e);
            TodayResponse {
                date: day_key(&today),
                logs: Vec::new(),
            }
        }
    }
}

/// Create the status routes
pub fn routes(journal_dir: PathBuf) -> Router {
    let state = StatusState {
        journal_dir: Arc::new(journal_dir),
    };
    Router::new()
        .route("/api/log/today", get(get_today))
        .route("/api/health", get(health))
        .with_state(state)
}

/// GET /api/log/today - Entries of the current day
async fn get_today(State(state): State<StatusState>) -> Json<TodayResponse> {
    let journal_dir = state.journal_dir.clone();
    let today = date::today();
    let response = tokio::task::spawn_blocking(move || today_response(&journal_dir, today)).await;
    match response {
        Ok(response) => Json(response),
        Err(e) => {
            log::error!("Status request failed: {}", e);
            Json(TodayResponse {
                date: day_key(&today),
                logs: Vec::new(),
            })
        }
    }
}

/// GET /api/health - Liveness check
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// Serve the status routes on `127.0.0.1:<port>` until `shutdown` resolves.
pub async fn serve(
    journal_dir: PathBuf,
    port: u16,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Status endpoint listening on http://{}", addr);

    axum::serve(listener, routes(journal_dir))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Run the status endpoint on a background thread with its own runtime.
/// Failures are logged; the caller keeps running without the endpoint.
pub fn spawn(journal_dir: PathBuf, port: u16) {
    let spawned = std::thread::Builder::new()
        .name("status-endpoint".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to start the status endpoint runtime: {}", e);
                    return;
                }
            };
            let result = runtime.block_on(serve(journal_dir, port, std::future::pending()));
            if let Err(e) = result {
                log::error!("Status endpoint stopped: {}", e);
            }
        });

    if let Err(e) = spawned {
        log::error!("Failed to spawn the status endpoint thread: {}", e);
    }
}

/// Handle the serve command: run the endpoint in the foreground until Ctrl-C
pub fn handle_serve(config: &Config, port: Option<u16>) -> bool {
    let port = port.unwrap_or(config.status_port);
    if port == 0 {
        eprintln!("✗ No status port configured");
        return false;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Error starting runtime: {}", e);
            return false;
        }
    };

    println!("✓ Serving {} on http://127.0.0.1:{}", config.journal_dir.display(), port);
    let result = runtime.block_on(serve(config.journal_dir.clone(), port, shutdown_signal()));

    match result {
        Ok(()) => true,
        Err(e) => {
            eprintln!("✗ Status endpoint error: {}", e);
            false
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down status endpoint");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_today_response_shape() {
        let dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2022, 2, 19).unwrap();
        {
            let mut store = LogStore::new(RealFileSystem, dir.path());
            store.add_new_log(date, "pay rent", Category::Task).unwrap();
            store
                .append_new_log(0, date, "transfer", Category::Complete)
                .unwrap();
            store.add_new_log(date, "sunny", Category::Note).unwrap();
        }

        let response = today_response(dir.path(), date);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["date"], "19.02.2022");
        assert_eq!(json["logs"][0]["name"], "pay rent");
        assert_eq!(json["logs"][0]["mark"], "task");
        assert_eq!(json["logs"][0]["sub_logs"][0]["mark"], "complete");
        assert!(json["logs"][1].get("sub_logs").is_none());
        assert!(json["logs"][1].get("url").is_none());
    }

    #[test]
    fn test_today_response_on_malformed_record() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("19.02.2022.yaml"), "items: {oops").unwrap();

        let date = NaiveDate::from_ymd_opt(2022, 2, 19).unwrap();
        let response = today_response(dir.path(), date);
        assert_eq!(response.date, "19.02.2022");
        assert!(response.logs.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_get_today_with_empty_journal() {
        let dir = TempDir::new().unwrap();
        let state = StatusState {
            journal_dir: Arc::new(dir.path().to_path_buf()),
        };

        let Json(response) = get_today(State(state)).await;
        assert_eq!(response.date, day_key(&date::today()));
        assert!(response.logs.is_empty());
    }
}
