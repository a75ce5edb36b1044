//! `chub serve`: the analysis pipeline behind a small HTTP endpoint.
//!
//! # Routes
//!
//! | Method | Path               | Purpose                                   |
//! |--------|--------------------|-------------------------------------------|
//! | GET    | `/`                | HTML upload form                          |
//! | GET    | `/health`          | Liveness                                  |
//! | POST   | `/api/upload`      | Multipart `file` (+ `center_author`) → JSON result |
//! | GET    | `/data/{filename}` | Download a stored upload                  |
//!
//! Each analysis runs on a blocking worker (`spawn_blocking`): the pipeline
//! itself is synchronous and sleeps between fetches.
//!
//! Errors are JSON `{"error": {"code", "message", "hint"}}` with 400 for
//! caller mistakes, 404 for unknown uploads, and 500 otherwise.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Args;
use collabhub_core::ErrorCode;
use collabhub_core::config::{AnalysisConfig, CollabConfig, FetchConfig, RunMode};
use collabhub_core::fetch::OpenAlexClient;
use collabhub_core::input::read_work_ids;
use serde_json::json;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::load_settings;
use crate::output::OutputMode;
use crate::pipeline::{AnalysisResult, run_pipeline};

/// Request body cap for uploads.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Collaboration hubs</title></head>
<body>
<h1>Collaboration hubs</h1>
<form action="/api/upload" method="post" enctype="multipart/form-data">
  <p><label>Work id table (.csv or .txt) <input type="file" name="file" required></label></p>
  <p><label>Center author <input type="text" name="center_author" placeholder="Sizun Jiang"></label></p>
  <p><button type="submit">Analyze</button></p>
</form>
</body>
</html>
"#;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on (overrides `server.bind`).
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory for stored uploads (overrides `server.upload_dir`).
    #[arg(long, value_name = "DIR")]
    pub upload_dir: Option<PathBuf>,
}

#[derive(Clone)]
struct AppState {
    config: Arc<CollabConfig>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A request failure carrying its stable code.
#[derive(Debug)]
struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalUnexpected, message)
    }

    const fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::UploadNotFound => StatusCode::NOT_FOUND,
            code if code.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = %self.code, message = %self.message, "request failed");
        } else {
            debug!(code = %self.code, message = %self.message, "request rejected");
        }

        let body = Json(json!({
            "error": {
                "code": self.code.code(),
                "message": self.message,
                "hint": self.code.hint(),
            }
        }));
        (status, body).into_response()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Execute `chub serve`.
///
/// # Errors
///
/// Returns an error if the config is unusable, the upload directory cannot
/// be created, or the address cannot be bound.
pub fn run_serve(
    args: &ServeArgs,
    config_path: Option<&FsPath>,
    output: OutputMode,
    cwd: &FsPath,
) -> anyhow::Result<()> {
    let mut config = load_settings(config_path, cwd, output)?;
    if let Some(bind) = &args.bind {
        config.server.bind.clone_from(bind);
    }
    if let Some(dir) = &args.upload_dir {
        config.server.upload_dir.clone_from(dir);
    }
    config.analysis(RunMode::Service).validate()?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(serve(config))
}

async fn serve(config: CollabConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.server.upload_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.server.upload_dir.display()
            )
        })?;

    let bind = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {bind}"))?;
    info!(addr = %bind, "listening");
    info!("  POST http://{bind}/api/upload - analyze an uploaded id table");
    info!("  GET  http://{bind}/health - health check");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server shutdown complete");
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/data/{filename}", get(download))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C"),
        () = terminate => info!("received terminate signal"),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Parsed multipart form.
#[derive(Debug, Default)]
struct UploadForm {
    filename: Option<String>,
    data: Vec<u8>,
    center_author: Option<String>,
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(ErrorCode::MissingUpload, e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.filename = Some(field.file_name().unwrap_or_default().to_string());
                form.data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::new(ErrorCode::MissingUpload, e.to_string()))?
                    .to_vec();
            }
            "center_author" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::new(ErrorCode::MissingUpload, e.to_string()))?;
                let text = text.trim();
                if !text.is_empty() {
                    form.center_author = Some(text.to_string());
                }
            }
            other => debug!(field = other, "ignoring form field"),
        }
    }

    accept_upload(&state, form).await.map(Json)
}

/// Validate, store, and analyze one upload.
async fn accept_upload(state: &AppState, form: UploadForm) -> Result<AnalysisResult, ApiError> {
    let Some(filename) = form.filename else {
        return Err(ApiError::new(ErrorCode::MissingUpload, "no file part"));
    };
    if filename.is_empty() {
        return Err(ApiError::new(ErrorCode::MissingUpload, "no selected file"));
    }
    let server = &state.config.server;
    let Some(ext) = server.accepted_extension(&filename) else {
        return Err(ApiError::new(
            ErrorCode::UnsupportedFileType,
            format!("{filename} is not an accepted file type"),
        ));
    };

    let stored = format!("{}.{ext}", Uuid::new_v4());
    let path = server.upload_dir.join(&stored);
    tokio::fs::write(&path, &form.data)
        .await
        .map_err(|e| ApiError::internal(format!("failed to store upload: {e}")))?;
    info!(%filename, %stored, bytes = form.data.len(), "stored upload");

    let mut analysis = state.config.analysis(RunMode::Service);
    if let Some(center) = form.center_author {
        analysis.center_author = center;
    }
    let fetch = state.config.fetch.clone();

    tokio::task::spawn_blocking(move || analyze_stored(&path, &fetch, &analysis))
        .await
        .map_err(|e| ApiError::internal(format!("analysis task failed: {e}")))?
}

fn analyze_stored(
    path: &FsPath,
    fetch: &FetchConfig,
    analysis: &AnalysisConfig,
) -> Result<AnalysisResult, ApiError> {
    let ids = read_work_ids(path).map_err(|e| ApiError::new(e.code(), e.to_string()))?;
    let client = OpenAlexClient::new(fetch);
    run_pipeline(&ids, &client, analysis)
        .map(|run| run.result)
        .map_err(|e| ApiError::new(e.code(), e.to_string()))
}

async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let not_found = || ApiError::new(ErrorCode::UploadNotFound, format!("no upload named {filename}"));

    if !is_plain_file_name(&filename) {
        return Err(not_found());
    }
    let path = state.config.server.upload_dir.join(&filename);
    let bytes = tokio::fs::read(&path).await.map_err(|_| not_found())?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], bytes).into_response())
}

/// A single path component with no traversal.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "csv" => "text/csv; charset=utf-8",
        Some(ext) if ext == "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
