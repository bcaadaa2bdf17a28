//! HTTP surface: routing, the upload handler, and response marshaling.
//!
//! ## Request lifecycle
//!
//! `POST /convert` walks a fixed sequence — parse multipart, validate,
//! stage, convert, respond — and every early exit funnels through
//! [`ApiError`], which owns the single mapping from failure kind to status
//! code. The scratch directory is bound to the handler's stack frame, so
//! cleanup happens on every path, error or not, without explicit bookkeeping.
//!
//! Requests are independent: the only shared state is the stateless
//! [`MarkdownEngine`] handle, and each request stages into its own uniquely
//! named directory, so concurrent uploads never contend.

use crate::allowlist;
use crate::config::ServerConfig;
use crate::convert::MarkdownEngine;
use crate::error::ApiError;
use crate::staging::{sanitize_filename, ScratchDir};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Upload page served at `/`, embedded at compile time.
const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Name of the converted-output artifact written into the scratch
/// directory. Retained only for the directory's lifetime; never served.
const CONVERTED_ARTIFACT: &str = "converted.md";

/// Shared application state. Cloned per request by axum; cheap because the
/// engine handle is configuration-only.
#[derive(Clone)]
pub struct AppState {
    engine: MarkdownEngine,
}

/// Successful conversion payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub success: bool,
    pub markdown: String,
}

/// Error payload, shared by all failure responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        if status.is_server_error() {
            error!("Conversion request failed: {self}");
        } else {
            debug!("Rejected request: {self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Build the application router.
///
/// Exposed so tests can drive the service in-process via
/// `tower::ServiceExt::oneshot` without binding a socket.
pub fn router(config: &ServerConfig) -> Router {
    let state = AppState {
        engine: MarkdownEngine::new(config.extract_max_chars),
    };
    Router::new()
        .route("/", get(index))
        .route("/convert", post(convert))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /` — the static upload page.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `POST /convert` — accept one multipart upload, return its Markdown.
async fn convert(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ConvertResponse>, ApiError> {
    // ── Receive ──────────────────────────────────────────────────────────
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Multipart {
            message: e.to_string(),
        })?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|e| ApiError::Multipart {
                message: e.to_string(),
            })?;
            upload = Some((filename, bytes));
            break;
        }
    }
    let (filename, bytes) = upload.ok_or(ApiError::NoFilePart)?;

    // ── Validate ─────────────────────────────────────────────────────────
    if filename.is_empty() {
        return Err(ApiError::NoFileName);
    }
    if !allowlist::is_allowed(&filename) {
        info!("Rejected upload with unsupported type: {filename:?}");
        return Err(ApiError::UnsupportedType);
    }

    // ── Stage ────────────────────────────────────────────────────────────
    let scratch = ScratchDir::create()?;
    let staged_name = staged_name_for(&filename);
    let staged_path = scratch.write(&staged_name, &bytes)?;
    info!(
        "Staged upload {:?} ({} bytes) as {}",
        filename,
        bytes.len(),
        staged_path.display()
    );

    // ── Convert ──────────────────────────────────────────────────────────
    // The engine is synchronous and may block for seconds (OCR,
    // transcription), so it runs on the blocking pool.
    let engine = state.engine.clone();
    let markdown = tokio::task::spawn_blocking(move || engine.convert(&staged_path))
        .await
        .map_err(|e| ApiError::Internal(format!("conversion task failed: {e}")))??;

    scratch.write(CONVERTED_ARTIFACT, markdown.as_bytes())?;

    // ── Respond ──────────────────────────────────────────────────────────
    Ok(Json(ConvertResponse {
        success: true,
        markdown,
    }))
    // `scratch` drops here: the upload, any transcoded copy, and the
    // converted.md artifact are all deleted.
}

/// The name the upload is staged under.
///
/// Normally the sanitised client filename. Sanitisation can destroy the
/// name entirely (or strip its suffix), and the adapter dispatches on the
/// staged file's extension, so when the sanitised name no longer ends with
/// the validated extension we fall back to `upload.<ext>`.
fn staged_name_for(filename: &str) -> String {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let suffix = format!(".{extension}");

    let sanitized = sanitize_filename(filename);
    if sanitized.len() > suffix.len() && sanitized.to_ascii_lowercase().ends_with(&suffix) {
        sanitized
    } else {
        format!("upload{suffix}")
    }
}
