use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Response,
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::devices::bulk::{fetch_csv, import_bytes, ImportReport};
use crate::errors::RegistryResult;
use crate::logger::{self, LogTag};
use crate::webserver::state::AppState;
use crate::webserver::utils::{error_response, registry_error_response, success_response};

// =============================================================================
// REQUEST TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct UrlImportRequest {
    pub url: String,
}

/// Fields read from an upload form
#[derive(Debug, Default)]
pub(super) struct UploadForm {
    pub file_name: Option<String>,
    pub file: Option<Vec<u8>>,
    pub q: String,
    pub all: String,
}

// =============================================================================
// ROUTES
// =============================================================================

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(import_upload))
        .route("/url", post(import_url))
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Collect the `file` field plus page context fields from a multipart body
pub(super) async fn read_upload(multipart: &mut Multipart) -> Result<UploadForm, String> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(format!("Failed to read upload: {}", e)),
        };

        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read uploaded file: {}", e))?;
                form.file = Some(bytes.to_vec());
            }
            "q" => form.q = field.text().await.unwrap_or_default(),
            "all" => form.all = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }

    Ok(form)
}

/// Import bytes with the configured MAC policy and delimiter fallback
pub(super) fn run_import(state: &AppState, bytes: &[u8]) -> RegistryResult<ImportReport> {
    import_bytes(
        state.store.as_ref(),
        bytes,
        state.mac_policy(),
        state.fallback_delimiter(),
    )
}

/// Fetch a CSV and import it
pub(super) async fn run_url_import(state: &AppState, url: &str) -> RegistryResult<ImportReport> {
    let bytes = fetch_csv(url, &state.config.import).await?;
    run_import(state, &bytes)
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /api/import (multipart, field `file`)
async fn import_upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let form = match read_upload(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, "READ_ERROR", &e, None);
        }
    };

    let bytes = match form.file {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "NO_FILE",
                "No file provided in upload",
                None,
            );
        }
    };

    logger::info(
        LogTag::Import,
        &format!(
            "Importing upload {} ({} bytes)",
            form.file_name.as_deref().unwrap_or("unnamed"),
            bytes.len()
        ),
    );

    match run_import(&state, &bytes) {
        Ok(report) => success_response(report),
        Err(e) => registry_error_response(&e),
    }
}

/// POST /api/import/url
async fn import_url(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UrlImportRequest>,
) -> Response {
    match run_url_import(&state, &request.url).await {
        Ok(report) => success_response(report),
        Err(e) => {
            logger::warning(LogTag::Import, &format!("URL import failed: {}", e));
            registry_error_response(&e)
        }
    }
}
