//! Server-rendered registry page
//!
//! Every action re-renders the full page. The response status reflects the
//! outcome so failed submissions are distinguishable without parsing HTML.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::import::{read_upload, run_import, run_url_import};
use crate::devices::{self, DeviceInput, DeviceQuery};
use crate::errors::{RegistryError, RegistryResult, ValidationError};
use crate::logger::{self, LogTag};
use crate::webserver::state::AppState;
use crate::webserver::templates::{self, Flash, IndexView};
use crate::webserver::utils::status_for;

// =============================================================================
// FORMS
// =============================================================================

/// Search and listing state carried between requests
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PageContext {
    pub q: String,
    pub all: String,
}

impl PageContext {
    fn show_all(&self) -> bool {
        matches!(self.all.as_str(), "1" | "true" | "on")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeviceForm {
    pub ip_address: String,
    pub mac_address: String,
    pub name: String,
    pub q: String,
    pub all: String,
}

impl DeviceForm {
    fn input(&self) -> DeviceInput {
        DeviceInput::new(&self.ip_address, &self.mac_address, &self.name)
    }

    fn context(&self) -> PageContext {
        PageContext {
            q: self.q.clone(),
            all: self.all.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteByIpForm {
    pub ip_address: String,
    pub q: String,
    pub all: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UrlImportForm {
    pub url: String,
    pub q: String,
    pub all: String,
}

// =============================================================================
// ROUTES
// =============================================================================

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/devices", post(register))
        .route("/devices/delete-by-ip", post(delete_by_ip))
        .route("/devices/:id/update", post(update))
        .route("/devices/:id/delete", post(delete))
        .route("/import/upload", post(import_upload))
        .route("/import/url", post(import_url))
}

// =============================================================================
// RENDERING
// =============================================================================

fn load_listings(state: &AppState, view: &mut IndexView) -> RegistryResult<()> {
    view.total = state.store.count()?;

    if !view.filter.trim().is_empty() {
        view.results = Some(devices::search_devices(
            state.store.as_ref(),
            &DeviceQuery::matching(&view.filter),
        )?);
    }

    if view.show_all {
        view.all_devices = Some(devices::search_devices(
            state.store.as_ref(),
            &DeviceQuery::newest_first(),
        )?);
    }

    Ok(())
}

/// Render the page with fresh listings
fn render_page(
    state: &AppState,
    context: &PageContext,
    mut view: IndexView,
    status: StatusCode,
) -> Response {
    view.filter = context.q.clone();
    view.show_all = context.show_all();

    if let Err(e) = load_listings(state, &mut view) {
        logger::error(LogTag::Webserver, &format!("Failed to load devices: {}", e));
        view.flashes
            .push(Flash::error(format!("Failed to load devices: {}", e)));
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(templates::index_page(&view)),
        )
            .into_response();
    }

    (status, Html(templates::index_page(&view))).into_response()
}

/// Render after a failed action
fn render_error(
    state: &AppState,
    context: &PageContext,
    mut view: IndexView,
    err: &RegistryError,
) -> Response {
    view.flashes.push(Flash::error(err.to_string()));
    render_page(state, context, view, status_for(err))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// GET /
async fn index(State(state): State<Arc<AppState>>, Query(context): Query<PageContext>) -> Response {
    render_page(&state, &context, IndexView::default(), StatusCode::OK)
}

/// POST /devices
async fn register(State(state): State<Arc<AppState>>, Form(form): Form<DeviceForm>) -> Response {
    let context = form.context();
    let input = form.input();

    match devices::register_device(state.store.as_ref(), &input, state.mac_policy()) {
        Ok(device) => {
            let view = IndexView {
                flashes: vec![Flash::success(format!(
                    "{} registered successfully",
                    device.name
                ))],
                ..IndexView::default()
            };
            render_page(&state, &context, view, StatusCode::OK)
        }
        Err(e) => {
            let view = IndexView {
                form: input,
                ..IndexView::default()
            };
            render_error(&state, &context, view, &e)
        }
    }
}

/// POST /devices/:id/update
async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<DeviceForm>,
) -> Response {
    let context = form.context();
    let input = form.input();

    match devices::edit_device(state.store.as_ref(), id, &input, state.mac_policy()) {
        Ok(device) => {
            let view = IndexView {
                flashes: vec![Flash::success(format!("{} updated", device.name))],
                ..IndexView::default()
            };
            render_page(&state, &context, view, StatusCode::OK)
        }
        Err(e) => {
            let view = IndexView {
                edit: Some((id, input)),
                ..IndexView::default()
            };
            render_error(&state, &context, view, &e)
        }
    }
}

/// POST /devices/:id/delete
async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(context): Form<PageContext>,
) -> Response {
    let flash = match devices::remove_device(state.store.as_ref(), id) {
        Ok(true) => Flash::success("Device removed"),
        Ok(false) => Flash::info("Device was already removed"),
        Err(e) => return render_error(&state, &context, IndexView::default(), &e),
    };

    let view = IndexView {
        flashes: vec![flash],
        ..IndexView::default()
    };
    render_page(&state, &context, view, StatusCode::OK)
}

/// POST /devices/delete-by-ip
async fn delete_by_ip(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DeleteByIpForm>,
) -> Response {
    let context = PageContext {
        q: form.q,
        all: form.all,
    };

    let ip = form.ip_address.trim();
    if ip.is_empty() {
        let err = RegistryError::from(ValidationError::MissingField("IP address"));
        return render_error(&state, &context, IndexView::default(), &err);
    }

    let flash = match devices::remove_device_by_ip(state.store.as_ref(), ip) {
        Ok(true) => Flash::success(format!("Device with IP {} removed", ip)),
        Ok(false) => Flash::info(format!("No device registered with IP {}", ip)),
        Err(e) => return render_error(&state, &context, IndexView::default(), &e),
    };

    let view = IndexView {
        flashes: vec![flash],
        ..IndexView::default()
    };
    render_page(&state, &context, view, StatusCode::OK)
}

/// POST /import/upload (multipart, field `file`)
async fn import_upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let form = match read_upload(&mut multipart).await {
        Ok(form) => form,
        Err(e) => {
            let view = IndexView {
                flashes: vec![Flash::error(e)],
                ..IndexView::default()
            };
            return render_page(&state, &PageContext::default(), view, StatusCode::BAD_REQUEST);
        }
    };
    let context = PageContext {
        q: form.q.clone(),
        all: form.all.clone(),
    };

    let bytes = match form.file {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            let view = IndexView {
                flashes: vec![Flash::error("Choose a CSV file to upload")],
                ..IndexView::default()
            };
            return render_page(&state, &context, view, StatusCode::BAD_REQUEST);
        }
    };

    match run_import(&state, &bytes) {
        Ok(report) => {
            let view = IndexView {
                flashes: vec![Flash::success(report.summary())],
                report: Some(report),
                ..IndexView::default()
            };
            render_page(&state, &context, view, StatusCode::OK)
        }
        Err(e) => render_error(&state, &context, IndexView::default(), &e),
    }
}

/// POST /import/url
async fn import_url(State(state): State<Arc<AppState>>, Form(form): Form<UrlImportForm>) -> Response {
    let context = PageContext {
        q: form.q,
        all: form.all,
    };

    match run_url_import(&state, &form.url).await {
        Ok(report) => {
            let view = IndexView {
                flashes: vec![Flash::success(report.summary())],
                report: Some(report),
                ..IndexView::default()
            };
            render_page(&state, &context, view, StatusCode::OK)
        }
        Err(e) => {
            logger::warning(LogTag::Import, &format!("URL import failed: {}", e));
            let view = IndexView {
                import_url: form.url,
                ..IndexView::default()
            };
            render_error(&state, &context, view, &e)
        }
    }
}
