use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::devices::bulk::export_csv;
use crate::devices::{self, Device, DeviceInput, DeviceQuery, ListOrder};
use crate::logger::{self, LogTag};
use crate::webserver::state::AppState;
use crate::webserver::utils::{registry_error_response, success_response};

// =============================================================================
// REQUEST / RESPONSE TYPES
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListDevicesQuery {
    /// Substring matched against ip, mac and name
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub order: ListOrder,
}

#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    pub devices: Vec<Device>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub removed: bool,
}

// =============================================================================
// ROUTES
// =============================================================================

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_devices).post(create_device))
        .route("/export", get(export_devices))
        .route("/by-ip/:ip", delete(delete_device_by_ip))
        .route("/:id", get(get_device).put(update_device).delete(delete_device))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// GET /api/devices?q=&order=
async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDevicesQuery>,
) -> Response {
    let query = DeviceQuery {
        filter: query.q,
        order: query.order,
    };

    match devices::search_devices(state.store.as_ref(), &query) {
        Ok(devices) => {
            let total = devices.len();
            success_response(DeviceListResponse { devices, total })
        }
        Err(e) => {
            logger::error(LogTag::Webserver, &format!("Failed to list devices: {}", e));
            registry_error_response(&e)
        }
    }
}

/// POST /api/devices
async fn create_device(
    State(state): State<Arc<AppState>>,
    Json(input): Json<DeviceInput>,
) -> Response {
    match devices::register_device(state.store.as_ref(), &input, state.mac_policy()) {
        Ok(device) => success_response(device),
        Err(e) => registry_error_response(&e),
    }
}

/// GET /api/devices/:id
async fn get_device(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match devices::fetch_device(state.store.as_ref(), id) {
        Ok(device) => success_response(device),
        Err(e) => registry_error_response(&e),
    }
}

/// PUT /api/devices/:id
async fn update_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<DeviceInput>,
) -> Response {
    match devices::edit_device(state.store.as_ref(), id, &input, state.mac_policy()) {
        Ok(device) => success_response(device),
        Err(e) => registry_error_response(&e),
    }
}

/// DELETE /api/devices/:id
async fn delete_device(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match devices::remove_device(state.store.as_ref(), id) {
        Ok(removed) => success_response(DeleteResponse { removed }),
        Err(e) => registry_error_response(&e),
    }
}

/// DELETE /api/devices/by-ip/:ip
async fn delete_device_by_ip(
    State(state): State<Arc<AppState>>,
    Path(ip): Path<String>,
) -> Response {
    match devices::remove_device_by_ip(state.store.as_ref(), &ip) {
        Ok(removed) => success_response(DeleteResponse { removed }),
        Err(e) => registry_error_response(&e),
    }
}

/// GET /api/devices/export
async fn export_devices(State(state): State<Arc<AppState>>) -> Response {
    let csv_content = match devices::search_devices(state.store.as_ref(), &DeviceQuery::all())
        .and_then(|devices| export_csv(&devices))
    {
        Ok(csv) => csv,
        Err(e) => {
            logger::error(LogTag::Webserver, &format!("Export failed: {}", e));
            return registry_error_response(&e);
        }
    };

    let filename = format!(
        "devices_{}.csv",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv_content,
    )
        .into_response()
}
