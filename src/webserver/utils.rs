/// Response helpers shared by the route modules
///
/// JSON envelope:
/// - success: `{"success": true, "data": ...}`
/// - failure: `{"success": false, "error": {"code", "message", "details"}}`
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::RegistryError;

#[derive(Debug, Serialize)]
struct SuccessEnvelope<T: Serialize> {
    success: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

/// 200 with the success envelope
pub fn success_response<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(SuccessEnvelope {
            success: true,
            data,
        }),
    )
        .into_response()
}

/// Error envelope with an explicit status
pub fn error_response(
    status: StatusCode,
    code: &str,
    message: &str,
    details: Option<&str>,
) -> Response {
    (
        status,
        Json(ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: code.to_string(),
                message: message.to_string(),
                details: details.map(|d| d.to_string()),
            },
        }),
    )
        .into_response()
}

/// HTTP status for a registry failure
pub fn status_for(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::DuplicateKey { .. } => StatusCode::CONFLICT,
        RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RegistryError::MissingColumns { .. } | RegistryError::Parse(_) => StatusCode::BAD_REQUEST,
        RegistryError::Fetch(_) => StatusCode::BAD_GATEWAY,
        RegistryError::StorageUnavailable(_) | RegistryError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Error envelope for a registry failure
pub fn registry_error_response(err: &RegistryError) -> Response {
    let details = match err {
        RegistryError::DuplicateKey { field, .. } => Some(field.label().to_string()),
        RegistryError::MissingColumns { missing } => Some(missing.join(",")),
        _ => None,
    };
    error_response(status_for(err), err.code(), &err.to_string(), details.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{KeyField, ValidationError};

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&ValidationError::EmptyName.into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&RegistryError::DuplicateKey {
                field: KeyField::MacAddress,
                value: "x".to_string()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&RegistryError::NotFound { id: 1 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&RegistryError::MissingColumns { missing: vec!["ip"] }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RegistryError::Fetch("timeout".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&RegistryError::Storage("disk".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
