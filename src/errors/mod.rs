/// Error types for the device registry
///
/// Every store, validation and import failure surfaces as a `RegistryError`.
/// Callers match on the variant to decide how to report it; the webserver maps
/// each variant to an HTTP status and a stable error code.
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// VALIDATION ERRORS
// =============================================================================

/// Input rejected before it reaches the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid IP address: {0}")]
    InvalidIp(String),

    #[error("invalid MAC address: {0} (expected format 00:1A:2B:3C:4D:5E)")]
    InvalidMac(String),

    #[error("device name cannot be empty")]
    EmptyName,
}

// =============================================================================
// UNIQUE KEYS
// =============================================================================

/// Columns carrying a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyField {
    IpAddress,
    MacAddress,
}

impl KeyField {
    pub fn label(&self) -> &'static str {
        match self {
            KeyField::IpAddress => "IP address",
            KeyField::MacAddress => "MAC address",
        }
    }
}

impl std::fmt::Display for KeyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{field} {value} is already registered")]
    DuplicateKey { field: KeyField, value: String },

    #[error("device {id} not found")]
    NotFound { id: i64 },

    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<&'static str> },

    #[error("failed to parse import data: {0}")]
    Parse(String),

    #[error("failed to fetch import data: {0}")]
    Fetch(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl RegistryError {
    /// Stable machine-readable code used in API responses
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::Validation(ValidationError::MissingField(_)) => "MISSING_FIELD",
            RegistryError::Validation(ValidationError::InvalidIp(_)) => "INVALID_IP",
            RegistryError::Validation(ValidationError::InvalidMac(_)) => "INVALID_MAC",
            RegistryError::Validation(ValidationError::EmptyName) => "EMPTY_NAME",
            RegistryError::DuplicateKey { .. } => "DUPLICATE",
            RegistryError::NotFound { .. } => "NOT_FOUND",
            RegistryError::MissingColumns { .. } => "MISSING_COLUMNS",
            RegistryError::Parse(_) => "PARSE_ERROR",
            RegistryError::Fetch(_) => "FETCH_ERROR",
            RegistryError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            RegistryError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Errors caused by the caller's input rather than the system
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            RegistryError::StorageUnavailable(_) | RegistryError::Storage(_)
        )
    }
}

impl From<rusqlite::Error> for RegistryError {
    fn from(err: rusqlite::Error) -> Self {
        RegistryError::Storage(err.to_string())
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
