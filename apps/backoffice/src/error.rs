//! # API Error Type
//!
//! Unified error type for back-office commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ValidationError ──► CoreError ──► DbError::Domain ──┐                 │
//! │                          │                           │                  │
//! │                          │ kind()                    ▼                  │
//! │                          └──────────────────────► ApiError { code,     │
//! │                                                            message }   │
//! │  sqlx::Error ──► DbError::{QueryFailed, ...} ───► DATABASE_ERROR       │
//! │                  (logged with error!, generic message to the UI)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! { "code": "CONFLICT", "message": "Insufficient stock for Cafe: available 1, requested 2" }
//! ```

use serde::Serialize;
use ts_rs::TS;

use mostrador_core::{CoreError, ErrorKind, ValidationError};
use mostrador_db::DbError;

/// API error returned from commands.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
///
/// ## Usage in Frontend
/// ```typescript
/// switch (e.code) {
///   case 'CONFLICT':         showWarning(e.message); break;
///   case 'VALIDATION_ERROR': showForm(e.message);    break;
///   default:                 showError('Something went wrong');
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Resource missing or owned by someone else
    NotFound,

    /// Insufficient stock, shift already open, order state, product in use
    Conflict,

    /// Declared total disagrees with the lines
    Integrity,

    /// Database operation failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::Conflict => ErrorCode::Conflict,
            ErrorKind::Integrity => ErrorCode::Integrity,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => ApiError::from(e),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::CheckViolation { message } => {
                tracing::error!("Check constraint violation: {}", message);
                ApiError::validation("Value out of range")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::Internal, "Internal error")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = ErrorCode::from(err.kind());
        match err {
            CoreError::Validation(e) => ApiError::from(e),
            other => ApiError::new(code, other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use mostrador_core::{Money, Quantity};

    #[test]
    fn test_core_errors_map_by_kind() {
        let stock: ApiError = CoreError::InsufficientStock {
            product: "Cafe".into(),
            available: Quantity::from_units(1),
            requested: Quantity::from_units(2),
        }
        .into();
        assert_eq!(stock.code, ErrorCode::Conflict);
        assert!(stock.message.contains("Cafe"));

        let mismatch: ApiError = CoreError::TotalMismatch {
            declared: Money::from_cents(2400),
            computed: Money::from_cents(2500),
        }
        .into();
        assert_eq!(mismatch.code, ErrorCode::Integrity);

        let missing: ApiError = DbError::Domain(CoreError::NoOpenShift).into();
        assert_eq!(missing.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_validation_message_is_unwrapped() {
        let err: ApiError = CoreError::Validation(ValidationError::Required {
            field: "name".into(),
        })
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!err.message.starts_with("Validation error"));
        assert!(err.message.contains("name"));
    }

    #[test]
    fn test_storage_errors_are_generic() {
        let err: ApiError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::validation("bad")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "bad");
    }
}
