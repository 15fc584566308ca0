//! # Register Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, AppError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Database Error? ─── DbError::QueryFailed("...") ─────┐                │
//! │         │                                             │                │
//! │         ▼                                             ▼                │
//! │  Validation Error? ─── ValidationError::... ─────── AppError ──► CLI   │
//! │         │                                             ▲                │
//! │         ▼                                             │                │
//! │  Config Error? ─── toml / io ─────────────────────────┘                │
//! │                                                                         │
//! │  The CLI prints `[CODE] message` and exits non-zero.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use pizzeria_core::{ComboError, CoreError, ValidationError};
use pizzeria_db::DbError;

/// Error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for the operator
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Order or transaction not found
    NotFound,

    /// Operator input rejected at the boundary
    ValidationError,

    /// Storage unavailable or query failed; the caller may retry
    DatabaseError,

    /// Operation not allowed in the current state (e.g. paying a voided order)
    BusinessLogic,

    /// Cart operation failed
    CartError,

    /// Configuration file or catalog could not be loaded
    ConfigError,

    /// Printer could not take the ticket
    PrinterError,

    /// Internal error
    Internal,
}

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        AppError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a business rule error.
    pub fn business(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::BusinessLogic, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::CartError, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ConfigError, message)
    }

    /// Creates a printer error.
    pub fn printer(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::PrinterError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to register errors.
impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AppError::not_found(&entity, id),
            DbError::ConstraintViolation { message } => {
                tracing::error!("Constraint violation: {}", message);
                AppError::validation("Value rejected by storage")
            }
            DbError::ConnectionFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                AppError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                AppError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                AppError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to register errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCatalog(reason) => {
                AppError::config(format!("Invalid catalog: {}", reason))
            }
            CoreError::Encode(e) => {
                tracing::error!("Order payload encoding failed: {}", e);
                AppError::internal("Order could not be saved")
            }
            CoreError::Combo(e) => e.into(),
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ComboError> for AppError {
    fn from(err: ComboError) -> Self {
        AppError::cart(err.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::config(format!("I/O error: {}", err))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::config(format!("Invalid config file: {}", err))
    }
}

/// Result type for register commands.
pub type AppResult<T> = Result<T, AppError>;
