//! # Error Types
//!
//! Domain-specific error types for pizzeria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pizzeria-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ComboError       - Combo editor cannot produce portions           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pizzeria-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  register errors (in app)                                              │
//! │  └── AppError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart mutations never return errors: invalid input is a no-op. Malformed
//! stored payloads are recovered as empty lists and never show up here.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The menu catalog could not be parsed or is inconsistent.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// An order payload could not be encoded at checkout.
    ///
    /// Checkout aborts before any storage call when this happens.
    #[error("Failed to encode order payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// Combo assembly was refused.
    #[error("Combo error: {0}")]
    Combo(#[from] ComboError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Combo Error
// =============================================================================

/// Reasons the combo editor cannot confirm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComboError {
    /// Nothing in the catalog may be used as a portion.
    #[error("No combinable pizzas in the catalog")]
    NoCombinablePizzas,

    /// The assignment does not have one entry per slot.
    #[error("Expected {expected} slots, got {actual}")]
    SlotCountMismatch { expected: usize, actual: usize },

    /// A slot was left empty.
    #[error("Slot {slot} has no pizza assigned")]
    BlankSlot { slot: usize },

    /// A slot names a pizza that is unknown or not combinable.
    #[error("Slot {slot}: '{name}' cannot be used in a combo")]
    NotCombinable { slot: usize, name: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors raised at the UI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., non-numeric amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_error_messages() {
        let err = ComboError::BlankSlot { slot: 3 };
        assert_eq!(err.to_string(), "Slot 3 has no pizza assigned");

        let err = ComboError::NotCombinable {
            slot: 1,
            name: "Calzone".to_string(),
        };
        assert_eq!(err.to_string(), "Slot 1: 'Calzone' cannot be used in a combo");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer name".to_string(),
        };
        assert_eq!(err.to_string(), "customer name is required");
    }

    #[test]
    fn test_conversions_into_core_error() {
        let core_err: CoreError = ComboError::NoCombinablePizzas.into();
        assert!(matches!(core_err, CoreError::Combo(_)));

        let core_err: CoreError = ValidationError::MustBePositive {
            field: "amount".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
