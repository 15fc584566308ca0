//! # Validation Module
//!
//! Checks applied to operator input before it reaches the cart, the order
//! mapper or the cash-transaction log.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Register command (text from the operator)                    │
//! │  ├── THIS MODULE: names, phones, amounts, quantities                   │
//! │  └── Rejected input never reaches the core                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Core (typed values only)                                     │
//! │  └── Cart/combo operations treat unknown items as no-ops               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK constraints on kinds and amounts                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pizzeria_core::validation::{parse_amount, validate_quantity};
//!
//! let amount = parse_amount("150.50").unwrap();
//! assert_eq!(amount.cents(), 15050);
//!
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_TEXT_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "customer name".to_string(),
        });
    }

    if name.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: 100,
        });
    }

    Ok(name.to_string())
}

/// Validates an optional phone number.
///
/// Blank input means "no phone". Otherwise 7 to 15 digits, ignoring spaces,
/// dashes and a leading `+`.
///
/// ## Example
/// ```rust
/// use pizzeria_core::validation::validate_phone;
///
/// assert_eq!(validate_phone("").unwrap(), None);
/// assert_eq!(validate_phone("555-123-4567").unwrap().as_deref(), Some("5551234567"));
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<Option<String>> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(None);
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let digits: String = body.chars().filter(|c| *c != ' ' && *c != '-').collect();

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces and dashes".to_string(),
        });
    }

    if !(7..=15).contains(&digits.len()) {
        return Err(ValidationError::OutOfRange {
            field: "phone digits".to_string(),
            min: 7,
            max: 15,
        });
    }

    Ok(Some(digits))
}

/// Validates a free-text description (cash movements, comments).
///
/// ## Rules
/// - Must not be empty
/// - At most MAX_TEXT_LENGTH characters
pub fn validate_description(text: &str) -> ValidationResult<String> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "description".to_string(),
        });
    }

    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_TEXT_LENGTH,
        });
    }

    Ok(text.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    u32::try_from(qty).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: MAX_ITEM_QUANTITY,
    })
}

/// Parses an amount typed by the operator.
///
/// ## Rules
/// - Digits with an optional `.` or `,` and at most 2 decimals
/// - An optional leading `$` is ignored
/// - Negative values are rejected
///
/// ## Example
/// ```rust
/// use pizzeria_core::validation::parse_amount;
///
/// assert_eq!(parse_amount("$80").unwrap().cents(), 8000);
/// assert_eq!(parse_amount("12,5").unwrap().cents(), 1250);
/// assert!(parse_amount("12.345").is_err());
/// assert!(parse_amount("abc").is_err());
/// assert!(parse_amount("-5").is_err());
/// ```
pub fn parse_amount(input: &str) -> ValidationResult<Money> {
    let text = input.trim();
    let text = text.strip_prefix('$').unwrap_or(text).trim();

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "amount".to_string(),
        reason: reason.to_string(),
    };

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "amount".to_string(),
        });
    }

    if text.starts_with('-') {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    let (whole, fraction) = match text.split_once(['.', ',']) {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("must be a number"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid("must be a number"));
    }
    if fraction.len() > 2 {
        return Err(invalid("at most 2 decimal places"));
    }

    let units: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("too large"))?
    };
    let cents: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid("must be a number"))? * 10,
        _ => fraction.parse().map_err(|_| invalid("must be a number"))?,
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(cents))
        .map(Money::from_cents)
        .ok_or_else(|| invalid("too large"))
}

/// Validates a payment or cash-movement amount.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_customer_name() {
        assert_eq!(validate_customer_name("  Ana  ").unwrap(), "Ana");
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone("  ").unwrap(), None);
        assert_eq!(
            validate_phone("+52 555 123 4567").unwrap().as_deref(),
            Some("525551234567")
        );
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("55-abc-1234").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(1).unwrap(), 1);
        assert_eq!(validate_quantity(99).unwrap(), 99);

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("150").unwrap(), Money::from_units(150));
        assert_eq!(parse_amount("150.5").unwrap(), Money::from_cents(15050));
        assert_eq!(parse_amount(" $ 0.99 ").unwrap(), Money::from_cents(99));
        assert_eq!(parse_amount(".50").unwrap(), Money::from_cents(50));
        assert_eq!(parse_amount("7.").unwrap(), Money::from_units(7));

        assert!(parse_amount("").is_err());
        assert!(parse_amount(".").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("1e3").is_err());
        assert!(parse_amount("-10").is_err());
        assert!(parse_amount("99999999999999999999").is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_units(10)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_units(-10)).is_err());
    }

    #[test]
    fn test_validate_description() {
        assert_eq!(validate_description(" Gas ").unwrap(), "Gas");
        assert!(validate_description("").is_err());
        assert!(validate_description(&"x".repeat(MAX_TEXT_LENGTH + 1)).is_err());
    }
}
