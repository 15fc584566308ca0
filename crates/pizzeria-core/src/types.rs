//! # Domain Types
//!
//! Shared value types used throughout the register.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PizzaSize     │   │ DeliveryOption  │   │  PaymentEntry   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Chica          │   │  price          │   │  method         │       │
//! │  │  Mediana        │   │  zone           │   │  amount         │       │
//! │  │  Grande         │   │  pick_up        │   │  reference      │       │
//! │  │  ExtraGrande    │   │  delivery_type  │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  SizeBucket     │   │ PizzaFraction   │   │ CashTransaction │       │
//! │  │  chica/mediana/ │   │  1/1 1/2 1/3    │   │  Ingreso        │       │
//! │  │  grande (caja)  │   │  1/4            │   │  Gasto          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// A rate in basis points (bps). 1 bps = 0.01%, so 9000 bps = 90%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Percentage(u32);

impl Percentage {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Pizza Size
// =============================================================================

/// A pizza size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PizzaSize {
    Chica,
    Mediana,
    Grande,
    ExtraGrande,
}

impl PizzaSize {
    /// Label shown on screen, on tickets and stored in order payloads.
    pub const fn label(&self) -> &'static str {
        match self {
            PizzaSize::Chica => "Chica",
            PizzaSize::Mediana => "Mediana",
            PizzaSize::Grande => "Grande",
            PizzaSize::ExtraGrande => "Extra Grande",
        }
    }
}

impl fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a size label typed or picked at the UI boundary.
impl FromStr for PizzaSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "chica" => Ok(PizzaSize::Chica),
            "mediana" => Ok(PizzaSize::Mediana),
            "grande" => Ok(PizzaSize::Grande),
            "extra grande" | "extragrande" => Ok(PizzaSize::ExtraGrande),
            _ => Err(ValidationError::NotAllowed {
                field: "size".to_string(),
                allowed: vec![
                    "chica".to_string(),
                    "mediana".to_string(),
                    "grande".to_string(),
                    "extra grande".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Size Bucket
// =============================================================================

/// Caja reporting bucket for pizza units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBucket {
    Chica,
    Mediana,
    Grande,
}

impl SizeBucket {
    /// Report order, smallest first.
    pub const ALL: [SizeBucket; 3] = [SizeBucket::Chica, SizeBucket::Mediana, SizeBucket::Grande];

    pub fn label(&self) -> &'static str {
        match self {
            SizeBucket::Chica => "Chica",
            SizeBucket::Mediana => "Mediana",
            SizeBucket::Grande => "Grande",
        }
    }

    /// Classifies a stored size label by case-insensitive substring match.
    ///
    /// "grande" is checked first so that "Extra Grande" also lands in the
    /// grande bucket. Labels matching none of the three return `None`.
    ///
    /// ```rust
    /// use pizzeria_core::types::SizeBucket;
    ///
    /// assert_eq!(SizeBucket::classify("EXTRA GRANDE"), Some(SizeBucket::Grande));
    /// assert_eq!(SizeBucket::classify("Pizza chica"), Some(SizeBucket::Chica));
    /// assert_eq!(SizeBucket::classify("Familiar"), None);
    /// ```
    pub fn classify(label: &str) -> Option<SizeBucket> {
        let label = label.to_lowercase();
        if label.contains("grande") {
            Some(SizeBucket::Grande)
        } else if label.contains("mediana") {
            Some(SizeBucket::Mediana)
        } else if label.contains("chica") {
            Some(SizeBucket::Chica)
        } else {
            None
        }
    }
}

// =============================================================================
// Pizza Fraction
// =============================================================================

/// The share of one physical pizza covered by a portion.
///
/// Used for labelling only. Combo pizzas are priced at the whole-size
/// combo price regardless of fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PizzaFraction {
    Whole,
    Half,
    Third,
    Quarter,
}

impl PizzaFraction {
    /// Denominator of the fraction (numerator is always 1).
    pub const fn denominator(&self) -> u32 {
        match self {
            PizzaFraction::Whole => 1,
            PizzaFraction::Half => 2,
            PizzaFraction::Third => 3,
            PizzaFraction::Quarter => 4,
        }
    }

    /// numerator / denominator
    pub fn ratio(&self) -> f64 {
        1.0 / f64::from(self.denominator())
    }

    /// Ticket label, e.g. "1/4".
    pub fn label(&self) -> String {
        format!("1/{}", self.denominator())
    }
}

// =============================================================================
// Delivery
// =============================================================================

/// How the order leaves the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    /// Customer picks the order up at the counter.
    Pasan,
    /// Walking delivery to nearby addresses.
    Caminando,
    /// Third-party delivery channel with a mandated 10% discount.
    Totodo,
    /// Own home delivery.
    ADomicilio,
}

/// A row of the delivery-options table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryOption {
    /// Delivery fee; zero means no delivery charge.
    pub price: Money,
    /// Zone label shown to staff.
    pub zone: String,
    #[serde(default)]
    pub pick_up: bool,
    pub delivery_type: DeliveryType,
}

impl DeliveryOption {
    pub fn is_totodo(&self) -> bool {
        self.delivery_type == DeliveryType::Totodo
    }
}

// =============================================================================
// Payments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash.
    Efectivo,
    /// Bank transfer.
    Transferencia,
}

impl PaymentMethod {
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Efectivo => "Efectivo",
            PaymentMethod::Transferencia => "Transferencia",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "efectivo" | "cash" => Ok(PaymentMethod::Efectivo),
            "transferencia" | "transfer" => Ok(PaymentMethod::Transferencia),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec!["efectivo".to_string(), "transferencia".to_string()],
            }),
        }
    }
}

/// One entry of an order's payment breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentEntry {
    pub method: PaymentMethod,
    pub amount: Money,
    /// Transfer reference or similar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// Customer identity frozen into the order at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerSnapshot {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// =============================================================================
// Cash Transactions
// =============================================================================

/// Direction of a manual cash movement captured on the caja screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Income put into the drawer.
    Ingreso,
    /// Expense paid out of the drawer.
    Gasto,
}

impl TransactionKind {
    /// Storage code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Ingreso => "INGRESO",
            TransactionKind::Gasto => "GASTO",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INGRESO" => Ok(TransactionKind::Ingreso),
            "GASTO" => Ok(TransactionKind::Gasto),
            _ => Err(ValidationError::NotAllowed {
                field: "transaction kind".to_string(),
                allowed: vec!["INGRESO".to_string(), "GASTO".to_string()],
            }),
        }
    }
}

/// A manual cash transaction before storage assigns its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCashTransaction {
    pub kind: TransactionKind,
    pub amount: Money,
    pub description: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A stored manual cash transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashTransaction {
    pub id: i64,
    pub kind: TransactionKind,
    pub amount: Money,
    pub description: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
