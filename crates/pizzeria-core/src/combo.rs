//! # Combo Assembler
//!
//! Turns a fractional pattern plus a slot → pizza assignment into the
//! portions of one combo pizza line.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Pattern        Slots                    Portions                       │
//! │  ───────        ─────                    ────────                       │
//! │  Quarters  ──►  [Pepperoni, Hawaiana, ──► 1/4 Pepperoni                 │
//! │                  Mexicana, Margarita]     1/4 Hawaiana                  │
//! │                                           1/4 Mexicana                  │
//! │                                           1/4 Margarita                 │
//! │                                                                         │
//! │  Any blank slot or non-combinable name ──► ComboError, no portions      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Portions keep slot order; the first slot prints first on the kitchen
//! ticket. Pricing never depends on the portions.

use serde::{Deserialize, Serialize};

use crate::cart::CartLinePortion;
use crate::catalog::Catalog;
use crate::error::ComboError;
use crate::types::PizzaFraction;

// =============================================================================
// Pattern
// =============================================================================

/// How a combo pizza is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboPattern {
    /// 2 × 1/2
    Halves,
    /// 3 × 1/3
    Thirds,
    /// 4 × 1/4
    Quarters,
}

impl ComboPattern {
    /// Number of slots the editor shows.
    pub const fn slot_count(&self) -> usize {
        match self {
            ComboPattern::Halves => 2,
            ComboPattern::Thirds => 3,
            ComboPattern::Quarters => 4,
        }
    }

    /// Fraction shared by every slot.
    pub const fn fraction(&self) -> PizzaFraction {
        match self {
            ComboPattern::Halves => PizzaFraction::Half,
            ComboPattern::Thirds => PizzaFraction::Third,
            ComboPattern::Quarters => PizzaFraction::Quarter,
        }
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Resolves a full slot assignment into portions, in slot order.
///
/// All or nothing: the first problem found is returned and no portions are
/// produced. An empty combinable set is refused before slots are looked at.
pub fn assemble<S: AsRef<str>>(
    catalog: &Catalog,
    pattern: ComboPattern,
    slots: &[S],
) -> Result<Vec<CartLinePortion>, ComboError> {
    if catalog.combinable_pizzas().next().is_none() {
        return Err(ComboError::NoCombinablePizzas);
    }

    let expected = pattern.slot_count();
    if slots.len() != expected {
        return Err(ComboError::SlotCountMismatch {
            expected,
            actual: slots.len(),
        });
    }

    let fraction = pattern.fraction();
    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let slot_number = index + 1;
            let name = slot.as_ref().trim();
            if name.is_empty() {
                return Err(ComboError::BlankSlot { slot: slot_number });
            }
            match catalog.pizza(name) {
                Some(pizza) if pizza.combinable => Ok(CartLinePortion {
                    pizza: pizza.name.clone(),
                    fraction,
                }),
                _ => Err(ComboError::NotCombinable {
                    slot: slot_number,
                    name: name.to_string(),
                }),
            }
        })
        .collect()
}

// =============================================================================
// Draft Editor
// =============================================================================

/// State of the combo dialog while the operator fills the slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboDraft {
    pattern: ComboPattern,
    slots: Vec<Option<String>>,
}

impl ComboDraft {
    pub fn new(pattern: ComboPattern) -> Self {
        ComboDraft {
            pattern,
            slots: vec![None; pattern.slot_count()],
        }
    }

    pub fn pattern(&self) -> ComboPattern {
        self.pattern
    }

    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    /// Puts a pizza in a slot (0-based). Out-of-range slots are ignored.
    pub fn assign(&mut self, slot: usize, pizza_name: impl Into<String>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = Some(pizza_name.into());
        }
    }

    pub fn clear_slot(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = None;
        }
    }

    /// Every slot holds a non-blank name.
    pub fn is_complete(&self) -> bool {
        self.slots
            .iter()
            .all(|s| s.as_deref().is_some_and(|name| !name.trim().is_empty()))
    }

    /// Confirms the dialog. On error the draft stays as it was.
    pub fn assemble(&self, catalog: &Catalog) -> Result<Vec<CartLinePortion>, ComboError> {
        let names: Vec<&str> = self
            .slots
            .iter()
            .map(|s| s.as_deref().unwrap_or(""))
            .collect();
        assemble(catalog, self.pattern, &names)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
