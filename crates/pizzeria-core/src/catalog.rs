//! # Menu Catalog
//!
//! Read-only table of pizzas, ingredients, desserts/extras, delivery options
//! and combo prices. Loaded once at startup, either from the menu embedded in
//! the binary or from a JSON file chosen in the register configuration.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  menu.json ──► Catalog::from_json ──► validate ──► Catalog              │
//! │                                                       │                 │
//! │        Cart (prices) ◄────────────────────────────────┤                 │
//! │        Combo editor (combinable set) ◄────────────────┤                 │
//! │        Kitchen ticket (ingredient names) ◄────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DeliveryOption, PizzaSize};

/// Menu shipped with the register.
const BUILTIN_MENU: &str = include_str!("../catalog/menu.json");

// =============================================================================
// Catalog Entries
// =============================================================================

/// Per-size price of an extra topping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraToppingPrice {
    pub chica: Money,
    pub mediana: Money,
    pub grande: Money,
}

/// An ingredient, referenced from pizzas by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: u32,
    pub name: String,
    pub extra_price: ExtraToppingPrice,
}

/// One size/price tier of a pizza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeTier {
    pub size: PizzaSize,
    pub price: Money,
}

/// A pizza recipe on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPizza {
    /// Unique within the catalog.
    pub name: String,
    /// Base ingredient ids, in display order.
    pub ingredients: Vec<u32>,
    pub tiers: Vec<SizeTier>,
    /// Whether the pizza may fill a portion of a combo pizza.
    #[serde(default)]
    pub combinable: bool,
}

impl CatalogPizza {
    /// Base price for a size, if the pizza is sold in that size.
    pub fn price_for(&self, size: PizzaSize) -> Option<Money> {
        self.tiers.iter().find(|t| t.size == size).map(|t| t.price)
    }
}

/// A dessert or an extra/add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DessertOrExtra {
    pub id: u32,
    pub name: String,
    pub price: Money,
    /// true = dessert, false = extra/add-on.
    pub is_dessert: bool,
    /// Marks bundled-deal items.
    #[serde(default)]
    pub is_combo: bool,
}

/// Price of a combo pizza of a given size, independent of its portions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboPrice {
    pub size: PizzaSize,
    pub price: Money,
}

// =============================================================================
// Catalog
// =============================================================================

/// The loaded menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    pizzas: Vec<CatalogPizza>,
    #[serde(default)]
    desserts: Vec<DessertOrExtra>,
    delivery_options: Vec<DeliveryOption>,
    #[serde(default)]
    combo_prices: Vec<ComboPrice>,
}

impl Catalog {
    /// Parses and validates a catalog from JSON text.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The menu embedded at compile time.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_json(BUILTIN_MENU)
    }

    /// Checks the cross references the rest of the engine relies on.
    fn validate(&self) -> CoreResult<()> {
        if self.delivery_options.is_empty() {
            return Err(CoreError::InvalidCatalog(
                "at least one delivery option is required".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for pizza in &self.pizzas {
            if !names.insert(pizza.name.as_str()) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate pizza name '{}'",
                    pizza.name
                )));
            }
            if pizza.tiers.is_empty() {
                return Err(CoreError::InvalidCatalog(format!(
                    "pizza '{}' has no size tiers",
                    pizza.name
                )));
            }
            if let Some(missing) = pizza
                .ingredients
                .iter()
                .find(|id| self.ingredient(**id).is_none())
            {
                return Err(CoreError::InvalidCatalog(format!(
                    "pizza '{}' references unknown ingredient {}",
                    pizza.name, missing
                )));
            }
        }

        let mut dessert_ids = HashSet::new();
        for item in &self.desserts {
            if !dessert_ids.insert(item.id) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate dessert id {}",
                    item.id
                )));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn list_pizzas(&self) -> &[CatalogPizza] {
        &self.pizzas
    }

    pub fn list_ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn list_desserts(&self) -> &[DessertOrExtra] {
        &self.desserts
    }

    pub fn list_delivery_options(&self) -> &[DeliveryOption] {
        &self.delivery_options
    }

    pub fn combo_prices(&self) -> &[ComboPrice] {
        &self.combo_prices
    }

    /// The first entry of the delivery-options table.
    pub fn default_delivery_option(&self) -> DeliveryOption {
        // validate() guarantees at least one entry; the fallback only covers
        // catalogs built through Default in tests.
        self.delivery_options
            .first()
            .cloned()
            .unwrap_or_else(no_delivery)
    }

    /// Pizzas allowed as combo portions, in menu order.
    pub fn combinable_pizzas(&self) -> impl Iterator<Item = &CatalogPizza> {
        self.pizzas.iter().filter(|p| p.combinable)
    }

    pub fn pizza(&self, name: &str) -> Option<&CatalogPizza> {
        self.pizzas.iter().find(|p| p.name == name)
    }

    pub fn ingredient(&self, id: u32) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    pub fn dessert(&self, id: u32) -> Option<&DessertOrExtra> {
        self.desserts.iter().find(|d| d.id == id)
    }

    /// Combo price for a size, if combos are sold in that size.
    pub fn combo_price(&self, size: PizzaSize) -> Option<Money> {
        self.combo_prices
            .iter()
            .find(|c| c.size == size)
            .map(|c| c.price)
    }

    /// Base ingredient names of a pizza. Unknown pizzas and unresolvable
    /// ingredient ids yield nothing.
    pub fn ingredient_names(&self, pizza_name: &str) -> Vec<&str> {
        self.pizza(pizza_name)
            .map(|pizza| {
                pizza
                    .ingredients
                    .iter()
                    .filter_map(|id| self.ingredient(*id))
                    .map(|i| i.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            ingredients: Vec::new(),
            pizzas: Vec::new(),
            desserts: Vec::new(),
            delivery_options: vec![no_delivery()],
            combo_prices: Vec::new(),
        }
    }
}

/// Counter pickup without a fee.
fn no_delivery() -> DeliveryOption {
    DeliveryOption {
        price: Money::zero(),
        zone: String::new(),
        pick_up: true,
        delivery_type: crate::types::DeliveryType::Pasan,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryType;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.list_pizzas().is_empty());
        assert!(!catalog.list_desserts().is_empty());
        assert_eq!(
            catalog.default_delivery_option().delivery_type,
            DeliveryType::Pasan
        );
        assert!(catalog.combinable_pizzas().count() >= 4);
    }

    #[test]
    fn test_builtin_catalog_prices() {
        let catalog = Catalog::builtin().unwrap();
        let pepperoni = catalog.pizza("Pepperoni").unwrap();
        assert_eq!(pepperoni.price_for(PizzaSize::Grande), Some(Money::from_units(150)));
        assert_eq!(
            catalog.combo_price(PizzaSize::ExtraGrande),
            Some(Money::from_units(210))
        );
        assert_eq!(catalog.combo_price(PizzaSize::Chica), None);
    }

    #[test]
    fn test_ingredient_names_resolve_in_order() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.ingredient_names("Hawaiana"),
            vec!["Salsa de tomate", "Queso mozzarella", "Jamon", "Pina"]
        );
        assert!(catalog.ingredient_names("No existe").is_empty());
    }

    #[test]
    fn test_rejects_missing_delivery_options() {
        let err = Catalog::from_json(r#"{ "delivery_options": [] }"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCatalog(_)));
    }

    #[test]
    fn test_rejects_unknown_ingredient_reference() {
        let json = r#"{
            "pizzas": [{ "name": "X", "ingredients": [99], "tiers": [{ "size": "chica", "price": 100 }] }],
            "delivery_options": [{ "price": 0, "zone": "M", "delivery_type": "PASAN" }]
        }"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_duplicate_pizza_names() {
        let json = r#"{
            "pizzas": [
                { "name": "X", "ingredients": [], "tiers": [{ "size": "chica", "price": 100 }] },
                { "name": "X", "ingredients": [], "tiers": [{ "size": "grande", "price": 200 }] }
            ],
            "delivery_options": [{ "price": 0, "zone": "M", "delivery_type": "PASAN" }]
        }"#;
        assert!(Catalog::from_json(json).is_err());
    }
}
