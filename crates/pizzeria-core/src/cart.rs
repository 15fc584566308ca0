//! # Cart Engine
//!
//! The in-progress order on the order screen.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Cart Method              Effect               │
//! │  ───────────────          ───────────              ──────               │
//! │  Tap pizza + size ──────► add_pizza() ───────────► qty+1 or new line    │
//! │  Tap minus ─────────────► remove_pizza() ────────► qty-1 or drop line   │
//! │  Confirm combo ─────────► add_combo_line() ──────► new combo line       │
//! │  Tap dessert/extra ─────► add_dessert() ─────────► qty+1 or new line    │
//! │  Pick delivery zone ────► set_delivery_option() ─► fee in total         │
//! │  Checkout / cancel ─────► clear() ───────────────► no lines             │
//! │                                                                         │
//! │  NOTE: No operation fails. Unknown items and sizes are ignored.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - A line's subtotal is always `unit_price × quantity`
//! - Quantity never reaches 0: a line at quantity 1 is removed instead
//! - A combo line has 2, 3 or 4 portions sharing one fraction
//!
//! The cart belongs to one order session and is never shared across threads,
//! so it carries no locking.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{Catalog, CatalogPizza, DessertOrExtra};
use crate::money::Money;
use crate::types::{DeliveryOption, PizzaFraction, PizzaSize};

// =============================================================================
// Line Items
// =============================================================================

/// Identifies a pizza line within one cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineId(u32);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One slice of a combo pizza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLinePortion {
    /// Catalog pizza name filling this portion.
    pub pizza: String,
    pub fraction: PizzaFraction,
}

/// What a pizza line is made of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PizzaLineKind {
    /// One catalog pizza in one size, priced at the tier base price.
    Simple {
        pizza: String,
        size: PizzaSize,
        unit_price: Money,
    },
    /// One physical pizza split into portions, priced at the combo price for
    /// its size.
    Combo {
        size: PizzaSize,
        unit_price: Money,
        portions: Vec<CartLinePortion>,
    },
}

/// A pizza line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    id: LineId,
    kind: PizzaLineKind,
    quantity: u32,
    golden: bool,
}

impl CartLineItem {
    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn kind(&self) -> &PizzaLineKind {
        &self.kind
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Extra-bake flag. Printed on tickets, no pricing effect.
    pub fn is_golden(&self) -> bool {
        self.golden
    }

    pub fn size(&self) -> PizzaSize {
        match &self.kind {
            PizzaLineKind::Simple { size, .. } | PizzaLineKind::Combo { size, .. } => *size,
        }
    }

    pub fn unit_price(&self) -> Money {
        match &self.kind {
            PizzaLineKind::Simple { unit_price, .. } | PizzaLineKind::Combo { unit_price, .. } => {
                *unit_price
            }
        }
    }

    /// unit_price × quantity
    pub fn subtotal(&self) -> Money {
        self.unit_price() * self.quantity
    }

    /// Catalog name for simple lines, `None` for combos.
    pub fn pizza_name(&self) -> Option<&str> {
        match &self.kind {
            PizzaLineKind::Simple { pizza, .. } => Some(pizza),
            PizzaLineKind::Combo { .. } => None,
        }
    }

    /// Portions of a combo line; empty for simple lines.
    pub fn portions(&self) -> &[CartLinePortion] {
        match &self.kind {
            PizzaLineKind::Simple { .. } => &[],
            PizzaLineKind::Combo { portions, .. } => portions,
        }
    }

    fn matches_simple(&self, name: &str, wanted: PizzaSize) -> bool {
        matches!(&self.kind, PizzaLineKind::Simple { pizza, size, .. } if pizza == name && *size == wanted)
    }
}

/// A dessert or extra line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDessertLine {
    item: DessertOrExtra,
    quantity: u32,
}

impl CartDessertLine {
    pub fn item(&self) -> &DessertOrExtra {
        &self.item
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// catalog price × quantity
    pub fn subtotal(&self) -> Money {
        self.item.price * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The order being built on the order screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pizzas: Vec<CartLineItem>,
    desserts: Vec<CartDessertLine>,
    delivery: DeliveryOption,
    default_delivery: DeliveryOption,
    comment: String,
    next_line: u32,
}

impl Cart {
    /// Creates an empty cart with the catalog's default delivery option.
    pub fn new(catalog: &Catalog) -> Self {
        let default_delivery = catalog.default_delivery_option();
        Cart {
            pizzas: Vec::new(),
            desserts: Vec::new(),
            delivery: default_delivery.clone(),
            default_delivery,
            comment: String::new(),
            next_line: 1,
        }
    }

    fn next_id(&mut self) -> LineId {
        let id = LineId(self.next_line);
        self.next_line += 1;
        id
    }

    // =========================================================================
    // Pizzas
    // =========================================================================

    /// Adds one pizza of the given size.
    ///
    /// An existing simple line for the same (pizza, size) gets its quantity
    /// bumped; otherwise a new line at quantity 1 is appended. Sizes the
    /// pizza is not sold in are ignored.
    pub fn add_pizza(&mut self, pizza: &CatalogPizza, size: PizzaSize) -> Option<LineId> {
        if let Some(line) = self
            .pizzas
            .iter_mut()
            .find(|l| l.matches_simple(&pizza.name, size))
        {
            line.quantity += 1;
            return Some(line.id);
        }

        let unit_price = pizza.price_for(size)?;
        let id = self.next_id();
        self.pizzas.push(CartLineItem {
            id,
            kind: PizzaLineKind::Simple {
                pizza: pizza.name.clone(),
                size,
                unit_price,
            },
            quantity: 1,
            golden: false,
        });
        Some(id)
    }

    /// Removes one pizza of the given size; the line goes away at quantity 1.
    pub fn remove_pizza(&mut self, pizza_name: &str, size: PizzaSize) {
        if let Some(pos) = self
            .pizzas
            .iter()
            .position(|l| l.matches_simple(pizza_name, size))
        {
            self.decrement_pizza_at(pos);
        }
    }

    /// Removes one unit of any pizza line (simple or combo) by id.
    pub fn remove_line(&mut self, id: LineId) {
        if let Some(pos) = self.pizzas.iter().position(|l| l.id == id) {
            self.decrement_pizza_at(pos);
        }
    }

    fn decrement_pizza_at(&mut self, pos: usize) {
        let drop_line = match self.pizzas.get_mut(pos) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                false
            }
            Some(_) => true,
            None => false,
        };
        if drop_line {
            self.pizzas.remove(pos);
        }
    }

    /// Appends a combo pizza line at quantity 1.
    ///
    /// The unit price comes from the catalog's combo price for `size`, not
    /// from the pizzas in the portions. Returns `None` without touching the
    /// cart when combos are not sold in that size or when the portions are
    /// not 2, 3 or 4 slices of one fraction.
    pub fn add_combo_line(
        &mut self,
        catalog: &Catalog,
        size: PizzaSize,
        portions: Vec<CartLinePortion>,
    ) -> Option<LineId> {
        if !portions_form_one_pizza(&portions) {
            return None;
        }
        let unit_price = catalog.combo_price(size)?;

        let id = self.next_id();
        self.pizzas.push(CartLineItem {
            id,
            kind: PizzaLineKind::Combo {
                size,
                unit_price,
                portions,
            },
            quantity: 1,
            golden: false,
        });
        Some(id)
    }

    /// Flips the extra-bake flag on one line. Returns false if no such line.
    pub fn toggle_golden(&mut self, id: LineId) -> bool {
        match self.pizzas.iter_mut().find(|l| l.id == id) {
            Some(line) => {
                line.golden = !line.golden;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Desserts and extras
    // =========================================================================

    /// Adds one unit of a dessert/extra, keyed by item id.
    pub fn add_dessert(&mut self, item: &DessertOrExtra) {
        if let Some(line) = self.desserts.iter_mut().find(|l| l.item.id == item.id) {
            line.quantity += 1;
            return;
        }
        self.desserts.push(CartDessertLine {
            item: item.clone(),
            quantity: 1,
        });
    }

    /// Removes one unit of a dessert/extra; the line goes away at quantity 1.
    pub fn remove_dessert(&mut self, item_id: u32) {
        let Some(pos) = self.desserts.iter().position(|l| l.item.id == item_id) else {
            return;
        };
        let drop_line = match self.desserts.get_mut(pos) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                false
            }
            Some(_) => true,
            None => false,
        };
        if drop_line {
            self.desserts.remove(pos);
        }
    }

    // =========================================================================
    // Delivery and comment
    // =========================================================================

    pub fn set_delivery_option(&mut self, option: DeliveryOption) {
        self.delivery = option;
    }

    /// Restores the first entry of the delivery-options table.
    pub fn reset_delivery_option(&mut self) {
        self.delivery = self.default_delivery.clone();
    }

    pub fn delivery_option(&self) -> &DeliveryOption {
        &self.delivery
    }

    pub fn set_comment(&mut self, text: impl Into<String>) {
        self.comment = text.into();
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn pizza_lines(&self) -> &[CartLineItem] {
        &self.pizzas
    }

    pub fn dessert_lines(&self) -> &[CartDessertLine] {
        &self.desserts
    }

    /// Sum of pizza and dessert line subtotals, without delivery.
    pub fn subtotal(&self) -> Money {
        let pizzas: Money = self.pizzas.iter().map(CartLineItem::subtotal).sum();
        let desserts: Money = self.desserts.iter().map(CartDessertLine::subtotal).sum();
        pizzas + desserts
    }

    /// Lines plus the selected delivery price. Always computed from the
    /// current lines.
    pub fn total(&self) -> Money {
        self.subtotal() + self.delivery.price
    }

    /// Total pizza units across lines.
    pub fn pizza_units(&self) -> u32 {
        self.pizzas.iter().map(|l| l.quantity).sum()
    }

    /// Total dessert/extra units across lines.
    pub fn dessert_units(&self) -> u32 {
        self.desserts.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pizzas.is_empty() && self.desserts.is_empty()
    }

    /// Empties both line lists. Delivery and comment are left for the caller.
    pub fn clear(&mut self) {
        self.pizzas.clear();
        self.desserts.clear();
    }
}

/// 2, 3 or 4 portions, all of the fraction that makes exactly one pizza.
fn portions_form_one_pizza(portions: &[CartLinePortion]) -> bool {
    let Some(first) = portions.first() else {
        return false;
    };
    let count = portions.len();
    (2..=4).contains(&count)
        && first.fraction.denominator() as usize == count
        && portions.iter().all(|p| p.fraction == first.fraction)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryType;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn quarters(names: [&str; 4]) -> Vec<CartLinePortion> {
        names
            .iter()
            .map(|n| CartLinePortion {
                pizza: n.to_string(),
                fraction: PizzaFraction::Quarter,
            })
            .collect()
    }

    #[test]
    fn test_add_same_pizza_increments_quantity() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        let pepperoni = catalog.pizza("Pepperoni").unwrap();

        let first = cart.add_pizza(pepperoni, PizzaSize::Grande).unwrap();
        let second = cart.add_pizza(pepperoni, PizzaSize::Grande).unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.pizza_lines().len(), 1);
        assert_eq!(cart.pizza_lines()[0].quantity(), 2);
        assert_eq!(cart.subtotal(), Money::from_units(300));
    }

    #[test]
    fn test_different_size_is_a_new_line() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        let pepperoni = catalog.pizza("Pepperoni").unwrap();

        cart.add_pizza(pepperoni, PizzaSize::Grande);
        cart.add_pizza(pepperoni, PizzaSize::Chica);

        assert_eq!(cart.pizza_lines().len(), 2);
        assert_eq!(cart.pizza_units(), 2);
    }

    #[test]
    fn test_unsold_size_is_ignored() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        let margarita = catalog.pizza("Margarita").unwrap();

        assert!(cart.add_pizza(margarita, PizzaSize::ExtraGrande).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_invariant_through_add_and_remove() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        let hawaiana = catalog.pizza("Hawaiana").unwrap();

        for _ in 0..5 {
            cart.add_pizza(hawaiana, PizzaSize::Mediana);
            let line = &cart.pizza_lines()[0];
            assert_eq!(line.subtotal(), line.unit_price() * line.quantity());
        }
        for _ in 0..4 {
            cart.remove_pizza("Hawaiana", PizzaSize::Mediana);
            let line = &cart.pizza_lines()[0];
            assert_eq!(line.subtotal(), line.unit_price() * line.quantity());
        }
        assert_eq!(cart.pizza_lines()[0].quantity(), 1);
    }

    #[test]
    fn test_removing_last_unit_drops_line() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        let margarita = catalog.pizza("Margarita").unwrap();

        cart.add_pizza(margarita, PizzaSize::Chica);
        cart.remove_pizza("Margarita", PizzaSize::Chica);

        assert!(cart.pizza_lines().is_empty());
    }

    #[test]
    fn test_remove_unknown_pizza_is_noop() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        let margarita = catalog.pizza("Margarita").unwrap();
        cart.add_pizza(margarita, PizzaSize::Chica);

        cart.remove_pizza("Margarita", PizzaSize::Grande);
        cart.remove_pizza("Fantasma", PizzaSize::Chica);

        assert_eq!(cart.pizza_units(), 1);
    }

    #[test]
    fn test_combo_line_uses_combo_price() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);

        let id = cart
            .add_combo_line(
                &catalog,
                PizzaSize::ExtraGrande,
                quarters(["Pepperoni", "Hawaiana", "Mexicana", "Margarita"]),
            )
            .unwrap();

        let line = &cart.pizza_lines()[0];
        assert_eq!(line.id(), id);
        assert_eq!(line.unit_price(), Money::from_units(210));
        assert_eq!(line.portions().len(), 4);
        assert_eq!(line.portions()[0].pizza, "Pepperoni");
        assert!(line.pizza_name().is_none());
    }

    #[test]
    fn test_combo_line_rejects_mixed_or_wrong_portions() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);

        let mut mixed = quarters(["Pepperoni", "Hawaiana", "Mexicana", "Margarita"]);
        mixed[3].fraction = PizzaFraction::Half;
        assert!(cart
            .add_combo_line(&catalog, PizzaSize::Mediana, mixed)
            .is_none());

        let three_quarters = quarters(["Pepperoni", "Hawaiana", "Mexicana", "Margarita"])
            .into_iter()
            .take(3)
            .collect();
        assert!(cart
            .add_combo_line(&catalog, PizzaSize::Mediana, three_quarters)
            .is_none());

        // no combo price for chica
        assert!(cart
            .add_combo_line(
                &catalog,
                PizzaSize::Chica,
                quarters(["Pepperoni", "Hawaiana", "Mexicana", "Margarita"])
            )
            .is_none());

        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_combo_line_by_id() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        let halves = vec![
            CartLinePortion {
                pizza: "Pepperoni".to_string(),
                fraction: PizzaFraction::Half,
            },
            CartLinePortion {
                pizza: "Margarita".to_string(),
                fraction: PizzaFraction::Half,
            },
        ];
        let id = cart
            .add_combo_line(&catalog, PizzaSize::Mediana, halves)
            .unwrap();

        cart.remove_line(id);
        assert!(cart.pizza_lines().is_empty());
    }

    #[test]
    fn test_toggle_golden_has_no_pricing_effect() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        let id = cart
            .add_pizza(catalog.pizza("Margarita").unwrap(), PizzaSize::Grande)
            .unwrap();
        let before = cart.total();

        assert!(cart.toggle_golden(id));
        assert!(cart.pizza_lines()[0].is_golden());
        assert_eq!(cart.total(), before);

        assert!(cart.toggle_golden(id));
        assert!(!cart.pizza_lines()[0].is_golden());
        assert!(!cart.toggle_golden(LineId(999)));
    }

    #[test]
    fn test_dessert_increment_and_removal() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        let flan = catalog.dessert(1).unwrap();

        cart.add_dessert(flan);
        cart.add_dessert(flan);
        assert_eq!(cart.dessert_lines().len(), 1);
        assert_eq!(cart.dessert_units(), 2);
        assert_eq!(cart.dessert_lines()[0].subtotal(), Money::from_units(90));

        cart.remove_dessert(1);
        assert_eq!(cart.dessert_units(), 1);
        cart.remove_dessert(1);
        assert!(cart.dessert_lines().is_empty());

        cart.remove_dessert(42);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_includes_delivery_and_tracks_changes() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        cart.add_pizza(catalog.pizza("Pepperoni").unwrap(), PizzaSize::Grande);
        cart.add_dessert(catalog.dessert(3).unwrap());
        assert_eq!(cart.total(), Money::from_units(175));

        let zona_1 = catalog.list_delivery_options()[2].clone();
        cart.set_delivery_option(zona_1);
        assert_eq!(cart.total(), Money::from_units(205));

        cart.remove_dessert(3);
        assert_eq!(cart.total(), Money::from_units(180));
    }

    #[test]
    fn test_reset_delivery_restores_first_option() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        cart.set_delivery_option(catalog.list_delivery_options()[4].clone());
        assert_eq!(cart.delivery_option().delivery_type, DeliveryType::Totodo);

        cart.reset_delivery_option();
        assert_eq!(cart.delivery_option(), &catalog.list_delivery_options()[0]);
    }

    #[test]
    fn test_clear_leaves_delivery_and_comment() {
        let catalog = catalog();
        let mut cart = Cart::new(&catalog);
        cart.add_pizza(catalog.pizza("Pepperoni").unwrap(), PizzaSize::Grande);
        cart.add_dessert(catalog.dessert(1).unwrap());
        cart.set_delivery_option(catalog.list_delivery_options()[1].clone());
        cart.set_comment("sin cebolla");

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.comment(), "sin cebolla");
        assert_eq!(cart.delivery_option().zone, "Centro");
        assert_eq!(cart.total(), Money::from_units(15));
    }
}
