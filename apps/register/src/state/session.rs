//! # Order Session
//!
//! The one order being built at this terminal.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderSession                                                           │
//! │  ├── catalog: Catalog   (read-only menu, loaded at startup)             │
//! │  └── cart: Cart         (mutated by the order screen, one at a time)    │
//! │                                                                         │
//! │  checkout() ──► cart cleared, delivery reset, comment kept              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A register processes one checkout at a time, so the session is owned
//! directly by the caller and passed as `&mut`. No locking.

use tracing::debug;

use crate::error::{AppError, AppResult};
use pizzeria_core::cart::Cart;
use pizzeria_core::catalog::Catalog;
use pizzeria_core::combo::{self, ComboPattern};
use pizzeria_core::validation::validate_quantity;
use pizzeria_core::{LineId, PizzaSize};

#[derive(Debug, Clone)]
pub struct OrderSession {
    catalog: Catalog,
    cart: Cart,
}

impl OrderSession {
    /// Starts a session with an empty cart on the catalog's default
    /// delivery option.
    pub fn new(catalog: Catalog) -> Self {
        let cart = Cart::new(&catalog);
        OrderSession { catalog, cart }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Adds `quantity` units of a menu pizza, as typed by the operator.
    pub fn add_pizza(&mut self, name: &str, size: PizzaSize, quantity: i64) -> AppResult<LineId> {
        let quantity = validate_quantity(quantity)?;
        let pizza = self
            .catalog
            .pizza(name)
            .ok_or_else(|| AppError::not_found("Pizza", name))?;

        let mut line = None;
        for _ in 0..quantity {
            line = self.cart.add_pizza(pizza, size);
        }
        debug!(pizza = name, size = size.label(), quantity, "Pizza added");

        line.ok_or_else(|| {
            AppError::cart(format!("{} is not sold in size {}", name, size.label()))
        })
    }

    /// Adds `quantity` units of a dessert or extra by catalog id.
    pub fn add_dessert(&mut self, item_id: u32, quantity: i64) -> AppResult<()> {
        let quantity = validate_quantity(quantity)?;
        let item = self
            .catalog
            .dessert(item_id)
            .ok_or_else(|| AppError::not_found("Dessert", item_id))?;

        for _ in 0..quantity {
            self.cart.add_dessert(item);
        }
        Ok(())
    }

    /// Assembles a combo from the operator's slot choices and adds it.
    pub fn add_combo<S: AsRef<str>>(
        &mut self,
        size: PizzaSize,
        pattern: ComboPattern,
        slots: &[S],
    ) -> AppResult<LineId> {
        let portions = combo::assemble(&self.catalog, pattern, slots)?;
        self.cart
            .add_combo_line(&self.catalog, size, portions)
            .ok_or_else(|| {
                AppError::cart(format!("Combos are not sold in size {}", size.label()))
            })
    }

    /// Selects a delivery option by its position in the catalog list.
    pub fn select_delivery(&mut self, index: usize) -> AppResult<()> {
        let option = self
            .catalog
            .list_delivery_options()
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::not_found("Delivery option", index))?;
        self.cart.set_delivery_option(option);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pizzeria_core::Money;

    fn session() -> OrderSession {
        OrderSession::new(Catalog::builtin().unwrap())
    }

    #[test]
    fn test_add_pizza_by_name() {
        let mut session = session();
        session.add_pizza("Pepperoni", PizzaSize::Grande, 2).unwrap();

        assert_eq!(session.cart().pizza_units(), 2);
        assert_eq!(session.cart().total(), Money::from_units(300));
    }

    #[test]
    fn test_add_pizza_rejects_bad_input() {
        let mut session = session();

        let err = session.add_pizza("Calzone", PizzaSize::Grande, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = session.add_pizza("Margarita", PizzaSize::ExtraGrande, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        let err = session.add_pizza("Margarita", PizzaSize::Chica, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_add_combo_and_dessert() {
        let mut session = session();
        session
            .add_combo(PizzaSize::Mediana, ComboPattern::Halves, &["Hawaiana", "Mexicana"])
            .unwrap();
        session.add_dessert(1, 2).unwrap();

        assert_eq!(session.cart().pizza_lines()[0].portions().len(), 2);
        assert_eq!(session.cart().dessert_units(), 2);
        assert_eq!(session.cart().total(), Money::from_units(130 + 90));
    }

    #[test]
    fn test_combo_refusal_is_a_cart_error() {
        let mut session = session();
        let err = session
            .add_combo(PizzaSize::Mediana, ComboPattern::Halves, &["Hawaiana", ""])
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::CartError);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_select_delivery() {
        let mut session = session();
        session.select_delivery(2).unwrap();
        assert_eq!(session.cart().delivery_option().price, Money::from_units(30));

        assert!(session.select_delivery(99).is_err());
    }
}
