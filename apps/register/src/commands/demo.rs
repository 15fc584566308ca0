//! Sample order used by the `demo` subcommand to exercise the whole
//! checkout → print → pay path on a fresh install.

use crate::error::AppResult;
use crate::state::OrderSession;
use pizzeria_core::combo::ComboPattern;
use pizzeria_core::{CustomerSnapshot, PizzaSize};

/// Delivery option index for "Zona 1" in the built-in menu.
const DEMO_DELIVERY: usize = 2;

/// Fills the session cart with a mixed order: a simple pizza marked golden,
/// a half-and-half combo, a dessert and an extra, delivered.
pub fn fill_demo_cart(session: &mut OrderSession) -> AppResult<CustomerSnapshot> {
    let pepperoni = session.add_pizza("Pepperoni", PizzaSize::Grande, 2)?;
    session.cart_mut().toggle_golden(pepperoni);
    session.add_combo(
        PizzaSize::Mediana,
        ComboPattern::Halves,
        &["Hawaiana", "Mexicana"],
    )?;
    session.add_dessert(1, 1)?;
    session.add_dessert(3, 2)?;
    session.select_delivery(DEMO_DELIVERY)?;
    session.cart_mut().set_comment("Tocar el timbre");

    Ok(CustomerSnapshot {
        name: "Cliente Demo".to_string(),
        phone: Some("5550001111".to_string()),
        address: Some("Av. Siempre Viva 742".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_core::catalog::Catalog;
    use pizzeria_core::Money;

    #[test]
    fn test_demo_cart_contents() {
        let mut session = OrderSession::new(Catalog::builtin().unwrap());
        let customer = fill_demo_cart(&mut session).unwrap();

        let cart = session.cart();
        assert_eq!(customer.name, "Cliente Demo");
        assert_eq!(cart.pizza_lines().len(), 2);
        assert!(cart.pizza_lines()[0].is_golden());
        // 2×150 + 130 + 45 + 2×25 + 30
        assert_eq!(cart.total(), Money::from_units(555));
    }
}
