//! # Ticket Formatter
//!
//! Renders fixed-width plain text for the receipt printer.
//!
//! ## Renderings
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ticket             Source                 Shows                        │
//! │  ──────             ──────                 ─────                        │
//! │  customer_receipt   TicketOrder            header, lines + prices,      │
//! │                                            totals, payments, footer     │
//! │  kitchen_ticket     TicketOrder + Catalog  lines, ingredients, no prices│
//! │  cash_report        DailyStatistics        caja aggregates only         │
//! │  void_ticket        TicketOrder            receipt body + VOID banner   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `TicketOrder` is built either from the live cart (printing before
//! checkout) or from a stored order (reprints, voids). Money always prints
//! with 2 decimals; long text wraps at the paper width.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::money::Money;
use crate::order::{
    from_persisted_order, PersistedOrder, StoredDessertLine, StoredPizzaLine, TotodoPricing,
};
use crate::stats::{BucketStats, DailyStatistics};
use crate::types::{CustomerSnapshot, PaymentEntry, SizeBucket};

/// Narrow 58mm paper.
pub const PAPER_WIDTH_NARROW: usize = 32;
/// Wide 80mm paper.
pub const PAPER_WIDTH_WIDE: usize = 48;

const MIN_WIDTH: usize = 20;
const INDENT: &str = "   ";

// =============================================================================
// Ticket Inputs
// =============================================================================

/// Business details printed at the top and bottom of customer tickets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreHeader {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: Option<String>,
    pub footer: String,
}

/// Everything a ticket needs to know about one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketOrder {
    /// Storage id; `None` before checkout.
    pub id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub customer: CustomerSnapshot,
    pub address: String,
    pub pizzas: Vec<StoredPizzaLine>,
    pub desserts: Vec<StoredDessertLine>,
    pub delivery_fee: Money,
    pub total: Money,
    pub totodo: TotodoPricing,
    pub payments: Vec<PaymentEntry>,
    pub comment: String,
}

impl TicketOrder {
    /// View of the cart being built.
    pub fn from_cart(
        cart: &Cart,
        customer: &CustomerSnapshot,
        address: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let delivery = cart.delivery_option();
        let total = cart.total();
        TicketOrder {
            id: None,
            created_at: now,
            customer: customer.clone(),
            address: address.to_string(),
            pizzas: cart.pizza_lines().iter().map(StoredPizzaLine::from).collect(),
            desserts: cart
                .dessert_lines()
                .iter()
                .map(StoredDessertLine::from)
                .collect(),
            delivery_fee: delivery.price,
            total,
            totodo: if delivery.is_totodo() {
                TotodoPricing::for_total(total)
            } else {
                TotodoPricing::default()
            },
            payments: Vec::new(),
            comment: cart.comment().to_string(),
        }
    }

    /// View of a stored order. Unreadable payloads show as no lines.
    pub fn from_persisted(persisted: &PersistedOrder) -> Self {
        let order = &persisted.order;
        let lines = from_persisted_order(order);
        TicketOrder {
            id: Some(persisted.id),
            created_at: order.created_at,
            customer: order.customer_snapshot(),
            address: order.address.clone(),
            pizzas: lines.pizzas,
            desserts: lines.desserts,
            delivery_fee: order.delivery_fee,
            total: order.total,
            totodo: order.totodo,
            payments: order.payments(),
            comment: order.comment.clone(),
        }
    }

    fn amount_paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    fn amount_charged(&self) -> Money {
        if self.totodo.is_totodo {
            self.totodo.discounted_price
        } else {
            self.total
        }
    }
}

// =============================================================================
// Formatter
// =============================================================================

/// Renders tickets for one paper width.
#[derive(Debug, Clone)]
pub struct TicketFormatter {
    width: usize,
    header: StoreHeader,
    offset: FixedOffset,
}

impl TicketFormatter {
    /// Widths below 20 columns are raised to 20. Times print in UTC until
    /// `with_offset` is called.
    pub fn new(width: usize, header: StoreHeader) -> Self {
        TicketFormatter {
            width: width.max(MIN_WIDTH),
            header,
            offset: Utc.fix(),
        }
    }

    /// Prints times in the given local offset.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    // =========================================================================
    // Customer receipt
    // =========================================================================

    pub fn customer_receipt(&self, order: &TicketOrder) -> String {
        let mut out = TicketBuffer::new(self.width);
        self.store_header(&mut out);
        out.divider('=');
        self.order_heading(&mut out, order);
        self.receipt_body(&mut out, order);
        if !self.header.footer.is_empty() {
            out.blank();
            out.center(&self.header.footer);
        }
        out.finish()
    }

    // =========================================================================
    // Kitchen ticket
    // =========================================================================

    /// Lines without prices, each pizza followed by its base ingredients.
    ///
    /// Ingredients that cannot be resolved through the catalog are left out;
    /// the pizza line itself always prints.
    pub fn kitchen_ticket(&self, order: &TicketOrder, catalog: &Catalog) -> String {
        let mut out = TicketBuffer::new(self.width);
        out.center("*** COCINA ***");
        let title = match order.id {
            Some(id) => format!("Pedido #{}", id),
            None => "Pedido".to_string(),
        };
        out.two_column(&title, &self.time(order.created_at));
        if !order.customer.name.is_empty() {
            out.wrapped(&format!("Cliente: {}", order.customer.name), "");
        }
        out.divider('-');

        for line in &order.pizzas {
            let size = line.size.to_uppercase();
            if line.is_combo() {
                out.wrapped(&format!("{}x {} COMBINADA", line.quantity, size), "");
                for portion in &line.portions {
                    out.wrapped(
                        &format!(
                            "{}{} {}",
                            INDENT,
                            portion.fraction.label(),
                            portion.pizza.to_uppercase()
                        ),
                        INDENT,
                    );
                    let ingredient_indent = INDENT.repeat(2);
                    for ingredient in catalog.ingredient_names(&portion.pizza) {
                        out.wrapped(
                            &format!("{}{}", ingredient_indent, ingredient),
                            &ingredient_indent,
                        );
                    }
                }
            } else {
                let name = line.name.as_deref().unwrap_or("");
                out.wrapped(
                    &format!("{}x {} {}", line.quantity, size, name.to_uppercase()),
                    INDENT,
                );
                for ingredient in catalog.ingredient_names(name) {
                    out.wrapped(&format!("{}{}", INDENT, ingredient), INDENT);
                }
            }
            if line.golden {
                out.line(&format!("{}** DORADA **", INDENT));
            }
        }

        if !order.desserts.is_empty() {
            out.divider('-');
            out.line("POSTRES / EXTRAS");
            for line in &order.desserts {
                out.wrapped(&format!("{}x {}", line.quantity, line.name), INDENT);
            }
        }

        out.divider('-');
        out.line(if order.delivery_fee.is_positive() {
            "A DOMICILIO"
        } else {
            "PARA LLEVAR / MOSTRADOR"
        });
        if !order.comment.trim().is_empty() {
            out.wrapped(&format!("Nota: {}", order.comment.trim()), "");
        }
        out.finish()
    }

    // =========================================================================
    // Cash-register report
    // =========================================================================

    /// The caja summary. `day_label` is printed under the title as given.
    pub fn cash_report(&self, stats: &DailyStatistics, day_label: &str) -> String {
        let mut out = TicketBuffer::new(self.width);
        if !self.header.name.is_empty() {
            out.center(&self.header.name.to_uppercase());
        }
        out.center("CORTE DE CAJA");
        out.center(day_label);
        out.divider('=');

        out.line("PIZZAS");
        for bucket in SizeBucket::ALL {
            self.bucket_row(&mut out, bucket.label(), stats.bucket(bucket));
        }
        self.bucket_row(&mut out, "Total pizzas", stats.pizzas_total);
        out.divider('-');
        self.bucket_row(&mut out, "Postres", stats.desserts);
        self.bucket_row(&mut out, "Extras", stats.extras);
        self.bucket_row(&mut out, "Envios", stats.delivery);
        out.divider('-');

        out.two_column("Pedidos", &stats.order_count.to_string());
        if stats.totodo_orders > 0 {
            out.two_column("Pedidos TOTODO", &stats.totodo_orders.to_string());
            out.two_column(
                "Descuento TOTODO",
                &(-stats.totodo_discount_total).to_string(),
            );
        }
        out.two_column("Total pedidos", &stats.orders_subtotal.to_string());
        out.two_column("Efectivo recibido", &stats.cash_received_efectivo.to_string());
        out.two_column(
            "Transferencias",
            &stats.cash_received_transferencia.to_string(),
        );
        out.two_column("Ingresos", &stats.captured_income.to_string());
        out.two_column("Gastos", &stats.captured_expense.to_string());
        out.divider('=');
        out.two_column("TOTAL CAJA", &stats.cash_register_total.to_string());
        out.two_column("EFECTIVO EN CAJA", &stats.cash_on_hand.to_string());
        out.two_column(
            "Diferencia cobrado/pedidos",
            &stats.unpaid_orders_amount.to_string(),
        );
        out.finish()
    }

    fn bucket_row(&self, out: &mut TicketBuffer, label: &str, bucket: BucketStats) {
        let right = format!("{:>4} {:>11}", bucket.units, bucket.revenue.to_string());
        out.two_column(label, &right);
    }

    // =========================================================================
    // Void audit ticket
    // =========================================================================

    /// The original order content under a cancellation banner.
    pub fn void_ticket(&self, order: &TicketOrder, voided_at: DateTime<Utc>) -> String {
        let mut out = TicketBuffer::new(self.width);
        out.divider('*');
        out.center("PEDIDO CANCELADO");
        out.divider('*');
        if !self.header.name.is_empty() {
            out.center(&self.header.name);
        }
        self.order_heading(&mut out, order);
        out.two_column("Cancelado", &self.time(voided_at));
        self.receipt_body(&mut out, order);
        out.divider('*');
        out.center("CANCELADO - NO VALIDO");
        out.divider('*');
        out.finish()
    }

    // =========================================================================
    // Shared sections
    // =========================================================================

    fn store_header(&self, out: &mut TicketBuffer) {
        if !self.header.name.is_empty() {
            out.center(&self.header.name.to_uppercase());
        }
        for line in &self.header.address_lines {
            out.center(line);
        }
        if let Some(phone) = &self.header.phone {
            out.center(&format!("Tel. {}", phone));
        }
    }

    fn order_heading(&self, out: &mut TicketBuffer, order: &TicketOrder) {
        let title = match order.id {
            Some(id) => format!("Pedido #{}", id),
            None => "Pedido".to_string(),
        };
        out.two_column(&title, &self.time(order.created_at));
        if !order.customer.name.is_empty() {
            out.wrapped(&format!("Cliente: {}", order.customer.name), INDENT);
        }
        if let Some(phone) = &order.customer.phone {
            out.line(&format!("Tel: {}", phone));
        }
        if !order.address.trim().is_empty() {
            out.wrapped(&format!("Entrega: {}", order.address.trim()), INDENT);
        }
    }

    fn receipt_body(&self, out: &mut TicketBuffer, order: &TicketOrder) {
        out.divider('-');
        for line in &order.pizzas {
            let label = match &line.name {
                Some(name) if !line.is_combo() => {
                    format!("{}x {} {}", line.quantity, line.size, name)
                }
                _ => format!("{}x {} Combinada", line.quantity, line.size),
            };
            out.two_column(&label, &line.subtotal().to_string());
            for portion in &line.portions {
                out.wrapped(
                    &format!("{}{} {}", INDENT, portion.fraction.label(), portion.pizza),
                    INDENT,
                );
            }
            if line.golden {
                out.line(&format!("{}(dorada)", INDENT));
            }
        }
        for line in &order.desserts {
            out.two_column(
                &format!("{}x {}", line.quantity, line.name),
                &line.subtotal().to_string(),
            );
        }
        out.divider('-');

        let lines_total = order.total - order.delivery_fee;
        out.two_column("Subtotal", &lines_total.to_string());
        if order.delivery_fee.is_positive() {
            out.two_column("Envio", &order.delivery_fee.to_string());
        }
        out.two_column("TOTAL", &order.total.to_string());
        if order.totodo.is_totodo {
            out.two_column("Descuento TOTODO", &(-order.totodo.discount_amount).to_string());
            out.two_column("A PAGAR", &order.totodo.discounted_price.to_string());
        }

        if !order.payments.is_empty() {
            out.divider('-');
            for payment in &order.payments {
                out.two_column(payment.method.label(), &payment.amount.to_string());
                if let Some(reference) = &payment.reference {
                    out.wrapped(&format!("{}Ref: {}", INDENT, reference), INDENT);
                }
            }
            // Measured against what the customer is charged (the TOTODO
            // price when discounted), while `NewOrder::is_fully_paid` compares
            // against the nominal total.
            let pending = order.amount_charged() - order.amount_paid();
            if pending.is_positive() {
                out.two_column("Pendiente", &pending.to_string());
            } else if pending.is_negative() {
                out.two_column("Cambio", &(-pending).to_string());
            }
        }

        if !order.comment.trim().is_empty() {
            out.divider('-');
            out.wrapped(&format!("Nota: {}", order.comment.trim()), "");
        }
    }

    fn time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format("%d/%m/%Y %H:%M")
            .to_string()
    }
}

// =============================================================================
// Line Buffer
// =============================================================================

/// Accumulates fixed-width lines.
struct TicketBuffer {
    width: usize,
    lines: Vec<String>,
}

impl TicketBuffer {
    fn new(width: usize) -> Self {
        TicketBuffer {
            width,
            lines: Vec::new(),
        }
    }

    fn line(&mut self, text: &str) {
        self.wrapped(text, "");
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn divider(&mut self, ch: char) {
        self.lines.push(ch.to_string().repeat(self.width));
    }

    fn center(&mut self, text: &str) {
        for piece in wrap(text, self.width, "") {
            let len = piece.chars().count();
            let pad = (self.width - len) / 2;
            self.lines.push(format!("{}{}", " ".repeat(pad), piece));
        }
    }

    /// Word-wraps `text`, prefixing continuation lines with `indent`.
    fn wrapped(&mut self, text: &str, indent: &str) {
        self.lines.extend(wrap(text, self.width, indent));
    }

    /// `left` flush left, `right` flush right on the same line. When they do
    /// not fit, `left` wraps in the space left of `right`.
    fn two_column(&mut self, left: &str, right: &str) {
        let right_len = right.chars().count();
        if right_len + 1 >= self.width {
            self.wrapped(left, INDENT);
            self.lines.push(right.to_string());
            return;
        }

        let room = self.width - right_len - 1;
        let mut pieces = wrap(left, room, INDENT).into_iter();
        let first = pieces.next().unwrap_or_default();
        let pad = self.width - first.chars().count() - right_len;
        self.lines.push(format!("{}{}{}", first, " ".repeat(pad), right));
        self.lines.extend(pieces);
    }

    fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Greedy word wrap. Words longer than the width are split. Leading spaces
/// of `text` are kept on the first line; `indent` prefixes the rest.
fn wrap(text: &str, width: usize, indent: &str) -> Vec<String> {
    let width = width.max(1);
    let indent = if indent.chars().count() >= width {
        ""
    } else {
        indent
    };
    let indent_len = indent.chars().count();

    let lead = text.chars().take_while(|c| *c == ' ').count();
    let lead = if lead < width { lead } else { 0 };

    let mut lines = Vec::new();
    let mut current = " ".repeat(lead);
    let mut len = lead;
    let mut base = lead;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while !chars.is_empty() {
            let sep = usize::from(len > base);
            if len + sep + chars.len() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                len += sep + chars.len();
                current.extend(chars.drain(..));
            } else if len > base {
                lines.push(std::mem::replace(&mut current, indent.to_string()));
                len = indent_len;
                base = indent_len;
            } else {
                let rest = chars.split_off(width - len);
                current.extend(chars);
                lines.push(std::mem::replace(&mut current, indent.to_string()));
                len = indent_len;
                base = indent_len;
                chars = rest;
            }
        }
    }

    if len > base || lines.is_empty() {
        lines.push(current.trim_end().to_string());
    }
    lines
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLinePortion;
    use crate::order::to_persisted_order;
    use crate::types::{PaymentMethod, PizzaFraction, PizzaSize};
    use chrono::TimeZone;

    fn header() -> StoreHeader {
        StoreHeader {
            name: "Pizzeria Don Pepe".to_string(),
            address_lines: vec!["Av. Juarez 123".to_string()],
            phone: Some("555 123 4567".to_string()),
            footer: "Gracias por su compra".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 20, 15, 0).unwrap()
    }

    fn cart(catalog: &Catalog) -> Cart {
        let mut cart = Cart::new(catalog);
        let id = cart
            .add_pizza(catalog.pizza("Pepperoni").unwrap(), PizzaSize::Grande)
            .unwrap();
        cart.toggle_golden(id);
        cart.add_combo_line(
            catalog,
            PizzaSize::ExtraGrande,
            ["Hawaiana", "Mexicana", "Margarita", "Vegetariana"]
                .iter()
                .map(|n| CartLinePortion {
                    pizza: n.to_string(),
                    fraction: PizzaFraction::Quarter,
                })
                .collect(),
        );
        cart.add_dessert(catalog.dessert(1).unwrap());
        cart.set_comment("sin cebolla en la mexicana");
        cart
    }

    fn customer() -> CustomerSnapshot {
        CustomerSnapshot {
            name: "Ana".to_string(),
            phone: Some("5551234567".to_string()),
            address: None,
        }
    }

    fn assert_fits(text: &str, width: usize) {
        for line in text.lines() {
            assert!(
                line.chars().count() <= width,
                "line wider than {}: {:?}",
                width,
                line
            );
        }
    }

    #[test]
    fn test_customer_receipt_contents() {
        let catalog = Catalog::builtin().unwrap();
        let order = TicketOrder::from_cart(&cart(&catalog), &customer(), "Calle 5 #10", now());
        let formatter = TicketFormatter::new(PAPER_WIDTH_WIDE, header());

        let text = formatter.customer_receipt(&order);

        assert!(text.contains("PIZZERIA DON PEPE"));
        assert!(text.contains("Cliente: Ana"));
        assert!(text.contains("1x Grande Pepperoni"));
        assert!(text.contains("$150.00"));
        assert!(text.contains("1x Extra Grande Combinada"));
        assert!(text.contains("1/4 Hawaiana"));
        assert!(text.contains("(dorada)"));
        assert!(text.contains("$405.00"));
        assert!(text.contains("Gracias por su compra"));
        assert!(!text.contains("TOTODO"));
        assert_fits(&text, PAPER_WIDTH_WIDE);
    }

    #[test]
    fn test_receipt_shows_totodo_and_payments() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new(&catalog);
        cart.add_pizza(catalog.pizza("Pepperoni").unwrap(), PizzaSize::Grande);
        cart.set_delivery_option(catalog.list_delivery_options()[4].clone());
        let mut new_order = to_persisted_order(&cart, &customer(), "", now()).unwrap();
        new_order
            .record_payment(PaymentMethod::Efectivo, Money::from_units(100), None)
            .unwrap();
        let persisted = PersistedOrder::new(7, new_order);

        let text = TicketFormatter::new(PAPER_WIDTH_WIDE, header())
            .customer_receipt(&TicketOrder::from_persisted(&persisted));

        assert!(text.contains("Pedido #7"));
        assert!(text.contains("Descuento TOTODO"));
        assert!(text.contains("-$15.00"));
        assert!(text.contains("A PAGAR"));
        assert!(text.contains("$135.00"));
        assert!(text.contains("Efectivo"));
        assert!(text.contains("Pendiente"));
        assert!(text.contains("$35.00"));
        assert_fits(&text, PAPER_WIDTH_WIDE);
    }

    #[test]
    fn test_kitchen_ticket_layout() {
        let catalog = Catalog::builtin().unwrap();
        let order = TicketOrder::from_cart(&cart(&catalog), &customer(), "", now());

        let text = TicketFormatter::new(PAPER_WIDTH_NARROW, header()).kitchen_ticket(&order, &catalog);

        assert!(text.contains("1x GRANDE PEPPERONI"));
        assert!(text.contains("** DORADA **"));
        assert!(text.contains("1x EXTRA GRANDE COMBINADA"));
        assert!(text.contains("1/4 HAWAIANA"));
        assert!(text.contains("Pina"));
        assert!(text.contains("1x Flan napolitano"));
        assert!(text.contains("Nota: sin cebolla"));
        assert!(!text.contains('$'));

        let hawaiana = text.find("1/4 HAWAIANA").unwrap();
        let mexicana = text.find("1/4 MEXICANA").unwrap();
        assert!(hawaiana < mexicana);
        assert_fits(&text, PAPER_WIDTH_NARROW);
    }

    #[test]
    fn test_totodo_paid_discounted_price_has_nothing_pending() {
        let catalog = Catalog::builtin().unwrap();
        let mut cart = Cart::new(&catalog);
        cart.add_pizza(catalog.pizza("Pepperoni").unwrap(), PizzaSize::Grande);
        cart.set_delivery_option(catalog.list_delivery_options()[4].clone());
        let mut new_order = to_persisted_order(&cart, &customer(), "", now()).unwrap();
        new_order
            .record_payment(PaymentMethod::Transferencia, Money::from_units(135), None)
            .unwrap();

        // The stored order still owes the discount against its nominal total.
        assert!(!new_order.is_fully_paid());
        assert_eq!(new_order.balance_due(), Money::from_units(15));

        let persisted = PersistedOrder::new(8, new_order);
        let text = TicketFormatter::new(PAPER_WIDTH_WIDE, header())
            .customer_receipt(&TicketOrder::from_persisted(&persisted));

        assert!(text.contains("A PAGAR"));
        assert!(!text.contains("Pendiente"));
        assert!(!text.contains("Cambio"));
    }

    #[test]
    fn test_kitchen_ticket_combo_ingredients_keep_indent_when_wrapped() {
        let json = include_str!("../catalog/menu.json")
            .replace("\"Pina\"", "\"Pina asada con canela y chile piquin\"");
        let catalog = Catalog::from_json(&json).unwrap();
        let mut cart = Cart::new(&catalog);
        cart.add_combo_line(
            &catalog,
            PizzaSize::Mediana,
            ["Hawaiana", "Mexicana"]
                .iter()
                .map(|n| CartLinePortion {
                    pizza: n.to_string(),
                    fraction: PizzaFraction::Half,
                })
                .collect(),
        );
        let order = TicketOrder::from_cart(&cart, &customer(), "", now());

        let text = TicketFormatter::new(PAPER_WIDTH_NARROW, header()).kitchen_ticket(&order, &catalog);

        let lines: Vec<&str> = text.lines().collect();
        let start = lines
            .iter()
            .position(|l| l.trim_start().starts_with("Pina asada"))
            .unwrap();
        assert!(lines[start].starts_with("      Pina"));
        assert!(lines[start + 1].starts_with("      "));
        assert!(lines[start + 1].contains("piquin"));
        assert_fits(&text, PAPER_WIDTH_NARROW);
    }

    #[test]
    fn test_kitchen_ticket_skips_unknown_ingredients() {
        let catalog = Catalog::builtin().unwrap();
        let mut order = TicketOrder::from_cart(&cart(&catalog), &customer(), "", now());
        order.pizzas[0].name = Some("Receta Retirada".to_string());

        let text = TicketFormatter::new(PAPER_WIDTH_NARROW, header()).kitchen_ticket(&order, &catalog);

        assert!(text.contains("1x GRANDE RECETA RETIRADA"));
        let after = &text[text.find("RECETA RETIRADA").unwrap()..];
        let next_line = after.lines().nth(1).unwrap();
        assert!(next_line.contains("DORADA"));
    }

    #[test]
    fn test_cash_report() {
        let stats = DailyStatistics {
            pizzas_grande: BucketStats {
                units: 3,
                revenue: Money::from_units(450),
            },
            pizzas_total: BucketStats {
                units: 3,
                revenue: Money::from_units(450),
            },
            order_count: 2,
            cash_register_total: Money::from_units(400),
            unpaid_orders_amount: Money::from_units(-50),
            ..DailyStatistics::default()
        };

        let text = TicketFormatter::new(PAPER_WIDTH_NARROW, header()).cash_report(&stats, "17/05/2024");

        assert!(text.contains("CORTE DE CAJA"));
        assert!(text.contains("17/05/2024"));
        let chica = text.find("Chica").unwrap();
        let mediana = text.find("Mediana").unwrap();
        let grande = text.find("Grande").unwrap();
        assert!(chica < mediana && mediana < grande);
        assert!(text[grande..].lines().next().unwrap().contains("$450.00"));
        assert!(text.contains("$450.00"));
        assert!(text.contains("TOTAL CAJA"));
        assert!(text.contains("-$50.00"));
        assert!(!text.contains("Pedido #"));
        assert_fits(&text, PAPER_WIDTH_NARROW);
    }

    #[test]
    fn test_void_ticket_has_banner_and_content() {
        let catalog = Catalog::builtin().unwrap();
        let new_order = to_persisted_order(&cart(&catalog), &customer(), "", now()).unwrap();
        let persisted = PersistedOrder::new(3, new_order);

        let text = TicketFormatter::new(PAPER_WIDTH_NARROW, header())
            .void_ticket(&TicketOrder::from_persisted(&persisted), now());

        assert!(text.contains("PEDIDO CANCELADO"));
        assert!(text.contains("Pedido #3"));
        assert!(text.contains("1x Grande Pepperoni"));
        assert!(text.contains("Cancelado"));
    }

    #[test]
    fn test_times_use_offset() {
        let catalog = Catalog::builtin().unwrap();
        let order = TicketOrder::from_cart(&cart(&catalog), &customer(), "", now());
        let formatter = TicketFormatter::new(PAPER_WIDTH_WIDE, header())
            .with_offset(FixedOffset::west_opt(6 * 3600).unwrap());

        let text = formatter.customer_receipt(&order);
        assert!(text.contains("17/05/2024 14:15"));
    }

    #[test]
    fn test_wrap_long_text() {
        let lines = wrap("uno dos tres cuatro cinco seis", 10, "  ");
        assert_eq!(lines, vec!["uno dos", "  tres", "  cuatro", "  cinco", "  seis"]);

        let lines = wrap("abcdefghijklmno", 6, "");
        assert_eq!(lines, vec!["abcdef", "ghijkl", "mno"]);

        assert_eq!(wrap("", 10, ""), vec![String::new()]);
    }

    #[test]
    fn test_two_column_wraps_long_labels() {
        let mut out = TicketBuffer::new(20);
        out.two_column("2x Extra Grande Carnes Frias", "$420.00");
        let text = out.finish();
        let mut lines = text.lines();
        let first = lines.next().unwrap();
        assert!(first.ends_with("$420.00"));
        assert_eq!(first.chars().count(), 20);
        assert!(lines.next().unwrap().starts_with(INDENT));
        assert_fits(&text, 20);
    }
}
