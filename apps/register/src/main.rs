//! # Pizzeria Register Entry Point
//!
//! Command line front end for the register.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pizzeria-register [--config FILE] <COMMAND>                            │
//! │                                                                         │
//! │  caja [--date D] [--json]     daily cash report                        │
//! │  reprint <ID> [--kitchen]     receipt or kitchen ticket again          │
//! │  void <ID>                    soft-delete + print void ticket          │
//! │  pay <ID> <METHOD> <AMOUNT>   record efectivo / transferencia          │
//! │  income <AMOUNT> <TEXT>       manual income                            │
//! │  expense <AMOUNT> <TEXT>      manual expense                           │
//! │  remove-transaction <ID>      delete a manual entry                    │
//! │  demo [--pay]                 check out a sample order                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr)
//! 2. Load configuration (file + `PIZZERIA_*` env)
//! 3. Open the register (catalog, database, formatter, printer)
//! 4. Run the command; tickets go to the configured printer

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use pizzeria_core::ticket::TicketOrder;
use pizzeria_core::{PaymentMethod, TransactionKind};
use pizzeria_register::commands::{self, demo, TicketKind};
use pizzeria_register::error::{AppError, AppResult};
use pizzeria_register::printer::print_and_wait;
use pizzeria_register::state::RegisterConfig;
use pizzeria_register::{init_tracing, Register};

#[derive(Debug, Parser)]
#[command(name = "pizzeria-register", about = "Pizzeria POS register", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the cash report for a day
    Caja {
        /// Day to report (YYYY-MM-DD, store local time); today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Write the statistics as JSON instead of printing a ticket
        #[arg(long)]
        json: bool,
    },

    /// Print a stored order again
    Reprint {
        order_id: i64,

        /// Kitchen ticket instead of the customer receipt
        #[arg(long)]
        kitchen: bool,
    },

    /// Void an order and print the cancellation ticket
    Void { order_id: i64 },

    /// Record a payment against an order
    Pay {
        order_id: i64,

        /// efectivo | transferencia
        method: PaymentMethod,

        /// Amount, e.g. 150 or 89.50
        amount: String,

        /// Transfer reference
        #[arg(long)]
        reference: Option<String>,
    },

    /// Record money put into the drawer
    Income {
        amount: String,
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// Record money taken out of the drawer
    Expense {
        amount: String,
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },

    /// Delete a manual income/expense entry
    RemoveTransaction { id: i64 },

    /// Check out a sample order and print its tickets
    Demo {
        /// Also record the full amount as paid in cash
        #[arg(long)]
        pay: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = RegisterConfig::load(cli.config)?;
    let mut register = Register::open(config).await?;
    info!(store = %register.config.store.name, "Register ready");

    let result = dispatch(&mut register, cli.command).await;
    register.db.close().await;
    result
}

async fn dispatch(register: &mut Register, command: Command) -> AppResult<()> {
    let now = Utc::now();

    match command {
        Command::Caja { date, json } => {
            let offset = register.config.utc_offset();
            let day = date.unwrap_or_else(|| commands::local_today(now, offset));
            let start = commands::day_start_ms(day, offset)?;
            let summary = commands::daily_summary(&register.db, start).await?;

            if json {
                let text = serde_json::to_string_pretty(&summary)
                    .map_err(|e| AppError::internal(e.to_string()))?;
                println!("{}", text);
                Ok(())
            } else {
                let label = day.format("%d/%m/%Y").to_string();
                let text = register.formatter.cash_report(&summary, &label);
                print_ticket(register, text).await
            }
        }

        Command::Reprint { order_id, kitchen } => {
            let kind = if kitchen {
                TicketKind::Kitchen
            } else {
                TicketKind::Receipt
            };
            let text = commands::reprint(
                &register.db,
                &register.formatter,
                register.session.catalog(),
                order_id,
                kind,
            )
            .await?;
            print_ticket(register, text).await
        }

        Command::Void { order_id } => {
            let text =
                commands::void_order(&register.db, &register.formatter, order_id, now).await?;
            print_ticket(register, text).await
        }

        Command::Pay {
            order_id,
            method,
            amount,
            reference,
        } => {
            let paid =
                commands::record_payment(&register.db, order_id, method, &amount, reference)
                    .await?;
            println!(
                "Pedido #{}: pagado {}, pendiente {}",
                paid.order_id, paid.amount_paid, paid.balance_due
            );
            Ok(())
        }

        Command::Income {
            amount,
            description,
        } => record_movement(register, TransactionKind::Ingreso, &amount, &description).await,

        Command::Expense {
            amount,
            description,
        } => record_movement(register, TransactionKind::Gasto, &amount, &description).await,

        Command::RemoveTransaction { id } => {
            commands::delete_transaction(&register.db, id).await?;
            println!("Movimiento {} eliminado", id);
            Ok(())
        }

        Command::Demo { pay } => {
            let customer = demo::fill_demo_cart(&mut register.session)?;
            let address = customer.address.clone().unwrap_or_default();
            let stored =
                commands::checkout(&register.db, &mut register.session, &customer, &address, now)
                    .await?;

            let view = TicketOrder::from_persisted(&stored);
            let kitchen = register
                .formatter
                .kitchen_ticket(&view, register.session.catalog());
            print_ticket(register, kitchen).await?;

            if pay {
                let amount = stored.order.amount_charged().to_string();
                commands::record_payment(
                    &register.db,
                    stored.id,
                    PaymentMethod::Efectivo,
                    &amount,
                    None,
                )
                .await?;
            }

            let receipt = commands::reprint(
                &register.db,
                &register.formatter,
                register.session.catalog(),
                stored.id,
                TicketKind::Receipt,
            )
            .await?;
            print_ticket(register, receipt).await
        }
    }
}

async fn record_movement(
    register: &Register,
    kind: TransactionKind,
    amount: &str,
    description: &[String],
) -> AppResult<()> {
    let stored = commands::add_transaction(
        &register.db,
        kind,
        amount,
        &description.join(" "),
        Utc::now(),
    )
    .await?;
    println!("Movimiento {} registrado: {}", stored.id, stored.amount);
    Ok(())
}

async fn print_ticket(register: &Register, text: String) -> AppResult<()> {
    let outcome = print_and_wait(register.printer.as_ref(), text).await;
    if outcome.success {
        info!(message = %outcome.message, "Ticket printed");
        Ok(())
    } else {
        Err(AppError::printer(outcome.message))
    }
}
