//! # Pizzeria Register Library
//!
//! The register application: wires configuration, storage, the order session
//! and the receipt printer together around the pure `pizzeria-core` logic.
//!
//! ## Module Organization
//! ```text
//! pizzeria_register/
//! ├── lib.rs          ◄─── You are here (startup & tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── RegisterConfig (TOML + env)
//! │   └── session.rs  ◄─── OrderSession (Catalog + Cart)
//! ├── commands/
//! │   ├── order.rs    ◄─── checkout, payments, void, reprint
//! │   ├── caja.rs     ◄─── daily summary, income/expense entries
//! │   └── demo.rs     ◄─── sample order
//! ├── printer.rs      ◄─── SpoolPrinter, ConsolePrinter
//! └── error.rs        ◄─── AppError for commands
//! ```

pub mod commands;
pub mod error;
pub mod printer;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use error::AppResult;
use pizzeria_core::printer::TicketPrinter;
use pizzeria_core::ticket::TicketFormatter;
use pizzeria_db::Database;
use state::{OrderSession, RegisterConfig};

/// Everything a register command may need, built once at startup.
pub struct Register {
    pub config: RegisterConfig,
    pub db: Database,
    pub session: OrderSession,
    pub formatter: TicketFormatter,
    pub printer: Box<dyn TicketPrinter>,
}

impl Register {
    /// Opens the register.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  1. Load catalog ─────────► config.catalog_path or built-in menu       │
    /// │  2. Connect to database ──► SQLite (WAL), pending migrations applied   │
    /// │  3. Build formatter ──────► paper width, store header, local offset    │
    /// │  4. Build printer ────────► spool file/device, or console              │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// Must run inside a tokio runtime.
    pub async fn open(config: RegisterConfig) -> AppResult<Self> {
        let catalog = config.load_catalog()?;
        info!(pizzas = catalog.list_pizzas().len(), "Catalog loaded");

        let db_config = config.db_config()?;
        info!(path = ?db_config.database_path, "Database path determined");
        let db = Database::new(db_config).await?;

        Self::with_database(config, db, OrderSession::new(catalog))
    }

    /// Builds a register around an already open database.
    pub fn with_database(
        config: RegisterConfig,
        db: Database,
        session: OrderSession,
    ) -> AppResult<Self> {
        let formatter = TicketFormatter::new(config.printer.paper_width, config.store_header())
            .with_offset(config.utc_offset());
        let printer = printer::from_settings(&config.printer)?;
        info!(
            paper_width = formatter.width(),
            spool = ?config.printer.spool_path,
            "Ticket printer ready"
        );

        Ok(Register {
            config,
            db,
            session,
            formatter,
            printer,
        })
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pizzeria=trace` - Show trace for pizzeria crates only
/// - Default: `info,pizzeria=debug,sqlx=warn`
///
/// Logs go to stderr so tickets printed to the console stay clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pizzeria=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_core::catalog::Catalog;
    use pizzeria_db::DbConfig;

    #[tokio::test]
    async fn test_register_with_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = OrderSession::new(Catalog::builtin().unwrap());

        let register = Register::with_database(RegisterConfig::default(), db, session).unwrap();

        assert_eq!(register.formatter.width(), 32);
        assert!(register.db.health_check().await);
        assert!(register.session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_open_with_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RegisterConfig::default();
        config.database.path = Some(dir.path().join("pizzeria.db"));
        config.database.max_connections = 3;
        config.printer.spool_path = Some(dir.path().join("spool.txt"));

        let register = Register::open(config).await.unwrap();
        assert!(register.db.health_check().await);
        assert_eq!(register.db.pool().options().get_max_connections(), 3);
        assert!(dir.path().join("pizzeria.db").exists());
    }
}
