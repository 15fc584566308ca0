//! # Register Configuration
//!
//! Loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment variables (`PIZZERIA_*`)          ◄── highest          │
//! │  2. Config file                                                        │
//! │     --config <path>, or the platform config dir:                       │
//! │     ~/.config/pizzeria/pizzeria.toml (Linux)                           │
//! │     ~/Library/Application Support/com.pizzeria.register/ (macOS)       │
//! │  3. Defaults (this file)                          ◄── lowest           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! catalog_path = "/etc/pizzeria/menu.json"
//!
//! [store]
//! name = "Pizzeria La Esquina"
//! address_lines = ["Av. Juarez 120", "Centro"]
//! phone = "555 123 4567"
//! footer = "Gracias por su compra"
//! utc_offset_minutes = -360
//!
//! [database]
//! path = "/var/lib/pizzeria/pizzeria.db"
//! max_connections = 2
//! busy_timeout_ms = 5000
//!
//! [printer]
//! paper_width = 32
//! spool_path = "/dev/usb/lp0"
//! max_attempts = 3
//! retry_delay_ms = 500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use pizzeria_core::catalog::Catalog;
use pizzeria_core::ticket::{StoreHeader, PAPER_WIDTH_NARROW, PAPER_WIDTH_WIDE};
use pizzeria_db::DbConfig;

const CONFIG_FILE_NAME: &str = "pizzeria.toml";
const DATABASE_FILE_NAME: &str = "pizzeria.db";
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;
const MAX_DB_CONNECTIONS: u32 = 16;

// =============================================================================
// Sections
// =============================================================================

/// Business details printed on tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub name: String,
    pub address_lines: Vec<String>,
    pub phone: Option<String>,
    pub footer: String,
    /// Local offset used for day boundaries and ticket times.
    pub utc_offset_minutes: i32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "Pizzeria".to_string(),
            address_lines: Vec::new(),
            phone: None,
            footer: "Gracias por su compra".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

/// SQLite settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// `None` means the platform data directory.
    pub path: Option<PathBuf>,
    pub max_connections: u32,
    /// How long a write waits on a file locked by another register process.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: DbConfig::DEFAULT_MAX_CONNECTIONS,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseSettings {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Receipt printer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterSettings {
    /// Characters per line: 32 (58mm) or 48 (80mm).
    pub paper_width: usize,
    /// File or device tickets are appended to. Tickets go to stdout when unset.
    pub spool_path: Option<PathBuf>,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        PrinterSettings {
            paper_width: PAPER_WIDTH_NARROW,
            spool_path: None,
            max_attempts: 3,
            retry_delay_ms: 500,
        }
    }
}

impl PrinterSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

// =============================================================================
// Register Configuration
// =============================================================================

/// Complete register configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterConfig {
    /// Menu file (JSON). The built-in menu is used when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub printer: PrinterSettings,
}

impl RegisterConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` must exist; the platform default may be
    /// missing, in which case defaults are used.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses one TOML file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        info!(?path, "Loading register config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(AppError::config("store.name must not be empty"));
        }

        if self.store.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(AppError::config(format!(
                "store.utc_offset_minutes must be within ±{}, got {}",
                MAX_UTC_OFFSET_MINUTES, self.store.utc_offset_minutes
            )));
        }

        if self.printer.paper_width != PAPER_WIDTH_NARROW
            && self.printer.paper_width != PAPER_WIDTH_WIDE
        {
            return Err(AppError::config(format!(
                "printer.paper_width must be {} or {}, got {}",
                PAPER_WIDTH_NARROW, PAPER_WIDTH_WIDE, self.printer.paper_width
            )));
        }

        if self.database.max_connections == 0 || self.database.max_connections > MAX_DB_CONNECTIONS {
            return Err(AppError::config(format!(
                "database.max_connections must be between 1 and {}, got {}",
                MAX_DB_CONNECTIONS, self.database.max_connections
            )));
        }

        if self.printer.max_attempts == 0 {
            return Err(AppError::config(
                "printer.max_attempts must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Applies `PIZZERIA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("PIZZERIA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("PIZZERIA_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(width) = lookup("PIZZERIA_PAPER_WIDTH") {
            match width.parse::<usize>() {
                Ok(w) => self.printer.paper_width = w,
                Err(_) => warn!(width = %width, "Ignoring non-numeric paper width in environment"),
            }
        }

        if let Some(path) = lookup("PIZZERIA_SPOOL_PATH") {
            debug!(path = %path, "Overriding spool path from environment");
            self.printer.spool_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("PIZZERIA_CATALOG_PATH") {
            self.catalog_path = Some(PathBuf::from(path));
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "pizzeria", "register")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Resolves the database file path, creating the data directory when the
    /// platform default is used.
    pub fn database_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }

        let dirs = Self::project_dirs()
            .ok_or_else(|| AppError::config("Could not determine app data directory"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    /// Pool settings for `Database::new`.
    pub fn db_config(&self) -> AppResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?)
            .max_connections(self.database.max_connections)
            .busy_timeout(self.database.busy_timeout()))
    }

    /// Loads the menu from `catalog_path`, or the built-in menu.
    pub fn load_catalog(&self) -> AppResult<Catalog> {
        let catalog = match &self.catalog_path {
            Some(path) => {
                info!(?path, "Loading catalog from file");
                Catalog::from_json(&std::fs::read_to_string(path)?)?
            }
            None => Catalog::builtin()?,
        };
        Ok(catalog)
    }

    pub fn store_header(&self) -> StoreHeader {
        StoreHeader {
            name: self.store.name.clone(),
            address_lines: self.store.address_lines.clone(),
            phone: self.store.phone.clone(),
            footer: self.store.footer.clone(),
        }
    }

    /// Local offset of the store. Validation keeps it in range.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.store.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}
