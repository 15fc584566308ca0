//! # Printer Transports
//!
//! Concrete [`TicketPrinter`] implementations for the register.
//!
//! ## Print Job Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SpoolPrinter::print                               │
//! │                                                                         │
//! │  caller ── print(text, callback) ──► returns immediately               │
//! │                     │                                                   │
//! │                     ▼  (spawned on the tokio runtime)                   │
//! │            ┌─────────────────┐   ok    ┌───────────────────────────┐   │
//! │            │ append to spool │ ──────► │ callback(printed)         │   │
//! │            └────────┬────────┘         └───────────────────────────┘   │
//! │                     │ io error                                          │
//! │                     ▼                                                   │
//! │            attempt < max_attempts? ── yes ── sleep(delay) ── retry     │
//! │                     │ no                                                │
//! │                     ▼                                                   │
//! │            callback(failed, last error)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The spool target can be a plain file or a character device such as
//! `/dev/usb/lp0`; both accept appended bytes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::state::PrinterSettings;
use pizzeria_core::printer::{PrintCallback, PrintOutcome, TicketPrinter};

/// Blank lines fed after every ticket so it clears the cutter.
const TICKET_FEED: &[u8] = b"\n\n\n";

// =============================================================================
// Spool Printer
// =============================================================================

/// Appends tickets to a spool file or device, retrying a bounded number of
/// times with a fixed delay.
#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    path: PathBuf,
    max_attempts: u32,
    retry_delay: Duration,
    runtime: Handle,
}

impl SpoolPrinter {
    /// Must be called from inside a tokio runtime; print jobs run there.
    pub fn new(path: impl Into<PathBuf>, max_attempts: u32, retry_delay: Duration) -> AppResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|_| AppError::printer("Spool printer needs a running tokio runtime"))?;

        Ok(SpoolPrinter {
            path: path.into(),
            max_attempts: max_attempts.max(1),
            retry_delay,
            runtime,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn append_ticket(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(text.as_bytes()).await?;
    file.write_all(TICKET_FEED).await?;
    file.flush().await
}

impl TicketPrinter for SpoolPrinter {
    fn print(&self, text: String, callback: PrintCallback) {
        let path = self.path.clone();
        let max_attempts = self.max_attempts;
        let mut backoff = Constant::new(self.retry_delay);

        self.runtime.spawn(async move {
            let mut last_error = String::new();

            for attempt in 1..=max_attempts {
                match append_ticket(&path, &text).await {
                    Ok(()) => {
                        info!(path = %path.display(), attempt, "Ticket printed");
                        callback(PrintOutcome::printed(format!(
                            "Printed to {}",
                            path.display()
                        )));
                        return;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), attempt, error = %e, "Print attempt failed");
                        last_error = e.to_string();
                    }
                }

                if attempt < max_attempts {
                    if let Some(delay) = backoff.next_backoff() {
                        debug!(?delay, "Waiting before next print attempt");
                        tokio::time::sleep(delay).await;
                    }
                }
            }

            callback(PrintOutcome::failed(format!(
                "Printer unavailable after {} attempts: {}",
                max_attempts, last_error
            )));
        });
    }
}

// =============================================================================
// Console Printer
// =============================================================================

/// Writes tickets to stdout. Used when no spool path is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrinter;

impl TicketPrinter for ConsolePrinter {
    fn print(&self, text: String, callback: PrintCallback) {
        println!("{}", text);
        callback(PrintOutcome::printed("Printed to console"));
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Builds the printer described by the settings.
pub fn from_settings(settings: &PrinterSettings) -> AppResult<Box<dyn TicketPrinter>> {
    match &settings.spool_path {
        Some(path) => Ok(Box::new(SpoolPrinter::new(
            path.clone(),
            settings.max_attempts,
            settings.retry_delay(),
        )?)),
        None => Ok(Box::new(ConsolePrinter)),
    }
}

/// Sends a ticket and waits for its callback.
pub async fn print_and_wait(printer: &dyn TicketPrinter, text: String) -> PrintOutcome {
    let (tx, rx) = oneshot::channel();
    printer.print(
        text,
        Box::new(move |outcome| {
            let _ = tx.send(outcome);
        }),
    );

    rx.await
        .unwrap_or_else(|_| PrintOutcome::failed("Print job dropped before completion"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spool_printer_appends_tickets() {
        let dir = tempfile::tempdir().unwrap();
        let spool = dir.path().join("spool.txt");
        let printer = SpoolPrinter::new(&spool, 3, Duration::from_millis(1)).unwrap();

        let first = print_and_wait(&printer, "TICKET 1".to_string()).await;
        let second = print_and_wait(&printer, "TICKET 2".to_string()).await;

        assert!(first.success);
        assert!(second.success);
        let contents = std::fs::read_to_string(&spool).unwrap();
        assert!(contents.starts_with("TICKET 1"));
        assert!(contents.contains("TICKET 2"));
    }

    #[tokio::test]
    async fn test_spool_printer_reports_failure_after_retries() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so every attempt fails.
        let spool = dir.path().join("missing").join("spool.txt");
        let printer = SpoolPrinter::new(&spool, 2, Duration::from_millis(1)).unwrap();

        let outcome = print_and_wait(&printer, "TICKET".to_string()).await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("after 2 attempts"));
    }

    #[test]
    fn test_spool_printer_requires_runtime() {
        let err = SpoolPrinter::new("/tmp/spool.txt", 3, Duration::from_millis(1)).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PrinterError);
    }

    #[tokio::test]
    async fn test_console_printer_succeeds() {
        let outcome = print_and_wait(&ConsolePrinter, "hola".to_string()).await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_from_settings_picks_console_without_spool() {
        let printer = from_settings(&PrinterSettings::default()).unwrap();
        let outcome = print_and_wait(printer.as_ref(), "demo".to_string()).await;
        assert_eq!(outcome.message, "Printed to console");
    }
}
