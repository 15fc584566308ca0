//! # Printer Capability
//!
//! The only thing the register needs from a receipt printer: hand it text and
//! be told later whether it came out. Transport, connection state and retry
//! policy belong to the implementation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TicketFormatter ──► String ──► TicketPrinter::print(text, callback)    │
//! │                                          │                              │
//! │                                          └──► callback(PrintOutcome)    │
//! │                                               { success, message }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Result of one print job, delivered through the callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintOutcome {
    pub success: bool,
    /// Human-readable status for the operator.
    pub message: String,
}

impl PrintOutcome {
    pub fn printed(message: impl Into<String>) -> Self {
        PrintOutcome {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        PrintOutcome {
            success: false,
            message: message.into(),
        }
    }
}

/// Completion callback for a print job. Called exactly once.
pub type PrintCallback = Box<dyn FnOnce(PrintOutcome) + Send + 'static>;

/// A receipt printer session.
///
/// `print` returns immediately; the outcome arrives through `callback`.
/// Implementations are passed around by reference, never reached through a
/// global.
pub trait TicketPrinter: Send + Sync {
    fn print(&self, text: String, callback: PrintCallback);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Collects everything it is asked to print.
    #[derive(Default)]
    struct Recorder {
        printed: Mutex<Vec<String>>,
    }

    impl TicketPrinter for Recorder {
        fn print(&self, text: String, callback: PrintCallback) {
            if let Ok(mut printed) = self.printed.lock() {
                printed.push(text);
            }
            callback(PrintOutcome::printed("ok"));
        }
    }

    #[test]
    fn test_callback_receives_outcome() {
        let printer = Recorder::default();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);

        printer.print(
            "hola".to_string(),
            Box::new(move |outcome| {
                *sink.lock().unwrap() = Some(outcome);
            }),
        );

        assert_eq!(*seen.lock().unwrap(), Some(PrintOutcome::printed("ok")));
        assert_eq!(printer.printed.lock().unwrap().as_slice(), ["hola"]);
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = PrintOutcome::failed("printer offline");
        assert!(!outcome.success);
        assert_eq!(outcome.message, "printer offline");
    }
}
