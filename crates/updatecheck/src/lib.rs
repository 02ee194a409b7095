//! Background update notifications for command-line programs.
//!
//! A host creates one [`UpdateNotifier`], calls [`UpdateNotifier::check`]
//! at startup and [`UpdateNotifier::print`] before exiting:
//! - The check runs on the tokio runtime and never delays the host.
//! - At most one network call is made per application per day; the last
//!   check day is kept in a small ledger file under the user config dir.
//! - Failures are logged at debug level and otherwise ignored.

mod application;
mod client;
mod ledger;
mod notifier;
mod options;

/// Host program identifier.
pub use application::Application;
/// Wire types and the single-shot request to the update checker API.
pub use client::{
    CheckError, CheckRequest, CheckResponse, DEVELOPMENT_ENDPOINT, PRODUCTION_ENDPOINT,
    UNKNOWN_CALLER, check_for_update, endpoint_for, user_agent,
};
/// Per-application record of the last check day.
pub use ledger::{Ledger, LedgerError, LedgerRecord};
/// Background check coordinator.
pub use notifier::{CheckOutcome, UpdateNotifier};
/// Per-call overrides (HTTP client, endpoint, caller name, kill switch).
pub use options::CheckOptions;
