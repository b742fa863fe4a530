//! Transient one-time-password ledger.
//!
//! Maps a phone number to its pending verification code with TTL
//! expiry. Process-local only; pending codes are lost on restart and
//! are not shared across instances.

mod error;
mod ledger;

pub use error::OtpError;
pub use ledger::OtpLedger;
