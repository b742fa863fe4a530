//! Ledger errors.

use thiserror::Error;

/// Why a verification attempt was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    #[error("no code issued for this phone")]
    NotIssued,

    #[error("code mismatch")]
    Mismatch,

    #[error("code expired")]
    Expired,
}
