//! In-memory ledger with TTL expiry.

use crate::error::OtpError;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

struct OtpEntry {
    code: String,
    expires_at: Instant,
}

/// In-memory one-time-password ledger.
///
/// One live entry per phone; issuing again overwrites. Verification
/// consumes the entry. A background task sweeps expired entries, and
/// reads re-check expiry themselves, so correctness never depends on
/// the sweep.
#[derive(Clone)]
pub struct OtpLedger {
    entries: Arc<RwLock<HashMap<String, OtpEntry>>>,
    ttl: Duration,
}

impl OtpLedger {
    /// Create a ledger whose codes stay valid for `ttl`.
    ///
    /// Spawns a background task to periodically sweep expired entries.
    pub fn new(ttl: Duration) -> Self {
        let ledger = Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        };

        let sweeper = ledger.clone();
        tokio::spawn(async move {
            sweeper.sweep_loop().await;
        });

        info!("OTP ledger initialized (ttl={:?})", ttl);
        ledger
    }

    /// Background task that periodically removes expired entries.
    async fn sweep_loop(&self) {
        let sweep_interval = Duration::from_secs(60);

        loop {
            tokio::time::sleep(sweep_interval).await;

            let now = Instant::now();
            let mut entries = self.entries.write().await;
            let before = entries.len();

            entries.retain(|_, entry| entry.expires_at >= now);

            let removed = before - entries.len();
            if removed > 0 {
                debug!("Swept {} expired codes", removed);
            }
        }
    }

    /// Issue a fresh code for a phone, replacing any pending one.
    #[instrument(skip(self))]
    pub async fn issue(&self, phone: &str) -> String {
        let code = generate_code();
        let mut entries = self.entries.write().await;
        entries.insert(
            phone.to_string(),
            OtpEntry {
                code: code.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        debug!("Code issued for {}", phone);
        code
    }

    /// Verify and consume the pending code for a phone.
    ///
    /// The entry is removed only on success; a mismatch leaves it
    /// pending until it expires or is overwritten.
    #[instrument(skip(self, code))]
    pub async fn verify(&self, phone: &str, code: &str) -> Result<(), OtpError> {
        let mut entries = self.entries.write().await;
        let entry = entries.get(phone).ok_or(OtpError::NotIssued)?;

        if entry.expires_at < Instant::now() {
            return Err(OtpError::Expired);
        }
        if entry.code != code {
            return Err(OtpError::Mismatch);
        }

        entries.remove(phone);
        debug!("Code verified for {}", phone);
        Ok(())
    }

    /// Number of entries currently pending, expired ones excluded.
    pub async fn pending(&self) -> usize {
        let entries = self.entries.read().await;
        let now = Instant::now();
        entries.values().filter(|e| e.expires_at >= now).count()
    }
}

/// Uniform random 6-digit code.
fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(20 * 60);

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..1000 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_issue_and_verify() {
        let ledger = OtpLedger::new(TTL);
        let code = ledger.issue("9999999999").await;
        assert!(ledger.verify("9999999999", &code).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_without_issue() {
        let ledger = OtpLedger::new(TTL);
        assert_eq!(
            ledger.verify("9999999999", "123456").await,
            Err(OtpError::NotIssued)
        );
    }

    #[tokio::test]
    async fn test_wrong_code_does_not_consume() {
        let ledger = OtpLedger::new(TTL);
        let code = ledger.issue("9999999999").await;

        assert_eq!(
            ledger.verify("9999999999", "000000").await,
            Err(OtpError::Mismatch)
        );
        // Entry survives a failed attempt
        assert!(ledger.verify("9999999999", &code).await.is_ok());
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let ledger = OtpLedger::new(TTL);
        let code = ledger.issue("9999999999").await;

        assert!(ledger.verify("9999999999", &code).await.is_ok());
        assert_eq!(
            ledger.verify("9999999999", &code).await,
            Err(OtpError::NotIssued)
        );
    }

    #[tokio::test]
    async fn test_reissue_overwrites() {
        let ledger = OtpLedger::new(TTL);
        let first = ledger.issue("9999999999").await;
        let second = ledger.issue("9999999999").await;

        if first != second {
            assert_eq!(
                ledger.verify("9999999999", &first).await,
                Err(OtpError::Mismatch)
            );
        }
        assert!(ledger.verify("9999999999", &second).await.is_ok());
        assert_eq!(ledger.pending().await, 0);
    }

    #[tokio::test]
    async fn test_expired_code_rejected() {
        let ledger = OtpLedger::new(Duration::ZERO);
        let code = ledger.issue("9999999999").await;

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(
            ledger.verify("9999999999", &code).await,
            Err(OtpError::Expired)
        );
    }

    #[tokio::test]
    async fn test_pending_excludes_expired() {
        let ledger = OtpLedger::new(Duration::ZERO);
        ledger.issue("9999999999").await;

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(ledger.pending().await, 0);
    }

    #[tokio::test]
    async fn test_entries_are_per_phone() {
        let ledger = OtpLedger::new(TTL);
        let a = ledger.issue("1111111111").await;
        let b = ledger.issue("2222222222").await;

        assert_eq!(ledger.pending().await, 2);
        assert!(ledger.verify("1111111111", &a).await.is_ok());
        assert!(ledger.verify("2222222222", &b).await.is_ok());
    }
}
