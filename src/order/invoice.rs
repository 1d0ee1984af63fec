use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Status of a freshly issued invoice and of its order lines.
pub const PAYMENT_PENDING: &str = "Pending";

/// Due date offset from the issue date.
pub const INVOICE_DUE_DAYS: i64 = 7;

/// Produces `INV-<user>-<unix_ts>-<seq>` numbers. The sequence starts at a
/// random point so restarts within the same second do not repeat numbers.
pub struct InvoiceNumberGenerator {
    seq: AtomicU64,
}

impl InvoiceNumberGenerator {
    pub fn new() -> Self {
        Self::with_seed(rand::thread_rng().gen_range(0..1_000_000))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seq: AtomicU64::new(seed),
        }
    }

    pub fn next(&self, user_id: i64, now: DateTime<Utc>) -> String {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        format!("INV-{}-{}-{:04}", user_id, now.timestamp(), seq)
    }
}

impl Default for InvoiceNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_format() {
        let generator = InvoiceNumberGenerator::with_seed(7);
        let now = Utc.timestamp_opt(1_733_200_000, 0).unwrap();
        assert_eq!(generator.next(42, now), "INV-42-1733200000-0007");
        assert_eq!(generator.next(42, now), "INV-42-1733200000-0008");
    }

    #[test]
    fn test_unique_across_threads_in_same_second() {
        let generator = Arc::new(InvoiceNumberGenerator::new());
        let now = Utc::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let g = generator.clone();
                std::thread::spawn(move || (0..250).map(|_| g.next(1, now)).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for n in h.join().unwrap() {
                assert!(seen.insert(n), "duplicate invoice number");
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
