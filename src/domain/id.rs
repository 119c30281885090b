//! Record id generation.
//!
//! Ids look like `expenditure-1729335600123`. The millisecond part is kept
//! strictly increasing per generator so records created in the same
//! millisecond still get distinct ids.

use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, kind: &str) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let prev = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(if now > last { now } else { last + 1 })
            })
            .unwrap_or(now);
        let stamp = if now > prev { now } else { prev + 1 };
        format!("{}-{}", kind, stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_has_kind_prefix() {
        let ids = IdGenerator::new();
        let id = ids.next("org");
        let (kind, millis) = id.split_once('-').unwrap();
        assert_eq!(kind, "org");
        assert!(millis.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn test_ids_unique_in_tight_loop() {
        let ids = IdGenerator::new();
        let seen: HashSet<String> = (0..1000).map(|_| ids.next("exp")).collect();
        assert_eq!(seen.len(), 1000);
    }
}
