// src/transport/backoff.rs

//! Reconnect delay with jitter.

use std::time::Duration;

use rand::Rng;

/// Random delay between 1 and `max_secs` seconds (inclusive).
pub fn reconnect_delay(max_secs: u64) -> Duration {
    let upper = max_secs.max(1);
    Duration::from_secs(rand::thread_rng().gen_range(1..=upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconnect_delay_bounds() {
        for _ in 0..100 {
            let d = reconnect_delay(5);
            assert!(d >= Duration::from_secs(1));
            assert!(d <= Duration::from_secs(5));
        }
        assert_eq!(reconnect_delay(0), Duration::from_secs(1));
    }
}
