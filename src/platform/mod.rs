//! Platform abstraction layer
//!
//! Handles browser/native differences for wall-clock time. The clock seeds
//! new rounds on the web and times headless runs; the simulation itself
//! never reads it.

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// A seed for a new run, taken from the page clock
#[cfg(target_arch = "wasm32")]
pub fn fresh_seed() -> u64 {
    now_ms() as u64
}

/// A seed for a new run, taken from the thread-local OS-seeded RNG
#[cfg(not(target_arch = "wasm32"))]
pub fn fresh_seed() -> u64 {
    rand::random()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_past_2020() {
        assert!(now_ms() > 1_577_836_800_000.0);
    }

    #[test]
    fn test_seeds_differ() {
        let seeds: Vec<u64> = (0..4).map(|_| fresh_seed()).collect();
        assert!(seeds.windows(2).any(|w| w[0] != w[1]));
    }
}
