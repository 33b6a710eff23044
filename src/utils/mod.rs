use std::time::Duration;

use rand::Rng;

/// Random per-file delay in `[0, max_ms)`; zero when `max_ms` is zero.
pub fn simulated_latency<R: Rng + ?Sized>(rng: &mut R, max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rng.random_range(0..max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_latency_is_bounded() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(simulated_latency(&mut rng, 100) < Duration::from_millis(100));
        }
    }

    #[test]
    fn test_zero_bound_means_no_sleep() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(simulated_latency(&mut rng, 0), Duration::ZERO);
    }
}
