/// Tunables for the simulated download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Number of simulated files per run.
    pub total_units: u32,
    /// Upper bound (exclusive) of the per-file sleep.
    pub max_latency_ms: u64,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            total_units: 200,
            max_latency_ms: 100,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form() {
        let config = DemoConfig::default();
        assert_eq!(config.total_units, 200);
        assert_eq!(config.max_latency_ms, 100);
        assert_eq!(config.seed, None);
    }
}
