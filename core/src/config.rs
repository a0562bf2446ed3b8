//! Benchmark configuration

/// What the "Data speed" report line carries
///
/// The line has always printed the elapsed milliseconds again rather than a
/// rate. That stays the default so existing capture scripts keep parsing;
/// `BytesPerSecond` has to be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RateReport {
    /// Repeat the elapsed time in milliseconds
    #[default]
    ElapsedMillis,
    /// Integer bytes per second over the whole block
    BytesPerSecond,
}

impl RateReport {
    /// Value printed on the rate line for `bytes` received in `elapsed_ms`
    pub fn value(self, bytes: usize, elapsed_ms: u64) -> u64 {
        match self {
            Self::ElapsedMillis => elapsed_ms,
            // A block faster than one tick counts as one millisecond
            Self::BytesPerSecond => (bytes as u64).saturating_mul(1000) / elapsed_ms.max(1),
        }
    }
}

/// Benchmark parameters
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BenchConfig {
    /// Link speed in bits per second (8N1 framing)
    pub baud_rate: u32,
    /// Content of the "Data speed" line
    pub rate_report: RateReport,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            baud_rate: 2400,
            rate_report: RateReport::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.baud_rate, 2400);
        assert_eq!(config.rate_report, RateReport::ElapsedMillis);
    }

    #[test]
    fn test_elapsed_rate_repeats_elapsed() {
        assert_eq!(RateReport::ElapsedMillis.value(1000, 4_170), 4_170);
    }

    #[test]
    fn test_bytes_per_second() {
        assert_eq!(RateReport::BytesPerSecond.value(1000, 4_000), 250);
        assert_eq!(RateReport::BytesPerSecond.value(1000, 0), 1_000_000);
    }
}
