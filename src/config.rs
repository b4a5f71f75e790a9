//! Soft heap configuration
//!
//! The only tunable is the error rate `epsilon`. It fixes the corruption
//! threshold `T = ceil(log2(3 / epsilon))`: `defill` may double-fill (and so
//! corrupt) only vertices whose rank exceeds `T`. At any time at most
//! `epsilon * n` items are corrupted, where `n` counts every insertion into the
//! heap and into heaps melded into it.
//!
//! | epsilon | threshold |
//! |---------|-----------|
//! | 1.0     | 2         |
//! | 0.5     | 3         |
//! | 0.25    | 4         |
//! | 0.1     | 5         |
//! | 3/1024  | 10        |

use crate::traits::ConfigError;

/// Error rate used by [`SoftHeapConfig::default`].
pub const DEFAULT_EPSILON: f64 = 0.25;

/// Per-heap configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftHeapConfig {
    epsilon: f64,
    threshold: u32,
}

impl SoftHeapConfig {
    /// Validates `epsilon` and derives the corruption threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EpsilonOutOfRange`] unless `0 < epsilon <= 1`.
    /// NaN is rejected as well.
    pub fn new(epsilon: f64) -> Result<Self, ConfigError> {
        if !(epsilon > 0.0 && epsilon <= 1.0) {
            return Err(ConfigError::EpsilonOutOfRange(epsilon));
        }
        let threshold = (3.0 / epsilon).log2().ceil() as u32;
        Ok(Self { epsilon, threshold })
    }

    /// The configured error rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// `ceil(log2(3 / epsilon))`
    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for SoftHeapConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            threshold: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_values() {
        let cases = [
            (1.0, 2),
            (0.5, 3),
            (0.25, 4),
            (0.1, 5),
            (3.0 / 1024.0, 10),
        ];
        for (epsilon, expected) in cases {
            let config = SoftHeapConfig::new(epsilon).unwrap();
            assert_eq!(config.threshold(), expected, "epsilon = {}", epsilon);
            assert_eq!(config.epsilon(), epsilon);
        }
    }

    #[test]
    fn test_default_matches_constructor() {
        assert_eq!(
            SoftHeapConfig::default(),
            SoftHeapConfig::new(DEFAULT_EPSILON).unwrap()
        );
    }

    #[test]
    fn test_rejects_out_of_range() {
        for epsilon in [0.0, -0.5, 1.0001, 2.0, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                SoftHeapConfig::new(epsilon),
                Err(ConfigError::EpsilonOutOfRange(epsilon))
            );
        }
    }

    #[test]
    fn test_rejects_nan() {
        assert!(matches!(
            SoftHeapConfig::new(f64::NAN),
            Err(ConfigError::EpsilonOutOfRange(e)) if e.is_nan()
        ));
    }

    #[test]
    fn test_error_display() {
        let err = SoftHeapConfig::new(1.5).unwrap_err();
        assert_eq!(err.to_string(), "epsilon must lie in (0, 1], got 1.5");
    }
}
