//! Replication settings
//!
//! Built once at startup and handed to the [`Replicator`](crate::Replicator);
//! every cycle reads the same values.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

/// Minimum plan notional as a fraction of destination capital
pub const DEFAULT_THRESHOLD: Decimal = dec!(0.004);

/// Fraction of destination capital kept out of the allocation
pub const DEFAULT_RESERVE: Decimal = dec!(0.01);

/// Settings read by every sync cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    simulation: bool,
    threshold: Decimal,
    reserve: Decimal,
}

impl SyncConfig {
    pub fn new(simulation: bool, threshold: Decimal, reserve: Decimal) -> ConfigResult<Self> {
        Self::default()
            .with_simulation(simulation)
            .with_threshold(threshold)?
            .with_reserve(reserve)
    }

    /// Plan and report orders without submitting them
    pub fn with_simulation(mut self, simulation: bool) -> Self {
        self.simulation = simulation;
        self
    }

    pub fn with_threshold(mut self, threshold: Decimal) -> ConfigResult<Self> {
        if !is_fraction(threshold) {
            return Err(ConfigError::ThresholdOutOfRange(threshold));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn with_reserve(mut self, reserve: Decimal) -> ConfigResult<Self> {
        if !is_fraction(reserve) {
            return Err(ConfigError::ReserveOutOfRange(reserve));
        }
        self.reserve = reserve;
        Ok(self)
    }

    pub fn with_threshold_f64(self, threshold: f64) -> ConfigResult<Self> {
        let threshold = fraction_from_f64("threshold", threshold)?;
        self.with_threshold(threshold)
    }

    pub fn with_reserve_f64(self, reserve: f64) -> ConfigResult<Self> {
        let reserve = fraction_from_f64("reserve", reserve)?;
        self.with_reserve(reserve)
    }

    pub fn simulation(&self) -> bool {
        self.simulation
    }

    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    pub fn reserve(&self) -> Decimal {
        self.reserve
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            simulation: false,
            threshold: DEFAULT_THRESHOLD,
            reserve: DEFAULT_RESERVE,
        }
    }
}

fn is_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

/// Convert a float through its shortest decimal rendering (`0.004` stays `0.004`)
pub fn fraction_from_f64(name: &'static str, value: f64) -> ConfigResult<Decimal> {
    let invalid = || ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    };
    if !value.is_finite() {
        return Err(invalid());
    }
    Decimal::from_str(&value.to_string()).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert!(!config.simulation());
        assert_eq!(config.threshold(), dec!(0.004));
        assert_eq!(config.reserve(), dec!(0.01));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(SyncConfig::new(false, dec!(0), dec!(1)).is_ok());
        assert!(SyncConfig::new(true, dec!(1), dec!(0)).is_ok());
    }

    #[test]
    fn test_out_of_range_is_rejected_not_clamped() {
        assert_eq!(
            SyncConfig::new(false, dec!(1.5), dec!(0.01)),
            Err(ConfigError::ThresholdOutOfRange(dec!(1.5)))
        );
        assert_eq!(
            SyncConfig::default().with_reserve(dec!(-0.1)),
            Err(ConfigError::ReserveOutOfRange(dec!(-0.1)))
        );
    }

    #[test]
    fn test_float_inputs_are_exact() {
        let config = SyncConfig::default()
            .with_threshold_f64(0.001)
            .unwrap()
            .with_reserve_f64(0.005)
            .unwrap();
        assert_eq!(config.threshold(), dec!(0.001));
        assert_eq!(config.reserve(), dec!(0.005));
    }

    #[test]
    fn test_non_finite_float_is_invalid() {
        assert!(matches!(
            SyncConfig::default().with_threshold_f64(f64::NAN),
            Err(ConfigError::InvalidValue { name: "threshold", .. })
        ));
        assert!(matches!(
            fraction_from_f64("reserve", f64::INFINITY),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
