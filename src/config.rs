//! Run configuration for the reconciliation engine

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::{ReconcileError, ReconcileResult};

/// Tunable constants for a reconciliation run.
///
/// Passed explicitly into the engine entry point; the engine holds no
/// module-level state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Annual membership fee every obligated payer owes
    pub annual_fee: BigDecimal,
    /// Hourly rate charged for facility bookings
    pub hourly_rate: BigDecimal,
    /// Inclusive similarity cutoff for the fuzzy name pass, in [0, 1]
    pub fuzzy_cutoff: f64,
}

impl ReconciliationConfig {
    /// Create a configuration with explicit constants
    pub fn new(annual_fee: BigDecimal, hourly_rate: BigDecimal, fuzzy_cutoff: f64) -> Self {
        Self {
            annual_fee,
            hourly_rate,
            fuzzy_cutoff,
        }
    }

    /// Validate that the constants are usable
    pub fn validate(&self) -> ReconcileResult<()> {
        if self.annual_fee < BigDecimal::from(0) {
            return Err(ReconcileError::InvalidConfig(format!(
                "annual fee must not be negative, got {}",
                self.annual_fee
            )));
        }

        if self.hourly_rate < BigDecimal::from(0) {
            return Err(ReconcileError::InvalidConfig(format!(
                "hourly rate must not be negative, got {}",
                self.hourly_rate
            )));
        }

        if !(0.0..=1.0).contains(&self.fuzzy_cutoff) {
            return Err(ReconcileError::InvalidConfig(format!(
                "fuzzy cutoff must be within [0, 1], got {}",
                self.fuzzy_cutoff
            )));
        }

        Ok(())
    }
}

impl Default for ReconciliationConfig {
    /// Production defaults: fee 120, hourly rate 5, cutoff 0.86
    fn default() -> Self {
        Self {
            annual_fee: BigDecimal::from(120),
            hourly_rate: BigDecimal::from(5),
            fuzzy_cutoff: 0.86,
        }
    }
}
