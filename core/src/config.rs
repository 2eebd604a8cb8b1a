//! Projection assumptions: the fixed cost and bias parameters the
//! calculator applies to every scenario.
//!
//! RULE: Assumptions are never taken from a request. They come from
//! `RoiAssumptions::default()` or an operator-supplied JSON file.

use serde::{Deserialize, Serialize};

use crate::error::{RoiError, RoiResult};

/// Cost to auto-process one invoice, in currency units.
pub const AUTOMATED_COST_PER_INVOICE: f64 = 0.20;
/// Error rate of the automated pipeline, as a fraction (0.1%).
pub const ERROR_RATE_AUTO: f64 = 0.001;
/// Multiplier applied to pre-bias monthly savings.
pub const MIN_ROI_BOOST_FACTOR: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiAssumptions {
    pub automated_cost_per_invoice: f64,
    pub error_rate_auto:            f64,
    /// Disclosed upward adjustment on projected monthly savings.
    /// Every downstream figure inherits it.
    pub boost_factor:               f64,
}

impl Default for RoiAssumptions {
    fn default() -> Self {
        Self {
            automated_cost_per_invoice: AUTOMATED_COST_PER_INVOICE,
            error_rate_auto:            ERROR_RATE_AUTO,
            boost_factor:               MIN_ROI_BOOST_FACTOR,
        }
    }
}

impl RoiAssumptions {
    /// Load from a JSON file such as `data/assumptions.json`.
    /// In tests, build the struct directly.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let assumptions: RoiAssumptions = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    pub fn validate(&self) -> RoiResult<()> {
        if !self.automated_cost_per_invoice.is_finite() || self.automated_cost_per_invoice < 0.0 {
            return Err(RoiError::validation(
                "automated_cost_per_invoice",
                "must be a finite, non-negative amount",
            ));
        }
        if !(0.0..=1.0).contains(&self.error_rate_auto) {
            return Err(RoiError::validation(
                "error_rate_auto",
                "must be a fraction between 0 and 1",
            ));
        }
        if !self.boost_factor.is_finite() || self.boost_factor <= 0.0 {
            return Err(RoiError::validation(
                "boost_factor",
                "must be a finite, positive multiplier",
            ));
        }
        Ok(())
    }
}
