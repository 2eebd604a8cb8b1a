//! ROI calculator. Maps a validated `SimulationInput` to a
//! `SimulationResult` using a fixed `RoiAssumptions` value.
//!
//! ORDER OF OPERATIONS (fixed):
//!   1. Manual labor cost      volume * hours/invoice * wage
//!   2. Automation cost        volume * cost/invoice
//!   3. Error savings          (manual rate - auto rate) * volume * error cost
//!   4. Pre-bias savings       labor + error savings - automation cost
//!   5. Monthly savings        pre-bias * boost factor
//!   6. Cumulative / net       monthly * horizon, minus implementation cost
//!   7. Payback / ROI          guarded by cost > 0 AND savings > 0
//!   8. Rounding               currency 2dp, months and percent 1dp
//!
//! Pure and stateless: safe to share across threads without coordination.

use serde::{Deserialize, Serialize};

use crate::{
    config::RoiAssumptions,
    error::{RoiError, RoiResult},
    scenario::{SimulationInput, SimulationResult},
};

/// Which payback branch a projection fell into.
///
/// `CostFree` and `NonPositiveSavings` both report zero payback and
/// unbounded ROI in `SimulationResult`; the tag keeps them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaybackOutcome {
    Standard,
    CostFree,
    NonPositiveSavings,
}

/// Unrounded projection figures plus the payback branch taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub labor_cost_manual:        f64,
    pub auto_cost:                f64,
    pub error_savings:            f64,
    pub monthly_savings_pre_bias: f64,
    pub monthly_savings:          f64,
    pub cumulative_savings:       f64,
    pub net_savings:              f64,
    pub payback_months:           f64,
    pub roi_percentage:           f64,
    pub outcome:                  PaybackOutcome,
}

impl Projection {
    /// False when extreme inputs pushed a figure past the range of `f64`.
    /// Unbounded ROI is only expected outside the `Standard` branch.
    pub fn is_finite(&self) -> bool {
        let money = [
            self.monthly_savings,
            self.cumulative_savings,
            self.net_savings,
            self.payback_months,
        ];
        money.iter().all(|v| v.is_finite())
            && (self.outcome != PaybackOutcome::Standard || self.roi_percentage.is_finite())
    }

    /// Apply the published rounding: half away from zero,
    /// two decimals for currency, one for months and percentages.
    pub fn rounded(&self) -> SimulationResult {
        SimulationResult {
            monthly_savings:    round_to(self.monthly_savings, 2),
            cumulative_savings: round_to(self.cumulative_savings, 2),
            net_savings:        round_to(self.net_savings, 2),
            payback_months:     round_to(self.payback_months, 1),
            roi_percentage:     round_to(self.roi_percentage, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoiCalculator {
    assumptions: RoiAssumptions,
}

impl RoiCalculator {
    pub fn new(assumptions: RoiAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &RoiAssumptions {
        &self.assumptions
    }

    /// Full projection with intermediate figures, before rounding.
    pub fn project(&self, input: &SimulationInput) -> Projection {
        let a = &self.assumptions;
        let volume = input.monthly_invoice_volume as f64;

        let labor_cost_manual = volume * input.avg_hours_per_invoice * input.hourly_wage;
        let auto_cost = volume * a.automated_cost_per_invoice;

        // May go negative when the manual rate is below the automated baseline.
        let manual_error_rate = input.error_rate_manual / 100.0;
        let error_savings = (manual_error_rate - a.error_rate_auto) * volume * input.error_cost;

        let monthly_savings_pre_bias = labor_cost_manual + error_savings - auto_cost;
        let monthly_savings = monthly_savings_pre_bias * a.boost_factor;

        let cumulative_savings = monthly_savings * input.time_horizon_months as f64;
        let cost = input.one_time_implementation_cost;
        let net_savings = cumulative_savings - cost;

        let (payback_months, roi_percentage, outcome) = if cost > 0.0 && monthly_savings > 0.0 {
            (
                cost / monthly_savings,
                net_savings / cost * 100.0,
                PaybackOutcome::Standard,
            )
        } else if cost > 0.0 {
            (0.0, f64::INFINITY, PaybackOutcome::NonPositiveSavings)
        } else {
            (0.0, f64::INFINITY, PaybackOutcome::CostFree)
        };

        Projection {
            labor_cost_manual,
            auto_cost,
            error_savings,
            monthly_savings_pre_bias,
            monthly_savings,
            cumulative_savings,
            net_savings,
            payback_months,
            roi_percentage,
            outcome,
        }
    }

    /// The published result: `project` followed by rounding.
    pub fn compute(&self, input: &SimulationInput) -> SimulationResult {
        let projection = self.project(input);
        log::debug!(
            "projection: volume={} monthly_savings={:.2} outcome={:?}",
            input.monthly_invoice_volume,
            projection.monthly_savings,
            projection.outcome
        );
        projection.rounded()
    }

    /// `compute` for untrusted input: rejects projections that overflow
    /// to infinity or NaN instead of returning them.
    pub fn checked_compute(&self, input: &SimulationInput) -> RoiResult<SimulationResult> {
        let projection = self.project(input);
        if !projection.is_finite() {
            log::warn!(
                "projection overflow: volume={} outcome={:?}",
                input.monthly_invoice_volume,
                projection.outcome
            );
            return Err(RoiError::validation(
                "inputs",
                "projection overflows; values are too large to evaluate",
            ));
        }
        Ok(projection.rounded())
    }
}

/// Round half away from zero. Non-finite values pass through, as do
/// magnitudes too large to scale (they carry no fractional digits).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scaled = value * 10f64.powi(decimals);
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 10f64.powi(decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_is_half_away_from_zero() {
        assert_eq!(round_to(0.25, 1), 0.3);
        assert_eq!(round_to(-0.25, 1), -0.3);
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(12.0, 2), 12.0);
    }

    #[test]
    fn round_to_keeps_huge_values_finite() {
        assert_eq!(round_to(f64::MAX, 2), f64::MAX);
        assert_eq!(round_to(1e308, 1), 1e308);
    }

    #[test]
    fn round_to_keeps_infinity() {
        assert_eq!(round_to(f64::INFINITY, 1), f64::INFINITY);
        assert!(round_to(f64::NAN, 1).is_nan());
    }
}
