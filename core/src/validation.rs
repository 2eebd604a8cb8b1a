//! Boundary checks applied before any input reaches the calculator.
//!
//! RULE: The calculator assumes validated input. Every public entry point
//! that accepts caller data runs the matching `validate()` first.

use crate::{
    error::{RoiError, RoiResult},
    scenario::{NewScenario, ReportRequest, SimulationInput},
};

pub const MAX_SCENARIO_NAME_LEN: usize = 200;

fn non_negative(field: &str, value: f64) -> RoiResult<()> {
    if !value.is_finite() {
        return Err(RoiError::validation(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(RoiError::validation(field, format!("must not be negative (got {value})")));
    }
    Ok(())
}

impl SimulationInput {
    pub fn validate(&self) -> RoiResult<()> {
        non_negative("avg_hours_per_invoice", self.avg_hours_per_invoice)?;
        non_negative("hourly_wage", self.hourly_wage)?;
        non_negative("error_rate_manual", self.error_rate_manual)?;
        non_negative("error_cost", self.error_cost)?;
        non_negative("one_time_implementation_cost", self.one_time_implementation_cost)?;

        if self.error_rate_manual > 100.0 {
            return Err(RoiError::validation(
                "error_rate_manual",
                format!("is a percentage and must be at most 100 (got {})", self.error_rate_manual),
            ));
        }
        if self.time_horizon_months == 0 {
            return Err(RoiError::validation(
                "time_horizon_months",
                "must be at least 1 month",
            ));
        }
        Ok(())
    }
}

impl NewScenario {
    pub fn validate(&self) -> RoiResult<()> {
        let name = self.scenario_name.trim();
        if name.is_empty() {
            return Err(RoiError::validation("scenario_name", "must not be empty"));
        }
        if name.chars().count() > MAX_SCENARIO_NAME_LEN {
            return Err(RoiError::validation(
                "scenario_name",
                format!("must be at most {MAX_SCENARIO_NAME_LEN} characters"),
            ));
        }
        self.inputs.validate()
    }
}

impl ReportRequest {
    /// Shape check only; deliverability is not our concern.
    pub fn validate(&self) -> RoiResult<()> {
        let email = self.email.trim();
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && !email.contains(char::is_whitespace)
                    && domain
                        .split_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            }
            None => false,
        };
        if !valid {
            return Err(RoiError::validation("email", "is not a valid email address"));
        }
        Ok(())
    }
}
