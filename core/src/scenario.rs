//! Data model: simulation input/result records and persisted scenarios.

use serde::{Deserialize, Serialize};

use crate::types::ScenarioId;

/// Caller-supplied business profile for one projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub monthly_invoice_volume: u64,
    /// Not used by the formula; kept for reporting.
    pub num_ap_staff: u64,
    pub avg_hours_per_invoice: f64,
    pub hourly_wage: f64,
    /// Percent, 0..=100.
    pub error_rate_manual: f64,
    pub error_cost: f64,
    pub time_horizon_months: u32,
    #[serde(default)]
    pub one_time_implementation_cost: f64,
}

/// Rounded projection figures as returned to callers and stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub monthly_savings:    f64,
    pub cumulative_savings: f64,
    pub net_savings:        f64,
    pub payback_months:     f64,
    /// `f64::INFINITY` when ROI is unbounded (see `PaybackOutcome`).
    #[serde(with = "unbounded_f64")]
    pub roi_percentage:     f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id:            ScenarioId,
    pub scenario_name: String,
    pub inputs:        SimulationInput,
    pub results:       SimulationResult,
}

/// Row returned by the scenario listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id:            ScenarioId,
    pub scenario_name: String,
}

/// Body of a create-and-persist request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScenario {
    pub scenario_name: String,
    pub inputs:        SimulationInput,
}

/// Body of a report request. The email is captured as a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub email:       String,
    pub scenario_id: ScenarioId,
}

/// JSON has no infinity literal. Non-finite values travel as the strings
/// `"Infinity"`, `"-Infinity"` and `"NaN"`; finite values stay numbers.
pub mod unbounded_f64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => match s.as_str() {
                "Infinity" | "inf" => Ok(f64::INFINITY),
                "-Infinity" | "-inf" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(de::Error::custom(format!(
                    "expected a number or \"Infinity\", got \"{other}\""
                ))),
            },
        }
    }
}
