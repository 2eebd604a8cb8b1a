//! The ROI service: the five request flows behind the HTTP surface.
//!
//! FLOWS:
//!   1. simulate         validate -> compute                  (no persistence)
//!   2. create_scenario  validate -> compute -> store.save
//!   3. list_scenarios   store.list
//!   4. get_scenario     store.get
//!   5. generate_report  store.get -> capture lead -> render PDF
//!
//! RULES:
//!   - Results are computed once, at creation, and stored as a snapshot.
//!   - Reports render the stored snapshot; nothing is recomputed.
//!   - Lead capture never fails a report.

use crate::{
    calculator::RoiCalculator,
    config::RoiAssumptions,
    error::RoiResult,
    lead::{LeadCaptured, LeadSink, LogLeadSink},
    report::{self, RenderedReport},
    scenario::{NewScenario, ReportRequest, Scenario, ScenarioSummary, SimulationInput, SimulationResult},
    store::ScenarioStore,
    types::ScenarioId,
};

/// Listing page size when the caller does not give one.
pub const DEFAULT_LIST_LIMIT: u32 = 100;
/// Largest page a single listing may return.
pub const MAX_LIST_LIMIT: u32 = 1000;

pub struct RoiService {
    calculator: RoiCalculator,
    store:      ScenarioStore,
    lead_sinks: Vec<Box<dyn LeadSink>>,
}

impl RoiService {
    /// A service with no lead sinks. Leads are still written to the store.
    pub fn new(calculator: RoiCalculator, store: ScenarioStore) -> Self {
        Self {
            calculator,
            store,
            lead_sinks: Vec::new(),
        }
    }

    /// Migrate the store and register the log sink.
    /// Call this instead of new() + manual register_sink() calls.
    pub fn build(assumptions: RoiAssumptions, store: ScenarioStore) -> RoiResult<Self> {
        assumptions.validate()?;
        store.migrate()?;
        let mut service = Self::new(RoiCalculator::new(assumptions), store);
        service.register_sink(Box::new(LogLeadSink));
        Ok(service)
    }

    /// In-memory store with default assumptions (used in tests).
    pub fn build_test() -> RoiResult<Self> {
        Self::build(RoiAssumptions::default(), ScenarioStore::in_memory()?)
    }

    /// Sinks receive leads in registration order.
    pub fn register_sink(&mut self, sink: Box<dyn LeadSink>) {
        self.lead_sinks.push(sink);
    }

    pub fn assumptions(&self) -> &RoiAssumptions {
        self.calculator.assumptions()
    }

    pub fn store(&self) -> &ScenarioStore {
        &self.store
    }

    pub fn simulate(&self, inputs: &SimulationInput) -> RoiResult<SimulationResult> {
        inputs.validate()?;
        self.calculator.checked_compute(inputs)
    }

    pub fn create_scenario(&self, request: &NewScenario) -> RoiResult<Scenario> {
        request.validate()?;
        let name = request.scenario_name.trim();
        let results = self.calculator.checked_compute(&request.inputs)?;

        let scenario = self.store.save(name, &request.inputs, &results).map_err(|e| {
            log::warn!("scenario create '{name}' rejected: {e}");
            e
        })?;
        log::info!(
            "scenario {} '{}' created: monthly_savings={:.2}",
            scenario.id,
            scenario.scenario_name,
            scenario.results.monthly_savings
        );
        Ok(scenario)
    }

    /// `limit` defaults to `DEFAULT_LIST_LIMIT` and is capped at `MAX_LIST_LIMIT`.
    pub fn list_scenarios(&self, skip: Option<u32>, limit: Option<u32>) -> RoiResult<Vec<ScenarioSummary>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
        self.store.list(skip.unwrap_or(0), limit)
    }

    pub fn get_scenario(&self, id: ScenarioId) -> RoiResult<Scenario> {
        self.store.get(id)
    }

    pub fn generate_report(&mut self, request: &ReportRequest) -> RoiResult<RenderedReport> {
        request.validate()?;
        let scenario = self.store.get(request.scenario_id)?;

        let lead = LeadCaptured::new(&request.email, &scenario);
        self.capture_lead(&lead);

        let rendered = report::render_scenario(&scenario)?;
        log::info!(
            "report generated for scenario {} ({} bytes)",
            scenario.id,
            rendered.bytes.len()
        );
        Ok(rendered)
    }

    fn capture_lead(&mut self, lead: &LeadCaptured) {
        if let Err(e) = self.store.record_lead(lead) {
            log::warn!("lead {} not persisted: {e}", lead.lead_id);
        }
        for sink in &mut self.lead_sinks {
            if let Err(e) = sink.capture(lead) {
                log::warn!("lead sink '{}' failed for lead {}: {e}", sink.name(), lead.lead_id);
            }
        }
    }
}
