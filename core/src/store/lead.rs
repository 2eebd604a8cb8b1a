//! Store methods for captured leads.

use rusqlite::params;

use super::ScenarioStore;
use crate::{error::RoiResult, lead::LeadCaptured, types::ScenarioId};

impl ScenarioStore {
    pub fn record_lead(&self, lead: &LeadCaptured) -> RoiResult<()> {
        self.conn.execute(
            "INSERT INTO lead_event (lead_id, scenario_id, scenario_name, email, captured_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                lead.lead_id,
                lead.scenario_id,
                lead.scenario_name,
                lead.email,
                lead.captured_at,
            ],
        )?;
        Ok(())
    }

    /// Leads for one scenario, oldest first.
    pub fn leads_for_scenario(&self, scenario_id: ScenarioId) -> RoiResult<Vec<LeadCaptured>> {
        let mut stmt = self.conn.prepare(
            "SELECT lead_id, scenario_id, scenario_name, email, captured_at
             FROM lead_event WHERE scenario_id = ?1
             ORDER BY id ASC",
        )?;
        let leads = stmt
            .query_map(params![scenario_id], |row| {
                Ok(LeadCaptured {
                    lead_id:       row.get(0)?,
                    scenario_id:   row.get(1)?,
                    scenario_name: row.get(2)?,
                    email:         row.get(3)?,
                    captured_at:   row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(leads)
    }

    pub fn lead_count(&self) -> RoiResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lead_event", [], |row| row.get(0))?;
        Ok(count)
    }
}
