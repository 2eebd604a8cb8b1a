//! Store methods for named scenarios.

use rusqlite::{params, ErrorCode, OptionalExtension};

use super::ScenarioStore;
use crate::{
    error::{RoiError, RoiResult},
    scenario::{Scenario, ScenarioSummary, SimulationInput, SimulationResult},
    types::ScenarioId,
};

impl ScenarioStore {
    /// Persist a scenario snapshot. Fails with `DuplicateName` when the
    /// name is already taken; nothing is written in that case.
    pub fn save(
        &self,
        name:    &str,
        inputs:  &SimulationInput,
        results: &SimulationResult,
    ) -> RoiResult<Scenario> {
        let inputs_json = serde_json::to_string(inputs)?;
        let results_json = serde_json::to_string(results)?;

        let inserted = self.conn.execute(
            "INSERT INTO scenario (scenario_name, inputs_json, results_json, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, inputs_json, results_json, chrono::Utc::now().to_rfc3339()],
        );
        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
                    && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                return Err(RoiError::DuplicateName { name: name.to_string() });
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Scenario {
            id:            self.conn.last_insert_rowid(),
            scenario_name: name.to_string(),
            inputs:        inputs.clone(),
            results:       *results,
        })
    }

    pub fn get(&self, id: ScenarioId) -> RoiResult<Scenario> {
        let row = self
            .conn
            .query_row(
                "SELECT id, scenario_name, inputs_json, results_json
                 FROM scenario WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let (id, scenario_name, inputs_json, results_json) =
            row.ok_or(RoiError::NotFound { id })?;
        Ok(Scenario {
            id,
            scenario_name,
            inputs:  serde_json::from_str(&inputs_json)?,
            results: serde_json::from_str(&results_json)?,
        })
    }

    /// Scenario names in creation order (ascending id).
    pub fn list(&self, offset: u32, limit: u32) -> RoiResult<Vec<ScenarioSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, scenario_name FROM scenario
             ORDER BY id ASC LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], |row| {
                Ok(ScenarioSummary {
                    id:            row.get(0)?,
                    scenario_name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> RoiResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM scenario", [], |row| row.get(0))?;
        Ok(count)
    }
}
