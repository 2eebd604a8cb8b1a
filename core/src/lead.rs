//! Lead capture: the contact event emitted when a report is requested.
//!
//! RULE: Lead capture is fire-and-forget. A failing sink is logged and
//! skipped; it never fails the report that triggered it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    error::RoiResult,
    scenario::Scenario,
    types::{LeadId, ScenarioId},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadCaptured {
    pub lead_id:       LeadId,
    pub scenario_id:   ScenarioId,
    pub scenario_name: String,
    pub email:         String,
    pub captured_at:   DateTime<Utc>,
}

impl LeadCaptured {
    pub fn new(email: &str, scenario: &Scenario) -> Self {
        Self {
            lead_id:       uuid::Uuid::new_v4().to_string(),
            scenario_id:   scenario.id,
            scenario_name: scenario.scenario_name.clone(),
            email:         email.trim().to_string(),
            captured_at:   Utc::now(),
        }
    }
}

/// A destination for captured leads.
pub trait LeadSink: Send {
    /// Stable name used in log lines.
    fn name(&self) -> &'static str;

    fn capture(&mut self, lead: &LeadCaptured) -> RoiResult<()>;
}

/// Emits each lead as an info-level log line.
#[derive(Debug, Default)]
pub struct LogLeadSink;

impl LeadSink for LogLeadSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn capture(&mut self, lead: &LeadCaptured) -> RoiResult<()> {
        log::info!(
            "Lead captured: {} requested report for scenario {}",
            lead.email,
            lead.scenario_name
        );
        Ok(())
    }
}

/// Appends each lead as one JSON line to a file.
pub struct JsonlLeadSink {
    path: PathBuf,
    file: File,
}

impl JsonlLeadSink {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| anyhow::anyhow!("Cannot open lead log {}: {e}", path.display()))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeadSink for JsonlLeadSink {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn capture(&mut self, lead: &LeadCaptured) -> RoiResult<()> {
        let line = serde_json::to_string(lead)?;
        writeln!(self.file, "{line}")
            .and_then(|_| self.file.flush())
            .map_err(|e| anyhow::anyhow!("write to {}: {e}", self.path.display()))?;
        Ok(())
    }
}
