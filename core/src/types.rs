//! Shared primitive types used across the crate.

/// Auto-assigned row id of a persisted scenario.
pub type ScenarioId = i64;

/// Unique identifier of a captured lead.
pub type LeadId = String;
