//! Invoice-automation ROI projections: calculator, scenario store,
//! lead capture and PDF reporting.

pub mod calculator;
pub mod config;
pub mod error;
pub mod lead;
pub mod report;
pub mod scenario;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;
