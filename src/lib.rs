//! Maestro: assembly program decision support
//!
//! Reads a snapshot of an aircraft assembly program (stages, stations,
//! employees, parts) and derives part shortages, delay costs, 6M incident
//! root causes and ranked staffing recommendations.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
