//! Entity type definitions
//!
//! A snapshot of the assembly program is made of three collections:
//!
//! - [`Employee`] - operators with experience, hourly cost, skills and clearances
//! - [`Part`] - catalogue parts with stock, cost, criticality and supplier data
//! - [`Stage`] - ordered production stages, each holding [`Station`]s with
//!   planned/actual durations, incidents, consumed parts and assigned staff
//!
//! Records accept both the English field names and the column names of the
//! source-system exports (`Matricule`, `Code / Référence`, `postes`, ...).

pub mod employee;
pub mod fields;
pub mod part;
pub mod station;

pub use employee::{ExperienceLevel, Employee, Skill};
pub use part::{Criticality, Part};
pub use station::{Stage, Station};
