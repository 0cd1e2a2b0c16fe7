//! CLI command implementations

pub mod causes;
pub mod completions;
pub mod config;
pub mod delays;
pub mod employees;
pub mod import;
pub mod needs;
pub mod parts;
pub mod recommend;
pub mod shortages;
pub mod stages;
pub mod status;
pub mod validate;
