//! Shared helper functions for CLI commands

use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::{load_snapshot, Config, Snapshot, SnapshotError};

/// Load the snapshot named on the command line or in the configuration
pub fn load(global: &GlobalOpts, config: &Config) -> Result<Snapshot> {
    let path = global
        .snapshot
        .clone()
        .or_else(|| config.snapshot.clone())
        .ok_or(SnapshotError::Unspecified)?;
    Ok(load_snapshot(&path)?)
}

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format minutes as `HH:MM`
pub fn format_minutes(minutes: u64) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Format a percentage with one decimal
pub fn format_pct(value: f64) -> String {
    format!("{:.1}%", value)
}
