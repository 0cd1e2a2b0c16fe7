//! Snapshot loading
//!
//! A snapshot is either a single YAML/JSON document holding the `employees`,
//! `parts` and `stages` collections, or a directory laid out as:
//!
//! ```text
//! snapshot/
//! ├── employees.yaml   # list of employees
//! ├── parts.yaml       # list of parts
//! └── stages/          # one stage per .yaml file, loaded in path order
//! ```
//!
//! Structural problems (missing collection, syntax errors, unreadable files)
//! surface here as [`SnapshotError`]; nothing downstream of loading fails.

use miette::Diagnostic;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::snapshot::Snapshot;
use crate::entities::{Employee, Part, Stage};
use crate::yaml::{self, YamlError};

#[derive(Debug, Error, Diagnostic)]
pub enum SnapshotError {
    #[error("Snapshot not found: {}", path.display())]
    #[diagnostic(
        code(maestro::snapshot::not_found),
        help("Pass --snapshot <PATH>, set MAESTRO_SNAPSHOT, or set `snapshot` in maestro.yaml")
    )]
    NotFound { path: PathBuf },

    #[error("No snapshot given")]
    #[diagnostic(
        code(maestro::snapshot::unspecified),
        help("Pass --snapshot <PATH>, set MAESTRO_SNAPSHOT, or set `snapshot` in maestro.yaml")
    )]
    Unspecified,

    #[error("Failed to read {}", path.display())]
    #[diagnostic(code(maestro::snapshot::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Invalid JSON snapshot {}: {source}", path.display())]
    #[diagnostic(
        code(maestro::snapshot::json),
        help("A snapshot needs three collections: `employees`, `parts` and `stages`")
    )]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported snapshot format: {}", path.display())]
    #[diagnostic(
        code(maestro::snapshot::format),
        help("Use a .yaml, .yml or .json file, or a snapshot directory")
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("Snapshot directory {} has no {collection}", path.display())]
    #[diagnostic(
        code(maestro::snapshot::missing_collection),
        help("A snapshot directory needs employees.yaml, parts.yaml and either stages.yaml or a stages/ directory")
    )]
    MissingCollection {
        path: PathBuf,
        collection: &'static str,
    },
}

/// Load a snapshot from a file or directory
pub fn load_snapshot(path: &Path) -> Result<Snapshot, SnapshotError> {
    if !path.exists() {
        return Err(SnapshotError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let snapshot = if path.is_dir() {
        load_directory(path)?
    } else {
        load_file(path)?
    };

    debug!(
        path = %path.display(),
        employees = snapshot.employees.len(),
        parts = snapshot.parts.len(),
        stages = snapshot.stages.len(),
        stations = snapshot.station_count(),
        "snapshot loaded"
    );

    Ok(snapshot)
}

fn load_file(path: &Path) -> Result<Snapshot, SnapshotError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("yaml") | Some("yml") => Ok(yaml::parse_yaml_file(path)?),
        Some("json") => {
            let content = read(path)?;
            serde_json::from_str(&content).map_err(|source| SnapshotError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(SnapshotError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn load_directory(dir: &Path) -> Result<Snapshot, SnapshotError> {
    let employees: Vec<Employee> = load_collection(dir, "employees")?;
    let parts: Vec<Part> = load_collection(dir, "parts")?;

    let stages_dir = dir.join("stages");
    let stages: Vec<Stage> = if stages_dir.is_dir() {
        load_stage_tree(&stages_dir)?
    } else {
        load_collection(dir, "stages")?
    };

    let metadata_path = dir.join("metadata.yaml");
    let metadata = if metadata_path.is_file() {
        yaml::parse_yaml_file(&metadata_path)?
    } else {
        Default::default()
    };

    let mut snapshot = Snapshot::new(employees, parts, stages);
    snapshot.metadata = metadata;
    Ok(snapshot)
}

fn load_collection<T: DeserializeOwned>(
    dir: &Path,
    collection: &'static str,
) -> Result<Vec<T>, SnapshotError> {
    for ext in ["yaml", "yml"] {
        let path = dir.join(format!("{}.{}", collection, ext));
        if path.is_file() {
            return Ok(yaml::parse_yaml_file(&path)?);
        }
    }
    Err(SnapshotError::MissingCollection {
        path: dir.to_path_buf(),
        collection,
    })
}

fn load_stage_tree(dir: &Path) -> Result<Vec<Stage>, SnapshotError> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map_or(false, |e| e == "yaml" || e == "yml")
        })
        .collect();
    files.sort();

    let mut stages = Vec::with_capacity(files.len());
    for path in &files {
        stages.push(yaml::parse_yaml_file::<Stage>(path)?);
    }
    Ok(stages)
}

fn read(path: &Path) -> Result<String, SnapshotError> {
    std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}
