//! Integration tests for the maestro CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"
metadata:
  source: line 2 extraction
employees:
  - id: E1
    first_name: Ana
    last_name: Martin
    qualification: Technicien
    experience: Expert
    hourly_cost: 20
    skills: "Soudure Niveau 4, Assemblage Niveau 3, Lecture plan Niveau 2"
    clearances: "H0B0, BR"
    home_station: Poste 1
  - id: E2
    first_name: Bob
    last_name: Durand
    qualification: Opérateur
    experience: Junior
    hourly_cost: 30
    skills: "Assemblage Niveau 2"
  - id: E3
    first_name: Cyd
    last_name: Petit
    experience: Confirmé
    hourly_cost: 25
    skills: "Montage électrique Niveau 5"
parts:
  - reference: P-1
    designation: Rivet
    quantity: 10
    unit_cost: 0.5
    criticality: Haute
    supplier: Acme
    lead_time_days: 12
  - reference: P-2
    designation: Panneau
    quantity: 0
    unit_cost: 120
    criticality: Critique
stages:
  - id: s1
    name: Assemblage cockpit
    stations:
      - id: 1
        planned: "01:00"
        actual: "01:31"
        incident: Dysfonctionnement machine soudure
        references: "P-1;P-1;P-2"
        employees: [E1]
      - id: 2
        planned: "02:00"
        actual: "02:00"
        incident: Contamination
        references: "P-1;P-9"
        employees: [E2, GHOST]
  - id: s2
    name: Stickers cockpit
    stations:
      - id: 3
        planned: "00:30"
        actual: "00:20"
        references: "P-2"
"#;

/// Helper to get a maestro command isolated from the caller's environment
fn maestro() -> Command {
    let mut cmd = Command::cargo_bin("maestro").unwrap();
    cmd.env_remove("MAESTRO_SNAPSHOT")
        .env_remove("MAESTRO_FORMAT")
        .env_remove("MAESTRO_LOG");
    cmd
}

/// Helper to write the fixture snapshot into a temp directory
fn setup_snapshot() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("snapshot.yaml");
    fs::write(&path, SNAPSHOT).unwrap();
    (tmp, path)
}

fn run_json(tmp: &TempDir, snapshot: &PathBuf, args: &[&str]) -> serde_json::Value {
    let output = maestro()
        .current_dir(tmp.path())
        .arg("--snapshot")
        .arg(snapshot)
        .args(["--format", "json"])
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "command failed: {:?}", args);
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    maestro()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shortages"))
        .stdout(predicate::str::contains("recommend"));
}

#[test]
fn test_missing_snapshot_is_reported() {
    let tmp = TempDir::new().unwrap();
    maestro()
        .current_dir(tmp.path())
        .arg("needs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No snapshot given"));
}

#[test]
fn test_nonexistent_snapshot_path() {
    let tmp = TempDir::new().unwrap();
    maestro()
        .current_dir(tmp.path())
        .args(["--snapshot", "nope.yaml", "needs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Snapshot not found"));
}

#[test]
fn test_snapshot_from_environment() {
    let (tmp, path) = setup_snapshot();
    maestro()
        .current_dir(tmp.path())
        .env("MAESTRO_SNAPSHOT", &path)
        .args(["--format", "md", "stages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Assemblage cockpit"));
}

// ============================================================================
// Analysis Commands
// ============================================================================

#[test]
fn test_needs_json() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["needs"]);

    let needs = json["needs"].as_array().unwrap();
    assert_eq!(needs.len(), 2);
    assert_eq!(json["kpis"]["insufficient"], 1);
    assert_eq!(json["unresolved"][0]["reference"], "P-9");
}

#[test]
fn test_shortages_markdown() {
    let (tmp, path) = setup_snapshot();
    maestro()
        .current_dir(tmp.path())
        .arg("--snapshot")
        .arg(&path)
        .args(["--format", "md", "shortages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Part shortages"))
        .stdout(predicate::str::contains("P-2"))
        .stdout(predicate::str::contains("240.00 €"));
}

#[test]
fn test_shortages_by_supplier_uses_unknown_label() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["shortages", "--by-supplier"]);
    assert_eq!(json[0]["supplier"], "Inconnu");
}

#[test]
fn test_delays_cost_and_deviation() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["delays"]);

    let first = &json["stations"][0];
    assert_eq!(first["delay_minutes"], 31);
    assert_eq!(first["billed_hours"], 1);
    assert_eq!(first["cost"], 20.0);
    assert_eq!(first["deviation_pct"], 51.7);
    assert_eq!(json["kpis"]["total_delay_cost"], 20.0);
    assert_eq!(json["kpis"]["delayed_stations"], 1);
}

#[test]
fn test_delays_top_lists_worst_deviation() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["delays", "--top", "1"]);
    let stations = json["stations"].as_array().unwrap();
    assert_eq!(stations.len(), 1);
    assert_eq!(stations[0]["station"], 1);
}

#[test]
fn test_causes_dominant_category() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["causes"]);
    assert_eq!(json["total_incidents"], 2);
    assert_eq!(json["dominant"], "Matériel");
}

#[test]
fn test_causes_drill_down() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["causes", "--category", "milieu"]);
    assert_eq!(json["count"], 1);
    assert_eq!(json["incidents"][0]["label"], "Contamination");
}

#[test]
fn test_recommend_station_ranks_welder_first() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["recommend", "--station", "1"]);

    let rec = &json[0];
    assert_eq!(rec["station"], 1);
    assert_eq!(rec["candidates"][0]["employee_id"], "E1");
    assert_eq!(rec["candidates"].as_array().unwrap().len(), 3);
}

#[test]
fn test_recommend_unknown_station_fails() {
    let (tmp, path) = setup_snapshot();
    maestro()
        .current_dir(tmp.path())
        .arg("--snapshot")
        .arg(&path)
        .args(["recommend", "--station", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No station with id 42"));
}

#[test]
fn test_status_json() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["status"]);
    assert_eq!(json["stations"], 3);
    assert_eq!(json["metadata"]["source"], "line 2 extraction");
    assert_eq!(json["fingerprint"].as_str().unwrap().len(), 64);
}

// ============================================================================
// Directory Commands
// ============================================================================

#[test]
fn test_employees_filter_by_skill() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["employees", "--skill", "assemblage", "--min-level", "3"]);
    let employees = json.as_array().unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0]["id"], "E1");
}

#[test]
fn test_employees_by_qualification() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["employees", "--by-qualification"]);
    let labels: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["qualification"].as_str().unwrap())
        .collect();
    assert!(labels.contains(&"Non spécifié"));
}

#[test]
fn test_parts_stats() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["parts", "--stats"]);
    assert_eq!(json["parts"], 2);
    assert_eq!(json["total_quantity"], 10);
    assert_eq!(json["stock_value"], 5.0);
}

#[test]
fn test_stages_in_canonical_order() {
    let (tmp, path) = setup_snapshot();
    let json = run_json(&tmp, &path, &["stages"]);
    assert_eq!(json[0]["name"], "Assemblage cockpit");
    assert_eq!(json[0]["incidents"], 2);
}

// ============================================================================
// Validate Command
// ============================================================================

#[test]
fn test_validate_reports_findings() {
    let (tmp, path) = setup_snapshot();
    maestro()
        .current_dir(tmp.path())
        .arg("--snapshot")
        .arg(&path)
        .args(["--format", "table", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("P-9"))
        .stdout(predicate::str::contains("GHOST"));
}

#[test]
fn test_validate_strict_fails() {
    let (tmp, path) = setup_snapshot();
    maestro()
        .current_dir(tmp.path())
        .arg("--snapshot")
        .arg(&path)
        .args(["validate", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

// ============================================================================
// Import Command
// ============================================================================

#[test]
fn test_import_builds_loadable_snapshot() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("mes.csv"),
        "Poste,Nom,Référence,Temps Prévu,Temps Réel,Aléas Industriels,Cause Potentielle\n\
         1,Assemblage cockpit,P-1,01:00:00,01:31:00,Contamination,Poussière\n\
         2,Stickers cockpit,P-1,00:30:00,00:30:00,,\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("erp.csv"),
        "Matricule,Prénom,Nom,Qualification,Niveau d'expérience,Coût horaire (€),Compétences,Habilitations,Poste de montage\n\
         E1,Ana,Martin,Technicien,Expert,20,Soudure Niveau 4,,Poste 1\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("plm.csv"),
        "Code / Référence,Désignation,Quantité,Coût achat pièce (€),Masse (kg),Criticité,Fournisseur,Délai Approvisionnement,Temps CAO (h)\n\
         P-1,Rivet,10,0.5,0.01,Haute,Acme,12,0\n",
    )
    .unwrap();

    maestro()
        .current_dir(tmp.path())
        .args([
            "import", "--mes", "mes.csv", "--erp", "erp.csv", "--plm", "plm.csv", "-o", "out.yaml",
            "--source", "test",
        ])
        .assert()
        .success();

    let out = tmp.path().join("out.yaml");
    assert!(out.exists());

    let json = run_json(&tmp, &out, &["delays"]);
    assert_eq!(json["stations"][0]["cost"], 20.0);
    assert_eq!(json["stations"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn test_completions_bash() {
    maestro()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("maestro"));
}
