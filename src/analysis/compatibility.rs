//! Employee-to-station compatibility scoring and ranked recommendations
//!
//! A score is the sum of four parts:
//!
//! | Part          | Range | Basis                                            |
//! |---------------|-------|--------------------------------------------------|
//! | Skill match   | 0-40  | required skills covered and their levels         |
//! | Experience    | 0-25  | experience ordinal × 5                           |
//! | Average level | 0-20  | mean declared skill level × 4                    |
//! | Team balance  | 0-15  | distance to the current team's mean experience   |
//!
//! Required skills come from the station's incident label through
//! [`SKILL_RULES`].

use serde::Serialize;

use super::DataIndex;
use crate::core::Snapshot;
use crate::entities::{Employee, Skill, Stage, Station};

/// Flat skill score when no skill is required
pub const EMPTY_REQUIREMENT_SCORE: f64 = 20.0;

/// Team balance score for a station nobody is assigned to
pub const NEW_TEAM_SCORE: f64 = 10.0;

/// Candidates kept per station unless configured otherwise
pub const DEFAULT_CANDIDATES: usize = 5;

/// Required skills implied by keywords of an incident label
#[derive(Debug, Clone, Copy)]
pub struct SkillRule {
    /// Lowercase substrings of the label that trigger the rule
    pub keywords: &'static [&'static str],
    pub skills: &'static [&'static str],
}

pub const SKILL_RULES: [SkillRule; 5] = [
    SkillRule {
        keywords: &["machine", "outillage", "équipement"],
        skills: &["Maintenance", "Montage mécanique"],
    },
    SkillRule {
        keywords: &["soudure"],
        skills: &["Soudure"],
    },
    SkillRule {
        keywords: &["électrique", "électronique"],
        skills: &["Montage électrique"],
    },
    SkillRule {
        keywords: &["qualité", "contrôle"],
        skills: &["Contrôle qualité"],
    },
    SkillRule {
        keywords: &["assemblage"],
        skills: &["Assemblage"],
    },
];

/// Skills required when the label is absent or matches no rule
pub const DEFAULT_REQUIRED_SKILLS: [&str; 2] = ["Assemblage", "Lecture plan"];

/// Skills a station needs, in rule order without repeats
pub fn required_skills(incident: Option<&str>) -> Vec<&'static str> {
    let mut skills: Vec<&'static str> = Vec::new();

    if let Some(label) = incident {
        let label = label.to_lowercase();
        for rule in SKILL_RULES.iter().filter(|r| r.keywords.iter().any(|k| label.contains(*k))) {
            for &skill in rule.skills {
                if !skills.contains(&skill) {
                    skills.push(skill);
                }
            }
        }
    }

    if skills.is_empty() {
        skills.extend(DEFAULT_REQUIRED_SKILLS);
    }
    skills
}

/// Sub-scores of one (employee, station) evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub skill: f64,
    pub experience: f64,
    pub level: f64,
    pub team: f64,

    /// Rounded sum of the four sub-scores
    pub total: u32,

    pub matched_skills: usize,
    pub required_skills: usize,
}

/// Skill-match sub-score and the number of required skills covered
pub fn skill_match(employee: &Employee, required: &[&str]) -> (f64, usize) {
    if required.is_empty() {
        return (EMPTY_REQUIREMENT_SCORE, 0);
    }

    let matched: Vec<&Skill> = required
        .iter()
        .filter_map(|skill| employee.find_skill(skill))
        .collect();
    let levels: Vec<f64> = matched.iter().filter_map(|s| s.level).map(f64::from).collect();
    let average_level = if levels.is_empty() {
        0.0
    } else {
        levels.iter().sum::<f64>() / levels.len() as f64
    };

    let score = matched.len() as f64 / required.len() as f64 * 25.0 + average_level * 3.0;
    (score, matched.len())
}

/// Team balance sub-score against the team's mean experience ordinal
pub fn team_balance(employee: &Employee, team_average: Option<f64>) -> f64 {
    let Some(average) = team_average else {
        return NEW_TEAM_SCORE;
    };
    let diff = (f64::from(employee.experience_ordinal()) - average).abs();
    if diff <= 1.0 {
        15.0
    } else if (diff - 2.0).abs() < f64::EPSILON {
        10.0
    } else {
        5.0
    }
}

/// Mean experience ordinal of the known employees in a team
pub fn team_average<'a>(team: impl IntoIterator<Item = &'a Employee>) -> Option<f64> {
    let ordinals: Vec<f64> = team
        .into_iter()
        .map(|e| f64::from(e.experience_ordinal()))
        .collect();
    (!ordinals.is_empty()).then(|| ordinals.iter().sum::<f64>() / ordinals.len() as f64)
}

/// Score an employee against a required skill set and a team
pub fn score(employee: &Employee, required: &[&str], team_average: Option<f64>) -> ScoreBreakdown {
    let (skill, matched_skills) = skill_match(employee, required);
    let experience = f64::from(employee.experience_ordinal()) * 5.0;
    let level = employee.average_skill_level() * 4.0;
    let team = team_balance(employee, team_average);

    ScoreBreakdown {
        skill,
        experience,
        level,
        team,
        total: (skill + experience + level + team).round() as u32,
        matched_skills,
        required_skills: required.len(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub employee_id: String,
    pub name: String,
    pub score: ScoreBreakdown,
    pub currently_assigned: bool,
}

/// Ranked candidates and team comparison for one station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRecommendation {
    pub stage: String,
    pub station: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident: Option<String>,

    pub required_skills: Vec<String>,

    /// Assigned employee ids as recorded on the station
    pub team: Vec<String>,

    /// Mean total over the assigned ids; an id with no employee record
    /// scores 0 (0 when nobody is assigned)
    pub current_team_score: f64,

    /// Mean total of the best candidates, as many as the current team
    pub recommended_team_score: f64,

    pub candidates: Vec<Candidate>,
}

impl StationRecommendation {
    pub fn has_incident(&self) -> bool {
        self.incident.is_some()
    }

    /// Score gained by replacing the team with the recommended one
    pub fn improvement(&self) -> f64 {
        self.recommended_team_score - self.current_team_score
    }
}

fn mean(values: impl IntoIterator<Item = u32>) -> f64 {
    let values: Vec<f64> = values.into_iter().map(f64::from).collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Rank every employee for one station and keep the best `limit`
pub fn recommend_station(
    stage: &Stage,
    station: &Station,
    employees: &[Employee],
    index: &DataIndex<'_>,
    limit: usize,
) -> StationRecommendation {
    let required = required_skills(station.incident.as_deref());
    let team: Vec<&Employee> = station
        .employees
        .iter()
        .filter_map(|id| index.employee(id))
        .collect();
    let average = team_average(team.iter().copied());

    let mut ranked: Vec<Candidate> = employees
        .iter()
        .map(|employee| Candidate {
            employee_id: employee.id.clone(),
            name: employee.name(),
            score: score(employee, &required, average),
            currently_assigned: station.is_assigned(&employee.id),
        })
        .collect();
    // Stable: ties keep roster order
    ranked.sort_by(|a, b| b.score.total.cmp(&a.score.total));

    let current_team_score = mean(station.employees.iter().map(|id| {
        index
            .employee(id)
            .map_or(0, |e| score(e, &required, average).total)
    }));
    let recommended_team_score = mean(
        ranked
            .iter()
            .take(team.len().max(1))
            .map(|c| c.score.total),
    );
    ranked.truncate(limit);

    StationRecommendation {
        stage: stage.name.clone(),
        station: station.id,
        incident: station.incident.clone(),
        required_skills: required.iter().map(|s| s.to_string()).collect(),
        team: station.employees.clone(),
        current_team_score,
        recommended_team_score,
        candidates: ranked,
    }
}

/// Recommendations for every station, incident-bearing stations first
pub fn recommend(snapshot: &Snapshot, index: &DataIndex<'_>, limit: usize) -> Vec<StationRecommendation> {
    let limit = limit.max(DEFAULT_CANDIDATES);
    let mut recommendations: Vec<StationRecommendation> = snapshot
        .stations()
        .map(|(stage, station)| recommend_station(stage, station, &snapshot.employees, index, limit))
        .collect();
    recommendations.sort_by(|a, b| {
        b.has_incident()
            .cmp(&a.has_incident())
            .then(a.station.cmp(&b.station))
    });
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::employee::parse_skills;
    use crate::entities::ExperienceLevel;

    fn employee(id: &str, experience: Option<ExperienceLevel>, skills: &str) -> Employee {
        let mut employee = Employee::new(id, id, "");
        employee.experience = experience;
        employee.skills = parse_skills(skills);
        employee
    }

    #[test]
    fn test_required_skills_from_label() {
        assert_eq!(
            required_skills(Some("Dysfonctionnement machine soudure")),
            vec!["Maintenance", "Montage mécanique", "Soudure"]
        );
        assert_eq!(
            required_skills(Some("Problème connectique électrique")),
            vec!["Montage électrique"]
        );
        assert_eq!(
            required_skills(Some("Défaillance contrôle qualité")),
            vec!["Contrôle qualité"]
        );
        assert_eq!(required_skills(Some("Contamination")), vec!["Assemblage", "Lecture plan"]);
        assert_eq!(required_skills(None), vec!["Assemblage", "Lecture plan"]);
    }

    #[test]
    fn test_required_skills_case_insensitive() {
        assert_eq!(
            required_skills(Some("Rupture OUTILLAGE spécifique")),
            vec!["Maintenance", "Montage mécanique"]
        );
    }

    #[test]
    fn test_skill_score_full_match() {
        let employee = employee("E1", None, "Welding Niveau 4, Assembly Niveau 3");
        let (skill, matched) = skill_match(&employee, &["Welding", "Assembly"]);
        assert_eq!(matched, 2);
        assert!((skill - 35.5).abs() < 1e-9);
    }

    #[test]
    fn test_skill_score_partial_and_empty() {
        let employee = employee("E1", None, "Soudure Niveau 5, Peinture Niveau 1");
        let (skill, matched) = skill_match(&employee, &["Soudure", "Assemblage"]);
        assert_eq!(matched, 1);
        assert!((skill - 27.5).abs() < 1e-9);

        assert_eq!(skill_match(&employee, &[]), (EMPTY_REQUIREMENT_SCORE, 0));
    }

    #[test]
    fn test_skill_match_ignores_case() {
        let employee = employee("E1", None, "lecture plan Niveau 2");
        let (_, matched) = skill_match(&employee, &["Lecture plan"]);
        assert_eq!(matched, 1);
    }

    #[test]
    fn test_team_balance() {
        let confirmed = employee("E1", Some(ExperienceLevel::Confirme), "");
        assert_eq!(team_balance(&confirmed, None), 10.0);
        assert_eq!(team_balance(&confirmed, Some(3.0)), 15.0);
        assert_eq!(team_balance(&confirmed, Some(2.0)), 10.0);
        assert_eq!(team_balance(&confirmed, Some(2.5)), 5.0);
        assert_eq!(team_balance(&confirmed, Some(1.0)), 5.0);
    }

    #[test]
    fn test_score_total_is_rounded_sum() {
        let expert = employee("E1", Some(ExperienceLevel::Expert), "Assemblage Niveau 5, Lecture plan Niveau 4");
        let breakdown = score(&expert, &["Assemblage", "Lecture plan"], None);
        // 38.5 + 25 + 18 + 10 = 91.5
        assert!((breakdown.skill - 38.5).abs() < 1e-9);
        assert_eq!(breakdown.experience, 25.0);
        assert!((breakdown.level - 18.0).abs() < 1e-9);
        assert_eq!(breakdown.total, 92);
    }

    #[test]
    fn test_recommend_station_ranks_and_flags() {
        let employees = vec![
            employee("E1", Some(ExperienceLevel::Debutant), ""),
            employee("E2", Some(ExperienceLevel::Expert), "Assemblage Niveau 5"),
            employee("E3", Some(ExperienceLevel::Debutant), ""),
        ];
        let index = DataIndex::from_collections(&employees, &[]);
        let stage = Stage::new("s0", "Assemblage cockpit");
        let mut station = Station::new(4);
        station.employees = vec!["E1".into()];

        let rec = recommend_station(&stage, &station, &employees, &index, 5);
        let order: Vec<&str> = rec.candidates.iter().map(|c| c.employee_id.as_str()).collect();
        assert_eq!(order, vec!["E2", "E1", "E3"]);
        assert!(rec.candidates[1].currently_assigned);
        assert!(!rec.candidates[0].currently_assigned);
        assert_eq!(rec.current_team_score, f64::from(rec.candidates[1].score.total));
        assert_eq!(rec.recommended_team_score, f64::from(rec.candidates[0].score.total));
        assert!(rec.improvement() > 0.0);
    }

    #[test]
    fn test_unknown_team_member_scores_zero() {
        let employees = vec![employee("E1", Some(ExperienceLevel::Expert), "Assemblage Niveau 5")];
        let index = DataIndex::from_collections(&employees, &[]);
        let mut station = Station::new(2);
        station.employees = vec!["E1".into(), "GHOST".into()];

        let rec = recommend_station(&Stage::new("s", "S"), &station, &employees, &index, 5);
        let known = f64::from(rec.candidates[0].score.total);
        assert_eq!(rec.current_team_score, known / 2.0);
    }

    #[test]
    fn test_empty_team_scores_zero() {
        let employees = vec![employee("E1", None, "")];
        let index = DataIndex::from_collections(&employees, &[]);
        let rec = recommend_station(&Stage::new("s", "S"), &Station::new(1), &employees, &index, 5);
        assert_eq!(rec.current_team_score, 0.0);
        assert_eq!(rec.candidates[0].score.team, NEW_TEAM_SCORE);
    }

    #[test]
    fn test_recommend_keeps_at_least_five() {
        let employees: Vec<Employee> = (0..8).map(|i| employee(&format!("E{}", i), None, "")).collect();
        let mut stage = Stage::new("s", "S");
        stage.stations.push(Station::new(1));
        let snapshot = Snapshot::new(employees, vec![], vec![stage]);
        let index = DataIndex::build(&snapshot);

        let recs = recommend(&snapshot, &index, 2);
        assert_eq!(recs[0].candidates.len(), 5);
        assert_eq!(recommend(&snapshot, &index, 7)[0].candidates.len(), 7);
    }

    #[test]
    fn test_station_order_incidents_first() {
        let mut stage = Stage::new("s", "S");
        for id in [5, 2, 9, 1] {
            let mut station = Station::new(id);
            if id == 9 || id == 5 {
                station.incident = Some("Contamination".into());
            }
            stage.stations.push(station);
        }
        let snapshot = Snapshot::new(vec![], vec![], vec![stage]);
        let index = DataIndex::build(&snapshot);

        let order: Vec<u32> = recommend(&snapshot, &index, 5).iter().map(|r| r.station).collect();
        assert_eq!(order, vec![5, 9, 1, 2]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::entities::ExperienceLevel;
    use proptest::prelude::*;

    fn arb_employee() -> impl Strategy<Value = Employee> {
        (
            prop::option::of(0usize..5),
            prop::collection::vec((0usize..4, prop::option::of(1u8..=5)), 0..5),
        )
            .prop_map(|(experience, skills)| {
                let names = ["Assemblage", "Soudure", "Maintenance", "Peinture"];
                let mut employee = Employee::new("E", "", "");
                employee.experience = experience.map(|i| ExperienceLevel::ALL[i]);
                employee.skills = skills
                    .into_iter()
                    .map(|(n, level)| Skill {
                        name: names[n].to_string(),
                        level,
                    })
                    .collect();
                employee
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_sub_scores_within_bounds(
            employee in arb_employee(),
            label in prop::option::of(prop::sample::select(vec![
                "Dysfonctionnement machine soudure",
                "Problème connectique électrique",
                "Contamination",
            ])),
            team in prop::option::of(1.0f64..=5.0),
        ) {
            let required = required_skills(label);
            let first = score(&employee, &required, team);

            prop_assert!((0.0..=40.0).contains(&first.skill));
            prop_assert!((0.0..=25.0).contains(&first.experience));
            prop_assert!((0.0..=20.0).contains(&first.level));
            prop_assert!((5.0..=15.0).contains(&first.team));
            prop_assert!(first.total <= 100);
            let sum = first.skill + first.experience + first.level + first.team;
            prop_assert_eq!(first.total, sum.round() as u32);

            // Deterministic
            prop_assert_eq!(first, score(&employee, &required, team));
        }
    }
}
