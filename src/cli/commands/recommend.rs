//! `maestro recommend` command - Staffing candidates per station

use console::style;
use miette::{miette, Result};

use crate::analysis::compatibility::recommend_station;
use crate::analysis::{recommend, DataIndex, StationRecommendation};
use crate::cli::helpers::{load, truncate_str};
use crate::cli::output::{print_structured, resolve_format, Report};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct RecommendArgs {
    /// Only this station (numeric id)
    #[arg(long)]
    pub station: Option<u32>,

    /// Candidates per station (minimum 5, default from configuration)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Only stations that reported an incident
    #[arg(long)]
    pub incidents_only: bool,

    /// Show the score breakdown of each candidate
    #[arg(long)]
    pub detail: bool,
}

pub fn run(args: RecommendArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let limit = args
        .limit
        .map_or_else(|| config.recommendations(), |n| n.max(crate::core::config::MIN_RECOMMENDATIONS));
    let snapshot = load(global, &config)?;
    let index = DataIndex::build(&snapshot);

    let recommendations: Vec<StationRecommendation> = match args.station {
        Some(id) => {
            let (stage, station) = snapshot
                .stations()
                .find(|(_, s)| s.id == id)
                .ok_or_else(|| miette!("No station with id {} in the snapshot", id))?;
            vec![recommend_station(stage, station, &snapshot.employees, &index, limit)]
        }
        None => recommend(&snapshot, &index, limit)
            .into_iter()
            .filter(|r| !args.incidents_only || r.has_incident())
            .collect(),
    };

    if print_structured(&recommendations, format)? {
        return Ok(());
    }

    for rec in &recommendations {
        print_station(rec, args.detail, format, global.quiet)?;
    }

    Ok(())
}

fn print_station(rec: &StationRecommendation, detail: bool, format: OutputFormat, quiet: bool) -> Result<()> {
    let mut headers = vec!["Rank", "ID", "Name", "Score", "Assigned"];
    if detail {
        headers.extend(["Skills", "Experience", "Level", "Team", "Matched"]);
    }
    let title = match &rec.incident {
        Some(incident) => format!("Station {} ({}) - {}", rec.station, rec.stage, incident),
        None => format!("Station {} ({})", rec.station, rec.stage),
    };

    let mut table = Report::new(title, headers);
    for (rank, candidate) in rec.candidates.iter().enumerate() {
        let mut row = vec![
            (rank + 1).to_string(),
            candidate.employee_id.clone(),
            truncate_str(&candidate.name, 28),
            candidate.score.total.to_string(),
            if candidate.currently_assigned { "yes" } else { "" }.to_string(),
        ];
        if detail {
            let s = &candidate.score;
            row.extend([
                format!("{:.1}", s.skill),
                format!("{:.1}", s.experience),
                format!("{:.1}", s.level),
                format!("{:.1}", s.team),
                format!("{}/{}", s.matched_skills, s.required_skills),
            ]);
        }
        table.push(row);
    }
    table.print(format)?;

    if !quiet && format != OutputFormat::Csv {
        let improvement = rec.improvement();
        let delta = if improvement > 0.0 {
            style(format!("+{:.1}", improvement)).green()
        } else {
            style(format!("{:.1}", improvement)).dim()
        };
        println!(
            "Required skills: {}\nCurrent team: {:.1}  Recommended team: {:.1}  ({})\n",
            rec.required_skills.join(", "),
            rec.current_team_score,
            rec.recommended_team_score,
            delta
        );
    }

    Ok(())
}
