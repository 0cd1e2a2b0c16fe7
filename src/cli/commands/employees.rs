//! `maestro employees` command - Employee directory

use miette::Result;

use crate::analysis::directory::{employee_facets, workforce_by_qualification, EmployeeFilter};
use crate::cli::helpers::{load, truncate_str};
use crate::cli::output::{money, or_dash, print_structured, print_summary, resolve_format, Report};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::entities::ExperienceLevel;

#[derive(clap::Args, Debug)]
pub struct EmployeesArgs {
    /// Search in id, first and last name
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by qualification (exact, case-insensitive)
    #[arg(long)]
    pub qualification: Option<String>,

    /// Filter by experience level (Débutant, Junior, Intermédiaire, Confirmé, Expert)
    #[arg(long, short = 'e')]
    pub experience: Option<ExperienceLevel>,

    /// Filter by skill (substring of the skill name)
    #[arg(long)]
    pub skill: Option<String>,

    /// Minimum level of the filtered skill, or of any skill
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub min_level: Option<u8>,

    /// Filter by clearance
    #[arg(long)]
    pub clearance: Option<String>,

    /// Filter by home station number
    #[arg(long)]
    pub station: Option<u32>,

    /// List the distinct skills, clearances and qualifications instead
    #[arg(long, conflicts_with = "by_qualification")]
    pub facets: bool,

    /// Show headcount per qualification instead
    #[arg(long)]
    pub by_qualification: bool,
}

impl EmployeesArgs {
    fn filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            search: self.search.clone(),
            qualification: self.qualification.clone(),
            experience: self.experience,
            skill: self.skill.clone(),
            min_level: self.min_level,
            clearance: self.clearance.clone(),
            home_station: self.station,
        }
    }
}

pub fn run(args: EmployeesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let format = resolve_format(global, &config);
    let snapshot = load(global, &config)?;

    if args.facets {
        let facets = employee_facets(&snapshot.employees);
        if print_structured(&facets, format)? {
            return Ok(());
        }
        for (title, values) in [
            ("Skills", &facets.skills),
            ("Clearances", &facets.clearances),
            ("Qualifications", &facets.qualifications),
        ] {
            let mut table = Report::new(title, ["Value"]);
            for value in values {
                table.push([value.as_str()]);
            }
            table.print(format)?;
        }
        return Ok(());
    }

    if args.by_qualification {
        let counts = workforce_by_qualification(&snapshot.employees);
        if print_structured(&counts, format)? {
            return Ok(());
        }
        let mut table = Report::new("Workforce by qualification", ["Qualification", "Employees"]);
        for row in &counts {
            table.push([row.qualification.clone(), row.count.to_string()]);
        }
        return table.print(format);
    }

    let employees = args.filter().apply(&snapshot.employees);

    if print_structured(&employees, format)? {
        return Ok(());
    }

    let mut table = Report::new(
        "Employees",
        ["ID", "Name", "Qualification", "Experience", "Hourly cost", "Skills", "Station"],
    );
    for employee in &employees {
        let skills: Vec<String> = employee.skills.iter().map(|s| s.to_string()).collect();
        table.push([
            employee.id.clone(),
            truncate_str(&employee.name(), 28),
            or_dash(employee.qualification.as_deref()),
            or_dash(employee.experience),
            money(employee.hourly_cost, config.currency()),
            truncate_str(&skills.join(", "), 48),
            or_dash(employee.home_station.as_deref()),
        ]);
    }
    table.print(format)?;

    if !global.quiet {
        print_summary(
            format,
            &[("Employees", format!("{} of {}", employees.len(), snapshot.employees.len()))],
        );
    }

    Ok(())
}
