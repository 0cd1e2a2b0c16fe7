//! Report rendering shared by all commands
//!
//! Structured formats (JSON, YAML) serialize the report structs directly;
//! tabular formats go through [`Report`], which renders the same rows as a
//! terminal table, a Markdown table or CSV.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

/// Resolve `auto` against the configured default and the terminal
pub fn resolve_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    let configured = config
        .default_format
        .as_deref()
        .and_then(|f| f.parse::<OutputFormat>().ok())
        .filter(|f| *f != OutputFormat::Auto);
    match configured {
        Some(format) => format,
        None if console::Term::stdout().is_term() => OutputFormat::Table,
        None => OutputFormat::Md,
    }
}

/// Print a serializable value when the format is structured
///
/// Returns `false` for tabular formats so the caller renders its table.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// A titled table of string cells
pub struct Report {
    title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Report {
    pub fn new<I, S>(title: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render in a tabular format (`Table`, `Md` or `Csv`)
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        if format == OutputFormat::Csv {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(&self.headers).into_diagnostic()?;
            for row in &self.rows {
                writer.write_record(row).into_diagnostic()?;
            }
            let bytes = writer.into_inner().into_diagnostic()?;
            return String::from_utf8(bytes).into_diagnostic();
        }

        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().map(String::as_str));
        for row in &self.rows {
            builder.push_record(row.iter().map(String::as_str));
        }
        let mut table = builder.build();

        let mut output = String::new();
        if format == OutputFormat::Md {
            output.push_str(&format!("## {}\n\n", self.title));
            output.push_str(&table.with(Style::markdown()).to_string());
        } else {
            output.push_str(&format!("{}\n", style(&self.title).bold().underlined()));
            output.push_str(&table.with(Style::rounded()).to_string());
        }
        output.push('\n');
        Ok(output)
    }

    pub fn print(&self, format: OutputFormat) -> Result<()> {
        print!("{}", self.render(format)?);
        Ok(())
    }
}

/// Key/value summary lines printed under a table
pub fn print_summary(format: OutputFormat, lines: &[(&str, String)]) {
    if format == OutputFormat::Csv {
        return;
    }
    println!();
    for (label, value) in lines {
        if format == OutputFormat::Md {
            println!("- **{}:** {}", label, value);
        } else {
            println!("  {:<24} {}", format!("{}:", label), style(value).cyan());
        }
    }
    println!();
}

/// Format an amount with its currency symbol and two decimals
pub fn money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

pub fn or_dash(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
