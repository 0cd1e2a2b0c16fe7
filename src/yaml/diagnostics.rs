//! YAML error diagnostics pointing at the offending line of a snapshot

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("YAML error: {message}")]
#[diagnostic(code(maestro::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    /// The underlying error message
    message: String,
}

impl YamlSyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let mut offset = line_col_to_offset(source, line, column).min(source.len().saturating_sub(1));
        while offset > 0 && !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }
}

/// Generic YAML error wrapper
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte offset of a 1-based line/column, or the last line start when the
/// location is past the end of the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut start = 0;
    for (n, text) in source.split_inclusive('\n').enumerate() {
        if n + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map_or(text.len(), |(i, _)| i);
            return start + within;
        }
        if start + text.len() < source.len() {
            start += text.len();
        }
    }
    start
}

/// Hints keyed by a fragment of the lowercased parser message
const HINTS: &[(&str, &str)] = &[
    (
        "missing field `employees`",
        "A snapshot needs three collections: `employees`, `parts` and `stages` (use `[]` for an empty one).",
    ),
    (
        "missing field `parts`",
        "A snapshot needs three collections: `employees`, `parts` and `stages` (use `[]` for an empty one).",
    ),
    (
        "missing field `stages`",
        "A snapshot needs three collections: `employees`, `parts` and `stages` (use `[]` for an empty one).",
    ),
    ("missing field `id`", "Every employee needs an `id` and every station a numeric `id`."),
    ("missing field `reference`", "Every part needs a `reference`."),
    ("station identifier", "Station ids are numbers, e.g. `id: 12` or `poste_id: \"Poste 12\"`."),
    ("found unexpected ':'", "Quote clock times: `planned: \"01:30\"`."),
    ("tab", "Indent with spaces; YAML rejects tab characters."),
];

/// Suggest a fix for common snapshot mistakes
fn generate_help(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    HINTS
        .iter()
        .find(|(fragment, _)| lower.contains(fragment))
        .map(|(_, hint)| hint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 1), 12);
        assert_eq!(line_col_to_offset(source, 2, 3), 8);
        assert_eq!(line_col_to_offset(source, 9, 1), 12);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("missing field `stages`").is_some());
        assert!(generate_help("found tab character").is_some());
        assert!(generate_help("stations[0].id: station identifier out of range").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_syntax_error_from_serde() {
        let source = "employees: []\nparts: [\n";
        let err = serde_yml::from_str::<serde_yml::Value>(source).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "snapshot.yaml");
        assert!(!diag.message.is_empty());
    }
}
