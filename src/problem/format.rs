use owo_colors::OwoColorize;

use super::{Diagnostic, Severity};

/// Format a diagnostic as a single coloured line.
pub fn concise_diagnostic(diagnostic: &Diagnostic) -> String {
    let label = match diagnostic.severity {
        Severity::Error => "error"
            .bright_red()
            .to_string(),
        Severity::Warning => "warning"
            .bright_yellow()
            .to_string(),
        Severity::Report => "info"
            .bright_blue()
            .to_string(),
        Severity::Debug => "debug"
            .dimmed()
            .to_string(),
    };

    format!(
        "{}: {}:{} {}",
        label,
        diagnostic
            .path
            .to_string_lossy(),
        diagnostic.line,
        diagnostic
            .message
            .bold(),
    )
}

/// Format a diagnostic along with the offending line of source, if the line
/// is known.
pub fn full_diagnostic(diagnostic: &Diagnostic, source: &str) -> String {
    if diagnostic.line == 0 {
        return concise_diagnostic(diagnostic);
    }

    let code = source
        .lines()
        .nth(diagnostic.line - 1)
        .unwrap_or("?");
    let width = 3.max(
        diagnostic
            .line
            .to_string()
            .len(),
    );

    format!(
        r#"
{}

{:width$} {}
{:width$} {} {}
        "#,
        concise_diagnostic(diagnostic),
        ' ',
        '|'.bright_blue(),
        diagnostic
            .line
            .bright_blue(),
        '|'.bright_blue(),
        code,
    )
    .trim_ascii()
    .to_string()
}
