//! Diagnostic rendering for transform errors.

use std::io;
use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::error::TransformError;

/// Build an ariadne report for a transform error: error code, one label on
/// the offending span.
pub fn report(error: &TransformError, filename: &str) -> Report<'static, (String, Range<usize>)> {
    let span = (filename.to_string(), error.span.start..error.span.end);
    Report::build(ReportKind::Error, span.clone())
        .with_code(error.code())
        .with_message("Decorator lowering error")
        .with_label(
            Label::new(span)
                .with_message(error.kind.to_string())
                .with_color(Color::Red),
        )
        .finish()
}

/// Render the report into a writer.
pub fn write(
    error: &TransformError,
    filename: &str,
    source: &str,
    out: impl io::Write,
) -> io::Result<()> {
    report(error, filename).write((filename.to_string(), Source::from(source)), out)
}

/// Print the report to stderr.
pub fn print(error: &TransformError, filename: &str, source: &str) -> io::Result<()> {
    report(error, filename).eprint((filename.to_string(), Source::from(source)))
}
