use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use formula::CalcError;
use std::fmt;
use std::io::IsTerminal;

const SOURCE_ID: &str = "expression";

/// A pipeline error together with the expression it points into
#[derive(Debug)]
pub struct ExpressionFailure {
    pub expression: String,
    pub error: CalcError,
}

impl ExpressionFailure {
    pub fn new(expression: &str, error: CalcError) -> Self {
        Self {
            expression: expression.to_string(),
            error,
        }
    }
}

impl fmt::Display for ExpressionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ExpressionFailure {}

/// Render an error with an Ariadne label under the offending characters
///
/// Spans are char offsets, which is also how Ariadne indexes a `Source`.
pub fn format_error(failure: &ExpressionFailure) -> String {
    let error = &failure.error;
    let char_count = failure.expression.chars().count();
    if failure.expression.trim().is_empty() || error.span.start >= char_count {
        return format!("Error: {}", error);
    }

    let start = error.span.start;
    let end = (start + error.length().max(1)).min(char_count);
    let message = format!("{} ({}): {}", error.code, error.code.number(), error.message);
    let color = std::io::stderr().is_terminal();

    let mut output = Vec::new();
    let report = Report::build(ReportKind::Error, SOURCE_ID, start)
        .with_config(Config::default().with_color(color))
        .with_message(message)
        .with_label(
            Label::new((SOURCE_ID, start..end))
                .with_message(label_text(error))
                .with_color(Color::Red),
        )
        .finish();

    match report.write(
        (SOURCE_ID, Source::from(failure.expression.as_str())),
        &mut output,
    ) {
        Ok(_) => String::from_utf8_lossy(&output).to_string(),
        Err(_) => format!("Error: {}", error),
    }
}

fn label_text(error: &CalcError) -> String {
    match error.code.stage() {
        formula::Stage::Tokenizer => "not understood here".to_string(),
        formula::Stage::Generator => "expression structure breaks here".to_string(),
        formula::Stage::Evaluator | formula::Stage::Internal => "failed here".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula::Engine;

    fn failure(expression: &str) -> ExpressionFailure {
        let error = Engine::new().evaluate(expression, None).unwrap_err();
        ExpressionFailure::new(expression, error)
    }

    #[test]
    fn test_report_names_code_and_message() {
        let output = format_error(&failure("9 / 0"));
        assert!(output.contains("DivisionByZero (3000)"), "{}", output);
        assert!(output.contains("Division by zero"), "{}", output);
    }

    #[test]
    fn test_multibyte_source_is_labelled() {
        let output = format_error(&failure("√9 × (2 + π) ÷ 0"));
        assert!(output.contains("failed here"), "{}", output);
    }

    #[test]
    fn test_empty_expression_falls_back_to_plain_text() {
        let output = format_error(&failure("   "));
        assert!(output.starts_with("Error: EmptyExpression"), "{}", output);
    }
}
