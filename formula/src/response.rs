use crate::error::CalcError;
use crate::parser::Token;
use crate::value::Value;
use serde::Serialize;

/// Outcome of one calculation
///
/// Always well-formed: on failure `value` is `None`, `errors` holds the
/// diagnostics and `message` repeats the first of them. The token sequences
/// are filled in as far as the pipeline got.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub success: bool,
    pub value: Option<Value>,
    pub message: String,
    pub errors: Vec<CalcError>,
    pub expression_tokens: Vec<Token>,
    pub rpn_tokens: Vec<Token>,
}

impl CalculationResult {
    pub fn success(value: Value, expression_tokens: Vec<Token>, rpn_tokens: Vec<Token>) -> Self {
        Self {
            success: true,
            value: Some(value),
            message: "OK".to_string(),
            errors: Vec::new(),
            expression_tokens,
            rpn_tokens,
        }
    }

    pub fn failure(
        error: CalcError,
        expression_tokens: Vec<Token>,
        rpn_tokens: Vec<Token>,
    ) -> Self {
        Self {
            success: false,
            value: None,
            message: error.message.clone(),
            errors: vec![error],
            expression_tokens,
            rpn_tokens,
        }
    }

    pub fn first_error(&self) -> Option<&CalcError> {
        self.errors.first()
    }

    /// The value, or the first error
    pub fn into_result(self) -> Result<Value, CalcError> {
        match (self.value, self.errors.into_iter().next()) {
            (Some(value), _) => Ok(value),
            (None, Some(error)) => Err(error),
            (None, None) => Err(CalcError::unexpected(
                "calculation produced neither a value nor an error",
                Default::default(),
            )),
        }
    }
}
