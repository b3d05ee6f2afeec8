use crate::ast::{build_ast, AstNode, Span};
use crate::environment::Environment;
use crate::error::CalcError;
use crate::evaluator::{evaluate, panic_message, Variables};
use crate::parser::{generate, tokenize, Token};
use crate::{CalcResult, CalculationResult, ResourceLimits, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// The formula engine.
///
/// Owns an [`Environment`] and the resource limits, and runs the
/// tokenize → generate → evaluate pipeline. Compiled expressions share the
/// environment snapshot that was current when they were compiled.
#[derive(Debug, Clone)]
pub struct Engine {
    environment: Arc<Environment>,
    limits: ResourceLimits,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            environment: Arc::new(Environment::with_defaults()),
            limits: ResourceLimits::default(),
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment: Arc::new(environment),
            limits: ResourceLimits::default(),
        }
    }

    /// Create an engine with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Mutable access to the environment
    ///
    /// Expressions compiled before the change keep the environment they were
    /// compiled with.
    pub fn environment_mut(&mut self) -> &mut Environment {
        Arc::make_mut(&mut self.environment)
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: ResourceLimits) {
        self.limits = limits;
    }

    /// Tokenize and generate once for repeated evaluation
    pub fn compile(&self, expression: &str) -> CalcResult<CompiledExpression> {
        guarded(|| {
            let tokens = tokenize(expression, &self.environment, &self.limits)?;
            let rpn = generate(&tokens, &self.limits)?;
            tracing::debug!(tokens = tokens.len(), rpn = rpn.len(), "compiled expression");
            Ok(CompiledExpression {
                source: Arc::from(expression),
                tokens: Arc::from(tokens),
                rpn: Arc::from(rpn),
                environment: Arc::clone(&self.environment),
            })
        })
    }

    pub fn calculate(&self, expression: &str) -> CalculationResult {
        self.run(expression, None)
    }

    /// Calculate with caller bindings layered over the environment's variables
    pub fn calculate_with(&self, expression: &str, variables: &Variables) -> CalculationResult {
        self.run(expression, Some(variables))
    }

    /// Calculate and return just the value or the first error
    pub fn evaluate(&self, expression: &str, variables: Option<&Variables>) -> CalcResult<Value> {
        self.run(expression, variables).into_result()
    }

    fn run(&self, expression: &str, variables: Option<&Variables>) -> CalculationResult {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let tokens = match tokenize(expression, &self.environment, &self.limits) {
                Ok(tokens) => tokens,
                Err(error) => return CalculationResult::failure(error, Vec::new(), Vec::new()),
            };
            let rpn = match generate(&tokens, &self.limits) {
                Ok(rpn) => rpn,
                Err(error) => return CalculationResult::failure(error, tokens, Vec::new()),
            };
            match evaluate(&rpn, expression, &self.environment, variables) {
                Ok(value) => CalculationResult::success(value, tokens, rpn),
                Err(error) => CalculationResult::failure(error, tokens, rpn),
            }
        }));
        let result = outcome.unwrap_or_else(|panic| {
            CalculationResult::failure(internal_failure(panic), Vec::new(), Vec::new())
        });
        log_result(&result);
        result
    }
}

/// An expression tokenized and converted to RPN, ready to evaluate
///
/// Cheap to clone and safe to share between threads; every evaluation takes
/// its own variable bindings.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    source: Arc<str>,
    tokens: Arc<[Token]>,
    rpn: Arc<[Token]>,
    environment: Arc<Environment>,
}

impl CompiledExpression {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn rpn(&self) -> &[Token] {
        &self.rpn
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn evaluate(&self, variables: Option<&Variables>) -> CalcResult<Value> {
        guarded(|| evaluate(&self.rpn, &self.source, &self.environment, variables))
    }

    pub fn calculate(&self, variables: Option<&Variables>) -> CalculationResult {
        let result = match self.evaluate(variables) {
            Ok(value) => {
                CalculationResult::success(value, self.tokens.to_vec(), self.rpn.to_vec())
            }
            Err(error) => {
                CalculationResult::failure(error, self.tokens.to_vec(), self.rpn.to_vec())
            }
        };
        log_result(&result);
        result
    }

    /// Tree view of the expression with the value of every evaluated node
    pub fn ast(&self, variables: Option<&Variables>) -> CalcResult<AstNode> {
        guarded(|| build_ast(&self.rpn, &self.environment, variables))
    }
}

fn guarded<T>(f: impl FnOnce() -> CalcResult<T>) -> CalcResult<T> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|panic| Err(internal_failure(panic)))
}

fn internal_failure(panic: Box<dyn std::any::Any + Send>) -> CalcError {
    let detail = panic_message(panic.as_ref());
    tracing::warn!(detail = %detail, "panic converted into an error");
    CalcError::unexpected(detail, Span::default())
}

fn log_result(result: &CalculationResult) {
    match result.first_error() {
        None => tracing::debug!("calculation succeeded"),
        Some(error) => tracing::debug!(
            code = %error.code,
            start = error.span.start,
            length = error.span.length,
            "calculation failed"
        ),
    }
}
