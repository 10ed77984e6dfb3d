use thiserror::Error;

/// Errors raised while evaluating a computed-field expression.
///
/// `Parse`, `Expression` and `Unsupported` are scoped to a single expression
/// on a single document; the orchestrator skips the expression and carries
/// on. `Contract` means the AST broke an invariant the parser is supposed to
/// uphold and is allowed to abort the whole batch.
#[derive(Debug, Error)]
pub enum EvalError {
    // The expression text did not parse.
    #[error("parse error: {0}")]
    Parse(String),

    // The expression parsed but cannot be evaluated against this document
    // (missing field, non-numeric operand, unknown function, ...).
    #[error("cannot evaluate expression: {0}")]
    Expression(String),

    // Valid expression, but this runtime does not implement the capability.
    #[error("{0} is not supported")]
    Unsupported(&'static str),

    // Invariant break in the AST handed to the evaluator.
    #[error("expression contract violated: {0}")]
    Contract(String),
}

impl EvalError {
    /// Whether the orchestrator may swallow this error and move on to the
    /// next expression.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EvalError::Contract(_))
    }
}

impl From<crate::parser::ParseError> for EvalError {
    fn from(err: crate::parser::ParseError) -> Self {
        let crate::parser::ParseError::InvalidSyntax(msg) = err;
        EvalError::Parse(msg)
    }
}

// Type alias for results that use `EvalError` as the error type
pub type Result<T> = std::result::Result<T, EvalError>;
