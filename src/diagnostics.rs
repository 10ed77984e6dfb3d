use crate::errors::EvalError;

/// Where the evaluator reports expressions it skipped.
///
/// The evaluator never logs on its own; callers inject a sink so the core
/// stays free of process-wide logging configuration.
pub trait DiagnosticSink {
    /// A recoverable failure: the expression was skipped for this document.
    fn expression_skipped(&self, name: &str, error: &EvalError);

    /// The expression asked for a capability this runtime does not provide.
    /// Reported separately because the runtime, not the request, is the
    /// limiting factor.
    fn capability_gap(&self, name: &str, error: &EvalError);
}

/// Default sink backed by `tracing`: skips at debug, capability gaps at warn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn expression_skipped(&self, name: &str, error: &EvalError) {
        tracing::debug!(expression = name, %error, "skipping expression");
    }

    fn capability_gap(&self, name: &str, error: &EvalError) {
        tracing::warn!(expression = name, %error, "expression needs an unsupported capability");
    }
}
