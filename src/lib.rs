//! Expression evaluation for computed search fields.
//!
//! A search request may declare named expressions (`price * 1.1`,
//! `snippet("red car", body)`); for every matched document the [`Evaluator`]
//! computes each expression against that document's fields and attaches the
//! result to the document's expression store, with per-expression failure
//! isolation.

pub mod diagnostics;
pub mod document;
pub mod engine;
pub mod errors;
pub mod expression;
pub mod functions;
pub mod index;
pub mod snippet;
pub mod tokenizer;
mod parser;

pub use document::{Document, NamedExpression, ScoredDocument, Value};
pub use engine::{Evaluator, SCORE_NAME};
pub use errors::{EvalError, Result};
pub use index::{InvertedIndex, Posting, Token};

/// Convenience: evaluate a batch of named expressions against one document.
///
/// Recoverable failures skip the affected expression; only contract
/// violations (a malformed AST) surface as `Err`.
pub fn evaluate_all(
    doc: &mut ScoredDocument,
    index: &InvertedIndex,
    exprs: &[NamedExpression],
) -> Result<()> {
    Evaluator::new(doc, index).evaluate_all(exprs)
}
