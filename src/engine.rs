use itertools::Itertools;

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::document::{NamedExpression, ScoredDocument, Value};
use crate::errors::{EvalError, Result};
use crate::expression::{parse_expr, ExprNode};
use crate::functions::{Builtin, CallShape};
use crate::index::{InvertedIndex, Token};
use crate::snippet;
use crate::tokenizer::SimpleTokenizer;

/// Reserved identifier resolving to the document's relevance score.
pub const SCORE_NAME: &str = "_score";

static DEFAULT_SINK: TracingSink = TracingSink;

/// =========================
/// Orchestrator
/// =========================

/// Evaluates a search request's named expressions against one matched
/// document and attaches the results to its expression store.
///
/// One instance is bound to exactly one document and one index for the
/// duration of that document's evaluation; the index and tokenizer rules are
/// read-only and may be shared across instances.
pub struct Evaluator<'a> {
    doc: &'a mut ScoredDocument,
    index: &'a InvertedIndex,
    tokenizer: SimpleTokenizer,
    case_preserving_tokenizer: SimpleTokenizer,
    diagnostics: &'a dyn DiagnosticSink,
    max_snippet_length: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(doc: &'a mut ScoredDocument, index: &'a InvertedIndex) -> Self {
        Self {
            doc,
            index,
            tokenizer: SimpleTokenizer::new(false),
            case_preserving_tokenizer: SimpleTokenizer::new(true),
            diagnostics: &DEFAULT_SINK,
            max_snippet_length: snippet::DEFAULT_MAX_SNIPPET_LENGTH,
        }
    }

    pub fn with_diagnostics(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn with_max_snippet_length(mut self, max_length: usize) -> Self {
        self.max_snippet_length = max_length;
        self
    }

    /// Evaluates one named expression and stores the result under its name.
    ///
    /// Recoverable failures (bad syntax, missing field, unsupported
    /// capability) skip the expression, report it to the diagnostic sink and
    /// return `Ok`; only contract violations propagate.
    pub fn evaluate(&mut self, expr: &NamedExpression) -> Result<()> {
        let outcome = parse_expr(&expr.expression)
            .map_err(EvalError::from)
            .and_then(|ast| self.eval_node(&ast));
        match outcome {
            Ok(Some(value)) => {
                self.doc.expressions.insert(expr.name.clone(), value);
                Ok(())
            }
            // A snippet with no match produces no value and is not an error.
            Ok(None) => Ok(()),
            Err(err @ EvalError::Unsupported(_)) => {
                self.diagnostics.capability_gap(&expr.name, &err);
                Ok(())
            }
            Err(err) if err.is_recoverable() => {
                self.diagnostics.expression_skipped(&expr.name, &err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Evaluates a whole batch with per-expression failure isolation.
    pub fn evaluate_all(&mut self, exprs: &[NamedExpression]) -> Result<()> {
        for expr in exprs {
            self.evaluate(expr)?;
        }
        Ok(())
    }

    /// =========================
    /// AST walker
    /// =========================

    /// `None` means the expression legitimately produced no value for this
    /// document (a snippet whose terms did not match).
    fn eval_node(&self, node: &ExprNode) -> Result<Option<Value>> {
        match node {
            ExprNode::Call { name, args } => {
                let builtin = Builtin::lookup(name)
                    .ok_or_else(|| EvalError::Expression(format!("no function named {name}")))?;
                self.call_builtin(builtin, args)
            }
            ExprNode::Plus(lhs, rhs) => self.arith(lhs, rhs, |a, b| a + b),
            ExprNode::Minus(lhs, rhs) => self.arith(lhs, rhs, |a, b| a - b),
            ExprNode::Times(lhs, rhs) => self.arith(lhs, rhs, |a, b| a * b),
            ExprNode::Divide(lhs, rhs) => {
                let quotient = self.eval_numeric(lhs)? / self.eval_numeric(rhs)?;
                if quotient.is_finite() {
                    Ok(Some(Value::Number(quotient)))
                } else {
                    Err(EvalError::Expression(
                        "division produced a non-finite value".to_string(),
                    ))
                }
            }
            ExprNode::Neg(inner) => Ok(Some(Value::Number(-self.eval_numeric(inner)?))),
            ExprNode::Int(text) | ExprNode::Float(text) => {
                let n: f64 = text.parse().map_err(|_| {
                    EvalError::Contract(format!("unparseable numeric literal {text:?}"))
                })?;
                Ok(Some(Value::Number(n)))
            }
            ExprNode::Phrase(text) => Ok(Some(Value::Text(strip_quotes(text).to_string()))),
            ExprNode::Name(name) => {
                if name == SCORE_NAME {
                    return Ok(Some(Value::Number(self.doc.score)));
                }
                match self.doc.document.first_value(name) {
                    Some(value) => Ok(Some(value.clone())),
                    None => Err(EvalError::Expression(format!(
                        "no field named {name} in document"
                    ))),
                }
            }
        }
    }

    fn call_builtin(&self, builtin: Builtin, args: &[ExprNode]) -> Result<Option<Value>> {
        match builtin.shape() {
            CallShape::NumericFold(fold) => {
                if args.is_empty() {
                    return Err(EvalError::Contract(format!(
                        "{} requires at least one argument",
                        builtin.name()
                    )));
                }
                let first = self.eval_numeric(&args[0])?;
                let folded = args[1..]
                    .iter()
                    .map(|node| self.eval_numeric(node))
                    .fold_ok(first, fold)?;
                Ok(Some(Value::Number(folded)))
            }
            CallShape::RawFieldName => {
                let [arg] = args else {
                    return Err(EvalError::Expression(format!(
                        "{} takes exactly one field name",
                        builtin.name()
                    )));
                };
                let field = raw_text(arg)?;
                Ok(Some(Value::Number(
                    self.doc.document.field_count(field) as f64
                )))
            }
            CallShape::QueryAndField => {
                let [query, field, ..] = args else {
                    return Err(EvalError::Expression(format!(
                        "{} takes a query and a field name",
                        builtin.name()
                    )));
                };
                self.snippet_value(raw_text(query)?, raw_text(field)?)
            }
            CallShape::Unsupported => Err(EvalError::Unsupported(builtin.name())),
        }
    }

    /// Finds the first indexed match of any query term inside `field` and
    /// excerpts the field text around it.
    fn snippet_value(&self, query: &str, field: &str) -> Result<Option<Value>> {
        for term in self.tokenizer.tokenize(query) {
            let token = Token::qualified(field, term.as_str());
            for posting in self.index.postings(&token) {
                if posting.doc_id != self.doc.document.id || posting.positions.is_empty() {
                    continue;
                }
                let field_text = match self.doc.document.first_value(field) {
                    Some(Value::Text(text)) => text,
                    _ => {
                        return Err(EvalError::Expression(format!(
                            "no text field named {field} in document"
                        )))
                    }
                };
                let words = self.case_preserving_tokenizer.tokenize(field_text);
                let position = posting.positions[0];
                if position >= words.len() {
                    continue;
                }
                return Ok(Some(Value::Text(snippet::generate(
                    &words,
                    position,
                    self.max_snippet_length,
                ))));
            }
        }
        Ok(None)
    }

    fn arith(
        &self,
        lhs: &ExprNode,
        rhs: &ExprNode,
        op: fn(f64, f64) -> f64,
    ) -> Result<Option<Value>> {
        Ok(Some(Value::Number(op(
            self.eval_numeric(lhs)?,
            self.eval_numeric(rhs)?,
        ))))
    }

    fn eval_numeric(&self, node: &ExprNode) -> Result<f64> {
        match self.eval_node(node)? {
            Some(Value::Number(n)) => Ok(n),
            Some(Value::Text(text)) => Err(EvalError::Expression(format!(
                "expected a numeric value, got {text:?}"
            ))),
            None => Err(EvalError::Expression(
                "expression produced no value".to_string(),
            )),
        }
    }
}

/// Strips one leading and one trailing quote character, if present.
fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Raw argument text for the builtins that do not evaluate their arguments.
fn raw_text(node: &ExprNode) -> Result<&str> {
    match node {
        ExprNode::Name(name) => Ok(name),
        ExprNode::Phrase(text) => Ok(strip_quotes(text)),
        _ => Err(EvalError::Expression(
            "expected a name or quoted phrase".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn listing() -> (ScoredDocument, InvertedIndex) {
        let doc = Document::new("car-1")
            .with_field("price", 19500.0)
            .with_field("body", "Low mileage red car with sunroof and alloy wheels")
            .with_field("color", "red")
            .with_field("color", "burgundy");
        let mut index = InvertedIndex::new();
        index.add_document(&doc);
        (ScoredDocument::with_score(doc, 1.25), index)
    }

    fn eval_one(scored: &mut ScoredDocument, index: &InvertedIndex, name: &str, text: &str) {
        Evaluator::new(scored, index)
            .evaluate(&NamedExpression::new(name, text))
            .unwrap();
    }

    #[test]
    fn arithmetic_over_fields_and_score() {
        let (mut scored, index) = listing();
        eval_one(&mut scored, &index, "double", "price * 2");
        eval_one(&mut scored, &index, "boosted", "_score + 1");
        assert_eq!(scored.expressions["double"], Value::Number(39000.0));
        assert_eq!(scored.expressions["boosted"], Value::Number(2.25));
    }

    #[test]
    fn snippet_highlights_the_matched_term() {
        let (mut scored, index) = listing();
        eval_one(&mut scored, &index, "blurb", r#"snippet("red car", body)"#);
        let Value::Text(out) = &scored.expressions["blurb"] else {
            panic!("expected a text snippet");
        };
        assert_eq!(out, "...Low mileage <b>red</b> car with sunroof and alloy wheels...");
    }

    #[test]
    fn snippet_without_a_match_attaches_nothing() {
        let (mut scored, index) = listing();
        eval_one(&mut scored, &index, "blurb", r#"snippet("submarine", body)"#);
        assert!(scored.expressions.is_empty());
    }

    #[derive(Default)]
    struct RecordingSink {
        skipped: RefCell<Vec<String>>,
        gaps: RefCell<Vec<String>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn expression_skipped(&self, name: &str, _error: &EvalError) {
            self.skipped.borrow_mut().push(name.to_string());
        }

        fn capability_gap(&self, name: &str, _error: &EvalError) {
            self.gaps.borrow_mut().push(name.to_string());
        }
    }

    #[test]
    fn sink_severity_separates_bad_input_from_capability_gaps() {
        let (mut scored, index) = listing();
        let sink = RecordingSink::default();
        let mut evaluator = Evaluator::new(&mut scored, &index).with_diagnostics(&sink);
        evaluator
            .evaluate(&NamedExpression::new("missing", "mileage * 2"))
            .unwrap();
        evaluator
            .evaluate(&NamedExpression::new("geo", "distance(home, here)"))
            .unwrap();
        assert_eq!(*sink.skipped.borrow(), vec!["missing".to_string()]);
        assert_eq!(*sink.gaps.borrow(), vec!["geo".to_string()]);
    }
}
