use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A scalar produced by expression evaluation and stored in document fields.
///
/// All numeric computation runs over `f64`; integer literals are widened at
/// evaluation time, so there is no separate integer variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// An immutable document: an identifier plus named fields, each holding one
/// or more values in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    fields: BTreeMap<String, Vec<Value>>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style variant of [`add_field`](Self::add_field).
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.add_field(name, value);
        self
    }

    /// Appends a value under `name`. Repeated names make a multi-valued field.
    pub fn add_field(&mut self, name: &str, value: impl Into<Value>) {
        self.fields
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    pub fn field_values(&self, name: &str) -> Option<&[Value]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Number of values stored under `name`; 0 when the field is absent.
    pub fn field_count(&self, name: &str) -> usize {
        self.fields.get(name).map_or(0, Vec::len)
    }

    /// The representative value of a field is its first stored value.
    pub fn first_value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).and_then(|values| values.first())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// A matched document during result construction: the document itself, its
/// mutable relevance score, and the store of computed expression results.
///
/// The expression store is filled one entry per successfully evaluated
/// expression; the last write for a given name wins.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
    pub expressions: HashMap<String, Value>,
}

impl ScoredDocument {
    pub fn new(document: Document) -> Self {
        Self::with_score(document, 0.0)
    }

    pub fn with_score(document: Document, score: f64) -> Self {
        Self {
            document,
            score,
            expressions: HashMap::new(),
        }
    }
}

/// A named expression declared on a search request, e.g.
/// `promo_price = price * 0.9`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedExpression {
    pub name: String,
    pub expression: String,
}

impl NamedExpression {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }
}
