use std::collections::BTreeMap;

use clap::Parser;
use computed_field_eval::{
    snippet, Document, Evaluator, InvertedIndex, NamedExpression, ScoredDocument, Value,
};
use serde_json::Value as Json;

/// Evaluate computed-field expressions against a JSON document.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON document: an object mapping field names to a string, a number,
    /// or an array of those.
    json: String,
    /// Named expression to evaluate, as NAME=EXPRESSION. Repeatable.
    #[arg(long = "expr", value_name = "NAME=EXPRESSION")]
    exprs: Vec<String>,
    /// Relevance score exposed to expressions as _score.
    #[arg(long, default_value_t = 0.0)]
    score: f64,
    /// Document identifier.
    #[arg(long, default_value = "doc")]
    id: String,
    /// Maximum snippet length in characters.
    #[arg(long, default_value_t = snippet::DEFAULT_MAX_SNIPPET_LENGTH)]
    max_snippet_length: usize,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let data: Json = match serde_json::from_str(&args.json) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid JSON: {e}");
            std::process::exit(1);
        }
    };
    let document = match document_from_json(&args.id, &data) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Invalid document: {e}");
            std::process::exit(1);
        }
    };

    let mut expressions = Vec::new();
    for spec in &args.exprs {
        match spec.split_once('=') {
            Some((name, text)) => expressions.push(NamedExpression::new(name.trim(), text)),
            None => {
                eprintln!("Invalid --expr {spec:?}: expected NAME=EXPRESSION");
                std::process::exit(1);
            }
        }
    }

    // The demo index covers just the document being evaluated.
    let mut index = InvertedIndex::new();
    index.add_document(&document);

    let mut scored = ScoredDocument::with_score(document, args.score);
    let mut evaluator =
        Evaluator::new(&mut scored, &index).with_max_snippet_length(args.max_snippet_length);
    if let Err(e) = evaluator.evaluate_all(&expressions) {
        eprintln!("Evaluation aborted: {e}");
        std::process::exit(1);
    }

    let ordered: BTreeMap<&String, &Value> = scored.expressions.iter().collect();
    match serde_json::to_string_pretty(&ordered) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("Cannot serialize results: {e}");
            std::process::exit(1);
        }
    }
}

fn document_from_json(id: &str, data: &Json) -> Result<Document, String> {
    let Json::Object(map) = data else {
        return Err("document must be a JSON object".to_string());
    };
    let mut doc = Document::new(id);
    for (name, value) in map {
        match value {
            Json::Array(items) => {
                for item in items {
                    doc.add_field(name, field_value(name, item)?);
                }
            }
            other => doc.add_field(name, field_value(name, other)?),
        }
    }
    Ok(doc)
}

fn field_value(name: &str, value: &Json) -> Result<Value, String> {
    match value {
        Json::String(s) => Ok(Value::Text(s.clone())),
        Json::Number(n) => n
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| format!("field {name}: number out of range")),
        other => Err(format!("field {name}: unsupported value {other}")),
    }
}
