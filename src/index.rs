use std::collections::HashMap;

use crate::document::{Document, Value};
use crate::tokenizer::SimpleTokenizer;

/// A tokenized word, optionally field-qualified as `field:term`.
/// Equality is by exact character content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(chars: impl Into<String>) -> Self {
        Token(chars.into())
    }

    pub fn qualified(field: &str, term: &str) -> Self {
        Token(format!("{field}:{term}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One inverted-index entry: a token occurring in one document, with the
/// ordered term positions inside that field's tokenized text. An empty
/// position list means the token is present but positions were not tracked;
/// the snippet path skips such postings.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub doc_id: String,
    pub positions: Vec<usize>,
}

/// In-memory inverted index mapping a field-qualified token to its postings.
/// Read-only to the evaluator; writable only while indexing documents.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<Token, Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Postings for `token`, empty when the token was never indexed.
    pub fn postings(&self, token: &Token) -> &[Posting] {
        self.postings.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indexes every text field of `doc`, case-folded. Positions count
    /// tokens continuously across the values of a multi-valued field, so a
    /// posting's position list stays monotonically increasing.
    pub fn add_document(&mut self, doc: &Document) {
        let tokenizer = SimpleTokenizer::new(false);
        for (field, values) in doc.fields() {
            let mut offset = 0;
            for value in values {
                let Value::Text(text) = value else { continue };
                let words = tokenizer.tokenize(text);
                for (position, word) in words.iter().enumerate() {
                    self.insert(
                        Token::qualified(field, word.as_str()),
                        &doc.id,
                        offset + position,
                    );
                }
                offset += words.len();
            }
        }
    }

    /// Appends a ready-made posting, e.g. one whose positions were not
    /// tracked at indexing time.
    pub fn add_posting(&mut self, token: Token, posting: Posting) {
        self.postings.entry(token).or_default().push(posting);
    }

    fn insert(&mut self, token: Token, doc_id: &str, position: usize) {
        let postings = self.postings.entry(token).or_default();
        match postings.iter_mut().find(|p| p.doc_id == doc_id) {
            Some(posting) => posting.positions.push(position),
            None => postings.push(Posting {
                doc_id: doc_id.to_string(),
                positions: vec![position],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_token_offsets() {
        let doc = Document::new("d1").with_field("body", "red car, red paint");
        let mut index = InvertedIndex::new();
        index.add_document(&doc);

        let postings = index.postings(&Token::qualified("body", "red"));
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].doc_id, "d1");
        assert_eq!(postings[0].positions, vec![0, 2]);
    }

    #[test]
    fn multi_valued_fields_keep_positions_increasing() {
        let doc = Document::new("d1")
            .with_field("tag", "red car")
            .with_field("tag", "blue car");
        let mut index = InvertedIndex::new();
        index.add_document(&doc);

        let postings = index.postings(&Token::qualified("tag", "car"));
        assert_eq!(postings[0].positions, vec![1, 3]);
    }

    #[test]
    fn unknown_token_has_no_postings() {
        let index = InvertedIndex::new();
        assert!(index.postings(&Token::qualified("body", "ghost")).is_empty());
    }
}
