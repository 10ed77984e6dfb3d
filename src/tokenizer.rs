use crate::index::Token;

/// Splits text into word tokens on any non-word character.
///
/// The evaluator keeps two instances: a case-folding one for query terms and
/// index lookups, and a case-preserving one for reconstructing field text in
/// snippets.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTokenizer {
    preserve_case: bool,
}

impl SimpleTokenizer {
    pub fn new(preserve_case: bool) -> Self {
        Self { preserve_case }
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|word| !word.is_empty())
            .map(|word| {
                if self.preserve_case {
                    Token::new(word)
                } else {
                    Token::new(word.to_lowercase())
                }
            })
            .collect()
    }
}
