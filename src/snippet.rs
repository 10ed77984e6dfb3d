use crate::index::Token;

/// Default character budget for a generated snippet, ellipses included.
pub const DEFAULT_MAX_SNIPPET_LENGTH: usize = 160;

/// Characters reserved for the `...` markers on both ends.
const ELLIPSIS_MARGIN: usize = 6;

/// Builds a snippet around `words[position]`, bounded to roughly
/// `max_length` characters.
///
/// The highlighted word is wrapped in `<b>`/`</b>` and the excerpt grows
/// alternately to the right and to the left, one word per side per round,
/// until either side of the document runs out or the projected length would
/// reach the budget. The fit check uses the word lengths recorded on the
/// previous round, so the result may overshoot `max_length` by up to one
/// word plus separator per side; that leniency is part of the excerpt
/// policy.
///
/// The highlighted word itself is never truncated, so a tiny budget still
/// yields a valid (possibly over-budget) snippet.
pub fn generate(words: &[Token], position: usize, max_length: usize) -> String {
    let mut snippet = format!("<b>{}</b>", words[position].as_str());
    let mut next_len = if position + 1 < words.len() {
        word_len(&words[position + 1]) + 1
    } else {
        0
    };
    let mut prev_len = if position > 0 {
        word_len(&words[position - 1]) + 1
    } else {
        0
    };

    let mut i = 1;
    while snippet.chars().count() + next_len + prev_len + ELLIPSIS_MARGIN < max_length
        && (position + i < words.len() || position > i)
    {
        if position + i < words.len() {
            snippet = format!("{} {}", snippet, words[position + i].as_str());
            next_len = word_len(&words[position + i]) + 1;
        } else {
            next_len = 0;
        }
        if position >= i {
            snippet = format!("{} {}", words[position - i].as_str(), snippet);
            prev_len = word_len(&words[position - i]) + 1;
        } else {
            prev_len = 0;
        }
        i += 1;
    }
    format!("...{snippet}...")
}

fn word_len(word: &Token) -> usize {
    word.as_str().chars().count()
}
