//! Sentence segmentation.
//!
//! A sentence is a maximal run of characters other than `.`, `!` and `?`,
//! followed by one or more of those terminal characters. The terminal run stays
//! attached to the sentence. Matches are trimmed and empty results dropped; a
//! trailing fragment without terminal punctuation is discarded.

use core::fmt;

use crate::error::AttentionError;

/// Terminal punctuation that closes a sentence.
pub const TERMINALS: [char; 3] = ['.', '!', '?'];

fn is_terminal(c: char) -> bool {
    TERMINALS.contains(&c)
}

/// A trimmed, non-empty sentence. Its position in the split output is its
/// display identity (`S1`, `S2`, …).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
pub struct Sentence(String);

impl Sentence {
    /// Build a sentence from raw text, trimming surrounding whitespace.
    ///
    /// Returns `None` when nothing remains after trimming.
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The sentence text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters (Unicode scalar values).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// First `max_chars` characters, with `...` appended when truncated.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.0.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

impl TryFrom<String> for Sentence {
    type Error = AttentionError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(&text).ok_or(AttentionError::EmptySentence)
    }
}

impl AsRef<str> for Sentence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split free text into sentences, in order of appearance.
///
/// ```
/// use attention_lens::sentence::split_sentences;
/// let s = split_sentences("I love cats. Cats are great!! trailing");
/// assert_eq!(s.len(), 2);
/// assert_eq!(s[1].as_str(), "Cats are great!!");
/// ```
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut rest = text;

    loop {
        // Terminals with no preceding body cannot open a sentence.
        let Some(start) = rest.find(|c: char| !is_terminal(c)) else {
            break;
        };
        let body = &rest[start..];
        let Some(body_end) = body.find(is_terminal) else {
            break;
        };
        let tail = &body[body_end..];
        let punct_len = tail.find(|c: char| !is_terminal(c)).unwrap_or(tail.len());

        if let Some(sentence) = Sentence::new(&body[..body_end + punct_len]) {
            sentences.push(sentence);
        }
        rest = &tail[punct_len..];
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sentences: &[Sentence]) -> Vec<&str> {
        sentences.iter().map(Sentence::as_str).collect()
    }

    #[test]
    fn test_splits_on_terminal_punctuation() {
        let s = split_sentences("I love cats. Cats are great.");
        assert_eq!(texts(&s), ["I love cats.", "Cats are great."]);
    }

    #[test]
    fn test_consecutive_terminals_stay_attached() {
        let s = split_sentences("Really?! Yes... Fine!");
        assert_eq!(texts(&s), ["Really?!", "Yes...", "Fine!"]);
    }

    #[test]
    fn test_unterminated_tail_is_discarded() {
        let s = split_sentences("First one. second has no end");
        assert_eq!(texts(&s), ["First one."]);
    }

    #[test]
    fn test_no_punctuation_yields_nothing() {
        assert!(split_sentences("no punctuation here").is_empty());
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_leading_terminals_are_skipped() {
        let s = split_sentences("...Hello there. ");
        assert_eq!(texts(&s), ["Hello there."]);
    }

    #[test]
    fn test_whitespace_is_trimmed_including_newlines() {
        let s = split_sentences("  One.\n\n\tTwo?  ");
        assert_eq!(texts(&s), ["One.", "Two?"]);
    }

    #[test]
    fn test_whitespace_only_body_keeps_its_punctuation() {
        let s = split_sentences("Hi.   ?");
        assert_eq!(texts(&s), ["Hi.", "?"]);
    }

    #[test]
    fn test_resplitting_concatenation_is_stable() {
        let first = split_sentences("Alpha beta. Gamma! Delta epsilon?");
        let joined: String = first.iter().map(Sentence::as_str).collect();
        let second = split_sentences(&joined);
        assert_eq!(first, second);
    }

    #[test]
    fn test_preview_truncates_by_characters() {
        let s = Sentence::new("The quick brown fox jumps over the lazy dog.").unwrap();
        assert_eq!(s.preview(30), "The quick brown fox jumps over...");
        let short = Sentence::new("Short.").unwrap();
        assert_eq!(short.preview(30), "Short.");
        let exact = Sentence::new("abcde").unwrap();
        assert_eq!(exact.preview(5), "abcde");
    }

    #[test]
    fn test_sentence_new_rejects_blank() {
        assert!(Sentence::new(" \t ").is_none());
        assert_eq!(Sentence::new("  x. ").unwrap().char_len(), 2);
    }

    #[test]
    fn test_try_from_string_keeps_the_non_empty_rule() {
        assert_eq!(Sentence::try_from("   ".to_string()), Err(AttentionError::EmptySentence));
        assert_eq!(Sentence::try_from(" Hi. ".to_string()).unwrap().as_str(), "Hi.");
    }
}
