use std::fmt;

use rust_stemmers::{Algorithm, Stemmer};

use crate::vectorizer::stop_words::is_stop_word;

/// Reduces a lowercase token to its root form
pub trait TermStemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Snowball (Porter2) stemmer from `rust-stemmers`
impl TermStemmer for Stemmer {
    #[inline]
    fn stem(&self, token: &str) -> String {
        Stemmer::stem(self, token).into_owned()
    }
}

/// Text Normalizer
/// Turns raw text into the ordered sequence of stems the vectorizer counts.
///
/// - `tokenize_and_stem` lowercases, replaces everything that is not `a-z`
///   or whitespace with a space, drops tokens of one character and stems
///   the rest.
/// - `analyze` additionally drops English stop words (checked on the stem).
///
/// Duplicates and order are kept.
pub struct Normalizer {
    stemmer: Box<dyn TermStemmer>,
}

impl Normalizer {
    /// Normalizer with the English Snowball stemmer
    pub fn english() -> Self {
        Self::with_stemmer(Stemmer::create(Algorithm::English))
    }

    pub fn with_stemmer<S>(stemmer: S) -> Self
    where
        S: TermStemmer + 'static,
    {
        Self {
            stemmer: Box::new(stemmer),
        }
    }

    /// # Arguments
    /// * `text` - arbitrary input text
    ///
    /// # Returns
    /// * `Vec<String>` - stems in input order, stop words included
    pub fn tokenize_and_stem(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_lowercase() || c.is_whitespace() { c } else { ' ' })
            .collect();
        cleaned
            .split_whitespace()
            .filter(|token| token.len() > 1)
            .map(|token| self.stemmer.stem(token))
            .collect()
    }

    /// Stems with stop words removed
    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.tokenize_and_stem(text)
            .into_iter()
            .filter(|stem| !is_stop_word(stem))
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;
    impl TermStemmer for Identity {
        fn stem(&self, token: &str) -> String {
            token.to_string()
        }
    }

    #[test]
    fn strips_non_letters_and_short_tokens() {
        let n = Normalizer::with_stemmer(Identity);
        let tokens = n.tokenize_and_stem("Hello, World! a 42x b-c dog's");
        assert_eq!(tokens, vec!["hello", "world", "dog"]);
    }

    #[test]
    fn tokens_are_lowercase_letters_only() {
        let n = Normalizer::english();
        let input = "Ünïcode MIXED-case t3xt, with_under_scores & émojis 🐺 howling!!";
        for token in n.tokenize_and_stem(input) {
            assert!(token.len() >= 2, "{token:?} too short");
            assert!(token.chars().all(|c| c.is_ascii_lowercase()), "{token:?} has non a-z chars");
        }
    }

    #[test]
    fn punctuation_and_digits_give_nothing() {
        let n = Normalizer::english();
        assert!(n.tokenize_and_stem("123 !!! ... 4.56 -- ?").is_empty());
        assert!(n.tokenize_and_stem("").is_empty());
    }

    #[test]
    fn stems_with_snowball() {
        let n = Normalizer::english();
        assert_eq!(n.tokenize_and_stem("The dog howls"), vec!["the", "dog", "howl"]);
        assert_eq!(n.tokenize_and_stem("playing cats"), vec!["play", "cat"]);
    }

    #[test]
    fn analyze_drops_stop_words_and_keeps_duplicates() {
        let n = Normalizer::english();
        assert_eq!(n.analyze("Which creature howls? The moon, the moon."), vec!["creatur", "howl", "moon", "moon"]);
    }
}
