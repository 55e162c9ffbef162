use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::TermFrequency;

/// keep document count and per-term document frequency
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    /// number of documents added
    doc_num: u64,
    /// number of documents each term appears in
    term_counts: IndexMap<Box<str>, u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            term_counts: IndexMap::new(),
        }
    }

    /// Add a document; each distinct term counts once
    pub fn add_doc(&mut self, freq: &TermFrequency) {
        self.doc_num += 1;
        for term in freq.term_set_ref() {
            self.term_counts
                .entry(term.into())
                .and_modify(|count| *count += 1)
                .or_insert(1);
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the number of documents containing `term`
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// All terms sorted lexicographically.
    /// The position of a term is its column in the weight matrix.
    pub fn sorted_vocabulary(&self) -> IndexSet<String> {
        let mut terms: Vec<String> = self.term_counts.keys().map(|t| t.to_string()).collect();
        terms.sort_unstable();
        terms.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq(terms: &[&str]) -> TermFrequency {
        let mut f = TermFrequency::new();
        f.add_terms(terms);
        f
    }

    #[test]
    fn document_frequency_counts_each_document_once() {
        let mut corpus = Corpus::new();
        corpus.add_doc(&freq(&["howl", "howl", "moon"]));
        corpus.add_doc(&freq(&["moon", "cat"]));
        assert_eq!(corpus.get_doc_num(), 2);
        assert_eq!(corpus.get_term_count("howl"), 1);
        assert_eq!(corpus.get_term_count("moon"), 2);
        assert_eq!(corpus.get_term_count("dog"), 0);
        assert_eq!(corpus.vocab_size(), 3);
    }

    #[test]
    fn vocabulary_is_sorted() {
        let mut corpus = Corpus::new();
        corpus.add_doc(&freq(&["watchdog", "howl", "moon", "chill"]));
        let vocab: Vec<String> = corpus.sorted_vocabulary().into_iter().collect();
        assert_eq!(vocab, vec!["chill", "howl", "moon", "watchdog"]);
    }

    #[test]
    fn empty_documents_still_count() {
        let mut corpus = Corpus::new();
        corpus.add_doc(&TermFrequency::new());
        assert_eq!(corpus.get_doc_num(), 1);
        assert_eq!(corpus.vocab_size(), 0);
    }
}
