pub mod compute;
pub mod corpus;
pub mod evaluate;
pub mod normalizer;
pub mod stop_words;
pub mod tfidf;
pub mod token;

use std::marker::PhantomData;

use indexmap::IndexSet;
use num::Num;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AffinityError, Result},
    utils::math::vector::ZeroSpVec,
    vectorizer::{
        compute::compare::{Compare, DefaultCompare},
        corpus::Corpus,
        normalizer::Normalizer,
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        token::TermFrequency,
    },
};

/// One document row of the weight matrix
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TFVector<N>
where
    N: Num + Copy,
{
    /// unit-length TF-IDF weights, sparse over the vocabulary
    pub weights: ZeroSpVec<N>,
    /// number of counted terms in this document
    pub term_sum: u64,
}

/// TF-IDF Vectorizer
/// Built once from a fixed, ordered set of documents.
/// The vocabulary and IDF values are frozen at build time;
/// every `transform` projects into the same column space.
///
/// - `N`: weight type (`f32` or `f64`)
/// - `E`: TF-IDF calculation engine
/// - `C`: similarity implementation
#[derive(Debug)]
pub struct TFIDFVectorizer<N = f64, E = DefaultTFIDFEngine, C = DefaultCompare>
where
    N: Num + Copy,
    E: TFIDFEngine<N>,
{
    normalizer: Normalizer,
    /// sorted vocabulary; position = column
    vocabulary: IndexSet<String>,
    /// document frequency statistics
    corpus: Corpus,
    /// IDF Vector
    idf: Vec<N>,
    /// weight matrix rows in document order
    documents: Vec<TFVector<N>>,
    _marker: PhantomData<(E, C)>,
}

impl<N, E, C> TFIDFVectorizer<N, E, C>
where
    N: Num + Copy + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
    C: Compare<N>,
{
    /// Build with the English normalizer
    pub fn build<T>(documents: &[T]) -> Result<Self>
    where
        T: AsRef<str> + Sync,
    {
        Self::build_with(Normalizer::english(), documents)
    }

    /// Build the vocabulary, IDF vector and weight matrix.
    ///
    /// # Errors
    /// * `NoDocuments` - `documents` is empty
    /// * `EmptyVocabulary` - no term survives normalization and stop-word removal
    pub fn build_with<T>(normalizer: Normalizer, documents: &[T]) -> Result<Self>
    where
        T: AsRef<str> + Sync,
    {
        if documents.is_empty() {
            return Err(AffinityError::NoDocuments);
        }

        let freqs: Vec<TermFrequency> = documents
            .par_iter()
            .map(|doc| {
                let mut freq = TermFrequency::new();
                freq.add_terms(&normalizer.analyze(doc.as_ref()));
                freq
            })
            .collect();

        let mut corpus = Corpus::new();
        for freq in &freqs {
            corpus.add_doc(freq);
        }
        if corpus.vocab_size() == 0 {
            return Err(AffinityError::EmptyVocabulary {
                doc_num: documents.len(),
            });
        }

        let vocabulary = corpus.sorted_vocabulary();
        let idf = E::idf_vec(&corpus, &vocabulary);
        let rows: Vec<TFVector<N>> = freqs
            .par_iter()
            .map(|freq| TFVector {
                weights: E::tfidf_vec(&E::tf_vec(freq, &vocabulary), &idf),
                term_sum: freq.term_sum(),
            })
            .collect();

        tracing::debug!(
            documents = rows.len(),
            vocabulary = vocabulary.len(),
            "built tf-idf matrix"
        );

        Ok(Self {
            normalizer,
            vocabulary,
            corpus,
            idf,
            documents: rows,
            _marker: PhantomData,
        })
    }

    /// Project a query onto the frozen vocabulary.
    /// Unknown terms are ignored; the result may be all-zero.
    pub fn transform(&self, query: &str) -> ZeroSpVec<N> {
        let mut freq = TermFrequency::new();
        freq.add_terms(&self.normalizer.analyze(query));
        let tf = E::tf_vec(&freq, &self.vocabulary);
        E::tfidf_vec(&tf, &self.idf)
    }

    /// Query stems (stop words included) that are in the vocabulary and carry
    /// weight in document `doc`. First occurrence order, no duplicates.
    pub fn matched_terms(&self, query: &str, doc: usize) -> Vec<String> {
        let stems: IndexSet<String> = self.normalizer.tokenize_and_stem(query).into_iter().collect();
        stems
            .into_iter()
            .filter(|stem| self.weight(doc, stem) > 0.0)
            .collect()
    }
}

/// accessors
impl<N, E, C> TFIDFVectorizer<N, E, C>
where
    N: Num + Copy + Into<f64>,
    E: TFIDFEngine<N>,
{
    /// Sorted vocabulary terms
    pub fn vocabulary(&self) -> Vec<&str> {
        self.vocabulary.iter().map(|t| t.as_str()).collect()
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains(term)
    }

    /// Column of `term`, `None` when it is not in the vocabulary
    #[inline]
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get_index_of(term)
    }

    pub fn idf(&self) -> &[N] {
        &self.idf
    }

    #[inline]
    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    /// Corpus statistics used for the IDF vector
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Weight of `term` in document `doc`; 0 for unknown terms or documents
    pub fn weight(&self, doc: usize, term: &str) -> f64 {
        match (self.documents.get(doc), self.term_index(term)) {
            (Some(row), Some(col)) => row.weights.get(col).into(),
            _ => 0.0,
        }
    }

    pub fn row(&self, doc: usize) -> Option<&ZeroSpVec<N>> {
        self.documents.get(doc).map(|d| &d.weights)
    }

    /// Weight matrix as dense rows in vocabulary column order
    pub fn dense_matrix(&self) -> Vec<Vec<f64>> {
        self.documents
            .iter()
            .map(|doc| doc.weights.to_dense().into_iter().map(Into::into).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENTS: [&str; 3] = [
        "The watchdog howls under the chilling moon.",
        "The feral cat observes the spectral transit of the night.",
        "The hound and the feline perform the rite together.",
    ];

    #[test]
    fn build_rejects_zero_documents() {
        let docs: [&str; 0] = [];
        let err = TFIDFVectorizer::<f64>::build(&docs).unwrap_err();
        assert!(matches!(err, AffinityError::NoDocuments));
    }

    #[test]
    fn build_rejects_empty_vocabulary() {
        let err = TFIDFVectorizer::<f64>::build(&["the of and", "42 !!", "a b c"]).unwrap_err();
        assert!(matches!(err, AffinityError::EmptyVocabulary { doc_num: 3 }));
    }

    #[test]
    fn vocabulary_is_sorted_stems_without_stop_words() {
        let v = TFIDFVectorizer::<f64>::build(&FRAGMENTS).unwrap();
        let vocab = v.vocabulary();
        assert!(vocab.contains(&"howl"));
        assert!(!vocab.contains(&"the"));
        assert!(!vocab.contains(&"under"));
        assert!(vocab.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(v.doc_num(), 3);
        assert_eq!(v.corpus().get_doc_num(), 3);
    }

    #[test]
    fn rows_are_unit_or_zero() {
        let v = TFIDFVectorizer::<f64>::build(&["cat dog cat", "!!!", "dog bird"]).unwrap();
        let norms: Vec<f64> = (0..3).map(|i| v.row(i).unwrap().norm()).collect();
        assert!((norms[0] - 1.0).abs() < 1e-12);
        assert_eq!(norms[1], 0.0);
        assert!((norms[2] - 1.0).abs() < 1e-12);
        assert!(v.dense_matrix().iter().flatten().all(|w| *w >= 0.0));
    }

    #[test]
    fn transform_never_grows_vocabulary() {
        let v = TFIDFVectorizer::<f64>::build(&FRAGMENTS).unwrap();
        let before = v.vocabulary().len();
        let q = v.transform("Wolves and ravens haunt a moonlit graveyard, howling!");
        assert_eq!(q.len(), before);
        assert!(q.indices().all(|i| i < before));
        assert_eq!(v.vocabulary().len(), before);

        let unknown = v.transform("zebra quantum");
        assert_eq!(unknown.nnz(), 0);
    }

    #[test]
    fn howling_query_matches_the_watchdog() {
        let v = TFIDFVectorizer::<f64>::build(&FRAGMENTS).unwrap();
        let hits = v.similarity(&v.transform("Which creature howls?"));
        let scores = hits.scores();
        assert!(scores[0] > scores[1]);
        assert!(scores[0] > scores[2]);
        assert_eq!(hits.best().map(|(k, _, _)| *k), Some(0));
        assert!(scores.iter().all(|s| (0.0..=1.0 + 1e-12).contains(s)));
        assert_eq!(v.matched_terms("Which creature howls?", 0), vec!["howl"]);
        assert!(v.matched_terms("Which creature howls?", 1).is_empty());
    }

    #[test]
    fn f32_weights_agree_with_f64() {
        let v64 = TFIDFVectorizer::<f64>::build(&FRAGMENTS).unwrap();
        let v32 = TFIDFVectorizer::<f32>::build(&FRAGMENTS).unwrap();
        let s64 = v64.similarity(&v64.transform("howling hound")).scores();
        let s32 = v32.similarity(&v32.transform("howling hound")).scores();
        for (a, b) in s64.iter().zip(s32.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }
}
