use indexmap::IndexSet;
use num::Num;

use crate::{utils::math::vector::ZeroSpVec, vectorizer::{corpus::Corpus, token::TermFrequency}};

pub trait TFIDFEngine<N>
where
    N: Num + Copy,
{
    /// Build the IDF vector
    /// # Arguments
    /// * `corpus` - document frequencies
    /// * `term_dim_sample` - vocabulary; position = column
    /// # Returns
    /// * `Vec<N>` - one IDF value per column
    fn idf_vec(corpus: &Corpus, term_dim_sample: &IndexSet<String>) -> Vec<N>;

    /// Build the TF vector of one document.
    /// Terms outside `term_dim_sample` are ignored.
    fn tf_vec(freq: &TermFrequency, term_dim_sample: &IndexSet<String>) -> ZeroSpVec<N>;

    /// Combine TF and IDF into a unit-length weight vector.
    /// A vector with zero norm stays all-zero.
    fn tfidf_vec(tf: &ZeroSpVec<N>, idf: &[N]) -> ZeroSpVec<N>;
}

/// Default TF-IDF engine
/// - tf = raw count
/// - idf = ln((1 + n) / (1 + df)) + 1
/// - rows are L2-normalized
///
/// Implemented for `f32` and `f64`.
#[derive(Debug)]
pub struct DefaultTFIDFEngine;

#[inline]
pub fn smooth_idf(doc_num: u64, doc_freq: u64) -> f64 {
    ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
}

macro_rules! impl_float_engine {
    ($t:ty) => {
        impl TFIDFEngine<$t> for DefaultTFIDFEngine {
            fn idf_vec(corpus: &Corpus, term_dim_sample: &IndexSet<String>) -> Vec<$t> {
                let doc_num = corpus.get_doc_num();
                term_dim_sample
                    .iter()
                    .map(|term| smooth_idf(doc_num, corpus.get_term_count(term)) as $t)
                    .collect()
            }

            fn tf_vec(freq: &TermFrequency, term_dim_sample: &IndexSet<String>) -> ZeroSpVec<$t> {
                let pairs: Vec<(usize, $t)> = freq
                    .iter()
                    .filter_map(|(term, count)| {
                        term_dim_sample
                            .get_index_of(term)
                            .map(|idx| (idx, count as $t))
                    })
                    .collect();
                ZeroSpVec::from_sparse(term_dim_sample.len(), pairs)
            }

            fn tfidf_vec(tf: &ZeroSpVec<$t>, idf: &[$t]) -> ZeroSpVec<$t> {
                let mut weights = tf.clone();
                weights.map_values(|idx, tf| tf * idf.get(idx).copied().unwrap_or(0.0));
                let norm = weights.norm();
                if norm > 0.0 {
                    weights.map_values(|_, w| (w as f64 / norm) as $t);
                }
                weights
            }
        }
    };
}

impl_float_engine!(f32);
impl_float_engine!(f64);
