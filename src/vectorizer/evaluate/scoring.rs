use std::fmt::{self, Debug};

use num::Num;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    utils::math::vector::ZeroSpVec,
    vectorizer::{compute::compare::Compare, tfidf::TFIDFEngine, TFIDFVectorizer},
};

/// Score threshold above which a match counts as high affinity
pub const DEFAULT_AFFINITY_THRESHOLD: f64 = 0.3;

/// Coarse label for a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affinity {
    /// score > threshold
    High,
    /// score <= threshold
    Low,
}

impl Affinity {
    #[inline]
    pub fn classify(score: f64, threshold: f64) -> Self {
        if score > threshold {
            Affinity::High
        } else {
            Affinity::Low
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Affinity::High => f.write_str("high affinity"),
            Affinity::Low => f.write_str("low affinity"),
        }
    }
}

/// Structure to store similarity results
pub struct Hits<K> {
    /// (Document key, Score, Document Length)
    pub list: Vec<(K, f64, u64)>,
}

impl<K> Hits<K> {
    pub fn new(vec: Vec<(K, f64, u64)>) -> Self {
        Hits { list: vec }
    }

    /// Sort results by descending score.
    /// The sort is stable: equal scores keep their previous relative order.
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|(_, s, _)| !s.is_nan());
        self.list.sort_by(|a, b| b.1.total_cmp(&a.1));
        self
    }

    /// First entry with the maximal score (stable argmax)
    pub fn best(&self) -> Option<&(K, f64, u64)> {
        self.list.iter().fold(None, |best, hit| match best {
            Some(b) if hit.1 <= b.1 => Some(b),
            _ if hit.1.is_nan() => best,
            _ => Some(hit),
        })
    }

    /// Maximal score, `None` for an empty result
    pub fn max_score(&self) -> Option<f64> {
        self.best().map(|(_, s, _)| *s)
    }

    pub fn scores(&self) -> Vec<f64> {
        self.list.iter().map(|(_, s, _)| *s).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Hits [")?;
            for (key, score, doc_len) in &self.list {
                writeln!(f, "    {:?}: {:.6} (len: {})", key, score, doc_len)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl<N, E, C> TFIDFVectorizer<N, E, C>
where
    N: Num + Copy + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
    C: Compare<N>,
{
    /// Cosine similarity of a transformed query against every document.
    /// Keys are document indices; the list is in document order.
    pub fn similarity(&self, query: &ZeroSpVec<N>) -> Hits<usize> {
        let list: Vec<(usize, f64, u64)> = self
            .documents
            .par_iter()
            .enumerate()
            .map(|(idx, doc)| {
                let score = C::cosine_similarity(query.raw_iter(), doc.weights.raw_iter());
                (idx, score, doc.term_sum)
            })
            .collect();
        Hits::new(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_strictly_greater_than_threshold() {
        assert_eq!(Affinity::classify(0.31, DEFAULT_AFFINITY_THRESHOLD), Affinity::High);
        assert_eq!(Affinity::classify(0.3, DEFAULT_AFFINITY_THRESHOLD), Affinity::Low);
        assert_eq!(Affinity::classify(0.0, DEFAULT_AFFINITY_THRESHOLD), Affinity::Low);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut hits = Hits::new(vec![(0, 0.2, 1), (1, 0.5, 1), (2, 0.2, 1), (3, 0.5, 1), (4, 0.0, 1)]);
        hits.sort_by_score_desc();
        let keys: Vec<usize> = hits.list.iter().map(|(k, _, _)| *k).collect();
        assert_eq!(keys, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn best_prefers_first_of_equal_scores() {
        let hits = Hits::new(vec![(0, 0.1, 1), (1, 0.7, 1), (2, 0.7, 1)]);
        assert_eq!(hits.best().map(|(k, _, _)| *k), Some(1));
        let zeros = Hits::new(vec![(0, 0.0, 1), (1, 0.0, 1)]);
        assert_eq!(zeros.best().map(|(k, _, _)| *k), Some(0));
        assert!(Hits::<usize>::new(Vec::new()).best().is_none());
    }

    #[test]
    fn sorted_top_equals_max() {
        let mut hits = Hits::new(vec![(0, 0.25, 1), (1, 0.9, 1), (2, 0.4, 1)]);
        let max = hits.max_score();
        hits.sort_by_score_desc();
        assert_eq!(Some(hits.list[0].1), max);
        assert!(hits.list.windows(2).all(|w| w[0].1 >= w[1].1));
    }
}
