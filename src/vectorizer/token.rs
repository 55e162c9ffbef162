use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TermFrequency
/// Counts how often each term occurs in one document.
/// Terms keep the order of their first occurrence.
///
/// # Examples
/// ```
/// use tf_idf_affinity::TermFrequency;
/// let mut freq = TermFrequency::new();
/// freq.add_terms(&["howl", "moon", "howl"]);
/// assert_eq!(freq.term_count("howl"), 2);
/// assert_eq!(freq.term_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u32>,
    total_term_count: u64,
}

/// add / remove
impl TermFrequency {
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::new(),
            total_term_count: 0,
        }
    }

    /// Add one occurrence of a term
    ///
    /// # Arguments
    /// * `term` - term to count
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        let count = self.term_count.entry(term.to_string()).or_insert(0);
        *count += 1;
        self.total_term_count += 1;
        self
    }

    /// Add one occurrence of each term in the slice
    ///
    /// # Arguments
    /// * `terms` - terms to count, duplicates are counted each time
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    #[inline]
    pub fn clear(&mut self) {
        self.term_count.clear();
        self.total_term_count = 0;
    }
}

/// statistics
impl TermFrequency {
    /// Occurrence count of a term, 0 when absent
    #[inline]
    pub fn term_count(&self, term: &str) -> u32 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Total number of counted occurrences
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// Number of distinct terms
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    /// Iterate over (term, count) in first-occurrence order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    /// Distinct terms in first-occurrence order
    #[inline]
    pub fn term_set_ref(&self) -> Vec<&str> {
        self.term_count.keys().map(|term| term.as_str()).collect()
    }
}
