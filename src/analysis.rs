//! One submission: validate the two text inputs, vectorize, rank and
//! collect everything the presentation layer shows.

use serde::{Deserialize, Serialize};

use crate::{
    error::{AffinityError, Result},
    vectorizer::evaluate::scoring::{Affinity, DEFAULT_AFFINITY_THRESHOLD},
    TFIDFVectorizer,
};

/// Settings for one computation
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub threshold: f64,
    pub label_prefix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_AFFINITY_THRESHOLD,
            label_prefix: crate::config::DEFAULT_LABEL_PREFIX.to_string(),
        }
    }
}

/// One input line treated as a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// 1-based display index
    pub index: usize,
    pub label: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestMatch {
    /// 0-based document index
    pub index: usize,
    pub label: String,
    pub text: String,
    pub score: f64,
    pub affinity: Affinity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFragment {
    pub label: String,
    pub text: String,
    pub score: f64,
}

/// Everything produced by one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub query: String,
    pub fragments: Vec<Fragment>,
    /// sorted stems; column order of `matrix`
    pub vocabulary: Vec<String>,
    /// one row per fragment
    pub matrix: Vec<Vec<f64>>,
    /// cosine score per fragment, input order
    pub scores: Vec<f64>,
    pub best: BestMatch,
    /// fragments by descending score, ties in input order
    pub ranking: Vec<RankedFragment>,
    /// query stems carrying weight in the best fragment
    pub matched_stems: Vec<String>,
}

impl Report {
    /// Copy with every weight and score rounded to `precision` decimals
    pub fn rounded(&self, precision: usize) -> Report {
        let mut report = self.clone();
        for row in &mut report.matrix {
            for cell in row.iter_mut() {
                *cell = round_to(*cell, precision);
            }
        }
        for score in &mut report.scores {
            *score = round_to(*score, precision);
        }
        for entry in &mut report.ranking {
            entry.score = round_to(entry.score, precision);
        }
        report.best.score = round_to(report.best.score, precision);
        report
    }
}

/// Round half away from zero to `precision` decimals
pub fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10_f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// One fragment per non-empty line, trimmed
pub fn parse_fragments(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run one computation.
///
/// # Errors
/// * `NoFragments` - no non-empty line in `fragments_text`
/// * `EmptyQuery` - `query` is empty or whitespace
/// * `EmptyVocabulary` - nothing survives normalization in any fragment
pub fn analyze(fragments_text: &str, query: &str, config: &AnalysisConfig) -> Result<Report> {
    let documents = parse_fragments(fragments_text);
    if documents.is_empty() {
        tracing::warn!("rejected submission without fragments");
        return Err(AffinityError::NoFragments);
    }
    if query.trim().is_empty() {
        tracing::warn!("rejected submission with empty query");
        return Err(AffinityError::EmptyQuery);
    }

    let vectorizer: TFIDFVectorizer = TFIDFVectorizer::build(&documents)?;
    let query_vec = vectorizer.transform(query);
    tracing::debug!(query_terms = query_vec.nnz(), "transformed query");

    let mut hits = vectorizer.similarity(&query_vec);
    let scores = hits.scores();
    let (best_idx, best_score) = hits
        .best()
        .map(|(idx, score, _)| (*idx, *score))
        .unwrap_or((0, 0.0));

    let fragments: Vec<Fragment> = documents
        .iter()
        .enumerate()
        .map(|(i, text)| Fragment {
            index: i + 1,
            label: format!("{} {}", config.label_prefix, i + 1),
            text: text.clone(),
        })
        .collect();

    hits.sort_by_score_desc();
    let ranking = hits
        .list
        .iter()
        .map(|(idx, score, _)| RankedFragment {
            label: fragments[*idx].label.clone(),
            text: fragments[*idx].text.clone(),
            score: *score,
        })
        .collect();

    let best = BestMatch {
        index: best_idx,
        label: fragments[best_idx].label.clone(),
        text: fragments[best_idx].text.clone(),
        score: best_score,
        affinity: Affinity::classify(best_score, config.threshold),
    };
    let matched_stems = vectorizer.matched_terms(query, best_idx);

    tracing::info!(
        fragments = fragments.len(),
        vocabulary = vectorizer.vocabulary().len(),
        best = best.index + 1,
        score = best.score,
        affinity = %best.affinity,
        "computed affinity"
    );

    Ok(Report {
        query: query.to_string(),
        vocabulary: vectorizer.vocabulary().into_iter().map(str::to_string).collect(),
        matrix: vectorizer.dense_matrix(),
        fragments,
        scores,
        best,
        ranking,
        matched_stems,
    })
}
