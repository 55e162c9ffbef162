/// This crate finds the text fragment closest to a query
/// using TF-IDF weights and cosine similarity.
pub mod analysis;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod utils;
pub mod vectorizer;

/// TF-IDF Vectorizer
/// Built once from an ordered set of documents (fragments).
/// It holds:
/// - The sorted vocabulary of stems
/// - The smoothed IDF vector
/// - One unit-length sparse weight row per document
///
/// `TFIDFVectorizer<N, E, C>` has the following generic parameters:
/// - `N`: weight type (f32, f64)
/// - `E`: TF-IDF calculation engine (e.g., DefaultTFIDFEngine)
/// - `C`: similarity implementation (e.g., DefaultCompare)
///
/// `transform` projects a query onto the frozen vocabulary and
/// `similarity` scores it against every document.
pub use vectorizer::TFIDFVectorizer;

/// Corpus statistics
/// Number of documents and, per term, the number of documents it appears in.
/// Base data for IDF calculation.
pub use vectorizer::corpus::Corpus;

/// Term Frequency structure
/// Occurrence count of each term within one document.
/// Base data for TF calculation.
pub use vectorizer::token::TermFrequency;

/// TF IDF Calculation Engine Trait
/// Plug in a different weighting by implementing it.
/// `DefaultTFIDFEngine` uses raw counts, smoothed IDF
/// (`ln((1 + n) / (1 + df)) + 1`) and L2-normalized rows, for f32 and f64.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Similarity trait and its default cosine implementation
pub use vectorizer::compute::compare::{Compare, DefaultCompare};

/// Text normalizer (lowercase, letters only, stem) and the stemmer seam
pub use vectorizer::normalizer::{Normalizer, TermStemmer};

/// Similarity results and the high / low affinity label
pub use vectorizer::evaluate::scoring::{Affinity, Hits};

pub use analysis::{analyze, AnalysisConfig, Report};
pub use config::AppConfig;
pub use error::{AffinityError, Result};
pub use session::Session;
