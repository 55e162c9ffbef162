use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AffinityError>;

#[derive(Debug, Error)]
pub enum AffinityError {
    #[error("at least one fragment required")]
    NoFragments,

    #[error("query cannot be empty")]
    EmptyQuery,

    #[error("cannot build a vectorizer from zero documents")]
    NoDocuments,

    #[error("empty vocabulary: all {doc_num} fragment(s) are empty after normalization and stop-word removal")]
    EmptyVocabulary { doc_num: usize },

    #[error("failed to read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {origin}")]
    ConfigParse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("failed to encode report as JSON")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode report as CBOR")]
    Cbor(#[from] serde_cbor::Error),
}

impl AffinityError {
    /// Errors caused by what the user typed, as opposed to I/O or encoding
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AffinityError::NoFragments | AffinityError::EmptyQuery | AffinityError::EmptyVocabulary { .. }
        )
    }
}
