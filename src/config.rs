//! Application settings, loaded from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisConfig;
use crate::error::{AffinityError, Result};
use crate::vectorizer::evaluate::scoring::DEFAULT_AFFINITY_THRESHOLD;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "affinity.toml";

pub const DEFAULT_PRECISION: usize = 4;
pub const DEFAULT_LABEL_PREFIX: &str = "Fragmento";
pub const DEFAULT_QUERY: &str = "Which creature howls?";
pub const DEFAULT_FRAGMENTS: [&str; 3] = [
    "The watchdog howls under the chilling moon.",
    "The feral cat observes the spectral transit of the night.",
    "The hound and the feline perform the rite together.",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// scores strictly above this are high affinity
    pub threshold: f64,
    /// decimals shown for weights and scores
    pub precision: usize,
    /// fragment labels are "{label_prefix} {n}"
    pub label_prefix: String,
    pub default_fragments: Vec<String>,
    pub default_query: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_AFFINITY_THRESHOLD,
            precision: DEFAULT_PRECISION,
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            default_fragments: DEFAULT_FRAGMENTS.iter().map(|s| s.to_string()).collect(),
            default_query: DEFAULT_QUERY.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when it exists,
    /// otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let contents = fs::read_to_string(path).map_err(|source| AffinityError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse(contents, "<inline>")
    }

    fn parse(contents: &str, origin: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|source| AffinityError::ConfigParse {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(AffinityError::ConfigInvalid("threshold must be a finite number".into()));
        }
        if self.precision > 15 {
            return Err(AffinityError::ConfigInvalid(format!(
                "precision {} is too large (max 15)",
                self.precision
            )));
        }
        Ok(())
    }

    /// Default fragments as one line per fragment
    pub fn default_fragments_text(&self) -> String {
        self.default_fragments.join("\n")
    }

    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            threshold: self.threshold,
            label_prefix: self.label_prefix.clone(),
        }
    }
}
