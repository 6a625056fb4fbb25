use std::path::PathBuf;

/// Error types for tokenizer resolution, vocabulary persistence and backends.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown tokenizer type: {name}. Available options: {available:?}")]
    UnknownStrategy {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("Malformed vocabulary file {}: {reason}", path.display())]
    MalformedFile { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Segmentation regex error: {0}")]
    Regex(#[from] fancy_regex::Error),

    #[error("Tokenizer {strategy} requires the `{feature}` feature")]
    BackendUnavailable {
        strategy: &'static str,
        feature: &'static str,
    },

    #[error("Tokenizer {strategy} failed: {message}")]
    Backend {
        strategy: &'static str,
        message: String,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    #[cfg(any(feature = "tiktoken", feature = "hf", feature = "sentencepiece"))]
    pub(crate) fn backend(strategy: &'static str, err: impl std::fmt::Display) -> Self {
        Error::Backend {
            strategy,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
