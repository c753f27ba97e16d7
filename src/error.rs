use thiserror::Error;

/// Failures of a single search round-trip.
///
/// The UI collapses every variant into one fixed banner message; the
/// variants exist so the log says what actually went wrong.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search endpoint returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
