//! Error types for the two failure domains of a run.
//!
//! - [`FetchError`]: anything that goes wrong while loading the news feed.
//!   These end the run.
//! - [`SummarizeError`]: anything that goes wrong while talking to the
//!   language model. These are caught and replaced by a placeholder text.
//!
//! Configuration problems get their own [`ConfigError`] since they happen
//! before either domain is entered.

use thiserror::Error;

/// Failure while fetching or preparing the news feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (DNS, connect, TLS, timeout).
    #[error("news request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("news endpoint returned {status}")]
    Status { status: reqwest::StatusCode },

    /// The body was not the structured payload we expect.
    #[error("malformed news payload: {0}")]
    Decode(String),

    /// The selected items could not be serialized for the model.
    #[error("failed to serialize news items: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure while producing the summary.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// No API key was configured.
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    /// Transport failure or undecodable response body.
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("chat API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The model returned no text.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The model kept asking for tools past the round limit.
    #[error("model requested tools for more than {0} rounds")]
    TooManyToolRounds(usize),

    /// The base URL could not be joined with the completions path.
    #[error("invalid chat base URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("max_payload_bytes must be at least {min}, got {got}")]
    PayloadBudgetTooSmall { min: usize, got: usize },

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),
}

/// Failure of a whole run: fetch faults and output faults propagate, summary
/// faults never reach this type.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to write page: {0}")]
    Write(#[from] std::io::Error),
}
