use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Rate limited while fetching {0}")]
    RateLimited(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("GraphQL query failed: {0}")]
    GraphQl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Only throttling responses are worth waiting out; everything else
    /// fails the same way on a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::RateLimited(_))
    }
}
