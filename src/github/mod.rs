pub mod client;
pub mod rate_limiter;
pub mod source;

pub use client::GitHubClient;
pub use rate_limiter::{PacingPolicy, RetryPolicy};
pub use source::{fetch_pinned, PinnedFetch, RepoSource};
