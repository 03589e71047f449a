use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::{Error, Result};
use crate::models::{Contributor, PinnedSet, RawRepository};

/// The upstream calls the curation pipeline depends on.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// One page of the account's repositories, most recently updated first.
    async fn list_repositories(&self, account: &str) -> Result<Vec<RawRepository>>;

    /// Names of the repositories pinned on the account's profile.
    async fn list_pinned(&self, account: &str) -> Result<Vec<String>>;

    async fn contributors(&self, account: &str, repo: &str) -> Result<Vec<Contributor>>;

    /// Number of published releases. A missing release listing counts as zero.
    async fn release_count(&self, account: &str, repo: &str) -> Result<u32>;
}

/// Outcome of the best-effort pinned lookup.
#[derive(Debug)]
pub enum PinnedFetch {
    Ok(PinnedSet),
    Degraded { pinned: PinnedSet, cause: Error },
}

impl PinnedFetch {
    pub fn pinned(&self) -> &PinnedSet {
        match self {
            PinnedFetch::Ok(pinned) => pinned,
            PinnedFetch::Degraded { pinned, .. } => pinned,
        }
    }

    pub fn into_pinned(self) -> PinnedSet {
        match self {
            PinnedFetch::Ok(pinned) => pinned,
            PinnedFetch::Degraded { pinned, .. } => pinned,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, PinnedFetch::Degraded { .. })
    }
}

pub async fn fetch_pinned(source: &dyn RepoSource, account: &str) -> PinnedFetch {
    match source.list_pinned(account).await {
        Ok(names) => {
            let pinned = PinnedSet::new(names);
            tracing::info!("Found {} pinned repositories", pinned.len());
            PinnedFetch::Ok(pinned)
        }
        Err(cause) => {
            tracing::warn!("Failed to fetch pinned repos, continuing without them: {}", cause);
            PinnedFetch::Degraded {
                pinned: PinnedSet::default(),
                cause,
            }
        }
    }
}
