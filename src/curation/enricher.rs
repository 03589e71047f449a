use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::github::{PacingPolicy, RepoSource, RetryPolicy};
use crate::models::{EnrichedRepository, Metrics, RawRepository};

pub const DEFAULT_FALLBACK_COMMITS: u32 = 100;

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub retry: RetryPolicy,
    pub pacing: PacingPolicy,
    /// Commit count used when the owner is missing from the contributor list.
    pub fallback_commit_count: u32,
    pub show_progress: bool,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            pacing: PacingPolicy::default(),
            fallback_commit_count: DEFAULT_FALLBACK_COMMITS,
            show_progress: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    pub enriched: Vec<EnrichedRepository>,
    /// Names of repositories whose lookups failed.
    pub skipped: Vec<String>,
}

/// Fetches per-repository metrics one repository at a time.
pub struct MetricsEnricher {
    source: Arc<dyn RepoSource>,
    config: EnrichConfig,
}

impl MetricsEnricher {
    pub fn new(source: Arc<dyn RepoSource>, config: EnrichConfig) -> Self {
        Self { source, config }
    }

    pub async fn enrich_all(&self, account: &str, repos: Vec<RawRepository>) -> EnrichmentOutcome {
        let pb = if self.config.show_progress {
            ProgressBar::new(repos.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} repos {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut outcome = EnrichmentOutcome::default();

        for (index, repository) in repos.into_iter().enumerate() {
            if index > 0 {
                self.config.pacing.before_repository(&repository.name).await;
            }
            pb.set_message(repository.name.clone());

            match self.enrich(account, &repository).await {
                Ok(metrics) => outcome.enriched.push(EnrichedRepository { repository, metrics }),
                Err(e) => {
                    tracing::warn!("✗ {}: enrichment failed, skipping: {}", repository.name, e);
                    outcome.skipped.push(repository.name);
                }
            }

            pb.inc(1);
        }

        pb.finish_with_message("metrics fetched");
        outcome
    }

    pub async fn enrich(&self, account: &str, repo: &RawRepository) -> Result<Metrics> {
        let (commit_count, attributed) = self.commit_count(account, &repo.name).await?;
        self.config.pacing.between_requests().await;
        let release_count = self.release_count(account, &repo.name).await?;

        Ok(Metrics {
            commit_count,
            release_count,
            attributed,
        })
    }

    async fn commit_count(&self, account: &str, repo: &str) -> Result<(u32, bool)> {
        let source = &self.source;
        let contributors = self
            .config
            .retry
            .run(&format!("commits of {}", repo), || source.contributors(account, repo))
            .await?;

        let owned = contributors
            .iter()
            .find(|c| c.login.eq_ignore_ascii_case(account))
            .map(|c| c.contributions);

        match owned {
            Some(count) => Ok((count, true)),
            None => {
                tracing::debug!(
                    "{} not among contributors of {}, using {} commits",
                    account,
                    repo,
                    self.config.fallback_commit_count
                );
                Ok((self.config.fallback_commit_count, false))
            }
        }
    }

    async fn release_count(&self, account: &str, repo: &str) -> Result<u32> {
        let source = &self.source;
        self.config
            .retry
            .run(&format!("releases of {}", repo), || source.release_count(account, repo))
            .await
    }
}
