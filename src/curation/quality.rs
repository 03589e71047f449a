use crate::models::{EnrichedRepository, Metrics};

/// Minimum bar for appearing in the catalog at all. Stars play no part
/// here; they only affect prominence later.
#[derive(Debug, Clone)]
pub struct QualityGate {
    pub min_commits: u32,
    pub require_release: bool,
}

impl QualityGate {
    pub fn new(min_commits: u32, require_release: bool) -> Self {
        Self {
            min_commits,
            require_release,
        }
    }

    pub fn admits(&self, metrics: &Metrics) -> bool {
        metrics.commit_count >= self.min_commits
            && (!self.require_release || metrics.release_count >= 1)
    }

    pub fn apply(&self, enriched: Vec<EnrichedRepository>) -> Vec<EnrichedRepository> {
        enriched
            .into_iter()
            .filter(|e| {
                let repo = &e.repository;
                let m = &e.metrics;
                if self.admits(m) {
                    tracing::info!(
                        "✓ {}: {} commits, {} releases, {} stars",
                        repo.name,
                        m.commit_count,
                        m.release_count,
                        repo.stargazers_count
                    );
                    true
                } else {
                    tracing::info!(
                        "✗ {}: {} commits, {} releases, {} stars (skipped)",
                        repo.name,
                        m.commit_count,
                        m.release_count,
                        repo.stargazers_count
                    );
                    false
                }
            })
            .collect()
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::new(15, true)
    }
}
