use std::sync::Arc;

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::curation::enricher::MetricsEnricher;
use crate::curation::featured::FeaturedSelector;
use crate::curation::filter::BasicFilter;
use crate::curation::quality::QualityGate;
use crate::curation::summary::RunSummary;
use crate::error::Result;
use crate::github::{fetch_pinned, RepoSource};
use crate::models::{Project, Snapshot};
use crate::taxonomy::Classifier;

#[derive(Debug, Clone)]
pub struct CurationReport {
    pub snapshot: Snapshot,
    pub summary: RunSummary,
}

pub struct CurationPipeline {
    source: Arc<dyn RepoSource>,
    filter: BasicFilter,
    enricher: MetricsEnricher,
    gate: QualityGate,
    classifier: Classifier,
    selector: FeaturedSelector,
}

impl CurationPipeline {
    pub fn new(source: Arc<dyn RepoSource>, config: PipelineConfig) -> Self {
        let selector =
            FeaturedSelector::new(config.featured).with_catch_all(config.taxonomy.catch_all.clone());
        Self {
            enricher: MetricsEnricher::new(source.clone(), config.enrich),
            source,
            filter: config.filter,
            gate: config.gate,
            classifier: Classifier::new(config.taxonomy),
            selector,
        }
    }

    /// Runs one curation pass. Only a failed repository listing is an error;
    /// everything downstream degrades or skips.
    pub async fn run(&self, account: &str) -> Result<CurationReport> {
        let pinned = fetch_pinned(self.source.as_ref(), account).await;
        let pinned_degraded = pinned.is_degraded();
        let pinned = pinned.into_pinned();

        let repos = self.source.list_repositories(account).await?;
        let candidates = repos.len();
        tracing::info!("Found {} repositories for {}", candidates, account);

        let survivors = self.filter.apply(repos);
        let filtered_out = candidates - survivors.len();
        tracing::info!(
            "Checking {} repositories for quality criteria ({} filtered out)",
            survivors.len(),
            filtered_out
        );

        let processed = survivors.len();
        let outcome = self.enricher.enrich_all(account, survivors).await;
        let qualifying = self.gate.apply(outcome.enriched);
        let included = qualifying.len();

        let projects: Vec<Project> = qualifying
            .iter()
            .map(|e| self.classifier.classify(e))
            .collect();
        let featured = self.selector.select(projects, &pinned);

        let snapshot = Snapshot {
            last_updated: Utc::now(),
            total_repos: candidates,
            projects: featured,
        };

        let mut summary = RunSummary {
            candidates,
            filtered_out,
            processed,
            skipped: outcome.skipped,
            included,
            pinned_degraded,
            ..Default::default()
        };
        summary.record_featured(&snapshot, &pinned);
        tracing::info!(
            "Featured {} of {} qualifying projects",
            summary.featured,
            summary.included
        );

        Ok(CurationReport { snapshot, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curation::enricher::EnrichConfig;
    use crate::curation::featured::FeaturedRules;
    use crate::error::Error;
    use crate::github::source::MockRepoSource;
    use crate::github::{PacingPolicy, RetryPolicy};
    use crate::models::{Contributor, RawRepository};
    use chrono::{TimeZone, Utc};

    fn config() -> PipelineConfig {
        PipelineConfig {
            enrich: EnrichConfig {
                retry: RetryPolicy::immediate(),
                pacing: PacingPolicy::none(),
                show_progress: false,
                ..Default::default()
            },
            featured: FeaturedRules {
                backfill_to: 0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn repo(name: &str, description: &str, language: Option<&str>, stars: u32) -> RawRepository {
        RawRepository {
            name: name.to_string(),
            description: description.to_string(),
            language: language.map(str::to_string),
            fork: false,
            private: false,
            stargazers_count: stars,
            html_url: format!("https://github.com/octo/{}", name),
            homepage: None,
            topics: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2022, 5, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    fn owner(commits: u32) -> Vec<Contributor> {
        vec![Contributor { login: "octo".to_string(), contributions: commits }]
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let mut source = MockRepoSource::new();
        source.expect_list_pinned().returning(|_| Ok(Vec::new()));
        source
            .expect_list_repositories()
            .returning(|account| Err(Error::AccountNotFound(account.to_string())));
        source.expect_contributors().never();
        source.expect_release_count().never();

        let pipeline = CurationPipeline::new(Arc::new(source), config());
        let result = pipeline.run("octo").await;
        assert!(matches!(result, Err(Error::AccountNotFound(_))));
    }

    #[tokio::test]
    async fn test_filtered_repositories_cost_no_requests() {
        let mut fork = repo("fork", "forked thing", Some("Go"), 10);
        fork.fork = true;

        let mut source = MockRepoSource::new();
        source.expect_list_pinned().returning(|_| Ok(Vec::new()));
        source
            .expect_list_repositories()
            .returning(move |_| Ok(vec![fork.clone(), repo("empty", "", Some("Go"), 4)]));
        source.expect_contributors().never();
        source.expect_release_count().never();

        let pipeline = CurationPipeline::new(Arc::new(source), config());
        let report = pipeline.run("octo").await.unwrap();
        assert_eq!(report.snapshot.total_repos, 2);
        assert!(report.snapshot.projects.is_empty());
        assert_eq!(report.summary.filtered_out, 2);
    }

    #[tokio::test]
    async fn test_end_to_end_with_degraded_pinned() {
        let mut source = MockRepoSource::new();
        source
            .expect_list_pinned()
            .returning(|_| Err(Error::GraphQl("Bad credentials".to_string())));
        source.expect_list_repositories().returning(|_| {
            Ok(vec![
                repo("foo-cli", "a CLI tool", Some("Go"), 3),
                repo("tiny", "barely anything", Some("Go"), 0),
                repo("notes", "A notes app", Some("Swift"), 8),
                repo("flaky", "sometimes fails", Some("Rust"), 2),
            ])
        });
        source.expect_contributors().returning(|_, repo| match repo {
            "foo-cli" => Ok(owner(20)),
            "tiny" => Ok(owner(5)),
            "notes" => Ok(owner(60)),
            _ => Err(Error::GitHubApi("502 Bad Gateway".to_string())),
        });
        source.expect_release_count().returning(|_, _| Ok(2));

        let pipeline = CurationPipeline::new(Arc::new(source), config());
        let report = pipeline.run("octo").await.unwrap();

        assert_eq!(report.snapshot.total_repos, 4);
        let names: Vec<_> = report.snapshot.projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["foo-cli", "notes"]);

        let foo = &report.snapshot.projects[0];
        assert_eq!(foo.category, "CLI Tools");
        assert_eq!(foo.platforms, vec!["macOS", "Linux", "Windows"]);
        assert_eq!(foo.commit_count, 20);
        assert_eq!(foo.release_count, 2);

        assert!(report.summary.pinned_degraded);
        assert_eq!(report.summary.processed, 4);
        assert_eq!(report.summary.skipped, vec!["flaky"]);
        assert_eq!(report.summary.included, 2);
        assert_eq!(report.summary.featured, 2);
    }

    #[tokio::test]
    async fn test_taxonomy_catch_all_drives_featured_quota() {
        let mut source = MockRepoSource::new();
        source.expect_list_pinned().returning(|_| Ok(Vec::new()));
        source.expect_list_repositories().returning(|_| {
            Ok(vec![
                repo("parser", "parsing library", Some("Rust"), 9),
                repo("render", "markdown renderer", Some("Rust"), 5),
            ])
        });
        source.expect_contributors().returning(|_, _| Ok(owner(30)));
        source.expect_release_count().returning(|_, _| Ok(1));

        let mut config = config();
        config.taxonomy.catch_all = "Misc".to_string();
        let pipeline = CurationPipeline::new(Arc::new(source), config);
        let report = pipeline.run("octo").await.unwrap();

        let projects = &report.snapshot.projects;
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "parser");
        assert_eq!(projects[0].category, "Misc");
        assert_eq!(report.summary.included, 2);
    }

    #[tokio::test]
    async fn test_unreleased_project_passes_commit_only_gate() {
        let mut source = MockRepoSource::new();
        source.expect_list_pinned().returning(|_| Ok(vec!["lib".to_string()]));
        source
            .expect_list_repositories()
            .returning(|_| Ok(vec![repo("lib", "parsing library", Some("Rust"), 0)]));
        source.expect_contributors().returning(|_, _| Ok(owner(30)));
        source.expect_release_count().returning(|_, _| Ok(0));

        let mut config = config();
        config.gate.require_release = false;
        let pipeline = CurationPipeline::new(Arc::new(source), config);
        let report = pipeline.run("octo").await.unwrap();

        assert_eq!(report.snapshot.projects.len(), 1);
        assert_eq!(report.snapshot.projects[0].release_count, 0);
        assert_eq!(report.summary.pinned_featured, 1);
    }
}
