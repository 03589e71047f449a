use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::curation::{BasicFilter, EnrichConfig, FeaturedRules, QualityGate};
use crate::error::{Error, Result};
use crate::github::{PacingPolicy, RetryPolicy};
use crate::taxonomy::Taxonomy;

pub const DEFAULT_OUTPUT_PATH: &str = "src/data/opensource.json";

/// Repositories that are never projects: profile READMEs, tap repos and
/// vendored forks.
pub const DEFAULT_DENYLIST: &[&str] = &[
    "isowords",
    "swift-composable-architecture",
    "homebrew-apod-cli",
    "homebrew-songlink-cli",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub account: Option<String>,
    pub output_path: String,
    pub repo_delay_secs: u64,
    pub request_delay_secs: u64,
    pub rate_limit_cooldown_secs: u64,
    pub min_commits: u32,
    pub require_release: bool,
    pub featured_limit: usize,
    pub denylist: Vec<String>,
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.trim().is_empty());
        if github_token.is_none() {
            tracing::warn!("GITHUB_TOKEN not set, requests will be anonymous and heavily rate limited");
        }

        let account = env::var("GITHUB_ACCOUNT").ok().filter(|a| !a.trim().is_empty());

        let output_path = env::var("OPENSOURCE_OUTPUT")
            .unwrap_or_else(|_| DEFAULT_OUTPUT_PATH.to_string());

        let denylist = match env::var("DENYLIST") {
            Ok(list) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
        };

        let featured_limit = parsed_or("FEATURED_LIMIT", 12);
        if featured_limit == 0 {
            return Err(Error::Config("FEATURED_LIMIT must be at least 1".to_string()));
        }

        Ok(Self {
            github_token,
            account,
            output_path,
            repo_delay_secs: parsed_or("REPO_DELAY_SECS", 3),
            request_delay_secs: parsed_or("REQUEST_DELAY_SECS", 2),
            rate_limit_cooldown_secs: parsed_or("RATE_LIMIT_COOLDOWN_SECS", 60),
            min_commits: parsed_or("MIN_COMMITS", 15),
            require_release: parsed_or("REQUIRE_RELEASE", true),
            featured_limit,
            denylist,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub filter: BasicFilter,
    pub enrich: EnrichConfig,
    pub gate: QualityGate,
    pub taxonomy: Taxonomy,
    pub featured: FeaturedRules,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        let mut denylist = config.denylist.clone();
        // The profile README repository shares the account's name.
        if let Some(account) = &config.account {
            denylist.push(account.clone());
        }

        Self {
            filter: BasicFilter::new(denylist),
            enrich: EnrichConfig {
                retry: RetryPolicy::new(2, Duration::from_secs(config.rate_limit_cooldown_secs)),
                pacing: PacingPolicy {
                    between_repositories: Duration::from_secs(config.repo_delay_secs),
                    between_requests: Duration::from_secs(config.request_delay_secs),
                },
                ..Default::default()
            },
            gate: QualityGate::new(config.min_commits, config.require_release),
            taxonomy: Taxonomy::default(),
            featured: FeaturedRules {
                limit: config.featured_limit,
                ..Default::default()
            },
        }
    }
}
