pub mod rules;

use crate::models::{EnrichedRepository, Project, RawRepository, UNKNOWN_LANGUAGE};

pub use rules::{CategoryRule, HighlightRule, Matcher, PlatformRule, RepoFacts};

pub const CATCH_ALL_CATEGORY: &str = "Other Projects";
pub const MAX_HIGHLIGHTS: usize = 3;
pub const MAX_TOPIC_HIGHLIGHTS: usize = 2;

/// The heuristic tables. Category and platform rules are first-match-wins,
/// so their order is part of the behaviour.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub categories: Vec<CategoryRule>,
    pub catch_all: String,
    pub platforms: Vec<PlatformRule>,
    pub highlights: Vec<HighlightRule>,
}

impl Taxonomy {
    fn default_categories() -> Vec<CategoryRule> {
        vec![
            CategoryRule::new("CLI Tools", Matcher::name(&["-cli"]).or_description(&["cli"])),
            CategoryRule::new(
                "Swift Packages",
                Matcher::language("Swift").or_name(&["kit"]).or_description(&["package"]),
            ),
            CategoryRule::new("Desktop Apps", Matcher::description(&["gtk", "desktop", "app"])),
            CategoryRule::new("Swift Projects", Matcher::language("Swift")),
            CategoryRule::new("Go Projects", Matcher::language("Go")),
        ]
    }

    fn default_platforms() -> Vec<PlatformRule> {
        vec![
            PlatformRule::new(
                vec![Matcher::language("Swift"), Matcher::description(&["swift"])],
                &["macOS"],
            )
            .refine("linux", "Linux")
            .refine("ios", "iOS"),
            PlatformRule::new(
                vec![Matcher::language("Go"), Matcher::name(&["-cli"])],
                &["macOS", "Linux", "Windows"],
            ),
            PlatformRule::new(vec![Matcher::description(&["gtk", "linux"])], &["Linux"]),
            PlatformRule::new(
                vec![Matcher::description(&["cross-platform"])],
                &["macOS", "Linux", "Windows"],
            ),
        ]
    }

    fn default_highlights() -> Vec<HighlightRule> {
        vec![
            HighlightRule::new(
                "Homebrew available",
                Matcher::description(&["homebrew"]).or_topics(&["homebrew"]),
            ),
            HighlightRule::new(
                "Cross-platform",
                Matcher::description(&["cross-platform", "linux", "macos"]),
            ),
            HighlightRule::new(
                "Well-tested",
                Matcher::description(&["test"]).or_topics(&["testing"]),
            ),
            HighlightRule::new(
                "AI-powered",
                Matcher::description(&["ai", "ml", "openai", "dalle"]),
            ),
            HighlightRule::new("GTK4", Matcher::description(&["gtk"])),
            HighlightRule::new("async/await", Matcher::description(&["async"])),
            HighlightRule::new("Vim controls", Matcher::description(&["vim"])),
            HighlightRule::new("Zero dependencies", Matcher::description(&["zero dependencies"])),
            HighlightRule::new("Batch generation", Matcher::description(&["batch"])),
            HighlightRule::new(
                "Cross-platform Swift",
                Matcher::language("Swift").or_description(&["linux"]),
            ),
        ]
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            categories: Self::default_categories(),
            catch_all: CATCH_ALL_CATEGORY.to_string(),
            platforms: Self::default_platforms(),
            highlights: Self::default_highlights(),
        }
    }
}

/// Turns a qualifying repository into its published record.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    taxonomy: Taxonomy,
}

impl Classifier {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn category(&self, repo: &RawRepository) -> String {
        let facts = RepoFacts::from_repository(repo);
        self.taxonomy
            .categories
            .iter()
            .find(|rule| rule.when.matches(&facts))
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| self.taxonomy.catch_all.clone())
    }

    pub fn platforms(&self, repo: &RawRepository) -> Vec<String> {
        let facts = RepoFacts::from_repository(repo);
        let Some(rule) = self.taxonomy.platforms.iter().find(|r| r.matches(&facts)) else {
            return Vec::new();
        };

        let refined = rule
            .refinements
            .iter()
            .filter(|(term, _)| facts.description.contains(term.as_str()))
            .map(|(_, platform)| platform);

        let mut platforms: Vec<String> = Vec::new();
        for platform in rule.platforms.iter().chain(refined) {
            if !platforms.contains(platform) {
                platforms.push(platform.clone());
            }
        }
        platforms
    }

    pub fn highlights(&self, repo: &RawRepository) -> Vec<String> {
        let facts = RepoFacts::from_repository(repo);
        let mut highlights: Vec<String> = Vec::new();

        let matched = self
            .taxonomy
            .highlights
            .iter()
            .filter(|rule| rule.when.matches(&facts))
            .map(|rule| rule.label.clone());
        let topics = repo
            .topics
            .iter()
            .take(MAX_TOPIC_HIGHLIGHTS)
            .map(|topic| title_case(topic));

        for label in matched.chain(topics) {
            if !contains_ignore_case(&highlights, &label) {
                highlights.push(label);
            }
        }

        highlights.truncate(MAX_HIGHLIGHTS);
        highlights
    }

    pub fn classify(&self, enriched: &EnrichedRepository) -> Project {
        let repo = &enriched.repository;
        Project {
            id: repo.id(),
            name: repo.name.clone(),
            description: repo.description.clone(),
            language: repo
                .language
                .clone()
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
            platforms: self.platforms(repo),
            stars: repo.stargazers_count,
            github_url: repo.html_url.clone(),
            category: self.category(repo),
            highlights: self.highlights(repo),
            updated_at: repo.updated_at,
            created_at: repo.created_at,
            topics: repo.topics.clone(),
            commit_count: enriched.metrics.commit_count,
            release_count: enriched.metrics.release_count,
            homepage_url: repo.homepage.clone(),
        }
    }
}

fn title_case(topic: &str) -> String {
    let mut chars = topic.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn contains_ignore_case(items: &[String], candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();
    items.iter().any(|item| item.to_lowercase() == candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metrics;
    use chrono::{TimeZone, Utc};

    fn repo(name: &str, description: &str, language: Option<&str>, topics: &[&str]) -> RawRepository {
        RawRepository {
            name: name.to_string(),
            description: description.to_string(),
            language: language.map(str::to_string),
            fork: false,
            private: false,
            stargazers_count: 3,
            html_url: format!("https://github.com/octo/{}", name),
            homepage: None,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            created_at: Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_category_precedence() {
        let classifier = Classifier::default();
        let cases = [
            (repo("foo-cli", "a CLI tool", Some("Go"), &[]), "CLI Tools"),
            (repo("NetworkKit", "networking", Some("Swift"), &[]), "Swift Packages"),
            (repo("scanner", "A swift package for scanning", Some("Swift"), &[]), "Swift Packages"),
            (repo("gtkterm", "GTK terminal", Some("C"), &[]), "Desktop Apps"),
            (repo("notes", "A notes app", Some("Swift"), &[]), "Desktop Apps"),
            (repo("raytracer", "Ray tracer", Some("Swift"), &[]), "Swift Projects"),
            (repo("proxy", "reverse proxy", Some("Go"), &[]), "Go Projects"),
            (repo("dotfiles", "my config", None, &[]), "Other Projects"),
        ];

        for (repo, expected) in cases {
            assert_eq!(classifier.category(&repo), expected, "{}", repo.name);
        }
    }

    #[test]
    fn test_cli_beats_swift_package() {
        // "cli" in the description outranks the package signal
        let classifier = Classifier::default();
        let repo = repo("ArgKit", "cli argument package", Some("Swift"), &[]);
        assert_eq!(classifier.category(&repo), "CLI Tools");
    }

    #[test]
    fn test_platforms() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.platforms(&repo("foo-cli", "a CLI tool", Some("Go"), &[])),
            vec!["macOS", "Linux", "Windows"]
        );
        assert_eq!(
            classifier.platforms(&repo("kit", "Runs on Linux and iOS", Some("Swift"), &[])),
            vec!["macOS", "Linux", "iOS"]
        );
        assert_eq!(
            classifier.platforms(&repo("kit", "plain", Some("Swift"), &[])),
            vec!["macOS"]
        );
        assert_eq!(
            classifier.platforms(&repo("term", "A GTK terminal", Some("C"), &[])),
            vec!["Linux"]
        );
        assert_eq!(
            classifier.platforms(&repo("lib", "cross-platform widgets", Some("Rust"), &[])),
            vec!["macOS", "Linux", "Windows"]
        );
        assert!(classifier
            .platforms(&repo("notes", "personal notes", Some("Python"), &[]))
            .is_empty());
    }

    #[test]
    fn test_highlights_are_bounded_and_unique() {
        let classifier = Classifier::default();
        let busy = repo(
            "imagegen",
            "Batch openai image generation with async workers, tested on linux",
            Some("Python"),
            &["homebrew", "cli"],
        );
        let highlights = classifier.highlights(&busy);
        assert_eq!(highlights, vec!["Homebrew available", "Cross-platform", "Well-tested"]);

        let topical = repo("misc", "Misc", None, &["homebrew", "Homebrew Available", "rust"]);
        let highlights = classifier.highlights(&topical);
        assert_eq!(highlights, vec!["Homebrew available", "Homebrew"]);
    }

    #[test]
    fn test_highlights_backfill_topics() {
        let classifier = Classifier::default();
        let repo = repo("misc", "Misc things", None, &["nasa", "space", "astronomy"]);
        assert_eq!(classifier.highlights(&repo), vec!["Nasa", "Space"]);
    }

    #[test]
    fn test_highlights_empty_is_explicit() {
        let classifier = Classifier::default();
        let repo = repo("misc", "Misc things", None, &[]);
        let project = classifier.classify(&EnrichedRepository {
            repository: repo,
            metrics: Metrics { commit_count: 1, release_count: 0, attributed: true },
        });
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["highlights"], serde_json::json!([]));
        assert_eq!(value["platforms"], serde_json::json!([]));
        assert_eq!(project.language, "Unknown");
        assert_eq!(project.category, "Other Projects");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let classifier = Classifier::default();
        let enriched = EnrichedRepository {
            repository: repo("Foo-CLI", "A CLI tool for macOS", Some("Go"), &["homebrew", "go"]),
            metrics: Metrics { commit_count: 20, release_count: 2, attributed: true },
        };

        let first = classifier.classify(&enriched);
        let second = classifier.classify(&enriched);
        assert_eq!(first, second);
        assert_eq!(first.id, "foo-cli");
        assert_eq!(first.category, "CLI Tools");
        assert_eq!(first.platforms, vec!["macOS", "Linux", "Windows"]);
        assert_eq!(first.highlights, vec!["Homebrew available", "Cross-platform", "Homebrew"]);
        assert_eq!(first.commit_count, 20);
        assert_eq!(first.release_count, 2);
    }
}
