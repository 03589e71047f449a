use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// A curated repository as published to the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub language: String,
    pub platforms: Vec<String>,
    pub stars: u32,
    pub github_url: String,
    pub category: String,
    pub highlights: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub topics: Vec<String>,
    pub commit_count: u32,
    pub release_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
}

/// The document consumed by the static site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub last_updated: DateTime<Utc>,
    /// Repositories returned by the listing, before any filtering.
    pub total_repos: usize,
    pub projects: Vec<Project>,
}

/// Lowercase identifiers of the repositories the owner pinned, in the
/// order the platform reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedSet {
    ids: Vec<String>,
}

impl PinnedSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: Vec<String> = Vec::new();
        for name in names {
            let id = name.as_ref().trim().to_lowercase();
            if !id.is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|p| p == id)
    }

    /// Position in the pinned order, used to emit pinned projects first.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|p| p == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_project(homepage: Option<&str>) -> Project {
        Project {
            id: "apod-cli".to_string(),
            name: "apod-cli".to_string(),
            description: "NASA picture of the day CLI".to_string(),
            language: "Go".to_string(),
            platforms: vec!["macOS".into(), "Linux".into(), "Windows".into()],
            stars: 7,
            github_url: "https://github.com/octo/apod-cli".to_string(),
            category: "CLI Tools".to_string(),
            highlights: Vec::new(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            topics: vec!["nasa".into()],
            commit_count: 42,
            release_count: 3,
            homepage_url: homepage.map(str::to_string),
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = Snapshot {
            last_updated: Utc.with_ymd_and_hms(2024, 6, 2, 8, 30, 0).unwrap(),
            total_repos: 31,
            projects: vec![sample_project(Some("https://apod.example")), sample_project(None)],
        };

        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_field_names_and_empty_lists() {
        let value = serde_json::to_value(sample_project(None)).unwrap();
        assert_eq!(value["githubUrl"], "https://github.com/octo/apod-cli");
        assert_eq!(value["commitCount"], 42);
        assert_eq!(value["highlights"], serde_json::json!([]));
        assert!(value.get("homepageUrl").is_none());
    }

    #[test]
    fn test_pinned_set_lowercases_and_dedupes() {
        let pinned = PinnedSet::new(["Apod-CLI", "songlink-cli", "apod-cli", " "]);
        assert_eq!(pinned.len(), 2);
        assert!(pinned.contains("apod-cli"));
        assert_eq!(pinned.position("songlink-cli"), Some(1));
        assert_eq!(pinned, PinnedSet::new(["apod-cli", "songlink-cli"]));
    }
}
