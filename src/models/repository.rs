use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A repository exactly as the listing endpoint reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRepository {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub language: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub stargazers_count: u32,
    pub html_url: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub homepage: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topics: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoKind {
    Fork,
    Origin,
}

impl RawRepository {
    pub fn kind(&self) -> RepoKind {
        if self.fork {
            RepoKind::Fork
        } else {
            RepoKind::Origin
        }
    }

    /// Stable identifier used for pinning and for the published record.
    pub fn id(&self) -> String {
        self.name.to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u32,
}

/// Enrichment result for a single repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub commit_count: u32,
    pub release_count: u32,
    /// False when the owner was missing from the contributor list and the
    /// commit count is the configured placeholder.
    pub attributed: bool,
}

#[derive(Debug, Clone)]
pub struct EnrichedRepository {
    pub repository: RawRepository,
    pub metrics: Metrics,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
