use std::collections::HashSet;
use std::fmt;

use crate::models::{RawRepository, RepoKind};

/// Why a repository never reaches enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Fork,
    Private,
    Denylisted,
    MissingDescription,
    NoSignal,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::Fork => write!(f, "fork"),
            Exclusion::Private => write!(f, "private"),
            Exclusion::Denylisted => write!(f, "denylisted"),
            Exclusion::MissingDescription => write!(f, "no description"),
            Exclusion::NoSignal => write!(f, "no stars, topics or language"),
        }
    }
}

/// Local checks that cost no API calls.
#[derive(Debug, Clone, Default)]
pub struct BasicFilter {
    denylist: HashSet<String>,
}

impl BasicFilter {
    pub fn new<I, S>(denylist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            denylist: denylist.into_iter().map(Into::into).collect(),
        }
    }

    pub fn exclusion(&self, repo: &RawRepository) -> Option<Exclusion> {
        if repo.kind() == RepoKind::Fork {
            return Some(Exclusion::Fork);
        }
        if repo.private {
            return Some(Exclusion::Private);
        }
        if self.denylist.contains(&repo.name) {
            return Some(Exclusion::Denylisted);
        }
        if repo.description.trim().is_empty() {
            return Some(Exclusion::MissingDescription);
        }
        let has_language = repo.language.as_deref().is_some_and(|l| !l.is_empty());
        if repo.stargazers_count == 0 && repo.topics.is_empty() && !has_language {
            return Some(Exclusion::NoSignal);
        }
        None
    }

    pub fn admits(&self, repo: &RawRepository) -> bool {
        self.exclusion(repo).is_none()
    }

    /// Keeps listing order.
    pub fn apply(&self, repos: Vec<RawRepository>) -> Vec<RawRepository> {
        repos
            .into_iter()
            .filter(|repo| match self.exclusion(repo) {
                Some(reason) => {
                    tracing::info!("✗ {}: {} (excluded)", repo.name, reason);
                    false
                }
                None => true,
            })
            .collect()
    }
}
