use crate::models::RawRepository;

/// Case-folded view of the repository fields the heuristics look at.
#[derive(Debug, Clone)]
pub struct RepoFacts {
    pub name: String,
    pub description: String,
    pub language: Option<String>,
    pub topics: Vec<String>,
}

impl RepoFacts {
    pub fn from_repository(repo: &RawRepository) -> Self {
        Self {
            name: repo.name.to_lowercase(),
            description: repo.description.to_lowercase(),
            language: repo.language.clone().filter(|l| !l.is_empty()),
            topics: repo.topics.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn is_language(&self, language: &str) -> bool {
        self.language
            .as_deref()
            .map(|l| l.eq_ignore_ascii_case(language))
            .unwrap_or(false)
    }
}

/// A single heuristic condition.
///
/// The language, when set, must match. When any term list is non-empty, at
/// least one term has to hit: name and description terms are substrings of
/// the lowercased field, topic terms are exact topic matches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matcher {
    pub language: Option<String>,
    pub name: Vec<String>,
    pub description: Vec<String>,
    pub topics: Vec<String>,
}

impl Matcher {
    pub fn language(language: &str) -> Self {
        Self {
            language: Some(language.to_string()),
            ..Default::default()
        }
    }

    pub fn description(terms: &[&str]) -> Self {
        Self::default().or_description(terms)
    }

    pub fn name(terms: &[&str]) -> Self {
        Self::default().or_name(terms)
    }

    pub fn or_name(mut self, terms: &[&str]) -> Self {
        self.name.extend(terms.iter().map(|t| t.to_lowercase()));
        self
    }

    pub fn or_description(mut self, terms: &[&str]) -> Self {
        self.description.extend(terms.iter().map(|t| t.to_lowercase()));
        self
    }

    pub fn or_topics(mut self, terms: &[&str]) -> Self {
        self.topics.extend(terms.iter().map(|t| t.to_lowercase()));
        self
    }

    fn has_terms(&self) -> bool {
        !(self.name.is_empty() && self.description.is_empty() && self.topics.is_empty())
    }

    fn any_term(&self, facts: &RepoFacts) -> bool {
        self.name.iter().any(|t| facts.name.contains(t.as_str()))
            || self.description.iter().any(|t| facts.description.contains(t.as_str()))
            || self.topics.iter().any(|t| facts.topics.iter().any(|topic| topic == t))
    }

    pub fn matches(&self, facts: &RepoFacts) -> bool {
        let language_ok = match &self.language {
            Some(language) => facts.is_language(language),
            None => true,
        };
        language_ok && (!self.has_terms() || self.any_term(facts))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRule {
    pub category: String,
    pub when: Matcher,
}

impl CategoryRule {
    pub fn new(category: &str, when: Matcher) -> Self {
        Self {
            category: category.to_string(),
            when,
        }
    }
}

/// Platforms implied by a repository. Matches when any matcher does.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformRule {
    pub when: Vec<Matcher>,
    pub platforms: Vec<String>,
    /// Extra platforms appended when the description mentions the term.
    pub refinements: Vec<(String, String)>,
}

impl PlatformRule {
    pub fn new(when: Vec<Matcher>, platforms: &[&str]) -> Self {
        Self {
            when,
            platforms: platforms.iter().map(|p| p.to_string()).collect(),
            refinements: Vec::new(),
        }
    }

    pub fn refine(mut self, term: &str, platform: &str) -> Self {
        self.refinements.push((term.to_lowercase(), platform.to_string()));
        self
    }

    pub fn matches(&self, facts: &RepoFacts) -> bool {
        self.when.iter().any(|m| m.matches(facts))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRule {
    pub label: String,
    pub when: Matcher,
}

impl HighlightRule {
    pub fn new(label: &str, when: Matcher) -> Self {
        Self {
            label: label.to_string(),
            when,
        }
    }
}
