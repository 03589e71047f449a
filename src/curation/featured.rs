use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use crate::models::{PinnedSet, Project};
use crate::taxonomy::CATCH_ALL_CATEGORY;

#[derive(Debug, Clone)]
pub struct FeaturedRules {
    pub limit: usize,
    pub min_commits: u32,
    pub min_stars: u32,
    pub star_weight: u64,
    pub commit_weight: u64,
    pub per_category: usize,
    pub catch_all_per_category: usize,
    /// Top up with the best remaining projects when the category walk
    /// produced fewer than this. Zero disables it.
    pub backfill_to: usize,
}

impl Default for FeaturedRules {
    fn default() -> Self {
        Self {
            limit: 12,
            min_commits: 25,
            min_stars: 2,
            star_weight: 10,
            commit_weight: 1,
            per_category: 2,
            catch_all_per_category: 1,
            backfill_to: 8,
        }
    }
}

/// Picks the prominently displayed subset: pinned first, then a
/// category-balanced walk over the rest by score.
#[derive(Debug, Clone)]
pub struct FeaturedSelector {
    rules: FeaturedRules,
    catch_all: String,
}

impl FeaturedSelector {
    pub fn new(rules: FeaturedRules) -> Self {
        Self {
            rules,
            catch_all: CATCH_ALL_CATEGORY.to_string(),
        }
    }

    /// The category the classifier falls back to. It is walked last and
    /// gets the smaller quota.
    pub fn with_catch_all(mut self, category: impl Into<String>) -> Self {
        self.catch_all = category.into();
        self
    }

    pub fn is_candidate(&self, project: &Project) -> bool {
        project.commit_count >= self.rules.min_commits || project.stars >= self.rules.min_stars
    }

    pub fn score(&self, project: &Project) -> u64 {
        u64::from(project.stars) * self.rules.star_weight
            + u64::from(project.commit_count) * self.rules.commit_weight
    }

    fn rank(&self, a: &Project, b: &Project) -> Ordering {
        self.score(b)
            .cmp(&self.score(a))
            .then_with(|| b.updated_at.cmp(&a.updated_at))
            .then_with(|| a.id.cmp(&b.id))
    }

    fn quota(&self, category: &str) -> usize {
        if category == self.catch_all {
            self.rules.catch_all_per_category
        } else {
            self.rules.per_category
        }
    }

    /// Alphabetical, with the catch-all category moved to the end.
    fn category_order(&self, projects: &[Project]) -> Vec<String> {
        let categories: BTreeSet<&str> = projects.iter().map(|p| p.category.as_str()).collect();
        let (mut ordered, catch_all): (Vec<String>, Vec<String>) = categories
            .into_iter()
            .map(str::to_string)
            .partition(|c| *c != self.catch_all);
        ordered.extend(catch_all);
        ordered
    }

    pub fn select(&self, projects: Vec<Project>, pinned: &PinnedSet) -> Vec<Project> {
        let limit = self.rules.limit;
        let (mut pinned_projects, mut unpinned): (Vec<Project>, Vec<Project>) = projects
            .into_iter()
            .filter(|p| self.is_candidate(p))
            .partition(|p| pinned.contains(&p.id));

        pinned_projects.sort_by_key(|p| pinned.position(&p.id));
        unpinned.sort_by(|a, b| self.rank(a, b));

        let mut emitted: HashSet<String> = HashSet::new();
        let mut featured: Vec<Project> = Vec::new();

        for project in pinned_projects {
            if featured.len() >= limit {
                break;
            }
            if emitted.insert(project.id.clone()) {
                featured.push(project);
            }
        }

        for category in self.category_order(&unpinned) {
            if featured.len() >= limit {
                break;
            }
            let quota = self.quota(&category);
            let picks: Vec<&Project> = unpinned
                .iter()
                .filter(|p| p.category == category && !emitted.contains(&p.id))
                .take(quota)
                .collect();
            for project in picks {
                if featured.len() >= limit {
                    break;
                }
                emitted.insert(project.id.clone());
                featured.push(project.clone());
            }
        }

        let target = self.rules.backfill_to.min(limit);
        if featured.len() < target {
            for project in &unpinned {
                if featured.len() >= target {
                    break;
                }
                if emitted.insert(project.id.clone()) {
                    featured.push(project.clone());
                }
            }
        }

        featured.truncate(limit);
        featured
    }
}

impl Default for FeaturedSelector {
    fn default() -> Self {
        Self::new(FeaturedRules::default())
    }
}
