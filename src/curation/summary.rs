use std::collections::BTreeMap;
use std::fmt;

use crate::models::{PinnedSet, Snapshot};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub candidates: usize,
    pub filtered_out: usize,
    pub processed: usize,
    pub skipped: Vec<String>,
    pub included: usize,
    pub featured: usize,
    pub pinned_featured: usize,
    pub pinned_degraded: bool,
    pub total_stars: u64,
    pub total_commits: u64,
    pub categories: BTreeMap<String, usize>,
    /// Name, stars and commits of the best-starred featured projects.
    pub top_by_stars: Vec<(String, u32, u32)>,
}

impl RunSummary {
    pub fn average_stars(&self) -> f64 {
        if self.featured == 0 {
            0.0
        } else {
            self.total_stars as f64 / self.featured as f64
        }
    }

    pub(crate) fn record_featured(&mut self, snapshot: &Snapshot, pinned: &PinnedSet) {
        self.featured = snapshot.projects.len();
        self.categories.clear();
        self.total_stars = 0;
        self.total_commits = 0;
        self.pinned_featured = 0;

        for project in &snapshot.projects {
            *self.categories.entry(project.category.clone()).or_default() += 1;
            self.total_stars += u64::from(project.stars);
            self.total_commits += u64::from(project.commit_count);
            if pinned.contains(&project.id) {
                self.pinned_featured += 1;
            }
        }

        let mut by_stars: Vec<_> = snapshot
            .projects
            .iter()
            .map(|p| (p.name.clone(), p.stars, p.commit_count))
            .collect();
        by_stars.sort_by(|a, b| b.1.cmp(&a.1));
        by_stars.truncate(5);
        self.top_by_stars = by_stars;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project stats:")?;
        writeln!(f, "  Repositories listed: {}", self.candidates)?;
        writeln!(f, "  Repositories checked: {}", self.processed)?;
        if !self.skipped.is_empty() {
            writeln!(f, "  Skipped after errors: {}", self.skipped.join(", "))?;
        }
        writeln!(f, "  Passed quality gate: {}", self.included)?;
        writeln!(f, "  Featured projects: {} ({} pinned)", self.featured, self.pinned_featured)?;
        if self.pinned_degraded {
            writeln!(f, "  Pinned lookup failed: featured list built without pinned repositories")?;
        }
        writeln!(f, "  Total stars: {}", self.total_stars)?;
        writeln!(f, "  Total commits: {}", self.total_commits)?;
        writeln!(f, "  Average stars per project: {:.1}", self.average_stars())?;

        if !self.categories.is_empty() {
            writeln!(f, "\nProject breakdown:")?;
            for (category, count) in &self.categories {
                writeln!(f, "  {}: {}", category, count)?;
            }
        }

        if !self.top_by_stars.is_empty() {
            writeln!(f, "\nTop {} projects by stars:", self.top_by_stars.len())?;
            for (i, (name, stars, commits)) in self.top_by_stars.iter().enumerate() {
                writeln!(f, "  {}. {} - {} stars, {} commits", i + 1, name, stars, commits)?;
            }
        }

        Ok(())
    }
}
