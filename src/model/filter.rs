use std::collections::HashSet;

use super::Repository;

/// Repository names that are listed even when they are forks.
pub const FEATURED_PROJECTS: [&str; 5] = [
    "web-kriss-nails",
    "catering-Front",
    "gestion-abogados-sistema",
    "sistema-salud-fronted",
    "parking-front",
];

/// Substring that excludes a repository from the listing.
const EXCLUDED_SUBSTRING: &str = "test";

/// Decides which fetched repositories are listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryFilter {
    featured_names: Vec<String>,
}

impl Default for RepositoryFilter {
    fn default() -> Self {
        Self::new(FEATURED_PROJECTS.iter().map(|name| name.to_string()).collect())
    }
}

impl RepositoryFilter {
    /// Creates a new `RepositoryFilter` with the given featured names.
    pub fn new(featured_names: Vec<String>) -> Self {
        Self { featured_names }
    }

    /// Retrieves the featured names, in display order.
    pub fn featured_names(&self) -> &[String] {
        &self.featured_names
    }

    /// Whether the name case-insensitively equals a featured name.
    pub fn is_featured(&self, name: &str) -> bool {
        self.featured_names
            .iter()
            .any(|featured| featured.eq_ignore_ascii_case(name))
    }

    /// Position of the name in the featured list, ignoring case, separators and whitespace.
    pub fn featured_position(&self, name: &str) -> Option<usize> {
        let name = normalize_name(name);
        self.featured_names
            .iter()
            .position(|featured| normalize_name(featured) == name)
    }

    /// Whether the repository is listed.
    pub fn keep(&self, repository: &Repository) -> bool {
        let is_test = repository
            .name()
            .to_lowercase()
            .contains(EXCLUDED_SUBSTRING);

        !is_test && (!repository.is_fork() || self.is_featured(repository.name()))
    }

    /// Filters the repositories, keeping the first occurrence of each id and the input order.
    pub fn apply(&self, repositories: Vec<Repository>) -> Vec<Repository> {
        let mut seen_ids = HashSet::new();

        repositories
            .into_iter()
            .filter(|repository| self.keep(repository))
            .filter(|repository| seen_ids.insert(repository.id()))
            .collect()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .collect()
}
