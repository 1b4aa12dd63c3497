use std::collections::BTreeMap;

use serde::Serialize;

use super::{Repository, RepositoryFilter};

/// Category for repositories without a primary language.
pub const NO_LANGUAGE_CATEGORY: &str = "No language";

/// Maximum number of repositories in the recent category.
const MAX_RECENT_REPOSITORIES: usize = 6;

/// Display order of the language categories.
const CATEGORY_ORDER: [&str; 11] = [
    "Assembly",
    "CSS",
    "Dockerfile",
    "HTML",
    "Java",
    "JavaScript",
    "Kotlin",
    "Python",
    NO_LANGUAGE_CATEGORY,
    "Svelte",
    "TypeScript",
];

/// Repositories of one language category.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LanguageCategory {
    pub language: String,
    pub repositories: Vec<Repository>,
}

/// Repositories split into the subsets displayed by the portfolio.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryCatalog {
    /// Featured repositories, in featured list order.
    pub featured: Vec<Repository>,

    /// Most recently updated repositories that are not featured.
    pub recent: Vec<Repository>,

    /// All repositories grouped by primary language.
    pub by_language: Vec<LanguageCategory>,
}

impl RepositoryCatalog {
    /// Builds the catalog from a listing.
    pub fn build(repositories: &[Repository], filter: &RepositoryFilter) -> Self {
        let (mut featured, mut others): (Vec<_>, Vec<_>) = repositories
            .iter()
            .cloned()
            .partition(|repository| filter.featured_position(repository.name()).is_some());
        featured.sort_by_key(|repository| filter.featured_position(repository.name()));
        others.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        others.truncate(MAX_RECENT_REPOSITORIES);

        let mut grouped: BTreeMap<String, Vec<Repository>> = BTreeMap::new();
        for repository in repositories {
            let language = repository.language().unwrap_or(NO_LANGUAGE_CATEGORY);
            grouped
                .entry(language.to_string())
                .or_default()
                .push(repository.clone());
        }
        let mut by_language = Vec::with_capacity(grouped.len());
        for language in CATEGORY_ORDER {
            if let Some(repositories) = grouped.remove(language) {
                by_language.push(LanguageCategory {
                    language: language.to_string(),
                    repositories,
                });
            }
        }
        by_language.extend(
            grouped
                .into_iter()
                .map(|(language, repositories)| LanguageCategory {
                    language,
                    repositories,
                }),
        );

        Self {
            featured,
            recent: others,
            by_language,
        }
    }

    /// Retrieves the repositories of a language category.
    pub fn language(&self, language: &str) -> &[Repository] {
        self.by_language
            .iter()
            .find(|category| category.language == language)
            .map(|category| category.repositories.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(repositories: &[Repository]) -> Vec<&str> {
        repositories.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn empty_listing_builds_empty_catalog() {
        let catalog = RepositoryCatalog::build(&[], &RepositoryFilter::default());

        assert_eq!(RepositoryCatalog::default(), catalog);
    }

    #[test]
    fn featured_follow_featured_list_order() {
        let repositories = vec![
            Repository::dummy(1, "parking-front"),
            Repository::dummy(2, "portfolio"),
            Repository::dummy(3, "Web_Kriss_Nails"),
        ];

        let catalog = RepositoryCatalog::build(&repositories, &RepositoryFilter::default());

        assert_eq!(vec!["Web_Kriss_Nails", "parking-front"], names(&catalog.featured));
        assert_eq!(vec!["portfolio"], names(&catalog.recent));
    }

    #[test]
    fn recent_keeps_six_latest_non_featured() {
        let repositories = (1..=8)
            .map(|day| {
                Repository::dummy(day, &format!("repo-{day}"))
                    .with_updated_at(&format!("2025-01-0{day}T00:00:00Z"))
            })
            .collect::<Vec<_>>();

        let catalog = RepositoryCatalog::build(&repositories, &RepositoryFilter::default());

        assert_eq!(
            vec!["repo-8", "repo-7", "repo-6", "repo-5", "repo-4", "repo-3"],
            names(&catalog.recent)
        );
    }

    #[test]
    fn groups_all_repositories_by_language_in_display_order() {
        let repositories = vec![
            Repository::dummy(1, "api").with_language("Rust"),
            Repository::dummy(2, "site").with_language("TypeScript"),
            Repository::dummy(3, "notes"),
            Repository::dummy(4, "parking-front").with_language("CSS"),
            Repository::dummy(5, "scripts").with_language("Go"),
        ];

        let catalog = RepositoryCatalog::build(&repositories, &RepositoryFilter::default());

        let languages = catalog
            .by_language
            .iter()
            .map(|category| category.language.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            vec!["CSS", NO_LANGUAGE_CATEGORY, "TypeScript", "Go", "Rust"],
            languages
        );
        assert_eq!(vec!["parking-front"], names(catalog.language("CSS")));
        assert!(catalog.language("Haskell").is_empty());
    }
}
