use std::{fmt::Display, ops::Deref};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The name of a GitHub account whose repositories are listed.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountName(pub String);

impl AccountName {
    /// Creates a new `AccountName` from the given login.
    pub fn new(login: &str) -> Self {
        Self(login.trim().to_string())
    }

    /// Whether the name is empty, in which case no data is ever fetched for it.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The cache key derived from the account name.
    pub fn cache_key(&self) -> String {
        format!("github-repos-{}", self.0)
    }
}

impl Deref for AccountName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata of a GitHub repository, as returned by the REST API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// The unique identifier of the repository.
    id: u64,

    /// The name of the repository.
    name: String,

    /// The name of the repository prefixed by its owner.
    #[serde(default)]
    full_name: String,

    description: Option<String>,

    /// The web URL of the repository.
    html_url: String,

    /// The homepage configured for the repository.
    homepage: Option<String>,

    /// The primary language of the repository.
    language: Option<String>,

    #[serde(default)]
    stargazers_count: u32,

    #[serde(default)]
    forks_count: u32,

    /// Whether the repository is a fork.
    fork: bool,

    #[serde(default)]
    topics: Vec<String>,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    pushed_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Retrieves the repository identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Retrieves the repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retrieves the repository description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Retrieves the web URL of the repository.
    pub fn html_url(&self) -> &str {
        &self.html_url
    }

    /// Retrieves the homepage of the repository.
    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref().filter(|homepage| !homepage.is_empty())
    }

    /// Retrieves the primary language of the repository.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Retrieves the number of stars of the repository.
    pub fn stargazers_count(&self) -> u32 {
        self.stargazers_count
    }

    /// Retrieves the number of forks of the repository.
    pub fn forks_count(&self) -> u32 {
        self.forks_count
    }

    /// Whether the repository is a fork of another one.
    pub fn is_fork(&self) -> bool {
        self.fork
    }

    /// Retrieves the topics of the repository.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Retrieves the last update date of the repository.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Creates a dummy `Repository` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy(id: u64, name: &str) -> Self {
        let date = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        Self {
            id,
            name: name.to_string(),
            full_name: format!("octocat/{name}"),
            description: None,
            html_url: format!("https://github.com/octocat/{name}"),
            homepage: None,
            language: None,
            stargazers_count: 0,
            forks_count: 0,
            fork: false,
            topics: vec![],
            created_at: date,
            updated_at: date,
            pushed_at: Some(date),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_fork(mut self, fork: bool) -> Self {
        self.fork = fork;
        self
    }

    #[cfg(test)]
    pub(crate) fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    #[cfg(test)]
    pub(crate) fn with_updated_at(mut self, updated_at: &str) -> Self {
        self.updated_at = DateTime::parse_from_rfc3339(updated_at)
            .unwrap()
            .with_timezone(&Utc);
        self
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repository: {}, Language: {}, Stars: {}, Fork: {}",
            self.name,
            self.language.as_deref().unwrap_or("-"),
            self.stargazers_count,
            self.fork
        )
    }
}

/// A validated message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    name: String,
    email: String,
    message: String,
}

impl ContactMessage {
    pub(crate) fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
        }
    }

    /// Retrieves the name of the sender.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retrieves the email of the sender.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Retrieves the message body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_name_cache_key() {
        let account = AccountName::new(" octocat ");

        assert_eq!("github-repos-octocat", account.cache_key());
        assert!(!account.is_blank());
    }

    #[test]
    fn account_name_blank() {
        assert!(AccountName::new("   ").is_blank());
        assert!(AccountName(String::new()).is_blank());
    }

    #[test]
    fn repository_deserializes_from_rest_payload() {
        let repository: Repository = serde_json::from_value(serde_json::json!({
            "id": 42,
            "name": "portfolio",
            "full_name": "octocat/portfolio",
            "description": null,
            "html_url": "https://github.com/octocat/portfolio",
            "homepage": "",
            "language": "TypeScript",
            "stargazers_count": 3,
            "forks_count": 1,
            "fork": false,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
            "pushed_at": "2025-01-01T00:00:00Z",
            "owner": { "login": "octocat" }
        }))
        .unwrap();

        assert_eq!(42, repository.id());
        assert_eq!("portfolio", repository.name());
        assert_eq!(Some("TypeScript"), repository.language());
        assert_eq!(None, repository.homepage());
        assert!(repository.topics().is_empty());
        assert!(!repository.is_fork());
    }
}
