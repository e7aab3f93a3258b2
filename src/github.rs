//! GitHub project enrichment.
//!
//! Fills the Featured Projects section from a user's public repositories when
//! the data file lists none. Enrichment is best-effort: every failure is
//! logged and reported as an empty project list.
use crate::error::EnrichmentError;
use crate::model::Project;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Upper bound on repositories handed back to the caller.
pub const MAX_FETCHED_PROJECTS: usize = 6;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("resume-pdf/", env!("CARGO_PKG_VERSION"));

/// Supplier of project summaries for a source-hosting identifier.
pub trait ProjectSource {
    /// Return at most a bounded list of projects; never fails.
    fn fetch_projects(&self, identifier: &str, token: Option<&str>) -> Vec<Project>;
}

/// Public repositories of a GitHub user, via the REST API.
#[derive(Debug, Clone)]
pub struct GithubProjects {
    api_base: String,
}

impl Default for GithubProjects {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl GithubProjects {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn try_fetch(
        &self,
        identifier: &str,
        token: Option<&str>,
    ) -> Result<Vec<Project>, EnrichmentError> {
        let username = parse_username(identifier)
            .ok_or_else(|| EnrichmentError::Username(identifier.to_string()))?;
        let url = format!(
            "{}/users/{}/repos?per_page=100&sort=updated",
            self.api_base, username
        );

        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        let agent = ureq::Agent::new_with_config(config);
        let mut request = agent
            .get(url.as_str())
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let mut response = request.call()?;
        let body = response.body_mut().read_to_string()?;
        let repos: Vec<Repo> = serde_json::from_str(&body)?;
        tracing::debug!(
            username = %username,
            repos = repos.len(),
            "fetched GitHub repositories"
        );
        Ok(select_projects(repos))
    }
}

impl ProjectSource for GithubProjects {
    fn fetch_projects(&self, identifier: &str, token: Option<&str>) -> Vec<Project> {
        match self.try_fetch(identifier, token) {
            Ok(projects) => projects,
            Err(err) => {
                tracing::warn!(identifier, error = %err, "GitHub enrichment failed");
                Vec::new()
            }
        }
    }
}

/// Subset of the GitHub repository payload this crate reads.
#[derive(Debug, Deserialize)]
struct Repo {
    name: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    fork: bool,
    #[serde(default)]
    archived: bool,
}

impl From<Repo> for Project {
    fn from(repo: Repo) -> Self {
        Project {
            name: repo.name,
            language: repo.language.unwrap_or_default(),
            stars: repo.stargazers_count,
            url: repo.html_url,
            description: repo.description.unwrap_or_default(),
            topics: repo.topics,
        }
    }
}

/// Drop forks and archived repositories, then keep the most-starred ones.
///
/// The sort is stable so equally starred repositories keep API order.
fn select_projects(repos: Vec<Repo>) -> Vec<Project> {
    let mut repos: Vec<Repo> = repos
        .into_iter()
        .filter(|repo| !repo.fork && !repo.archived)
        .collect();
    repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    repos
        .into_iter()
        .take(MAX_FETCHED_PROJECTS)
        .map(Project::from)
        .collect()
}

/// Extract a GitHub username from a profile URL, `@handle`, or bare handle.
pub fn parse_username(identifier: &str) -> Option<String> {
    let identifier = identifier.trim();
    if let Some(cap) = profile_url_regex().captures(identifier) {
        return cap.get(1).map(|m| m.as_str().to_string());
    }
    handle_regex()
        .captures(identifier)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

fn profile_url_regex() -> &'static Regex {
    static PROFILE_URL: OnceLock<Regex> = OnceLock::new();
    PROFILE_URL.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:https?://)?(?:www\.)?github\.com/([A-Za-z0-9][A-Za-z0-9-]*)(?:[/?#].*)?$",
        )
        .expect("regex for GitHub profile URLs")
    })
}

fn handle_regex() -> &'static Regex {
    static HANDLE: OnceLock<Regex> = OnceLock::new();
    HANDLE.get_or_init(|| {
        Regex::new(r"^@?([A-Za-z0-9][A-Za-z0-9-]*)$").expect("regex for GitHub handles")
    })
}
