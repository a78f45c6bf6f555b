//! REST API issue source

use crate::error::GitHubError;
use crate::filter::AuthorFilter;
use async_trait::async_trait;
use issuelens_domain::traits::IssueSource;
use issuelens_domain::RawIssue;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default GitHub API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Issues requested per page (the API maximum)
pub const PER_PAGE: usize = 100;

const USER_AGENT: &str = concat!("issuelens/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

/// Issue source backed by the GitHub REST API
///
/// Authentication is optional; without a token the unauthenticated rate
/// limit applies.
pub struct GitHubIssueSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    filter: AuthorFilter,
}

#[derive(Deserialize)]
struct ApiIssue {
    number: u64,
    id: u64,
    title: String,
    html_url: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    comments: u64,
    updated_at: String,
    #[serde(default)]
    reactions: Option<serde_json::Value>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    #[serde(default)]
    user: Option<ApiUser>,
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Deserialize)]
struct ApiUser {
    login: String,
}

/// The text handed to extraction for one issue
#[derive(Serialize)]
struct IssueDocument<'a> {
    number: u64,
    id: u64,
    title: &'a str,
    html_url: &'a str,
    body: &'a str,
    comments: u64,
    updated_at: &'a str,
    reactions: &'a serde_json::Value,
    labels: Vec<&'a str>,
    repository: &'a str,
    user: &'a str,
}

impl ApiIssue {
    fn author(&self) -> &str {
        self.user.as_ref().map(|u| u.login.as_str()).unwrap_or("")
    }

    fn to_raw(&self, repo: &str) -> Result<RawIssue, GitHubError> {
        let no_reactions = serde_json::Value::Object(serde_json::Map::new());
        let document = IssueDocument {
            number: self.number,
            id: self.id,
            title: &self.title,
            html_url: &self.html_url,
            body: self.body.as_deref().unwrap_or(""),
            comments: self.comments,
            updated_at: &self.updated_at,
            reactions: self.reactions.as_ref().unwrap_or(&no_reactions),
            labels: self.labels.iter().map(|l| l.name.as_str()).collect(),
            repository: repo,
            user: self.author(),
        };

        serde_json::to_string(&document)
            .map(RawIssue::new)
            .map_err(|e| GitHubError::InvalidResponse(format!("Failed to serialize issue: {}", e)))
    }
}

impl GitHubIssueSource {
    /// Create a source, authenticated when a token is given
    pub fn new(token: Option<String>) -> Result<Self, GitHubError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GitHubError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: DEFAULT_API_URL.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            filter: AuthorFilter::default(),
        })
    }

    /// Point at a different API host (GitHub Enterprise, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the author filter
    pub fn with_filter(mut self, filter: AuthorFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Whether requests carry a token
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch_page(&self, owner: &str, repo: &str, page: usize) -> Result<Vec<ApiIssue>, GitHubError> {
        let url = format!("{}/repos/{}/{}/issues", self.base_url, owner, repo);
        let per_page = PER_PAGE.to_string();
        let page_number = page.to_string();

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .query(&[("state", "open"), ("per_page", per_page.as_str()), ("page", page_number.as_str())]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GitHubError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                StatusCode::NOT_FOUND => GitHubError::NotFound(format!("{}/{}", owner, repo)),
                StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => GitHubError::RateLimited(message),
                _ => GitHubError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        response
            .json::<Vec<ApiIssue>>()
            .await
            .map_err(|e| GitHubError::InvalidResponse(format!("Failed to parse issues page {}: {}", page, e)))
    }
}

#[async_trait]
impl IssueSource for GitHubIssueSource {
    type Error = GitHubError;

    async fn open_issues(&self, owner: &str, repo: &str) -> Result<Vec<RawIssue>, GitHubError> {
        let mut issues = Vec::new();
        let mut skipped = 0usize;
        let mut page = 1;

        loop {
            let batch = self.fetch_page(owner, repo, page).await?;
            let fetched = batch.len();
            debug!("Fetched page {} of {}/{} ({} items)", page, owner, repo, fetched);

            for issue in &batch {
                if issue.pull_request.is_some() {
                    continue;
                }
                if !self.filter.allows(issue.author()) {
                    skipped += 1;
                    continue;
                }
                issues.push(issue.to_raw(repo)?);
            }

            if fetched < PER_PAGE {
                break;
            }
            page += 1;
        }

        info!(
            "Found {} open issues in {}/{} ({} filtered by author)",
            issues.len(),
            owner,
            repo,
            skipped
        );
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn issue(number: u64, login: &str) -> serde_json::Value {
        json!({
            "number": number,
            "id": 1000 + number,
            "title": format!("Issue {}", number),
            "html_url": format!("https://github.com/acme/app/issues/{}", number),
            "body": "Something broke",
            "comments": 3,
            "updated_at": "2024-03-01T12:00:00Z",
            "reactions": {"+1": 2, "-1": 1, "total_count": 3},
            "labels": [{"name": "bug"}, {"name": "ui"}],
            "user": {"login": login},
            "state": "open"
        })
    }

    fn source(server: &MockServer) -> GitHubIssueSource {
        GitHubIssueSource::new(None).unwrap().with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_serializes_issue_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/app/issues"))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([issue(7, "octocat")])))
            .mount(&server)
            .await;

        let issues = source(&server).open_issues("acme", "app").await.unwrap();
        assert_eq!(issues.len(), 1);

        let doc: serde_json::Value = serde_json::from_str(issues[0].as_str()).unwrap();
        assert_eq!(doc["number"], 7);
        assert_eq!(doc["id"], 1007);
        assert_eq!(doc["repository"], "app");
        assert_eq!(doc["user"], "octocat");
        assert_eq!(doc["labels"], json!(["bug", "ui"]));
        assert_eq!(doc["reactions"]["+1"], 2);
        assert_eq!(doc["comments"], 3);
    }

    #[tokio::test]
    async fn test_drops_pull_requests_and_bots() {
        let server = MockServer::start().await;
        let mut pr = issue(3, "octocat");
        pr["pull_request"] = json!({"url": "https://api.github.com/repos/acme/app/pulls/3"});

        Mock::given(method("GET"))
            .and(path("/repos/acme/app/issues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                issue(1, "octocat"),
                issue(2, "renovate-bot"),
                pr,
                issue(4, "forking-renovate[bot]"),
            ])))
            .mount(&server)
            .await;

        let issues = source(&server).open_issues("acme", "app").await.unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].as_str().contains("\"number\":1"));
    }

    #[tokio::test]
    async fn test_follows_pages_until_short_page() {
        let server = MockServer::start().await;
        let full: Vec<_> = (1..=PER_PAGE as u64).map(|n| issue(n, "octocat")).collect();

        Mock::given(method("GET"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(full)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([issue(101, "octocat")])))
            .expect(1)
            .mount(&server)
            .await;

        let issues = source(&server).open_issues("acme", "app").await.unwrap();
        assert_eq!(issues.len(), PER_PAGE + 1);
    }

    #[tokio::test]
    async fn test_sends_token_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("Authorization", "Bearer ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let source = GitHubIssueSource::new(Some("ghp_test".to_string()))
            .unwrap()
            .with_base_url(server.uri());
        assert!(source.is_authenticated());
        assert!(source.open_issues("acme", "app").await.unwrap().is_empty());
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let source = GitHubIssueSource::new(Some("  ".to_string())).unwrap();
        assert!(!source.is_authenticated());
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/missing/issues"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/limited/issues"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API rate limit exceeded"))
            .mount(&server)
            .await;

        let source = source(&server);
        assert!(matches!(
            source.open_issues("acme", "missing").await,
            Err(GitHubError::NotFound(_))
        ));
        assert!(matches!(
            source.open_issues("acme", "limited").await,
            Err(GitHubError::RateLimited(_))
        ));
    }
}
