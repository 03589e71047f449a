use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::github::source::RepoSource;
use crate::models::{Contributor, RawRepository};

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const PAGE_SIZE: u32 = 100;
const PINNED_LIMIT: u32 = 6;

const PINNED_QUERY: &str = r#"
query($login: String!, $first: Int!) {
  user(login: $login) {
    pinnedItems(first: $first, types: REPOSITORY) {
      nodes {
        ... on Repository {
          name
        }
      }
    }
  }
}
"#;

pub struct GitHubClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: PinnedVariables<'a>,
}

#[derive(Serialize)]
struct PinnedVariables<'a> {
    login: &'a str,
    first: u32,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<PinnedData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct PinnedData {
    user: Option<PinnedUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PinnedUser {
    pinned_items: PinnedItems,
}

#[derive(Deserialize)]
struct PinnedItems {
    nodes: Vec<PinnedNode>,
}

#[derive(Deserialize)]
struct PinnedNode {
    name: Option<String>,
}

impl GitHubClient {
    /// Builds a client; without a token requests go out anonymously and
    /// are simply more likely to be throttled.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token.trim()))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("showcase-curator/0.1"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("Fetching: {}", url);
        Ok(self.client.get(url).send().await?)
    }
}

fn is_throttled(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS
}

async fn api_error(what: &str, response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Error::GitHubApi(format!("Failed to fetch {}: {} - {}", what, status, body))
}

#[async_trait]
impl RepoSource for GitHubClient {
    async fn list_repositories(&self, account: &str) -> Result<Vec<RawRepository>> {
        let url = format!(
            "{}/users/{}/repos?per_page={}&sort=updated",
            self.base_url, account, PAGE_SIZE
        );
        tracing::info!("Fetching repositories for: {}", account);

        let response = self.get(&url).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::AccountNotFound(account.to_string()));
        }
        if is_throttled(status) {
            return Err(Error::RateLimited(format!("repositories of {}", account)));
        }
        if !status.is_success() {
            return Err(api_error(&format!("repositories of {}", account), response).await);
        }

        Ok(response.json().await?)
    }

    async fn list_pinned(&self, account: &str) -> Result<Vec<String>> {
        let url = format!("{}/graphql", self.base_url);
        let request = GraphQlRequest {
            query: PINNED_QUERY,
            variables: PinnedVariables {
                login: account,
                first: PINNED_LIMIT,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(Error::GraphQl(format!(
                "pinned items query responded with {}",
                response.status()
            )));
        }

        let body: GraphQlResponse = response.json().await?;
        if let Some(error) = body.errors.first() {
            return Err(Error::GraphQl(error.message.clone()));
        }

        let user = body
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| Error::GraphQl(format!("no user named {}", account)))?;

        Ok(user
            .pinned_items
            .nodes
            .into_iter()
            .filter_map(|n| n.name)
            .map(|n| n.to_lowercase())
            .collect())
    }

    async fn contributors(&self, account: &str, repo: &str) -> Result<Vec<Contributor>> {
        let url = format!("{}/repos/{}/{}/contributors", self.base_url, account, repo);
        let response = self.get(&url).await?;
        let status = response.status();

        // Empty repositories answer with no content.
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if is_throttled(status) {
            return Err(Error::RateLimited(format!("contributors of {}", repo)));
        }
        if !status.is_success() {
            return Err(api_error(&format!("contributors of {}", repo), response).await);
        }

        Ok(response.json().await?)
    }

    async fn release_count(&self, account: &str, repo: &str) -> Result<u32> {
        let url = format!(
            "{}/repos/{}/{}/releases?per_page={}",
            self.base_url, account, repo, PAGE_SIZE
        );
        let response = self.get(&url).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(0);
        }
        if is_throttled(status) {
            return Err(Error::RateLimited(format!("releases of {}", repo)));
        }
        if !status.is_success() {
            return Err(api_error(&format!("releases of {}", repo), response).await);
        }

        let releases: Vec<serde_json::Value> = response.json().await?;
        Ok(releases.len() as u32)
    }
}
