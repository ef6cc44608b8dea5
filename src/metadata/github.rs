//! Client for the GitHub REST API endpoints used by license resolution

use crate::config::NetworkConfig;
use crate::error::{InventoryError, Result};
use crate::types::RepositoryIdentity;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub owner: Option<RepositoryOwner>,
    pub license: Option<RepositoryLicense>,
    pub created_at: Option<String>,
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

/// License summary attached to a repository
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryLicense {
    pub key: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
}

/// `GET /users/{login}`
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
}

/// `GET /licenses/{key}`
#[derive(Debug, Clone, Deserialize)]
pub struct License {
    pub key: Option<String>,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    download_url: Option<String>,
}

/// GitHub API client sharing one connection pool across calls
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    /// Carries no credentials; used for `download_url` links on other hosts
    raw: Client,
    base_url: String,
}

impl GitHubClient {
    /// Build a client with GitHub headers and, if configured, a bearer token
    pub fn new(config: &NetworkConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );

        if let Some(token) = &config.github_token {
            let value: reqwest::header::HeaderValue =
                format!("Bearer {}", token.trim()).parse().map_err(|_| {
                    InventoryError::config("GitHub token contains characters not allowed in a header")
                })?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| InventoryError::config(format!("Cannot build HTTP client: {}", e)))?;

        let raw = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| InventoryError::config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            raw,
            base_url: config.base_url().to_string(),
        })
    }

    /// Fetch repository metadata
    pub async fn repository(&self, identity: &RepositoryIdentity) -> Result<Repository> {
        if identity.is_incomplete() {
            return Err(InventoryError::InvalidRepository(identity.to_string()));
        }

        let url = format!(
            "{}/repos/{}/{}",
            self.base_url,
            urlencoding::encode(&identity.owner),
            urlencoding::encode(&identity.repo)
        );
        self.get_json(&url).await
    }

    /// Fetch a user's profile
    pub async fn user(&self, login: &str) -> Result<User> {
        let url = format!("{}/users/{}", self.base_url, urlencoding::encode(login));
        self.get_json(&url).await
    }

    /// Fetch a license template from the license registry
    pub async fn license(&self, key: &str) -> Result<License> {
        let url = format!("{}/licenses/{}", self.base_url, urlencoding::encode(key));
        self.get_json(&url).await
    }

    /// Fetch the raw text of the repository's `LICENSE` file.
    ///
    /// Returns `Ok(None)` when the repository has no such file.
    pub async fn license_file(
        &self,
        full_name: &str,
        branch: Option<&str>,
    ) -> Result<Option<String>> {
        let mut url = format!("{}/repos/{}/contents/LICENSE", self.base_url, full_name);
        if let Some(branch) = branch {
            url.push_str("?ref=");
            url.push_str(&urlencoding::encode(branch));
        }

        let entry: ContentEntry = match self.get_json(&url).await {
            Ok(entry) => entry,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let Some(download_url) = entry.download_url else {
            return Ok(None);
        };

        debug!("GET {}", download_url);
        let response = self.raw.get(&download_url).send().await?;
        let response = check_status(response, &download_url)?;
        Ok(Some(response.text().await?))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let response = check_status(response, url)?;
        Ok(response.json::<T>().await?)
    }
}

/// Map non-success statuses onto inventory errors
fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(InventoryError::NotFound(url.to_string()));
    }

    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0"));

    if rate_limited {
        let retry_after = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .map(|reset| {
                let now = chrono::Utc::now().timestamp();
                Duration::from_secs(reset.saturating_sub(now).max(0) as u64)
            });

        return Err(InventoryError::RateLimited { retry_after });
    }

    Err(InventoryError::Status {
        status: status.as_u16(),
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::Server) -> GitHubClient {
        let config = NetworkConfig {
            api_base_url: server.url(),
            timeout_secs: 5,
            github_token: Some("secret".to_string()),
        };
        GitHubClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_repository_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/foo/bar")
            .match_header("authorization", "Bearer secret")
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"full_name": "foo/bar", "owner": {"login": "foo"},
                    "license": {"key": "mit", "name": "MIT License", "url": null},
                    "created_at": "2019-03-01T10:00:00Z", "default_branch": "main"}"#,
            )
            .create_async()
            .await;

        let repo = client_for(&server)
            .repository(&RepositoryIdentity::new("foo", "bar"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(repo.full_name, "foo/bar");
        let license = repo.license.unwrap();
        assert_eq!(license.name.as_deref(), Some("MIT License"));
        assert_eq!(license.url, None);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/ghost")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/users/busy")
            .with_status(403)
            .with_header("x-ratelimit-remaining", "0")
            .create_async()
            .await;
        server
            .mock("GET", "/users/broken")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.user("ghost").await,
            Err(InventoryError::NotFound(_))
        ));
        assert!(matches!(
            client.user("busy").await,
            Err(InventoryError::RateLimited { .. })
        ));
        assert!(matches!(
            client.user("broken").await,
            Err(InventoryError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_incomplete_identity_is_not_requested() {
        let server = mockito::Server::new_async().await;
        let result = client_for(&server)
            .repository(&RepositoryIdentity::new("foo", ""))
            .await;
        assert!(matches!(result, Err(InventoryError::InvalidRepository(ref id)) if id == "foo"));
    }

    #[tokio::test]
    async fn test_license_file_follows_download_url() {
        let mut server = mockito::Server::new_async().await;
        let download_url = format!("{}/raw/foo/bar/main/LICENSE", server.url());
        server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/repos/foo/bar/contents/LICENSE".to_string()),
            )
            .match_query(mockito::Matcher::UrlEncoded("ref".into(), "main".into()))
            .match_header("authorization", "Bearer secret")
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"download_url": "{}"}}"#, download_url))
            .create_async()
            .await;
        let raw = server
            .mock("GET", "/raw/foo/bar/main/LICENSE")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_body("MIT License\n\nCopyright (c) 2019 Foo")
            .create_async()
            .await;

        let text = client_for(&server)
            .license_file("foo/bar", Some("main"))
            .await
            .unwrap();
        raw.assert_async().await;
        assert_eq!(text.as_deref(), Some("MIT License\n\nCopyright (c) 2019 Foo"));
    }

    #[tokio::test]
    async fn test_missing_license_file_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/foo/bar/contents/LICENSE")
            .with_status(404)
            .create_async()
            .await;

        let text = client_for(&server).license_file("foo/bar", None).await.unwrap();
        assert_eq!(text, None);
    }
}
