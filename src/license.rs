//! License resolution: name, link and text of a dependency's license
//!
//! Resolution walks a chain of GitHub lookups. Each lookup is allowed to fail
//! on its own: the affected field falls back to an empty value (or, for the
//! name, to the package's self-declared license) and the rest of the chain
//! carries on.

use crate::link;
use crate::metadata::github::{GitHubClient, Repository};
use crate::types::LicenseResolution;
use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, warn};

const YEAR_PLACEHOLDERS: [&str; 2] = ["[yyyy]", "[year]"];
const OWNER_PLACEHOLDERS: [&str; 2] = ["[name of copyright owner]", "[fullname]"];

const PARAGRAPH_MARK: &str = "\u{1e}";

/// Resolves license information through the GitHub API
pub struct LicenseResolver<'a> {
    client: &'a GitHubClient,
    include_description: bool,
}

impl<'a> LicenseResolver<'a> {
    pub fn new(client: &'a GitHubClient, include_description: bool) -> Self {
        Self {
            client,
            include_description,
        }
    }

    /// Whether resolutions carry a license text
    pub fn includes_description(&self) -> bool {
        self.include_description
    }

    /// Resolve the license of the repository a raw `repository_link` points at.
    ///
    /// Never fails. If the link names no GitHub repository, or the repository
    /// cannot be fetched, the result only carries the declared license name.
    pub async fn resolve(
        &self,
        repository_link: &str,
        declared_license: Option<&str>,
    ) -> LicenseResolution {
        let identity = link::identity_of(repository_link);
        let repository = match self.client.repository(&identity).await {
            Ok(repository) => repository,
            Err(e) => {
                warn!("Can't fetch package info from: '{}' ({})", repository_link, e);
                return LicenseResolution::declared(declared_license);
            }
        };

        let name = license_name(&repository, declared_license);
        let link = self.license_link(&repository, &name).await;
        let description = if self.include_description {
            self.license_description(&repository, &name).await
        } else {
            String::new()
        };

        LicenseResolution {
            name,
            link,
            description,
        }
    }

    /// The repository's license URL, else the registry page of the license
    async fn license_link(&self, repository: &Repository, name: &str) -> String {
        if let Some(url) = repository
            .license
            .as_ref()
            .and_then(|l| l.url.as_deref())
            .filter(|url| !url.is_empty())
        {
            return url.to_string();
        }

        if name.is_empty() {
            return String::new();
        }

        match self.client.license(&name.to_lowercase()).await {
            Ok(license) => license.html_url.unwrap_or_default(),
            Err(e) => {
                debug!("No registry link for license '{}': {}", name, e);
                String::new()
            }
        }
    }

    /// The repository's LICENSE file, else the registry template filled in
    /// with the repository's creation year and owner
    async fn license_description(&self, repository: &Repository, name: &str) -> String {
        match self
            .client
            .license_file(&repository.full_name, repository.default_branch.as_deref())
            .await
        {
            Ok(Some(text)) if !text.trim().is_empty() => return normalize_paragraphs(&text),
            Ok(_) => {}
            Err(e) => debug!("No LICENSE file in {}: {}", repository.full_name, e),
        }

        let key = repository
            .license
            .as_ref()
            .and_then(|l| l.key.as_deref())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| name.to_lowercase());
        if key.is_empty() {
            return String::new();
        }

        let body = match self.client.license(&key).await {
            Ok(license) => license.body.unwrap_or_default(),
            Err(e) => {
                debug!("No license template for '{}': {}", key, e);
                return String::new();
            }
        };
        if body.trim().is_empty() {
            return String::new();
        }

        let year = creation_year(repository.created_at.as_deref());
        let owner = self.owner_name(repository).await;
        normalize_paragraphs(&fill_placeholders(&body, year, &owner))
    }

    /// Display name of the repository owner, falling back to the login
    async fn owner_name(&self, repository: &Repository) -> String {
        let Some(login) = repository.owner.as_ref().map(|o| o.login.as_str()) else {
            return String::new();
        };

        match self.client.user(login).await {
            Ok(user) => user
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| login.to_string()),
            Err(e) => {
                debug!("No profile for {}: {}", login, e);
                login.to_string()
            }
        }
    }
}

/// The repository's license name, else the package's declared license
pub fn license_name(repository: &Repository, declared_license: Option<&str>) -> String {
    repository
        .license
        .as_ref()
        .and_then(|l| l.name.as_deref())
        .filter(|name| !name.is_empty())
        .or(declared_license)
        .unwrap_or_default()
        .to_string()
}

/// Year the repository was created; the current year when unknown
pub fn creation_year(created_at: Option<&str>) -> i32 {
    created_at
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc).year())
        .unwrap_or_else(|| Utc::now().year())
}

/// Replace the year and copyright-owner placeholders of a license template
pub fn fill_placeholders(body: &str, year: i32, owner: &str) -> String {
    let year = year.to_string();
    let mut text = body.to_string();
    for placeholder in YEAR_PLACEHOLDERS {
        text = text.replace(placeholder, &year);
    }
    for placeholder in OWNER_PLACEHOLDERS {
        text = text.replace(placeholder, owner);
    }
    text
}

/// Unwrap hard-wrapped lines while keeping paragraph breaks
pub fn normalize_paragraphs(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("\n\n", PARAGRAPH_MARK)
        .replace('\n', " ")
        .replace(PARAGRAPH_MARK, "\n\n")
        .trim()
        .to_string()
}
