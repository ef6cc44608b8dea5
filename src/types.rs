//! Core data types for the license inventory

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dependency declared in the project manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDependency {
    /// Package name, e.g. `left-pad` or `@scope/pkg`
    pub name: String,
    /// Version range as written in the manifest, e.g. `^1.0.0`
    pub version_range: String,
}

impl PackageDependency {
    pub fn new(name: impl Into<String>, version_range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version_range: version_range.into(),
        }
    }
}

/// The `repository` field of a package manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RepositoryReference {
    /// `"repository": "https://github.com/owner/repo"`
    Url(String),
    /// `"repository": { "type": "git", "url": "..." }`
    Object { url: Option<String> },
}

impl RepositoryReference {
    /// The raw link string, if the reference carries one
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url.as_str()),
            Self::Object { url } => url.as_deref(),
        }
    }
}

/// Metadata read from an installed package's own manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    pub repository: Option<RepositoryReference>,
    pub homepage: Option<String>,
    /// License the package declares for itself
    pub declared_license: Option<String>,
}

/// Canonical `owner/repo` pair of a hosted repository
///
/// Case is preserved. Malformed links may produce an empty `repo`
/// (or an empty `owner`), in which case lookups simply fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RepositoryIdentity {
    pub owner: String,
    pub repo: String,
}

impl RepositoryIdentity {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Build from an already-canonical `owner/repo` string
    pub fn from_canonical(canonical: &str) -> Self {
        let mut segments = canonical.splitn(2, '/');
        let owner = segments.next().unwrap_or_default();
        let repo = segments.next().unwrap_or_default();
        Self::new(owner, repo)
    }

    /// True when either segment is missing
    pub fn is_incomplete(&self) -> bool {
        self.owner.is_empty() || self.repo.is_empty()
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repo.is_empty() {
            write!(f, "{}", self.owner)
        } else {
            write!(f, "{}/{}", self.owner, self.repo)
        }
    }
}

/// Outcome of the license resolution chain; unresolved fields are empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseResolution {
    pub name: String,
    pub link: String,
    pub description: String,
}

impl LicenseResolution {
    /// Resolution that only knows the package's self-declared license
    pub fn declared(declared_license: Option<&str>) -> Self {
        Self {
            name: declared_license.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }
}

/// One row of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// 1-based position in the dependency mapping
    pub no: usize,
    pub name: String,
    pub version: String,
    pub license_name: String,
    pub license_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_description: Option<String>,
}

impl ReportRecord {
    pub fn new(
        no: usize,
        dependency: &PackageDependency,
        resolution: LicenseResolution,
        include_description: bool,
    ) -> Self {
        Self {
            no,
            name: dependency.name.clone(),
            version: dependency.version_range.clone(),
            license_name: resolution.name,
            license_link: resolution.link,
            license_description: include_description.then_some(resolution.description),
        }
    }
}

/// A dependency mapping of the project manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencySection {
    Dependencies,
    DevDependencies,
}

impl DependencySection {
    /// Key of the mapping in `package.json`
    pub fn manifest_key(&self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
        }
    }
}

impl fmt::Display for DependencySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.manifest_key())
    }
}

/// Which dependency mappings to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependencyKind {
    #[default]
    Dependencies,
    DevDependencies,
    Both,
}

impl DependencyKind {
    /// Choices in the order they are offered to the operator
    pub const ALL: [DependencyKind; 3] = [Self::Dependencies, Self::DevDependencies, Self::Both];

    /// Sections to export, in export order
    pub fn sections(&self) -> &'static [DependencySection] {
        match self {
            Self::Dependencies => &[DependencySection::Dependencies],
            Self::DevDependencies => &[DependencySection::DevDependencies],
            Self::Both => &[
                DependencySection::Dependencies,
                DependencySection::DevDependencies,
            ],
        }
    }

    /// Human-readable choice label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dependencies => "Only dependencies",
            Self::DevDependencies => "Only devDependencies",
            Self::Both => "Both",
        }
    }
}

impl FromStr for DependencyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dependencies" | "deps" | "prod" => Ok(Self::Dependencies),
            "dev-dependencies" | "devdependencies" | "dev" => Ok(Self::DevDependencies),
            "both" | "all" => Ok(Self::Both),
            _ => Err(format!(
                "Unknown dependency kind: '{}'. Valid kinds: dependencies, dev-dependencies, both",
                s
            )),
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dependencies => write!(f, "dependencies"),
            Self::DevDependencies => write!(f, "dev-dependencies"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// The records produced for one dependency section of a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReport {
    pub project_name: String,
    pub section: DependencySection,
    pub records: Vec<ReportRecord>,
    /// Whether records carry a license description
    pub include_description: bool,
}
