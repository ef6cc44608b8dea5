//! Reader for `package.json` manifests: the project's own and those of installed packages

use crate::error::{InventoryError, Result};
use crate::types::{DependencySection, PackageDependency, PackageMetadata, RepositoryReference};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "package.json";
const INSTALL_DIR: &str = "node_modules";

/// The parts of the project manifest the inventory needs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectManifest {
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: Map<String, Value>,
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: Map<String, Value>,
}

impl ProjectManifest {
    /// Dependencies of one section, in declaration order
    pub fn dependencies_of(&self, section: DependencySection) -> Vec<PackageDependency> {
        let mapping = match section {
            DependencySection::Dependencies => &self.dependencies,
            DependencySection::DevDependencies => &self.dev_dependencies,
        };

        mapping
            .iter()
            .map(|(name, range)| {
                let range = match range {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                PackageDependency::new(name.clone(), range)
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct InstalledManifest {
    repository: Option<Value>,
    homepage: Option<String>,
    license: Option<Value>,
    licenses: Option<Vec<Value>>,
}

/// Read `<root>/package.json`
pub fn read_project_manifest(project_root: &Path) -> Result<ProjectManifest> {
    let path = project_root.join(MANIFEST_FILE);
    let content =
        std::fs::read_to_string(&path).map_err(|e| InventoryError::manifest(&path, e))?;

    serde_json::from_str(&content).map_err(|e| InventoryError::manifest(&path, e))
}

/// Resolve the project's name, falling back to the directory name
pub fn project_name(manifest: &ProjectManifest, project_root: &Path) -> String {
    manifest
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            project_root
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "project".to_string())
}

/// Location of an installed package's manifest
pub fn installed_manifest_path(project_root: &Path, package_name: &str) -> PathBuf {
    let mut path = project_root.join(INSTALL_DIR);
    // scoped names (`@scope/pkg`) live in nested directories
    for segment in package_name.split('/') {
        path.push(segment);
    }
    path.join(MANIFEST_FILE)
}

/// Read `<root>/node_modules/<name>/package.json`
pub fn read_package_metadata(project_root: &Path, package_name: &str) -> Result<PackageMetadata> {
    let path = installed_manifest_path(project_root, package_name);
    let content =
        std::fs::read_to_string(&path).map_err(|e| InventoryError::manifest(&path, e))?;

    parse_package_metadata(&content).map_err(|e| InventoryError::manifest(&path, e))
}

/// Parse the metadata fields of an installed package manifest
pub fn parse_package_metadata(content: &str) -> Result<PackageMetadata> {
    let manifest: InstalledManifest = serde_json::from_str(content)?;

    let declared_license = manifest
        .license
        .as_ref()
        .and_then(license_name)
        .or_else(|| {
            manifest
                .licenses
                .as_ref()
                .and_then(|licenses| licenses.first())
                .and_then(license_name)
        });

    // unrecognised repository shapes count as absent
    let repository = manifest
        .repository
        .and_then(|value| serde_json::from_value::<RepositoryReference>(value).ok());

    Ok(PackageMetadata {
        repository,
        homepage: manifest.homepage.filter(|h| !h.trim().is_empty()),
        declared_license,
    })
}

/// Accepts `"MIT"` as well as the legacy `{ "type": "MIT" }` form
fn license_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => obj.get("type")?.as_str()?,
        _ => return None,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}
