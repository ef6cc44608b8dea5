//! Main inventory orchestration logic

use crate::config::InventoryConfig;
use crate::error::Result;
use crate::license::LicenseResolver;
use crate::link;
use crate::manifest::{project_name, read_package_metadata, read_project_manifest};
use crate::metadata::GitHubClient;
use crate::prompt::Prompt;
use crate::types::{
    DependencyKind, InventoryReport, LicenseResolution, PackageDependency, ReportRecord,
};
use std::path::Path;
use tracing::{info, warn};

/// Inventory the selected dependency sections of a project.
///
/// Fails only when the project manifest cannot be read or the HTTP client
/// cannot be built. Problems with individual dependencies are logged and
/// leave blank license fields in their record.
pub async fn inventory_project(
    project_root: &Path,
    kind: DependencyKind,
    config: &InventoryConfig,
    prompt: &dyn Prompt,
) -> Result<Vec<InventoryReport>> {
    info!("Starting inventory of project at: {}", project_root.display());

    let manifest = read_project_manifest(project_root)?;
    let project_name = project_name(&manifest, project_root);

    let client = GitHubClient::new(&config.network)?;
    let resolver = LicenseResolver::new(&client, config.include_description);

    let mut reports = Vec::new();
    for &section in kind.sections() {
        let dependencies = manifest.dependencies_of(section);
        info!(
            "Found {} {} for project '{}'",
            dependencies.len(),
            section,
            project_name
        );

        let records = walk_dependencies(project_root, &dependencies, &resolver, prompt).await;
        reports.push(InventoryReport {
            project_name: project_name.clone(),
            section,
            records,
            include_description: config.include_description,
        });
    }

    Ok(reports)
}

/// Resolve every dependency in order, one record per dependency.
///
/// Records are numbered from 1 in the order of `dependencies`.
pub async fn walk_dependencies(
    project_root: &Path,
    dependencies: &[PackageDependency],
    resolver: &LicenseResolver<'_>,
    prompt: &dyn Prompt,
) -> Vec<ReportRecord> {
    let mut records = Vec::with_capacity(dependencies.len());

    for (idx, dependency) in dependencies.iter().enumerate() {
        let resolution = resolve_dependency(project_root, dependency, resolver, prompt).await;

        info!(
            "[PACKAGE INFO]: {} {} {} {}",
            dependency.name, dependency.version_range, resolution.name, resolution.link
        );

        records.push(ReportRecord::new(
            idx + 1,
            dependency,
            resolution,
            resolver.includes_description(),
        ));
    }

    records
}

async fn resolve_dependency(
    project_root: &Path,
    dependency: &PackageDependency,
    resolver: &LicenseResolver<'_>,
    prompt: &dyn Prompt,
) -> LicenseResolution {
    let metadata = match read_package_metadata(project_root, &dependency.name) {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Can't read installed manifest of {}: {}", dependency.name, e);
            return LicenseResolution::default();
        }
    };

    let repository_link = link::raw_link(&metadata, &dependency.name, prompt);
    resolver
        .resolve(&repository_link, metadata.declared_license.as_deref())
        .await
}
