//! # license_inventory
//!
//! Inventories the declared dependencies of a Node project and resolves, for
//! each one, the source repository and its license:
//! - **Link normalization**: reduce `repository`/`homepage` links to `owner/repo`
//! - **License resolution**: name, link and text of the license via the GitHub API
//! - **Reports**: one CSV (and optionally JSON) file per dependency section
//!
//! ## Quick Start
//!
//! ```no_run
//! use license_inventory::{inventory_project, DependencyKind, InventoryConfig, NonInteractivePrompt};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> license_inventory::Result<()> {
//! let config = InventoryConfig::default();
//! let reports = inventory_project(
//!     Path::new("."),
//!     DependencyKind::Dependencies,
//!     &config,
//!     &NonInteractivePrompt,
//! )
//! .await?;
//!
//! for record in &reports[0].records {
//!     println!("{} {}: {}", record.no, record.name, record.license_name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Dependencies are processed one at a time. A lookup that fails only blanks
//! the fields it was meant to fill; the run itself fails only when the project
//! manifest cannot be read.

mod config;
mod error;
pub mod export;
mod inventory;
pub mod license;
pub mod link;
pub mod manifest;
pub mod metadata;
mod prompt;
mod types;

// Re-export public API
pub use config::{InventoryConfig, InventoryConfigBuilder, NetworkConfig};
pub use error::{InventoryError, Result};
pub use inventory::{inventory_project, walk_dependencies};
pub use license::LicenseResolver;
pub use metadata::GitHubClient;
pub use prompt::{NonInteractivePrompt, Prompt, TerminalPrompt};
pub use types::{
    DependencyKind, DependencySection, InventoryReport, LicenseResolution, PackageDependency,
    PackageMetadata, ReportRecord, RepositoryIdentity, RepositoryReference,
};
