//! CLI tool for inventorying dependency licenses

use clap::Parser;
use colored::*;
use license_inventory::export::{write_report, ExportFormat};
use license_inventory::{
    inventory_project, DependencyKind, InventoryConfig, NonInteractivePrompt, Prompt,
    TerminalPrompt,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "license-inventory")]
#[command(about = "Inventory a project's dependencies and resolve their repository licenses into CSV/JSON reports", long_about = None)]
#[command(version)]
struct Cli {
    /// Root folder containing package.json (asked interactively when omitted)
    #[arg(short = 'p', long)]
    project_root: Option<String>,

    /// Dependencies to export: dependencies, dev-dependencies or both (asked when omitted)
    #[arg(short = 'k', long)]
    kind: Option<DependencyKind>,

    /// Directory the reports are written to
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Path to custom configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Base URL of the GitHub API
    #[arg(long)]
    api_url: Option<String>,

    /// Skip fetching license texts
    #[arg(long)]
    no_description: bool,

    /// Only write the CSV report
    #[arg(long)]
    no_json: bool,

    /// Never ask questions; missing answers are left empty
    #[arg(long)]
    no_prompt: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    // Variables already set in the environment win over `.env`
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);
    if let Ok(path) = &dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        match InventoryConfig::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{} Failed to load config: {}", "Error:".red().bold(), e);
                process::exit(1);
            }
        }
    } else {
        InventoryConfig::default()
    };
    apply_overrides(&mut config, &cli);

    let prompt: Box<dyn Prompt> = if cli.no_prompt {
        Box::new(NonInteractivePrompt)
    } else {
        Box::new(TerminalPrompt)
    };

    let project_root = match cli.project_root.clone() {
        Some(root) => root,
        None => prompt
            .input("Please tell us the root folder path which contains your package.json")
            .unwrap_or_else(|e| fail("Could not read the project root", e)),
    };

    let kind = match cli.kind {
        Some(kind) => kind,
        None => ask_kind(prompt.as_ref()),
    };

    let project_root = project_root.trim();
    if project_root.is_empty() {
        println!("The root path is empty.");
        return;
    }

    let reports =
        match inventory_project(Path::new(project_root), kind, &config, prompt.as_ref()).await {
            Ok(reports) => reports,
            Err(e) => fail("Inventory failed", e),
        };

    let mut formats = vec![ExportFormat::Csv];
    if config.write_json {
        formats.push(ExportFormat::Json);
    }

    for report in &reports {
        match write_report(&config.output_dir, report, &formats) {
            Ok(paths) => {
                for path in paths {
                    println!("{} {}", "Written:".green().bold(), path.display());
                }
            }
            Err(e) => {
                error!(
                    "Failed to write {} report for {}: {}",
                    report.section, report.project_name, e
                );
            }
        }
    }
}

fn apply_overrides(config: &mut InventoryConfig, cli: &Cli) {
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(url) = &cli.api_url {
        config.network.api_base_url = url.clone();
    }
    if cli.no_description {
        config.include_description = false;
    }
    if cli.no_json {
        config.write_json = false;
    }
}

fn ask_kind(prompt: &dyn Prompt) -> DependencyKind {
    let choices: Vec<&str> = DependencyKind::ALL.iter().map(|k| k.label()).collect();
    match prompt.select(
        "Do you want to export dependencies or devDependencies or both",
        &choices,
    ) {
        Ok(idx) => DependencyKind::ALL.get(idx).copied().unwrap_or_default(),
        Err(e) => fail("Could not read the dependency kind", e),
    }
}

fn fail(context: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("{} {}: {}", "Error:".red().bold(), context, e);
    process::exit(1);
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "info,license_inventory=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
