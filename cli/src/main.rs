use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use mps_core::{StorePaths, paths, registry, remote, store, sync};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mps")]
#[command(about = "Keep the modern-python-skill files in sync across your projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the central store with an empty registry and the built-in skill tree
    Init,
    /// Register a project directory and give it an initial sync
    Add { name: String, path: PathBuf },
    /// Unregister a project, leaving its synced files in place
    Remove { name: String },
    /// Copy the skill tree into one project, or into every project
    Sync { name: Option<String> },
    /// Refresh the store's skill tree from the upstream repository
    Update {
        /// Clone or pull from this URL instead of the default source
        #[arg(long)]
        mirror: Option<String>,
    },
    /// Show every registered project
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", style("✗").red().bold());
        std::process::exit(exit_code(&err));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<mps_core::Error>()
        .map(mps_core::Error::exit_code)
        .unwrap_or(1)
}

fn run(cli: Cli) -> Result<()> {
    let store = StorePaths::from_home().context("could not resolve a home directory")?;

    match cli.command {
        Commands::Init => init_store(&store),
        Commands::Add { name, path } => add_project(&store, &name, &path),
        Commands::Remove { name } => remove_project(&store, &name),
        Commands::Sync { name: Some(name) } => sync_project(&store, &name),
        Commands::Sync { name: None } => sync_all_projects(&store),
        Commands::Update { mirror } => update_skills(&store, mirror.as_deref()),
        Commands::List => list_projects(&store),
    }
}

fn init_store(store: &StorePaths) -> Result<()> {
    let report = store::init(store)?;

    if report.registry_created {
        println!(
            "{} Registry created: {}",
            style("✓").green().bold(),
            store.registry_file().display()
        );
    } else {
        println!(
            "{} Registry already exists: {}",
            style("!").yellow(),
            store.registry_file().display()
        );
    }

    if report.skills_seeded {
        println!(
            "{} Skill tree seeded ({} files): {}",
            style("✓").green().bold(),
            report.files_written,
            store.skill_source().display()
        );
    } else {
        println!(
            "{} Skill tree already exists: {}",
            style("!").yellow(),
            store.skill_source().display()
        );
    }

    println!();
    println!("Fetch the latest skills:");
    println!("  mps update");
    Ok(())
}

fn add_project(store: &StorePaths, name: &str, path: &Path) -> Result<()> {
    let registry_file = store.registry_file();
    let mut registry = registry::load(&registry_file)?;
    let entry = registry.add(name, path)?;
    registry::save(&registry_file, &registry)?;

    println!(
        "{} Registered '{}' at {}",
        style("✓").green().bold(),
        entry.name,
        entry.path.display()
    );

    let report = sync::sync(store, &entry)?;
    println!(
        "{} Synced {} files into {}",
        style("✓").green().bold(),
        report.files_written,
        paths::project_skill_target(&entry.path).display()
    );
    Ok(())
}

fn remove_project(store: &StorePaths, name: &str) -> Result<()> {
    let registry_file = store.registry_file();
    let mut registry = registry::load(&registry_file)?;
    let entry = registry.remove(name)?;
    registry::save(&registry_file, &registry)?;

    println!(
        "{} Unregistered '{}'; files in {} are left in place",
        style("✓").green().bold(),
        entry.name,
        paths::project_skill_target(&entry.path).display()
    );
    Ok(())
}

fn sync_project(store: &StorePaths, name: &str) -> Result<()> {
    let registry = registry::load(&store.registry_file())?;
    let entry = registry.get(name)?;
    let report = sync::sync(store, &entry)?;

    println!(
        "{} {} ({} files)",
        style("✓").green().bold(),
        entry.name,
        report.files_written
    );
    Ok(())
}

fn sync_all_projects(store: &StorePaths) -> Result<()> {
    let registry = registry::load(&store.registry_file())?;

    if registry.is_empty() {
        println!("{} No projects registered", style("!").yellow());
        println!();
        println!("Register one:");
        println!("  mps add <name> <path>");
        return Ok(());
    }

    let total = registry.len();
    let mut failed = 0;
    let mut first_failure: Option<anyhow::Error> = None;
    for outcome in sync::sync_all(store, &registry) {
        match outcome.result {
            Ok(report) => println!(
                "{} {} ({} files)",
                style("✓").green().bold(),
                outcome.name,
                report.files_written
            ),
            Err(err) => {
                println!("{} {}: {err}", style("✗").red().bold(), outcome.name);
                failed += 1;
                if first_failure.is_none() {
                    first_failure = Some(err.into());
                }
            }
        }
    }

    match first_failure {
        Some(err) => Err(err.context(format!("{failed} of {total} projects failed to sync"))),
        None => Ok(()),
    }
}

fn update_skills(store: &StorePaths, mirror: Option<&str>) -> Result<()> {
    let url = mirror.unwrap_or(remote::DEFAULT_SOURCE_URL);
    println!("{} Fetching skills from {url}", style("→").cyan());

    let report = remote::update(store, mirror)?;
    match report.kind {
        remote::UpdateKind::Cloned => println!(
            "{} Skill tree cloned into {}",
            style("✓").green().bold(),
            store.skill_source().display()
        ),
        remote::UpdateKind::Pulled => println!(
            "{} Skill tree updated in {}",
            style("✓").green().bold(),
            store.skill_source().display()
        ),
    }
    if let Some(revision) = &report.revision {
        println!("  {}", style(format!("revision {revision}")).dim());
    }

    println!();
    println!("Push it out to your projects:");
    println!("  mps sync");
    Ok(())
}

fn list_projects(store: &StorePaths) -> Result<()> {
    let registry = registry::load(&store.registry_file())?;

    if registry.is_empty() {
        println!("{} No projects registered", style("!").yellow());
        println!();
        println!("Register one:");
        println!("  mps add <name> <path>");
        return Ok(());
    }

    println!(
        "{} Registered projects ({})",
        style("✓").green().bold(),
        registry.len()
    );
    println!();

    for entry in registry.entries() {
        let marker = if entry.path.is_dir() {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!(
            "  {} {} {}",
            marker,
            style(&entry.name).white().bold(),
            style(entry.path.display().to_string()).dim()
        );
    }
    Ok(())
}
