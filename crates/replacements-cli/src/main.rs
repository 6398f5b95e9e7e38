//! Registry Replacements CLI
//!
//! Offline tooling for replacement configurations: checks entries against an
//! exported registry snapshot, lists what a mod registers, and shows which
//! replacement a missing identifier would get.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use replacements_core::{
    Identifier, LoggingConfig, RegistrySnapshotFile, RemapCoordinator, ReplacementsConfig,
};

/// Remap missing registry identifiers.
#[derive(Parser)]
#[command(name = "replacements")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the replacements configuration file.
    #[arg(short, long, default_value = "replacements.yaml")]
    config: PathBuf,

    /// Path to the exported registry snapshot.
    #[arg(short, long, default_value = "registry.yaml")]
    registry: PathBuf,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report every configuration entry the registry snapshot rejects.
    Validate,

    /// List registry identifiers in a namespace.
    Dump {
        /// Category name, or `all`.
        category: String,
        /// Namespace (mod id) to list.
        namespace: String,
    },

    /// Show the replacement configured for a missing identifier.
    Resolve {
        category: String,
        identifier: String,
    },

    /// Write a configuration template with every standard category.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    setup_tracing(&logging_config(&args.config, args.verbose));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        registry = %args.registry.display(),
        "starting replacements"
    );

    match args.command {
        Command::Init { force } => init(&args.config, force),
        Command::Validate => {
            let config = load_config(&args.config)?;
            validate(&config, &load_coordinator(&args.registry)?)
        }
        Command::Dump { category, namespace } => {
            dump(&load_coordinator(&args.registry)?, &category, &namespace)
        }
        Command::Resolve { category, identifier } => {
            let config = load_config(&args.config)?;
            resolve(&config, &load_coordinator(&args.registry)?, &category, &identifier)
        }
    }
}

fn setup_tracing(config: &LoggingConfig) {
    let level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let subscriber = tracing_subscriber::registry().with(filter);

    // logs go to stderr so command output stays pipeable
    if config.json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Logging settings from the config file, overridden by `-v`.
///
/// A missing or unreadable config falls back to defaults here; commands that
/// need the entries report the problem themselves.
fn logging_config(path: &Path, verbose: u8) -> LoggingConfig {
    let base = ReplacementsConfig::from_file(path)
        .map(|c| c.logging)
        .unwrap_or_default();
    match verbose {
        0 => base,
        1 => LoggingConfig {
            level: "debug".to_string(),
            ..base
        },
        _ => LoggingConfig {
            level: "trace".to_string(),
            ..base
        },
    }
}

fn load_config(path: &Path) -> anyhow::Result<ReplacementsConfig> {
    if !path.exists() {
        bail!(
            "config file '{}' not found (run `replacements init` to create one)",
            path.display()
        );
    }
    ReplacementsConfig::from_file(path).with_context(|| format!("loading config '{}'", path.display()))
}

fn load_coordinator(path: &Path) -> anyhow::Result<RemapCoordinator<Identifier>> {
    let snapshot = RegistrySnapshotFile::from_file(path)
        .with_context(|| format!("loading registry snapshot '{}'", path.display()))?;
    Ok(snapshot.coordinator())
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("'{}' already exists (use --force to overwrite)", path.display());
    }
    let yaml = ReplacementsConfig::template().to_yaml()?;
    std::fs::write(path, yaml).with_context(|| format!("writing '{}'", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn validate(config: &ReplacementsConfig, coordinator: &RemapCoordinator<Identifier>) -> anyhow::Result<()> {
    let mut checked = 0;
    let mut invalid = 0;

    for (category, entries) in &config.replacements {
        let Some(table) = coordinator.table(category) else {
            println!("{category}: unknown category ({} entries)", entries.len());
            invalid += entries.len();
            continue;
        };

        for raw in entries {
            checked += 1;
            if let Err(e) = table.check(raw) {
                println!("{category}: '{raw}': {e}");
                invalid += 1;
            }
        }
    }

    println!("{checked} entries checked, {invalid} invalid");
    if invalid > 0 {
        bail!("{invalid} invalid replacement entries");
    }
    Ok(())
}

fn dump(coordinator: &RemapCoordinator<Identifier>, category: &str, namespace: &str) -> anyhow::Result<()> {
    if category == "all" {
        let summary = coordinator.dump_all(namespace);
        for (name, listing) in &summary.per_category {
            for id in listing {
                println!("{name}\t{id}");
            }
        }
        println!("dumped {} identifiers of '{namespace}' across all registries", summary.total);
        return Ok(());
    }

    let report = coordinator.dump_category(category, namespace)?;
    for id in &report.listing {
        println!("{id}");
    }
    println!("dumped {} identifiers of '{namespace}' from {category}", report.count);
    Ok(())
}

fn resolve(
    config: &ReplacementsConfig,
    coordinator: &RemapCoordinator<Identifier>,
    category: &str,
    identifier: &str,
) -> anyhow::Result<()> {
    let old_id = Identifier::parse(identifier)?;
    if coordinator.table(category).is_none() {
        bail!("unknown registry category: {category}");
    }

    coordinator.apply_config(config);
    match coordinator.on_missing_identifier(category, &old_id) {
        Some(new_id) => println!("{old_id} -> {new_id}"),
        None => println!("{old_id}: no replacement"),
    }
    Ok(())
}
