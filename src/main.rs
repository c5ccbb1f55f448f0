//! optstack CLI
//!
//! Inspect and mutate the persisted settings tree from the command line.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use optstack::cli::{resolve_store_path, Cli, Command};
use optstack::logging;
use optstack::options::SqliteStore;
use optstack::settings::{apply_updates, cast_value, SettingsStore, UnknownPathBehavior};

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log, cli.verbose)?;

    let store_path = resolve_store_path(cli.database);
    if let Some(parent) = store_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    info!(database = %store_path.display(), "opening settings store");

    let store = SqliteStore::open(&store_path)
        .with_context(|| format!("failed to open settings store at {}", store_path.display()))?;
    let mut settings = SettingsStore::detect(Arc::new(store));

    match cli.command {
        Command::Show => run_show(&settings)?,
        Command::Get { path } => run_get(&settings, &path)?,
        Command::Set {
            path,
            value,
            json,
            unknown,
        } => run_set(&mut settings, &path, &value, json, unknown)?,
        Command::Reset => run_reset(&mut settings),
        Command::Environment => run_environment(&settings),
        Command::Export { output } => run_export(&settings, output.as_deref())?,
        Command::Import {
            file,
            replace,
            unknown,
        } => run_import(&mut settings, &file, replace, unknown)?,
    }

    Ok(())
}

fn run_show(settings: &SettingsStore) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&settings.snapshot())?);
    Ok(())
}

fn run_get(settings: &SettingsStore, path: &str) -> Result<()> {
    match settings.get(path) {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        None => bail!("no value at '{}'", path),
    }
}

fn run_set(
    settings: &mut SettingsStore,
    path: &str,
    raw: &str,
    as_json: bool,
    unknown: UnknownPathBehavior,
) -> Result<()> {
    let value: Value = if as_json {
        serde_json::from_str(raw).with_context(|| format!("invalid JSON value: {raw}"))?
    } else {
        cast_value(raw)
    };

    let warnings = apply_updates(settings, &[(path.to_string(), value.clone())], unknown)?;
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }

    if !settings.save() {
        bail!("failed to persist settings");
    }
    println!("{} = {}", path, value);
    Ok(())
}

fn run_reset(settings: &mut SettingsStore) {
    settings.reset();
    println!("Settings reset to defaults.");
}

fn run_environment(settings: &SettingsStore) {
    let host = settings.host();
    println!("environment:  {}", host.environment);
    println!(
        "site_url:     {}",
        host.site_url.as_deref().unwrap_or("(none)")
    );
    println!("debug:        {}", host.debug);
    println!("development:  {}", settings.is_development());
    println!("production:   {}", settings.is_production());
    println!("staging:      {}", settings.is_staging());
}

fn run_export(settings: &SettingsStore, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(&settings.snapshot())?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Exported to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn run_import(
    settings: &mut SettingsStore,
    file: &Path,
    replace: bool,
    unknown: UnknownPathBehavior,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;

    let Some(tree) = optstack::settings::SettingsTree::from_value(value) else {
        bail!("{} must hold a JSON object", file.display());
    };

    if replace {
        settings.reset();
    }

    let updates: Vec<(String, Value)> = tree
        .leaf_paths()
        .into_iter()
        .filter_map(|path| tree.get(&path).cloned().map(|v| (path, v)))
        .collect();
    let count = updates.len();

    let warnings = apply_updates(settings, &updates, unknown)?;
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }

    if !settings.save() {
        bail!("failed to persist settings");
    }
    println!("Imported {} value(s) from {}", count, file.display());
    Ok(())
}
