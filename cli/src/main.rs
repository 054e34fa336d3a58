//! `replaycsv`: decode every replay in a folder and write one CSV file.
//!
//! ```text
//! replaycsv <DIR> [INCLUDE_SUBDIRS] [--vehicles tanklist.json] [--maps maps.json]
//! ```

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use replaycodec_batch::{discover_replays, BatchEngine, BatchRequest, BatchResult, ErrorMode};
use replaycodec_core::{BatchError, CancelToken, ReplayPipeline};
use replaycodec_export::CsvExporter;
use replaycodec_observability::init_tracing;
use replaycodec_registry::{MapCatalog, MemoryCatalog};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

mod config;

use config::AppConfig;

#[derive(Parser)]
#[command(
    name = "replaycsv",
    about = "Decode a folder of .wotreplay files into a single CSV",
    version
)]
struct Cli {
    /// Folder containing replay files
    dir: PathBuf,

    /// Also search subfolders: true | false (default: config file, else false)
    #[arg(value_parser = parse_include_flag)]
    include_subdirs: Option<bool>,

    /// Vehicle list JSON (tag, name, tier per vehicle)
    #[arg(long)]
    vehicles: Option<PathBuf>,

    /// Map list JSON (map id to display name)
    #[arg(long)]
    maps: Option<PathBuf>,

    /// Write the CSV here instead of <DIR>/<timestamp>.csv
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Worker threads (0 = all CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// List every failed file with its error
    #[arg(long)]
    collect_errors: bool,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Parse the `INCLUDE_SUBDIRS` argument, case-insensitively.
fn parse_include_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!("expected 'true' or 'false', got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &cli);

    init_tracing(&config.log).map_err(|e| anyhow!("logging init failed: {e}"))?;

    if !cli.dir.is_dir() {
        bail!("'{}' is not a directory", cli.dir.display());
    }
    println!("Path:              {}", cli.dir.display());
    println!("Include subfolders: {}", config.batch.include_subdirectories);

    let pipeline = build_pipeline(&config)?;
    let paths = discover_replays(
        &cli.dir,
        config.batch.include_subdirectories,
        &config.batch.extension,
    )
    .with_context(|| format!("list replays in '{}'", cli.dir.display()))?;

    let cancel = CancelToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling...");
            on_signal.cancel();
        }
    });

    let started = Instant::now();
    let request = BatchRequest::from_config(paths, &config.batch).cancel_token(cancel);
    let engine = BatchEngine::new(pipeline);
    let outcome = tokio::task::spawn_blocking(move || engine.run(request))
        .await
        .context("batch worker panicked")?;

    let result = match outcome {
        Ok(result) => result,
        Err(BatchError::Cancelled { completed, total }) => {
            println!("Cancelled after {completed} of {total} replays; no CSV written.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    report(&result, started.elapsed().as_millis());

    if result.records.is_empty() {
        println!("No replays decoded; no CSV written.");
        return Ok(());
    }
    let written = match &cli.output {
        Some(path) => {
            CsvExporter::write_to_path(&result, path)?;
            path.clone()
        }
        None => CsvExporter::write_to_dir(&result, &cli.dir)?,
    };
    println!("File created at {}", written.display());
    Ok(())
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(include_subdirs) = cli.include_subdirs {
        config.batch.include_subdirectories = include_subdirs;
    }
    if let Some(threads) = cli.threads {
        config.batch.concurrency = threads;
    }
    if cli.collect_errors {
        config.batch.error_mode = ErrorMode::Collect;
    }
    if let Some(vehicles) = &cli.vehicles {
        config.catalog.vehicles = vehicles.clone();
    }
    if let Some(maps) = &cli.maps {
        config.catalog.maps = Some(maps.clone());
    }
    if cli.verbose {
        config.log.level = "debug".into();
    }
    if cli.json_logs {
        config.log.json = true;
    }
}

fn build_pipeline(config: &AppConfig) -> Result<ReplayPipeline> {
    let vehicles = load_vehicles(&config.catalog.vehicles)?;
    let mut pipeline = ReplayPipeline::new(Arc::new(vehicles));
    if let Some(maps_path) = &config.catalog.maps {
        let maps = MapCatalog::load_file(maps_path)
            .with_context(|| format!("load map list '{}'", maps_path.display()))?;
        pipeline = pipeline.with_maps(Arc::new(maps));
    }
    Ok(pipeline)
}

fn load_vehicles(path: &Path) -> Result<MemoryCatalog> {
    let catalog = MemoryCatalog::load_file(path)
        .with_context(|| format!("load vehicle list '{}'", path.display()))?;
    if catalog.is_empty() {
        bail!("vehicle list '{}' has no usable entries", path.display());
    }
    Ok(catalog)
}

fn report(result: &BatchResult, elapsed_ms: u128) {
    println!("Failed replays:    {}", result.failed);
    for (kind, count) in &result.failures_by_kind {
        println!("  {kind}: {count}");
    }
    for (path, err) in &result.errors {
        eprintln!("  ✗ {}: {}", path.display(), err);
    }
    println!("Loaded replays:    {}", result.succeeded());
    println!("Elapsed:           {elapsed_ms} ms");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_flag_is_case_insensitive() {
        assert_eq!(parse_include_flag("TRUE"), Ok(true));
        assert_eq!(parse_include_flag(" False "), Ok(false));
        assert!(parse_include_flag("yes").is_err());
        assert!(parse_include_flag("").is_err());
    }

    #[test]
    fn invalid_include_flag_is_a_usage_error() {
        let err = Cli::try_parse_from(["replaycsv", "replays", "maybe"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn absent_include_flag_keeps_config_value() {
        let cli = Cli::parse_from(["replaycsv", "replays"]);
        assert_eq!(cli.include_subdirs, None);

        let mut config: AppConfig =
            serde_yaml::from_str("batch:\n  include_subdirectories: true\n").unwrap();
        apply_overrides(&mut config, &cli);
        assert!(config.batch.include_subdirectories);

        let cli = Cli::parse_from(["replaycsv", "replays", "false"]);
        apply_overrides(&mut config, &cli);
        assert!(!config.batch.include_subdirectories);
    }

    fn fixture_path(name: &str) -> PathBuf {
        let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        p.push("../fixtures/catalog");
        p.push(name);
        p
    }

    #[test]
    fn pipeline_builds_from_fixture_catalogs() {
        let mut config = AppConfig::default();
        config.catalog.vehicles = fixture_path("tanklist.json");
        config.catalog.maps = Some(fixture_path("maps.json"));
        assert!(build_pipeline(&config).is_ok());

        config.catalog.maps = Some(fixture_path("missing.json"));
        assert!(build_pipeline(&config).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let cli = Cli::parse_from([
            "replaycsv",
            "replays",
            "true",
            "--threads",
            "3",
            "--collect-errors",
            "--maps",
            "m.json",
            "-v",
        ]);
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &cli);
        assert!(config.batch.include_subdirectories);
        assert_eq!(config.batch.concurrency, 3);
        assert_eq!(config.batch.error_mode, ErrorMode::Collect);
        assert_eq!(config.catalog.maps, Some(PathBuf::from("m.json")));
        assert_eq!(config.catalog.vehicles, PathBuf::from("tanklist.json"));
        assert_eq!(config.log.level, "debug");
    }
}
