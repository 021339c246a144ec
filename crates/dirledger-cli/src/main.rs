mod commands;
mod logging;
mod progress;

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{AnalysisType, Cli, Commands};
use dirledger_core::analysis;
use dirledger_core::engine::resolve_base_path;
use dirledger_core::{AppConfig, Database, ScanEngine};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::error;

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let mut config = match dirledger_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();
    if let Some(db) = args.db {
        config.db_path = db;
    }

    let result = match args.command {
        Some(Commands::Scan {
            run_identifier,
            drive_name,
            path,
        }) => run_scan(&config, &run_identifier, &drive_name, &path),
        Some(Commands::Analyze { analysis_type }) => run_analyze(&config, analysis_type),
        Some(Commands::Clear { base_path }) => run_clear(&config, &base_path),
        Some(Commands::Runs) => run_list(&config),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            process::exit(1);
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        eprintln!("{} {:#}", "error:".red().bold(), err);
        process::exit(1);
    }
}

fn open_store(config: &AppConfig) -> anyhow::Result<Database> {
    Database::open(&config.db_path)
        .with_context(|| format!("Cannot open run store '{}'", config.db_path))
}

fn run_scan(
    config: &AppConfig,
    run_identifier: &str,
    drive_name: &str,
    path: &Path,
) -> anyhow::Result<()> {
    let db = open_store(config)?;
    let reporter = CliReporter::new();
    let result = ScanEngine::new(&db)
        .with_config(config)
        .scan(run_identifier, drive_name, path, &reporter)?;

    println!(
        "Scan completed successfully. Run ID: {} ({} files, {} skipped)",
        format!("{}", result.run_id).green(),
        result.files_indexed,
        format!("{}", result.files_skipped).yellow(),
    );
    Ok(())
}

fn run_analyze(config: &AppConfig, analysis_type: AnalysisType) -> anyhow::Result<()> {
    let db = open_store(config)?;
    let report = match analysis_type {
        AnalysisType::FindDuplicates => {
            analysis::render_duplicates(&analysis::find_duplicate_groups(&db)?)
        }
        AnalysisType::FindModified => {
            analysis::render_modified(&analysis::find_modified_files(&db)?)
        }
    };
    print!("{}", report);
    Ok(())
}

fn run_clear(config: &AppConfig, base_path: &Path) -> anyhow::Result<()> {
    let db = open_store(config)?;
    let resolved = resolve_base_path(base_path);
    let base = resolved.to_string_lossy();
    let summary = db.clear_path(&base)?;

    if summary.is_empty() {
        println!("No scans found for path: {}", base);
    } else {
        println!(
            "Cleared {} entries from {} runs for path: {}",
            format!("{}", summary.entries_removed).red(),
            summary.runs_removed,
            base
        );
    }
    Ok(())
}

fn run_list(config: &AppConfig) -> anyhow::Result<()> {
    let db = open_store(config)?;
    let runs = db.list_runs()?;
    if runs.is_empty() {
        println!("No scan runs recorded.");
        return Ok(());
    }
    for (run, entry_count) in runs {
        println!(
            "{:>5}  {}  {}  [{}] {}  ({} files)",
            run.run_id,
            run.scan_timestamp.dimmed(),
            run.run_identifier.cyan(),
            run.drive_name,
            run.base_path,
            entry_count
        );
    }
    Ok(())
}
