use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dirledger")]
#[command(about = "Index directory trees and compare scans over time", long_about = None)]
pub struct Cli {
    /// Run store file (overrides `db_path` from configuration)
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Index every file under a path as a new scan run
    Scan {
        /// Label for this run (display only, need not be unique)
        run_identifier: String,
        /// Label for the volume being scanned
        drive_name: String,
        /// Directory to scan
        path: PathBuf,
    },
    /// Run a cross-run analysis over every stored scan
    Analyze {
        #[arg(value_enum)]
        analysis_type: AnalysisType,
    },
    /// Delete all runs (and their entries) recorded for a base path
    Clear { base_path: PathBuf },
    /// List stored scan runs
    Runs,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalysisType {
    /// Same file name and content under more than one path
    #[value(name = "find_duplicates")]
    FindDuplicates,
    /// Same file name seen with different content
    #[value(name = "find_modified")]
    FindModified,
}
