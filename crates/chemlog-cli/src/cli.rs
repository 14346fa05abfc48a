//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// chemlog - Extract properties from quantum-chemistry log files.
#[derive(Debug, Parser)]
#[command(name = "chemlog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CHEMLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (present keys only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a log file into a result record
    Parse(ParseArgs),

    /// List the standard catalog in run order
    Catalog,

    /// Detect which program wrote a log file
    Detect(DetectArgs),
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Log file to parse
    pub file: PathBuf,

    /// Program that wrote the log (detected when omitted)
    #[arg(short, long)]
    pub program: Option<String>,

    /// How the log is divided into jobs
    #[arg(short, long, value_enum)]
    pub split: Option<SplitArg>,

    /// How repeated values across jobs are merged
    #[arg(short, long, value_enum)]
    pub merge: Option<MergeArg>,

    /// Also print each job's extractor outcomes
    #[arg(short, long)]
    pub report: bool,
}

/// Arguments for the detect command.
#[derive(Debug, Parser)]
pub struct DetectArgs {
    /// Log file to inspect
    pub file: PathBuf,
}

/// Job split argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SplitArg {
    /// Whole log is one job
    Whole,
    /// One job per normal-termination line
    Jobs,
}

/// Merge policy argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MergeArg {
    /// First value wins
    KeepFirst,
    /// Last value wins
    Overwrite,
    /// Per-step sequences are appended
    Accumulate,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<SplitArg> for chemlog_extractor::JobSplit {
    fn from(split: SplitArg) -> Self {
        match split {
            SplitArg::Whole => chemlog_extractor::JobSplit::Whole,
            SplitArg::Jobs => chemlog_extractor::JobSplit::ByTerminator,
        }
    }
}

impl From<MergeArg> for chemlog_domain::MergePolicy {
    fn from(merge: MergeArg) -> Self {
        match merge {
            MergeArg::KeepFirst => chemlog_domain::MergePolicy::KeepFirst,
            MergeArg::Overwrite => chemlog_domain::MergePolicy::Overwrite,
            MergeArg::Accumulate => chemlog_domain::MergePolicy::Accumulate,
        }
    }
}
