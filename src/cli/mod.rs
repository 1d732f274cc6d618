//! CLI command definitions and handlers

mod init;
mod queues;
mod report;
mod watch;

use crate::attendance::PresenceRule;
use crate::config::{self, ProjectConfig};
use crate::filter::Selection;
use crate::reporters::OutputFormat;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Parse an ISO `YYYY-MM-DD` date
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a date (expected YYYY-MM-DD)", s))
}

/// Parse and validate a percentile (0-1)
fn parse_percentile(s: &str) -> Result<f64, String> {
    let p: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err("percentile must be between 0 and 1 (e.g. 0.95)".to_string())
    }
}

/// ccdash - contact-center KPI and attendance dashboard
#[derive(Parser, Debug)]
#[command(name = "ccdash")]
#[command(
    version,
    about = "Contact-center KPI and attendance dashboard from CSV exports",
    long_about = "ccdash reads a daily KPI export and an attendance roster, then reports \
volumes, handle time, latency, queue comparison, percentile anomalies, status \
distribution and head-count vs. output.\n\n\
Run without a subcommand to print the dashboard for the full data span:\n  \
ccdash --kpi kpi.csv --attendance roster.csv",
    after_help = "\
Examples:
  ccdash                                          Report using ccdash.toml or default file names
  ccdash report --dates 2025-01-01 2025-01-15     Restrict to an inclusive date range
  ccdash report --queue Inbound --queue Email     Only these queues
  ccdash report -f html -o dashboard.html         Standalone HTML dashboard
  ccdash queues                                   List queues and the data span
  ccdash watch -f html -o dashboard.html          Rebuild whenever a source file changes"
)]
pub struct Cli {
    /// KPI export CSV (default: from config, or "RAW KPI metric.csv")
    #[arg(long, global = true, env = "CCDASH_KPI")]
    pub kpi: Option<PathBuf>,

    /// Attendance roster CSV (default: from config, or "Raw Attandance.csv")
    #[arg(long, global = true, env = "CCDASH_ATTENDANCE")]
    pub attendance: Option<PathBuf>,

    /// Config file (default: ccdash.toml or .ccdashrc.json in the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dashboard report (default command)
    Report(ReportArgs),

    /// List the queues and the date span available for selection
    Queues {
        /// Year appended to Day-Mon labels
        #[arg(long)]
        year: Option<i32>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-render the report whenever a source file changes
    Watch(ReportArgs),

    /// Write an example ccdash.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing ccdash.toml
        #[arg(long)]
        force: bool,
    },

    /// Print the version
    Version,
}

/// Options shared by `report` and `watch`
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Output format: text, json, markdown (or md), html
    #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md", "html"])]
    pub format: Option<String>,

    /// Output file path (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Date bounds: START END (inclusive). Omit the flag for the full span
    #[arg(long, num_args = 0.., value_parser = parse_date)]
    pub dates: Option<Vec<NaiveDate>>,

    /// Queue to include (repeatable, default: all)
    #[arg(long = "queue")]
    pub queues: Option<Vec<String>>,

    /// Year appended to Day-Mon labels
    #[arg(long)]
    pub year: Option<i32>,

    /// Anomaly percentile (0-1)
    #[arg(long, value_parser = parse_percentile)]
    pub percentile: Option<f64>,

    /// Disable colors in text output
    #[arg(long)]
    pub no_color: bool,
}

/// Everything a report run needs, after merging flags, config and defaults
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub kpi: PathBuf,
    pub attendance: PathBuf,
    pub year: i32,
    pub percentile: f64,
    pub presence: PresenceRule,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub selection: Selection,
    pub color: bool,
}

impl Settings {
    /// Flags win over the config file, which wins over built-in defaults.
    pub(crate) fn resolve(cli: &Cli, args: &ReportArgs, project: &ProjectConfig) -> Result<Self> {
        let format = match args.format.as_deref().or(project.defaults.format.as_deref()) {
            Some(f) => OutputFormat::from_str(f)?,
            None => args
                .output
                .as_deref()
                .and_then(format_from_extension)
                .unwrap_or(OutputFormat::Text),
        };

        let selection = Selection {
            dates: args
                .dates
                .clone()
                .or_else(|| project.defaults.dates.clone()),
            queues: args
                .queues
                .clone()
                .or_else(|| project.defaults.queues.clone()),
        };

        let color = !args.no_color
            && !project.defaults.no_color.unwrap_or(false)
            && args.output.is_none();

        Ok(Self {
            kpi: cli.kpi.clone().unwrap_or_else(|| project.kpi_path()),
            attendance: cli
                .attendance
                .clone()
                .unwrap_or_else(|| project.attendance_path()),
            year: args.year.unwrap_or_else(|| project.year()),
            percentile: args.percentile.unwrap_or_else(|| project.percentile()),
            presence: project.presence_rule(),
            format,
            output: args.output.clone(),
            selection,
            color,
        })
    }
}

/// Guess the format from an output file name
fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "htm" => Some(OutputFormat::Html),
        "txt" => Some(OutputFormat::Text),
        other => OutputFormat::from_str(other).ok(),
    }
}

/// An explicit `--config` must load; a discovered one may be skipped.
fn load_config(cli: &Cli) -> Result<ProjectConfig> {
    match &cli.config {
        Some(path) => config::load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Cannot determine working directory")?;
            Ok(config::load_project_config(&cwd))
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Init { dir, force }) => init::run(dir, *force),

        Some(Commands::Version) => {
            println!("ccdash {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        Some(Commands::Report(args)) => {
            let project = load_config(&cli)?;
            report::run(&Settings::resolve(&cli, args, &project)?)
        }

        Some(Commands::Watch(args)) => {
            let project = load_config(&cli)?;
            watch::run(&Settings::resolve(&cli, args, &project)?)
        }

        Some(Commands::Queues { year, json }) => {
            let project = load_config(&cli)?;
            let kpi = cli.kpi.clone().unwrap_or_else(|| project.kpi_path());
            queues::run(&kpi, year.unwrap_or_else(|| project.year()), *json)
        }

        None => {
            let project = load_config(&cli)?;
            report::run(&Settings::resolve(&cli, &ReportArgs::default(), &project)?)
        }
    }
}
