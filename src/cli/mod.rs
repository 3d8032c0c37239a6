//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the import, service and
//! report layers. Every command reads its statement fresh; nothing is
//! kept between invocations.

pub mod bars;
pub mod categorize;
pub mod report;
pub mod sankey;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use tracing::warn;

use crate::config::{CashflowPaths, Settings};
use crate::error::{CashflowError, CashflowResult};
use crate::import::{self, BankFormat};
use crate::models::{DateWindow, Month, TransactionStore};
use crate::services::CategoryRuleSet;

pub use bars::{handle_bars_command, BarsArgs};
pub use categorize::{handle_categorize_command, CategorizeArgs};
pub use report::{handle_report_command, ReportArgs};
pub use sankey::{handle_sankey_command, SankeyArgs};

/// Which statement to read and how to label it
#[derive(Args, Debug, Clone)]
pub struct StatementArgs {
    /// Bank export file
    pub file: PathBuf,

    /// Export format: CDT (comdirect), ING or CSV (normalized)
    #[arg(short, long)]
    pub bank: Option<BankFormat>,

    /// Category rule file (JSON or YAML)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,
}

impl StatementArgs {
    /// Read the statement and apply the category rules
    pub fn load_labeled(
        &self,
        paths: &CashflowPaths,
        settings: &Settings,
    ) -> CashflowResult<TransactionStore> {
        let format = self.bank.unwrap_or(settings.default_bank);
        let store = import::load_statement(&self.file, format)?;
        let rules = self.rule_set(paths, settings)?;
        Ok(rules.apply(&store))
    }

    fn rule_set(&self, paths: &CashflowPaths, settings: &Settings) -> CashflowResult<CategoryRuleSet> {
        if let Some(path) = &self.rules {
            return CategoryRuleSet::from_path(path);
        }

        let path = settings.rules_path(paths);
        if path.exists() {
            CategoryRuleSet::from_path(&path)
        } else {
            warn!(
                path = %path.display(),
                "no category rule file, using income/expense defaults only"
            );
            Ok(CategoryRuleSet::default())
        }
    }
}

/// Date window selection shared by the reporting commands
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Window start, excluded (YYYY-MM-DD)
    #[arg(short, long, conflicts_with = "period")]
    pub start: Option<String>,

    /// Window end, excluded (YYYY-MM-DD); defaults to today
    #[arg(long, conflicts_with = "period")]
    pub stop: Option<String>,

    /// Whole calendar month (YYYY-MM)
    #[arg(short, long)]
    pub period: Option<String>,

    /// Report plain sums instead of monthly averages
    #[arg(long)]
    pub total: bool,
}

impl WindowArgs {
    /// Resolve the exclusive window; without arguments it covers the
    /// configured number of days before `today`
    pub fn resolve(&self, settings: &Settings, today: NaiveDate) -> CashflowResult<DateWindow> {
        if let Some(period) = &self.period {
            let month = Month::parse(period).map_err(|e| {
                CashflowError::Validation(format!(
                    "Invalid period format: {}. Use YYYY-MM (e.g., 2025-01)",
                    e
                ))
            })?;
            return month.window().ok_or_else(|| {
                CashflowError::Validation(format!("Period {} is out of range", month))
            });
        }

        let stop = match &self.stop {
            Some(s) => parse_date("stop", s)?,
            None => today,
        };
        let start = match &self.start {
            Some(s) => parse_date("start", s)?,
            None => DateWindow::lookback(stop, u64::from(settings.lookback_days)).start,
        };

        if start >= stop {
            return Err(CashflowError::Validation(format!(
                "Start date {} must be before stop date {}",
                start, stop
            )));
        }

        Ok(DateWindow::new(start, stop))
    }

    pub fn normalize_monthly(&self, settings: &Settings) -> bool {
        settings.normalize_monthly && !self.total
    }
}

/// Output formats for exported structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal view
    Text,
    Csv,
    Json,
    /// YAML (human-readable)
    Yaml,
}

fn parse_date(name: &str, s: &str) -> CashflowResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        CashflowError::Validation(format!("Invalid {} date format: {}. Use YYYY-MM-DD", name, s))
    })
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Open a buffered writer for an output file
pub fn create_output(path: &Path) -> CashflowResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        CashflowError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Write `text` to a file, or to stdout when no path is given
pub fn write_text(output: Option<&Path>, text: &str) -> CashflowResult<()> {
    match output {
        Some(path) => {
            let mut writer = create_output(path)?;
            writer
                .write_all(text.as_bytes())
                .and_then(|_| writer.flush())
                .map_err(|e| CashflowError::Export(e.to_string()))
        }
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}
