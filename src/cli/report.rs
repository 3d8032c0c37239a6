//! `cashflow report`: per-category turnover over a window

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use super::{create_output, today, OutputFormat, StatementArgs, WindowArgs};
use crate::config::{CashflowPaths, Settings};
use crate::display::format_aggregate;
use crate::error::{CashflowError, CashflowResult};
use crate::export::{export_aggregate_csv, export_aggregate_json, export_aggregate_yaml};
use crate::services::{CategoryAggregate, PeriodAggregator};

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub statement: StatementArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Label the statement and aggregate it over the requested window
pub(crate) fn build_aggregate(
    paths: &CashflowPaths,
    settings: &Settings,
    statement: &StatementArgs,
    window: &WindowArgs,
) -> CashflowResult<CategoryAggregate> {
    let store = statement.load_labeled(paths, settings)?;
    let range = window.resolve(settings, today())?;

    PeriodAggregator::new(&store).aggregate_window(range, window.normalize_monthly(settings))
}

/// Handle the report command
pub fn handle_report_command(
    paths: &CashflowPaths,
    settings: &Settings,
    args: ReportArgs,
) -> CashflowResult<()> {
    let aggregate = build_aggregate(paths, settings, &args.statement, &args.window)?;
    let symbol = settings.currency_symbol.as_str();

    match &args.output {
        Some(path) => {
            let mut writer = create_output(path)?;
            write_aggregate(&aggregate, args.format, symbol, &mut writer)?;
            writer
                .flush()
                .map_err(|e| CashflowError::Export(e.to_string()))?;
            println!("Report exported to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_aggregate(&aggregate, args.format, symbol, &mut stdout.lock())?;
        }
    }

    Ok(())
}

fn write_aggregate<W: Write>(
    aggregate: &CategoryAggregate,
    format: OutputFormat,
    symbol: &str,
    writer: &mut W,
) -> CashflowResult<()> {
    match format {
        OutputFormat::Text => writer
            .write_all(format_aggregate(aggregate, symbol).as_bytes())
            .map_err(|e| CashflowError::Export(e.to_string())),
        OutputFormat::Csv => export_aggregate_csv(aggregate, writer),
        OutputFormat::Json => {
            export_aggregate_json(aggregate, writer, true)?;
            writeln!(writer).map_err(|e| CashflowError::Export(e.to_string()))
        }
        OutputFormat::Yaml => export_aggregate_yaml(aggregate, writer),
    }
}
