//! `cashflow bars`: bar chart series in the terminal

use std::path::PathBuf;

use clap::Args;

use super::report::build_aggregate;
use super::{today, write_text, StatementArgs, WindowArgs};
use crate::config::{CashflowPaths, Settings};
use crate::display::{format_bar_chart, format_monthly_bars};
use crate::error::CashflowResult;
use crate::reports::{BarChartSeries, MonthlyBars};

#[derive(Args, Debug)]
pub struct BarsArgs {
    #[command(flatten)]
    pub statement: StatementArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// One row per calendar month instead of one bar per category
    #[arg(short, long)]
    pub monthly: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the bars command
pub fn handle_bars_command(
    paths: &CashflowPaths,
    settings: &Settings,
    args: BarsArgs,
) -> CashflowResult<()> {
    let symbol = settings.currency_symbol.as_str();

    let text = if args.monthly {
        let store = args.statement.load_labeled(paths, settings)?;
        let range = args.window.resolve(settings, today())?;
        let bars = MonthlyBars::generate(&store, range.start, range.stop)?;
        format_monthly_bars(&bars, symbol)
    } else {
        let aggregate = build_aggregate(paths, settings, &args.statement, &args.window)?;
        format_bar_chart(&BarChartSeries::from_aggregate(&aggregate), symbol)
    };

    write_text(args.output.as_deref(), &text)
}
