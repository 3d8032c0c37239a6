//! `cashflow categorize`: label a statement and show or export the register

use std::path::PathBuf;

use clap::Args;

use super::{create_output, StatementArgs};
use crate::config::{CashflowPaths, Settings};
use crate::display::format_transaction_register;
use crate::error::CashflowResult;
use crate::export::export_transactions_csv;

#[derive(Args, Debug)]
pub struct CategorizeArgs {
    #[command(flatten)]
    pub statement: StatementArgs,

    /// Write the labeled transactions as CSV instead of printing them
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the categorize command
pub fn handle_categorize_command(
    paths: &CashflowPaths,
    settings: &Settings,
    args: CategorizeArgs,
) -> CashflowResult<()> {
    let store = args.statement.load_labeled(paths, settings)?;

    if let Some(path) = args.output {
        let writer = create_output(&path)?;
        export_transactions_csv(&store, writer)?;
        println!(
            "{} labeled transactions exported to: {}",
            store.len(),
            path.display()
        );
    } else {
        print!(
            "{}",
            format_transaction_register(&store, &settings.date_format)?
        );
    }

    Ok(())
}
