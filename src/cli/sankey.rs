//! `cashflow sankey`: build the flow graph for a window

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use super::report::build_aggregate;
use super::{create_output, OutputFormat, StatementArgs, WindowArgs};
use crate::config::{CashflowPaths, Settings};
use crate::display::format_flow_graph;
use crate::error::{CashflowError, CashflowResult};
use crate::export::{export_graph_json, export_graph_yaml};
use crate::reports::{FlowGraph, FlowGraphBuilder};

#[derive(Args, Debug)]
pub struct SankeyArgs {
    #[command(flatten)]
    pub statement: StatementArgs,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Output format (csv is not available for graphs)
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compact JSON on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Handle the sankey command
pub fn handle_sankey_command(
    paths: &CashflowPaths,
    settings: &Settings,
    args: SankeyArgs,
) -> CashflowResult<()> {
    if args.format == OutputFormat::Csv {
        return Err(CashflowError::Validation(
            "Flow graphs can be written as text, json or yaml".into(),
        ));
    }

    let aggregate = build_aggregate(paths, settings, &args.statement, &args.window)?;
    let graph = FlowGraphBuilder::build(&aggregate);

    match &args.output {
        Some(path) => {
            let mut writer = create_output(path)?;
            write_graph(&graph, &args, &settings.currency_symbol, &mut writer)?;
            writer
                .flush()
                .map_err(|e| CashflowError::Export(e.to_string()))?;
            println!("Flow graph exported to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_graph(&graph, &args, &settings.currency_symbol, &mut stdout.lock())?;
        }
    }

    Ok(())
}

fn write_graph<W: Write>(
    graph: &FlowGraph,
    args: &SankeyArgs,
    symbol: &str,
    writer: &mut W,
) -> CashflowResult<()> {
    match args.format {
        OutputFormat::Json => {
            export_graph_json(graph, writer, !args.compact)?;
            writeln!(writer).map_err(|e| CashflowError::Export(e.to_string()))
        }
        OutputFormat::Yaml => export_graph_yaml(graph, writer),
        OutputFormat::Text | OutputFormat::Csv => writer
            .write_all(format_flow_graph(graph, symbol).as_bytes())
            .map_err(|e| CashflowError::Export(e.to_string())),
    }
}
