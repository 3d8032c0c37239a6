//! YAML Export functionality
//!
//! Human-readable variants of the JSON exports.

use std::io::Write;

use crate::error::{CashflowError, CashflowResult};
use crate::export::json::AggregateExport;
use crate::reports::FlowGraph;
use crate::services::CategoryAggregate;

fn export_error(e: impl std::fmt::Display) -> CashflowError {
    CashflowError::Export(e.to_string())
}

/// Export a flow graph to YAML
pub fn export_graph_yaml<W: Write>(graph: &FlowGraph, writer: &mut W) -> CashflowResult<()> {
    writeln!(writer, "# cashflow Sankey graph").map_err(export_error)?;
    writeln!(
        writer,
        "# {} nodes, {} links",
        graph.node_count(),
        graph.link_count()
    )
    .map_err(export_error)?;

    serde_yaml::to_writer(writer, graph).map_err(export_error)
}

/// Export a period aggregate to YAML
pub fn export_aggregate_yaml<W: Write>(
    aggregate: &CategoryAggregate,
    writer: &mut W,
) -> CashflowResult<()> {
    let export = AggregateExport::from_aggregate(aggregate);

    writeln!(writer, "# cashflow category aggregate").map_err(export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_error)?;
    writeln!(writer, "# Window: {} (bounds excluded)", export.window).map_err(export_error)?;

    serde_yaml::to_writer(writer, &export).map_err(export_error)
}
