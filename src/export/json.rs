//! JSON Export functionality
//!
//! Writes flow graphs and period aggregates as JSON. Aggregates are wrapped
//! in a versioned [`AggregateExport`] so that other tools can check what they
//! are reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{CashflowError, CashflowResult};
use crate::models::DateWindow;
use crate::reports::FlowGraph;
use crate::services::CategoryAggregate;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One category of an exported aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub category: String,
    /// Summed turnover over the window
    pub total: f64,
    /// Reported value: the monthly average when normalized, otherwise the total
    pub value: f64,
    pub transaction_count: usize,
}

/// Versioned aggregate export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Exclusive window the records were selected from
    pub window: DateWindow,

    pub period_months: f64,

    pub normalized: bool,

    pub rows: Vec<AggregateRow>,
}

impl AggregateExport {
    pub fn from_aggregate(aggregate: &CategoryAggregate) -> Self {
        let rows = aggregate
            .values()
            .map(|(category, value)| AggregateRow {
                category: category.to_string(),
                total: aggregate.totals[category].as_f64(),
                value,
                transaction_count: aggregate.count(category),
            })
            .collect();

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            window: aggregate.window,
            period_months: aggregate.period_months,
            normalized: aggregate.normalized,
            rows,
        }
    }
}

/// Export a flow graph to JSON
pub fn export_graph_json<W: Write>(graph: &FlowGraph, writer: &mut W, pretty: bool) -> CashflowResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, graph)
    } else {
        serde_json::to_writer(writer, graph)
    }
    .map_err(|e| CashflowError::Export(e.to_string()))
}

/// Export a period aggregate to JSON
pub fn export_aggregate_json<W: Write>(
    aggregate: &CategoryAggregate,
    writer: &mut W,
    pretty: bool,
) -> CashflowResult<()> {
    let export = AggregateExport::from_aggregate(aggregate);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| CashflowError::Export(e.to_string()))
}
