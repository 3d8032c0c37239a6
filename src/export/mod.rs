//! Export module for cashflow
//!
//! - CSV: labeled transactions and aggregate rows (spreadsheet-compatible)
//! - JSON: flow graphs and versioned aggregates for renderers and scripts
//! - YAML: the same structures in human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_aggregate_csv, export_transactions_csv};
pub use json::{
    export_aggregate_json, export_graph_json, AggregateExport, AggregateRow, EXPORT_SCHEMA_VERSION,
};
pub use yaml::{export_aggregate_yaml, export_graph_yaml};
