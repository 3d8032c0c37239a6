//! Display formatting for terminal output
//!
//! Plain-text views of registers, aggregates, flow graphs and bar series.

pub mod aggregate;
pub mod report;
pub mod transaction;

pub use aggregate::{format_aggregate, format_bar_chart, format_flow_graph, format_monthly_bars};
pub use transaction::format_transaction_register;
