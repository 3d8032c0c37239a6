//! Reports module for cashflow
//!
//! Presentation-ready structures derived from a category aggregate: the
//! Sankey flow graph and bar chart series.

pub mod bar_chart;
pub mod sankey;

pub use bar_chart::{Bar, BarChartSeries, MonthBucket, MonthlyBars};
pub use sankey::{FlowGraph, FlowGraphBuilder, FlowLink, BUDGET_NODE};
