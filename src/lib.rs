//! cashflow - bank statement categorization and Sankey cashflow graphs
//!
//! This library reads bank statement exports, labels every transaction with
//! a category from keyword rules, sums the turnover per category over a date
//! window and turns the result into a node-link graph for a Sankey renderer.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (records, store, money, periods)
//! - `import`: Bank export parsers
//! - `services`: Categorization and period aggregation
//! - `reports`: Flow graph and bar chart series
//! - `export`: CSV, JSON and YAML writers
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//! - `logging`: Log subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use cashflow::import::{parse_statement, BankFormat};
//! use cashflow::reports::FlowGraphBuilder;
//! use cashflow::services::{CategoryRuleSet, PeriodAggregator};
//!
//! let store = parse_statement(&bytes, BankFormat::Comdirect)?;
//! let labeled = CategoryRuleSet::from_path("categories.json")?.apply(&store);
//! let aggregate = PeriodAggregator::new(&labeled).aggregate(start, stop, true)?;
//! let graph = FlowGraphBuilder::build(&aggregate);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{CashflowError, CashflowResult};
