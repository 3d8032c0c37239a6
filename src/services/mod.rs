//! Service layer for cashflow
//!
//! Categorization and period aggregation over a [`TransactionStore`]. Both
//! services are pure: they take a store by reference and return new values.
//!
//! [`TransactionStore`]: crate::models::TransactionStore

pub mod aggregate;
pub mod categorize;

pub use aggregate::{CategoryAggregate, PeriodAggregator, DAYS_PER_MONTH};
pub use categorize::{CategoryRule, CategoryRuleSet, KeywordPredicate, SAMPLE_RULES};
