//! Period aggregation
//!
//! Sums signed turnover per category over an exclusive date window and
//! optionally turns the sums into average monthly rates.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CashflowError, CashflowResult};
use crate::models::{DateWindow, Money, TransactionStore};

/// Average number of days per month in the Gregorian calendar
pub const DAYS_PER_MONTH: f64 = 30.436875;

/// Per-category turnover over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    /// The exclusive window the records were selected from
    pub window: DateWindow,
    /// Days between the first and last selected record, in months
    pub period_months: f64,
    /// Whether [`CategoryAggregate::value`] reports monthly averages
    pub normalized: bool,
    /// Summed signed turnover per category, sorted by category name
    pub totals: BTreeMap<String, Money>,
    /// Number of records per category
    pub counts: BTreeMap<String, usize>,
}

impl CategoryAggregate {
    /// The reported value of a category: the monthly average when normalized,
    /// otherwise the plain sum
    pub fn value(&self, category: &str) -> Option<f64> {
        self.totals.get(category).map(|total| self.scale(*total))
    }

    /// Reported values in category order
    pub fn values(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.totals
            .iter()
            .map(move |(category, total)| (category.as_str(), self.scale(*total)))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.totals.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    pub fn transaction_count(&self) -> usize {
        self.counts.values().sum()
    }

    /// Sum of the reported values of all income categories
    pub fn total_income(&self) -> f64 {
        self.values().map(|(_, v)| v).filter(|v| *v > 0.0).sum()
    }

    /// Sum of the reported values of all expense categories (negative)
    pub fn total_expenses(&self) -> f64 {
        self.values().map(|(_, v)| v).filter(|v| *v < 0.0).sum()
    }

    fn scale(&self, total: Money) -> f64 {
        if self.normalized {
            total.as_f64() / self.period_months
        } else {
            total.as_f64()
        }
    }
}

/// Aggregates a transaction store over date windows
pub struct PeriodAggregator<'a> {
    store: &'a TransactionStore,
}

impl<'a> PeriodAggregator<'a> {
    pub fn new(store: &'a TransactionStore) -> Self {
        Self { store }
    }

    /// Sum turnover per category for records booked strictly between
    /// `start_date` and `stop_date`
    ///
    /// The period length is measured between the first and the last selected
    /// record in store order, not between the earliest and latest dates.
    ///
    /// # Errors
    ///
    /// - [`CashflowError::EmptyPeriod`] if no record lies inside the window
    /// - [`CashflowError::DegeneratePeriod`] if `normalize_monthly` is set and
    ///   the selected records span zero days
    pub fn aggregate(
        &self,
        start_date: NaiveDate,
        stop_date: NaiveDate,
        normalize_monthly: bool,
    ) -> CashflowResult<CategoryAggregate> {
        let window = DateWindow::new(start_date, stop_date);
        let selected = self.store.filter(|r| window.contains(r.booking_date));

        let (first, last) = match (selected.first(), selected.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(CashflowError::EmptyPeriod {
                    start: start_date,
                    stop: stop_date,
                })
            }
        };

        let span_days = (first.booking_date - last.booking_date).num_days().abs();
        let period_months = span_days as f64 / DAYS_PER_MONTH;

        if normalize_monthly && span_days == 0 {
            return Err(CashflowError::DegeneratePeriod {
                start: start_date,
                stop: stop_date,
            });
        }

        let mut totals: BTreeMap<String, Money> = BTreeMap::new();
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in &selected {
            *totals.entry(record.category_key().to_string()).or_default() += record.turnover;
            *counts.entry(record.category_key().to_string()).or_default() += 1;
        }

        debug!(
            window = %window,
            records = selected.len(),
            categories = totals.len(),
            period_months,
            "aggregated period"
        );

        Ok(CategoryAggregate {
            window,
            period_months,
            normalized: normalize_monthly,
            totals,
            counts,
        })
    }

    /// Aggregate over a [`DateWindow`]
    pub fn aggregate_window(
        &self,
        window: DateWindow,
        normalize_monthly: bool,
    ) -> CashflowResult<CategoryAggregate> {
        self.aggregate(window.start, window.stop, normalize_monthly)
    }
}
