//! Bar chart series
//!
//! Two views for a bar chart: per-category bars of a single aggregate, and
//! per-month turnover by category over a window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CashflowError, CashflowResult};
use crate::models::{DateWindow, Money, Month, TransactionStore};
use crate::services::CategoryAggregate;

/// One bar: a category and its magnitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub category: String,
    pub value: f64,
}

/// Income and expense bars of an aggregate
///
/// Expense values are reported as positive magnitudes. Both series are
/// sorted by magnitude, largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartSeries {
    pub income: Vec<Bar>,
    pub expenses: Vec<Bar>,
    pub normalized: bool,
}

impl BarChartSeries {
    pub fn from_aggregate(aggregate: &CategoryAggregate) -> Self {
        let mut income = Vec::new();
        let mut expenses = Vec::new();

        for (category, value) in aggregate.values() {
            let bar = Bar {
                category: category.to_string(),
                value: value.abs(),
            };
            if value < 0.0 {
                expenses.push(bar);
            } else {
                income.push(bar);
            }
        }

        // Stable sort keeps category order among equal values
        income.sort_by(|a, b| b.value.total_cmp(&a.value));
        expenses.sort_by(|a, b| b.value.total_cmp(&a.value));

        Self {
            income,
            expenses,
            normalized: aggregate.normalized,
        }
    }

    /// Largest bar across both series, used to scale terminal bars
    pub fn max_value(&self) -> f64 {
        self.income
            .iter()
            .chain(&self.expenses)
            .map(|bar| bar.value)
            .fold(0.0, f64::max)
    }
}

/// Turnover of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub month: Month,
    pub categories: BTreeMap<String, Money>,
    pub income: Money,
    pub expenses: Money,
}

impl MonthBucket {
    fn new(month: Month) -> Self {
        Self {
            month,
            categories: BTreeMap::new(),
            income: Money::zero(),
            expenses: Money::zero(),
        }
    }

    pub fn net(&self) -> Money {
        self.income + self.expenses
    }
}

/// Monthly turnover by category over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBars {
    pub window: DateWindow,
    pub months: Vec<MonthBucket>,
}

impl MonthlyBars {
    /// Bucket the records booked strictly inside the window by month
    ///
    /// Months without records are omitted.
    pub fn generate(
        store: &TransactionStore,
        start_date: NaiveDate,
        stop_date: NaiveDate,
    ) -> CashflowResult<Self> {
        let window = DateWindow::new(start_date, stop_date);
        let mut buckets: BTreeMap<Month, MonthBucket> = BTreeMap::new();

        for record in store.iter().filter(|r| window.contains(r.booking_date)) {
            let month = Month::of(record.booking_date);
            let bucket = buckets
                .entry(month)
                .or_insert_with(|| MonthBucket::new(month));

            *bucket
                .categories
                .entry(record.category_key().to_string())
                .or_default() += record.turnover;

            if record.turnover.is_positive() {
                bucket.income += record.turnover;
            } else {
                bucket.expenses += record.turnover;
            }
        }

        if buckets.is_empty() {
            return Err(CashflowError::EmptyPeriod {
                start: start_date,
                stop: stop_date,
            });
        }

        Ok(Self {
            window,
            months: buckets.into_values().collect(),
        })
    }

    /// Every category seen in any month, sorted
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .months
            .iter()
            .flat_map(|m| m.categories.keys().map(String::as_str))
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Largest monthly income or expense magnitude
    pub fn max_magnitude(&self) -> Money {
        self.months
            .iter()
            .map(|m| m.income.max(m.expenses.abs()))
            .max()
            .unwrap_or_default()
    }
}
