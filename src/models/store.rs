//! Transaction store
//!
//! An ordered, immutable collection of [`TransactionRecord`]s in import
//! order. Every transforming operation returns a new store.

use serde::{Deserialize, Serialize};

use super::transaction::TransactionRecord;

/// Ordered sequence of transaction records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionStore {
    records: Vec<TransactionRecord>,
}

impl TransactionStore {
    /// Create a store from records in import order
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&TransactionRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&TransactionRecord> {
        self.records.last()
    }

    /// Return a new store with the records matching `predicate`, keeping
    /// their relative order
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&TransactionRecord) -> bool,
    {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// Return a new store in which record `i` carries `categories[i]`
    ///
    /// # Panics
    ///
    /// Panics if `categories` does not have one entry per record.
    pub fn with_categories(&self, categories: Vec<String>) -> Self {
        assert_eq!(
            categories.len(),
            self.records.len(),
            "one category per record is required"
        );

        Self {
            records: self
                .records
                .iter()
                .zip(categories)
                .map(|(record, category)| record.with_category(category))
                .collect(),
        }
    }
}

impl From<Vec<TransactionRecord>> for TransactionStore {
    fn from(records: Vec<TransactionRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<TransactionRecord> for TransactionStore {
    fn from_iter<I: IntoIterator<Item = TransactionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TransactionStore {
    type Item = &'a TransactionRecord;
    type IntoIter = std::slice::Iter<'a, TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn sample_store() -> TransactionStore {
        let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        TransactionStore::new(vec![
            TransactionRecord::simple(day(20), "salary", Money::from_cents(250000)),
            TransactionRecord::simple(day(12), "supermarket", Money::from_cents(-4550)),
            TransactionRecord::simple(day(3), "cafe", Money::from_cents(-320)),
        ])
    }

    #[test]
    fn test_filter_preserves_order_and_source() {
        let store = sample_store();
        let expenses = store.filter(|r| r.is_expense());

        assert_eq!(store.len(), 3);
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses.first().unwrap().description.text, "supermarket");
        assert_eq!(expenses.last().unwrap().description.text, "cafe");
    }

    #[test]
    fn test_with_categories_returns_labeled_copy() {
        let store = sample_store();
        let labeled = store.with_categories(vec![
            "Salary".to_string(),
            "Groceries".to_string(),
            "Other Expenses".to_string(),
        ]);

        assert!(store.iter().all(|r| r.category.is_none()));
        let categories: Vec<_> = labeled.iter().map(|r| r.category_key()).collect();
        assert_eq!(categories, vec!["Salary", "Groceries", "Other Expenses"]);
    }

    #[test]
    #[should_panic(expected = "one category per record")]
    fn test_with_categories_length_mismatch() {
        sample_store().with_categories(vec!["Salary".to_string()]);
    }

    #[test]
    fn test_empty_store() {
        let store = TransactionStore::default();
        assert!(store.is_empty());
        assert!(store.first().is_none());
        assert!(store.filter(|_| true).is_empty());
    }
}
