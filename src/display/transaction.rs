//! Transaction register formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::{category_label, check_date_format, truncate};
use crate::error::{CashflowError, CashflowResult};
use crate::models::{TransactionRecord, TransactionStore};

const DESCRIPTION_WIDTH: usize = 40;

#[derive(Tabled)]
struct RegisterRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Category")]
    category: String,
}

impl RegisterRow {
    fn new(record: &TransactionRecord, date_format: &str) -> Self {
        Self {
            date: record.booking_date.format(date_format).to_string(),
            description: truncate(record.description.summary(), DESCRIPTION_WIDTH),
            amount: record.turnover.to_string(),
            category: category_label(record.category_key()).to_string(),
        }
    }
}

/// Format a store as a register table
pub fn format_transaction_register(
    store: &TransactionStore,
    date_format: &str,
) -> CashflowResult<String> {
    check_date_format(date_format).map_err(CashflowError::Validation)?;

    if store.is_empty() {
        return Ok("No transactions found.\n".to_string());
    }

    let rows: Vec<RegisterRow> = store
        .iter()
        .map(|record| RegisterRow::new(record, date_format))
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::psql());
    Ok(format!("{}\n", table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_register() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let store = TransactionStore::new(vec![
            TransactionRecord::simple(date, "REWE SAGT DANKE", Money::from_cents(-4550))
                .with_category("Groceries"),
            TransactionRecord::simple(date, "Korrektur", Money::zero()).with_category(""),
        ]);

        let output = format_transaction_register(&store, "%d.%m.%Y").unwrap();
        assert!(output.contains("Category"));
        assert!(output.contains("15.01.2025"));
        assert!(output.contains("REWE SAGT DANKE"));
        assert!(output.contains("-45.50"));
        assert!(output.contains("(uncategorized)"));
    }

    #[test]
    fn test_empty_register() {
        let output = format_transaction_register(&TransactionStore::default(), "%Y-%m-%d").unwrap();
        assert_eq!(output, "No transactions found.\n");
    }

    #[test]
    fn test_invalid_date_format_is_an_error() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let store = TransactionStore::new(vec![TransactionRecord::simple(
            date,
            "REWE",
            Money::from_cents(-450),
        )]);

        let err = format_transaction_register(&store, "%Q").unwrap_err();
        assert!(matches!(err, CashflowError::Validation(_)));
    }
}
