//! CSV Export functionality
//!
//! Labeled transactions are written in the normalized CSV layout, so the
//! output can be read back with `--bank CSV`.

use std::io::Write;

use crate::error::{CashflowError, CashflowResult};
use crate::models::TransactionStore;
use crate::services::CategoryAggregate;

const TRANSACTION_HEADER: [&str; 11] = [
    "booking_date",
    "value_date",
    "description",
    "turnover",
    "procedure",
    "client",
    "recipient",
    "reference",
    "iban",
    "bic",
    "category",
];

fn export_error(e: impl std::fmt::Display) -> CashflowError {
    CashflowError::Export(e.to_string())
}

/// Export transactions (with their categories) to CSV
pub fn export_transactions_csv<W: Write>(store: &TransactionStore, writer: W) -> CashflowResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(TRANSACTION_HEADER)?;

    for record in store {
        let d = &record.description;
        let booking_date = record.booking_date.format("%Y-%m-%d").to_string();
        let value_date = record.value_date.format("%Y-%m-%d").to_string();
        let turnover = record.turnover.to_string();

        csv_writer.write_record([
            booking_date.as_str(),
            value_date.as_str(),
            d.text.as_str(),
            turnover.as_str(),
            d.procedure.as_str(),
            d.client.as_str(),
            d.recipient.as_str(),
            d.reference.as_str(),
            d.iban.as_str(),
            d.bic.as_str(),
            record.category_key(),
        ])?;
    }

    csv_writer.flush().map_err(export_error)
}

/// Export an aggregate as one row per category
pub fn export_aggregate_csv<W: Write>(aggregate: &CategoryAggregate, writer: W) -> CashflowResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "start_date",
        "stop_date",
        "category",
        "total",
        "value",
        "transaction_count",
    ])?;

    let start = aggregate.window.start.to_string();
    let stop = aggregate.window.stop.to_string();

    for (category, value) in aggregate.values() {
        let total = aggregate.totals[category].to_string();
        let value = format!("{:.2}", value);
        let count = aggregate.count(category).to_string();

        csv_writer.write_record([
            start.as_str(),
            stop.as_str(),
            category,
            total.as_str(),
            value.as_str(),
            count.as_str(),
        ])?;
    }

    csv_writer.flush().map_err(export_error)
}
