//! Normalized CSV parser
//!
//! A bank-neutral CSV with a named header row. Required columns are
//! `booking_date`, `value_date`, `description` and `turnover`; `procedure`,
//! `client`, `recipient`, `reference`, `iban`, `bic` and `category` are
//! optional. Dates are ISO (`YYYY-MM-DD`) and amounts use a `.` decimal
//! separator. This is also the format `categorize --output` writes.

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

use super::{BankFormat, StatementParser};
use crate::error::{CashflowError, CashflowResult};
use crate::models::{Description, Money, TransactionRecord, TransactionStore};

pub const REQUIRED_COLUMNS: [&str; 4] = ["booking_date", "value_date", "description", "turnover"];

pub const OPTIONAL_COLUMNS: [&str; 7] = [
    "procedure",
    "client",
    "recipient",
    "reference",
    "iban",
    "bic",
    "category",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column positions resolved from the header row
#[derive(Debug, Clone)]
struct ColumnMapping {
    required: [usize; 4],
    optional: [Option<usize>; 7],
}

impl ColumnMapping {
    fn from_headers(headers: &StringRecord) -> CashflowResult<Self> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let mut required = [0; 4];
        for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = position(name)
                .ok_or_else(|| CashflowError::malformed(1, name, "column is missing from the header"))?;
        }

        let mut optional = [None; 7];
        for (slot, name) in optional.iter_mut().zip(OPTIONAL_COLUMNS) {
            *slot = position(name);
        }

        Ok(Self { required, optional })
    }

    fn optional_value(&self, record: &StringRecord, idx: usize) -> String {
        self.optional[idx]
            .and_then(|col| record.get(col))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }
}

/// Parser for the normalized CSV format
#[derive(Debug, Default)]
pub struct NormalizedCsvParser;

impl NormalizedCsvParser {
    pub fn new() -> Self {
        Self
    }

    fn required<'r>(
        row: usize,
        record: &'r StringRecord,
        mapping: &ColumnMapping,
        idx: usize,
    ) -> CashflowResult<&'r str> {
        let name = REQUIRED_COLUMNS[idx];
        record
            .get(mapping.required[idx])
            .map(str::trim)
            .ok_or_else(|| CashflowError::malformed(row, name, "is missing"))
    }

    fn parse_date(row: usize, field: &'static str, value: &str) -> CashflowResult<NaiveDate> {
        NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
            CashflowError::malformed(row, field, format!("is not a YYYY-MM-DD date: '{}'", value))
        })
    }

    fn parse_row(
        row: usize,
        record: &StringRecord,
        mapping: &ColumnMapping,
    ) -> CashflowResult<TransactionRecord> {
        let booking_date = Self::parse_date(row, "booking_date", Self::required(row, record, mapping, 0)?)?;
        let value_date = Self::parse_date(row, "value_date", Self::required(row, record, mapping, 1)?)?;
        let text = Self::required(row, record, mapping, 2)?;

        let raw_turnover = Self::required(row, record, mapping, 3)?;
        let turnover = Money::parse(raw_turnover).map_err(|_| {
            CashflowError::malformed(
                row,
                "turnover",
                format!("is not a decimal amount: '{}'", raw_turnover),
            )
        })?;

        let description = Description {
            text: text.to_string(),
            procedure: mapping.optional_value(record, 0),
            client: mapping.optional_value(record, 1),
            recipient: mapping.optional_value(record, 2),
            reference: mapping.optional_value(record, 3),
            iban: mapping.optional_value(record, 4),
            bic: mapping.optional_value(record, 5),
        };

        let parsed = TransactionRecord::new(booking_date, value_date, description, turnover);
        let category = mapping.optional_value(record, 6);
        if category.is_empty() {
            Ok(parsed)
        } else {
            Ok(parsed.with_category(category))
        }
    }
}

impl StatementParser for NormalizedCsvParser {
    fn format(&self) -> BankFormat {
        BankFormat::Normalized
    }

    fn parse(&self, bytes: &[u8]) -> CashflowResult<TransactionStore> {
        let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| CashflowError::malformed(1, "header", e.to_string()))?
            .clone();
        let mapping = ColumnMapping::from_headers(&headers)?;

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            // Header is row 1
            let row = idx + 2;
            let record = result.map_err(|e| CashflowError::malformed(row, "row", e.to_string()))?;
            records.push(Self::parse_row(row, &record, &mapping)?);
        }

        debug!(rows = records.len(), "parsed normalized csv");
        Ok(TransactionStore::new(records))
    }
}
