//! Comdirect CSV export parser
//!
//! The export is Windows-1252 encoded and `;` separated. Four preamble rows
//! (account name, period, balance) precede the header row and two rows with
//! the old balance close the file. The booking text column packs several
//! fields into one string:
//!
//! ```text
//! Auftraggeber: REWE Markt GmbH Buchungstext: REWE SAGT DANKE Ref. 5X2C3
//! ```

use std::sync::OnceLock;

use chrono::NaiveDate;
use encoding_rs::WINDOWS_1252;
use regex::Regex;
use tracing::{debug, warn};

use super::{BankFormat, StatementParser};
use crate::error::{CashflowError, CashflowResult};
use crate::models::{Description, Money, TransactionRecord, TransactionStore};

/// Rows before the header row
pub const PREAMBLE_ROWS: usize = 4;

/// Rows after the last transaction
pub const FOOTER_ROWS: usize = 2;

const DATE_FORMAT: &str = "%d.%m.%Y";

const COLUMNS: [&str; 5] = [
    "booking_date",
    "value_date",
    "procedure",
    "booking_text",
    "turnover",
];

fn client_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Auftraggeber: (.+) Buchungstext:").expect("invalid client regex"))
}

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Ref\. (.+)").expect("invalid reference regex"))
}

fn recipient_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Empfänger: (.+)Kto/IBAN:").expect("invalid recipient regex"))
}

fn iban_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Kto/IBAN: (.+) BLZ/BIC:").expect("invalid iban regex"))
}

fn bic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"BLZ/BIC: (.+)\s+Buchungstext:").expect("invalid bic regex"))
}

fn booking_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Buchungstext: (.+) Ref\.").expect("invalid booking text regex"))
}

fn capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Split a packed comdirect booking text into its fields
pub fn split_booking_text(procedure: &str, raw: &str) -> Description {
    let text = if raw.contains("Buchungstext:") {
        capture(booking_text_re(), raw)
    } else {
        raw.trim().to_string()
    };

    Description {
        text,
        procedure: procedure.trim().to_string(),
        client: capture(client_re(), raw),
        recipient: capture(recipient_re(), raw),
        reference: capture(reference_re(), raw),
        iban: capture(iban_re(), raw),
        bic: capture(bic_re(), raw),
    }
}

/// Decode export bytes; exports are Windows-1252 but re-saved files may be UTF-8
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
    if had_errors {
        warn!("statement contains bytes outside Windows-1252");
    }
    decoded.into_owned()
}

/// Parser for comdirect giro account exports
#[derive(Debug, Default)]
pub struct ComdirectParser;

impl ComdirectParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_date(row: usize, field: &'static str, value: &str) -> CashflowResult<NaiveDate> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
            CashflowError::malformed(row, field, format!("is not a DD.MM.YYYY date: '{}'", value))
        })
    }

    fn parse_row(row: usize, record: &csv::StringRecord) -> CashflowResult<TransactionRecord> {
        let column = |idx: usize| {
            record
                .get(idx)
                .ok_or_else(|| CashflowError::malformed(row, COLUMNS[idx], "is missing"))
        };

        let booking_date = Self::parse_date(row, COLUMNS[0], column(0)?)?;
        let value_date = Self::parse_date(row, COLUMNS[1], column(1)?)?;
        let description = split_booking_text(column(2)?, column(3)?);

        let raw_turnover = column(4)?;
        let turnover = Money::parse_german(raw_turnover).map_err(|_| {
            CashflowError::malformed(
                row,
                COLUMNS[4],
                format!("is not a decimal amount: '{}'", raw_turnover),
            )
        })?;

        Ok(TransactionRecord::new(
            booking_date,
            value_date,
            description,
            turnover,
        ))
    }
}

impl StatementParser for ComdirectParser {
    fn format(&self) -> BankFormat {
        BankFormat::Comdirect
    }

    fn parse(&self, bytes: &[u8]) -> CashflowResult<TransactionStore> {
        let text = decode(bytes);
        let lines: Vec<&str> = text.lines().collect();

        if lines.len() < PREAMBLE_ROWS + 1 + FOOTER_ROWS {
            return Err(CashflowError::malformed(
                lines.len(),
                "header",
                format!(
                    "is missing: expected at least {} rows, found {}",
                    PREAMBLE_ROWS + 1 + FOOTER_ROWS,
                    lines.len()
                ),
            ));
        }

        // Header row included; the reader skips it
        let table = lines[PREAMBLE_ROWS..lines.len() - FOOTER_ROWS].join("\n");
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(table.as_bytes());

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            // 1-based line number in the export
            let row = PREAMBLE_ROWS + 2 + idx;
            let record = result.map_err(|e| CashflowError::malformed(row, "row", e.to_string()))?;
            records.push(Self::parse_row(row, &record)?);
        }

        debug!(rows = records.len(), "parsed comdirect export");
        Ok(TransactionStore::new(records))
    }
}
