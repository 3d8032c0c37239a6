//! Statement import
//!
//! Turns raw bank export bytes into a [`TransactionStore`]. Each supported
//! export format has a [`StatementParser`]; [`parse_statement`] picks the
//! parser for a [`BankFormat`].

pub mod comdirect;
pub mod normalized;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CashflowError, CashflowResult};
use crate::models::TransactionStore;

pub use comdirect::ComdirectParser;
pub use normalized::NormalizedCsvParser;

/// Bank export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankFormat {
    /// Comdirect giro account CSV export
    #[serde(rename = "CDT", alias = "comdirect")]
    Comdirect,
    /// ING giro account CSV export
    #[serde(rename = "ING", alias = "ing")]
    Ing,
    /// Plain CSV with a named header row
    #[serde(rename = "CSV", alias = "normalized")]
    Normalized,
}

impl BankFormat {
    pub const ALL: [BankFormat; 3] = [Self::Comdirect, Self::Ing, Self::Normalized];

    /// The short code used on the command line and in settings
    pub fn code(&self) -> &'static str {
        match self {
            Self::Comdirect => "CDT",
            Self::Ing => "ING",
            Self::Normalized => "CSV",
        }
    }

    pub fn bank_name(&self) -> &'static str {
        match self {
            Self::Comdirect => "comdirect",
            Self::Ing => "ING",
            Self::Normalized => "normalized CSV",
        }
    }

    /// Resolve a format code, case-insensitive
    pub fn from_code(code: &str) -> CashflowResult<Self> {
        match code.trim().to_lowercase().as_str() {
            "cdt" | "comdirect" => Ok(Self::Comdirect),
            "ing" => Ok(Self::Ing),
            "csv" | "normalized" => Ok(Self::Normalized),
            other => Err(CashflowError::UnsupportedFormat(format!(
                "unknown bank format '{}' (expected one of CDT, ING, CSV)",
                other
            ))),
        }
    }
}

impl fmt::Display for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for BankFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).map_err(|e| e.to_string())
    }
}

/// A parser for one bank export format
pub trait StatementParser {
    fn format(&self) -> BankFormat;

    /// Parse a complete export file
    fn parse(&self, bytes: &[u8]) -> CashflowResult<TransactionStore>;
}

/// Get the parser for a format
pub fn parser_for(format: BankFormat) -> CashflowResult<Box<dyn StatementParser>> {
    match format {
        BankFormat::Comdirect => Ok(Box::new(ComdirectParser::new())),
        BankFormat::Normalized => Ok(Box::new(NormalizedCsvParser::new())),
        BankFormat::Ing => Err(CashflowError::UnsupportedFormat(format!(
            "{} exports are not supported yet",
            format.bank_name()
        ))),
    }
}

/// Parse export bytes in the given format
pub fn parse_statement(bytes: &[u8], format: BankFormat) -> CashflowResult<TransactionStore> {
    let store = parser_for(format)?.parse(bytes)?;
    info!(format = %format, records = store.len(), "imported statement");
    Ok(store)
}

/// Read and parse an export file
pub fn load_statement(path: impl AsRef<Path>, format: BankFormat) -> CashflowResult<TransactionStore> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        CashflowError::Io(format!("Failed to read statement {}: {}", path.display(), e))
    })?;
    parse_statement(&bytes, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_format_codes() {
        assert_eq!(BankFormat::from_code("CDT").unwrap(), BankFormat::Comdirect);
        assert_eq!(BankFormat::from_code("comdirect").unwrap(), BankFormat::Comdirect);
        assert_eq!(BankFormat::from_code("ing").unwrap(), BankFormat::Ing);
        assert_eq!("csv".parse::<BankFormat>().unwrap(), BankFormat::Normalized);

        for format in BankFormat::ALL {
            assert_eq!(BankFormat::from_code(format.code()).unwrap(), format);
        }
    }

    #[test]
    fn test_unknown_format() {
        let err = BankFormat::from_code("DKB").unwrap_err();
        assert!(matches!(err, CashflowError::UnsupportedFormat(_)));
        assert!("DKB".parse::<BankFormat>().is_err());
    }

    #[test]
    fn test_ing_is_unsupported() {
        let err = parse_statement(b"anything", BankFormat::Ing).unwrap_err();
        assert!(matches!(err, CashflowError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(
            serde_json::to_string(&BankFormat::Comdirect).unwrap(),
            "\"CDT\""
        );
        let format: BankFormat = serde_json::from_str("\"normalized\"").unwrap();
        assert_eq!(format, BankFormat::Normalized);
    }

    #[test]
    fn test_load_statement_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "booking_date,value_date,description,turnover").unwrap();
        writeln!(file, "2025-01-15,2025-01-15,REWE,-12.50").unwrap();

        let store = load_statement(file.path(), BankFormat::Normalized).unwrap();
        assert_eq!(store.len(), 1);

        let err = load_statement("/nonexistent/statement.csv", BankFormat::Normalized).unwrap_err();
        assert!(matches!(err, CashflowError::Io(_)));
    }
}
