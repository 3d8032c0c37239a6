//! Transaction record model
//!
//! A [`TransactionRecord`] is one row of a bank statement after parsing:
//! two dates, a decomposed description and a signed turnover. The category
//! starts out absent and is only ever attached by producing a new record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

/// Category assigned to records that no rule matched and that carry no turnover
pub const UNSET_CATEGORY: &str = "";

/// Default category for records with positive turnover
pub const OTHER_INCOME: &str = "Other Income";

/// Default category for records with negative turnover
pub const OTHER_EXPENSES: &str = "Other Expenses";

/// The description of a transaction, split into the sub-fields a bank
/// format encodes inline. Sub-fields that a format does not provide stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Booking text (the free-text part of the description)
    #[serde(default)]
    pub text: String,

    /// Kind of booking as reported by the bank (e.g. "Lastschrift / Belastung")
    #[serde(default)]
    pub procedure: String,

    /// Counterparty who ordered the payment
    #[serde(default)]
    pub client: String,

    /// Counterparty receiving the payment
    #[serde(default)]
    pub recipient: String,

    /// Reference number
    #[serde(default)]
    pub reference: String,

    #[serde(default)]
    pub iban: String,

    #[serde(default)]
    pub bic: String,
}

impl Description {
    /// Create a description that only carries booking text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Get the value of a text field
    pub fn field(&self, field: RecordField) -> &str {
        match field {
            RecordField::Description => &self.text,
            RecordField::Procedure => &self.procedure,
            RecordField::Client => &self.client,
            RecordField::Recipient => &self.recipient,
            RecordField::Reference => &self.reference,
            RecordField::Iban => &self.iban,
            RecordField::Bic => &self.bic,
        }
    }

    /// The most useful single-line label for display: the counterparty when
    /// known, otherwise the booking text
    pub fn summary(&self) -> &str {
        if !self.client.is_empty() {
            &self.client
        } else if !self.recipient.is_empty() {
            &self.recipient
        } else {
            &self.text
        }
    }
}

/// Text fields of a record that keyword rules can bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordField {
    Description,
    Procedure,
    Client,
    Recipient,
    Reference,
    Iban,
    Bic,
}

impl RecordField {
    /// All fields, in schema order
    pub const ALL: [RecordField; 7] = [
        Self::Description,
        Self::Procedure,
        Self::Client,
        Self::Recipient,
        Self::Reference,
        Self::Iban,
        Self::Bic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Procedure => "procedure",
            Self::Client => "client",
            Self::Recipient => "recipient",
            Self::Reference => "reference",
            Self::Iban => "iban",
            Self::Bic => "bic",
        }
    }
}

impl FromStr for RecordField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "description" | "booking_text" => Ok(Self::Description),
            "procedure" => Ok(Self::Procedure),
            "client" => Ok(Self::Client),
            "recipient" => Ok(Self::Recipient),
            "reference" | "ref_number" => Ok(Self::Reference),
            "iban" => Ok(Self::Iban),
            "bic" => Ok(Self::Bic),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single bank statement transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Date the bank booked the transaction
    pub booking_date: NaiveDate,

    /// Date the amount became effective
    pub value_date: NaiveDate,

    pub description: Description,

    /// Signed amount (positive for income, negative for expenses)
    pub turnover: Money,

    /// Assigned category, absent until the record has been categorized
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionRecord {
    /// Create a new uncategorized record
    pub fn new(
        booking_date: NaiveDate,
        value_date: NaiveDate,
        description: Description,
        turnover: Money,
    ) -> Self {
        Self {
            booking_date,
            value_date,
            description,
            turnover,
            category: None,
        }
    }

    /// Create a record booked and valued on the same day with plain booking text
    pub fn simple(date: NaiveDate, text: impl Into<String>, turnover: Money) -> Self {
        Self::new(date, date, Description::from_text(text), turnover)
    }

    /// Return a copy of this record carrying the given category
    pub fn with_category(&self, category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..self.clone()
        }
    }

    /// The category key used for grouping; absent categories fall into the
    /// unset bucket
    pub fn category_key(&self) -> &str {
        self.category.as_deref().unwrap_or(UNSET_CATEGORY)
    }

    pub fn is_income(&self) -> bool {
        self.turnover.is_positive()
    }

    pub fn is_expense(&self) -> bool {
        self.turnover.is_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_field_lookup() {
        let description = Description {
            text: "Miete Januar".into(),
            client: "Hausverwaltung".into(),
            iban: "DE02120300000000202051".into(),
            ..Default::default()
        };

        assert_eq!(description.field(RecordField::Description), "Miete Januar");
        assert_eq!(description.field(RecordField::Client), "Hausverwaltung");
        assert_eq!(description.field(RecordField::Bic), "");
        assert_eq!(description.summary(), "Hausverwaltung");
    }

    #[test]
    fn test_field_names_and_aliases() {
        assert_eq!(
            "booking_text".parse::<RecordField>().unwrap(),
            RecordField::Description
        );
        assert_eq!(
            "ref_number".parse::<RecordField>().unwrap(),
            RecordField::Reference
        );
        assert_eq!("IBAN".parse::<RecordField>().unwrap(), RecordField::Iban);
        assert_eq!(
            "merchant".parse::<RecordField>().unwrap_err(),
            "merchant".to_string()
        );

        for field in RecordField::ALL {
            assert_eq!(field.name().parse::<RecordField>().unwrap(), field);
        }
    }

    #[test]
    fn test_with_category_leaves_original_untouched() {
        let record = TransactionRecord::simple(date(2025, 1, 15), "cafe", Money::from_cents(-350));
        let labeled = record.with_category("Dining");

        assert_eq!(record.category, None);
        assert_eq!(record.category_key(), UNSET_CATEGORY);
        assert_eq!(labeled.category_key(), "Dining");
        assert!(labeled.is_expense());
    }
}
