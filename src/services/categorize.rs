//! Keyword based categorization
//!
//! A [`CategoryRuleSet`] maps category names to ordered keyword predicates
//! and labels every record of a [`TransactionStore`].
//!
//! Precedence:
//!
//! 1. Positive turnover defaults to "Other Income", negative turnover to
//!    "Other Expenses"; zero turnover stays unset.
//! 2. Categories are visited in configuration order and their predicates in
//!    list order. Every match overwrites the category assigned so far, so the
//!    last matching keyword in configuration order wins.
//! 3. Records that are still unset get [`UNSET_CATEGORY`].

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{CashflowError, CashflowResult};
use crate::models::{
    RecordField, TransactionRecord, TransactionStore, OTHER_EXPENSES, OTHER_INCOME,
    UNSET_CATEGORY,
};

/// Starter rule file written by `cashflow init`
pub const SAMPLE_RULES: &str = r#"{
  "Salary": [{ "client": "Arbeitgeber GmbH" }],
  "Groceries": ["rewe", "edeka", "aldi", "lidl"],
  "Rent": [{ "recipient": "Hausverwaltung" }],
  "Insurance": [{ "description": "versicherung" }],
  "Cash": [{ "procedure": "Auszahlung" }]
}
"#;

/// Case-insensitive substring match on one record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordPredicate {
    pub field: RecordField,
    pub keyword: String,
    folded: String,
}

impl KeywordPredicate {
    pub fn new(field: RecordField, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let folded = keyword.to_lowercase();
        Self {
            field,
            keyword,
            folded,
        }
    }

    /// Check if the bound field of `record` contains the keyword
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        record
            .description
            .field(self.field)
            .to_lowercase()
            .contains(&self.folded)
    }
}

/// One category and the predicates that select it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: String,
    pub predicates: Vec<KeywordPredicate>,
}

/// Ordered set of category rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRuleSet {
    rules: Vec<CategoryRule>,
}

impl CategoryRuleSet {
    /// Create a rule set from rules in application order
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// Load rules from a file, choosing YAML for `.yaml`/`.yml` and JSON otherwise
    pub fn from_path(path: impl AsRef<Path>) -> CashflowResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            CashflowError::Config(format!(
                "Failed to read rules file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        if is_yaml {
            Self::from_yaml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    /// Parse rules from JSON text
    pub fn from_json_str(s: &str) -> CashflowResult<Self> {
        let value: Value = serde_json::from_str(s).map_err(|e| {
            CashflowError::Config(format!("Failed to parse rules JSON: {}", e))
        })?;
        Self::from_value(&value)
    }

    /// Parse rules from YAML text
    pub fn from_yaml_str(s: &str) -> CashflowResult<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(s).map_err(|e| {
            CashflowError::Config(format!("Failed to parse rules YAML: {}", e))
        })?;
        // Mappings keep their key order through the conversion
        let value = serde_json::to_value(yaml).map_err(|e| {
            CashflowError::Config(format!("Unsupported rules YAML: {}", e))
        })?;
        Self::from_value(&value)
    }

    /// Build rules from a decoded configuration document
    ///
    /// The document must be a mapping from category name to a list of
    /// entries. An entry is either a bare keyword (matched against the
    /// description) or a mapping from field name to keyword.
    pub fn from_value(value: &Value) -> CashflowResult<Self> {
        let categories = value.as_object().ok_or_else(|| {
            CashflowError::Config(format!(
                "Rules must be a mapping of category names to keyword lists, found {}",
                kind_of(value)
            ))
        })?;

        let mut rules = Vec::with_capacity(categories.len());
        for (category, entries) in categories {
            let entries = entries.as_array().ok_or_else(|| {
                CashflowError::Config(format!(
                    "Keywords for category '{}' must be a list, found {}",
                    category,
                    kind_of(entries)
                ))
            })?;

            let mut predicates = Vec::new();
            for entry in entries {
                predicates.extend(parse_entry(category, entry)?);
            }

            rules.push(CategoryRule {
                category: category.clone(),
                predicates,
            });
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Label every record of `store`, returning a new store
    ///
    /// After this call every record carries `Some(category)`; records with
    /// zero turnover that match no keyword carry [`UNSET_CATEGORY`].
    pub fn apply(&self, store: &TransactionStore) -> TransactionStore {
        let mut categories: Vec<Option<&str>> = store
            .iter()
            .map(|record| {
                if record.turnover.is_positive() {
                    Some(OTHER_INCOME)
                } else if record.turnover.is_negative() {
                    Some(OTHER_EXPENSES)
                } else {
                    None
                }
            })
            .collect();

        let mut matched = 0usize;
        for rule in &self.rules {
            for predicate in &rule.predicates {
                for (slot, record) in categories.iter_mut().zip(store.iter()) {
                    if predicate.matches(record) {
                        *slot = Some(rule.category.as_str());
                        matched += 1;
                    }
                }
            }
        }

        debug!(
            records = store.len(),
            rules = self.rules.len(),
            keyword_matches = matched,
            "categorized transactions"
        );

        store.with_categories(
            categories
                .into_iter()
                .map(|c| c.unwrap_or(UNSET_CATEGORY).to_string())
                .collect(),
        )
    }
}

fn parse_entry(category: &str, entry: &Value) -> CashflowResult<Vec<KeywordPredicate>> {
    match entry {
        Value::String(keyword) => Ok(vec![KeywordPredicate::new(
            RecordField::Description,
            keyword.as_str(),
        )]),
        Value::Object(fields) => fields
            .iter()
            .map(|(name, keyword)| -> CashflowResult<KeywordPredicate> {
                let field = name.parse::<RecordField>().map_err(|field| {
                    CashflowError::UnknownRuleField {
                        category: category.to_string(),
                        field,
                    }
                })?;
                let keyword = keyword.as_str().ok_or_else(|| {
                    CashflowError::Config(format!(
                        "Keyword for field '{}' in category '{}' must be a string, found {}",
                        name,
                        category,
                        kind_of(keyword)
                    ))
                })?;
                Ok(KeywordPredicate::new(field, keyword))
            })
            .collect(),
        other => Err(CashflowError::Config(format!(
            "Entries for category '{}' must be keywords or field mappings, found {}",
            category,
            kind_of(other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Description, Money};
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::Builder;

    fn record(text: &str, cents: i64) -> TransactionRecord {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        TransactionRecord::simple(date, text, Money::from_cents(cents))
    }

    fn categories(store: &TransactionStore) -> Vec<&str> {
        store.iter().map(|r| r.category_key()).collect()
    }

    #[test]
    fn test_groceries_scenario() {
        let rules =
            CategoryRuleSet::from_json_str(r#"{"Groceries": ["supermarket"], "Other Expenses": []}"#)
                .unwrap();
        let store = TransactionStore::new(vec![
            record("SUPERMARKET XYZ", -5000),
            record("cafe", -1000),
        ]);

        let labeled = rules.apply(&store);
        assert_eq!(categories(&labeled), vec!["Groceries", "Other Expenses"]);
    }

    #[test]
    fn test_default_pass_by_sign() {
        let rules = CategoryRuleSet::default();
        let store = TransactionStore::new(vec![
            record("salary", 250000),
            record("rent", -90000),
            record("fee refund", 0),
        ]);

        let labeled = rules.apply(&store);
        assert_eq!(
            categories(&labeled),
            vec![OTHER_INCOME, OTHER_EXPENSES, UNSET_CATEGORY]
        );
        assert!(labeled.iter().all(|r| r.category.is_some()));
    }

    #[test]
    fn test_later_category_wins() {
        // "Coffee" is the more specific keyword but "Shopping" comes later
        let rules = CategoryRuleSet::from_json_str(
            r#"{"Coffee": ["starbucks coffee"], "Shopping": ["starbucks"]}"#,
        )
        .unwrap();
        let store = TransactionStore::new(vec![record("STARBUCKS COFFEE #12", -450)]);

        assert_eq!(categories(&rules.apply(&store)), vec!["Shopping"]);

        let reversed = CategoryRuleSet::from_json_str(
            r#"{"Shopping": ["starbucks"], "Coffee": ["starbucks coffee"]}"#,
        )
        .unwrap();
        assert_eq!(categories(&reversed.apply(&store)), vec!["Coffee"]);
    }

    #[test]
    fn test_keyword_overrides_sign_default() {
        let rules = CategoryRuleSet::from_json_str(r#"{"Refunds": ["refund"]}"#).unwrap();
        let store = TransactionStore::new(vec![
            record("Amazon Refund", 1999),
            record("refund correction", 0),
        ]);

        assert_eq!(categories(&rules.apply(&store)), vec!["Refunds", "Refunds"]);
    }

    #[test]
    fn test_predicate_is_case_insensitive() {
        let predicate = KeywordPredicate::new(RecordField::Description, "Supermarket");
        assert!(predicate.matches(&record("SUPERMARKET XYZ", -5000)));
        assert!(predicate.matches(&record("my supermarket", -5000)));
        assert!(!predicate.matches(&record("cafe", -1000)));

        let client = KeywordPredicate::new(RecordField::Client, "supermarket");
        assert!(!client.matches(&record("supermarket", -5000)));
    }

    #[test]
    fn test_field_bound_rules() {
        let rules = CategoryRuleSet::from_json_str(
            r#"{"Salary": [{"client": "acme gmbh"}], "Rent": [{"iban": "DE0212"}]}"#,
        )
        .unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let salary = TransactionRecord::new(
            date,
            date,
            Description {
                text: "Lohn Januar".into(),
                client: "ACME GmbH".into(),
                ..Default::default()
            },
            Money::from_cents(300000),
        );
        let rent = TransactionRecord::new(
            date,
            date,
            Description {
                text: "Miete".into(),
                iban: "DE02120300000000202051".into(),
                ..Default::default()
            },
            Money::from_cents(-90000),
        );
        // The keyword only appears in the description, not in the client field
        let other = record("acme gmbh merch", -2500);

        let labeled = rules.apply(&TransactionStore::new(vec![salary, rent, other]));
        assert_eq!(categories(&labeled), vec!["Salary", "Rent", OTHER_EXPENSES]);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let rules = CategoryRuleSet::from_json_str(r#"{"Groceries": ["market"]}"#).unwrap();
        let store = TransactionStore::new(vec![record("market", -100)]);

        let _ = rules.apply(&store);
        assert!(store.iter().all(|r| r.category.is_none()));
    }

    #[test]
    fn test_multi_field_entry_order() {
        let rules = CategoryRuleSet::from_json_str(
            r#"{"Travel": [{"description": "db vertrieb", "procedure": "kartenzahlung"}]}"#,
        )
        .unwrap();

        let predicates = &rules.rules()[0].predicates;
        assert_eq!(predicates.len(), 2);
        assert_eq!(predicates[0].field, RecordField::Description);
        assert_eq!(predicates[1].field, RecordField::Procedure);
    }

    #[test]
    fn test_configuration_order_is_preserved() {
        let rules = CategoryRuleSet::from_json_str(
            r#"{"Zoo": ["z"], "Alpha": ["a"], "Middle": ["m"]}"#,
        )
        .unwrap();
        let names: Vec<_> = rules.rules().iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["Zoo", "Alpha", "Middle"]);
    }

    #[test]
    fn test_sample_rules_parse() {
        let rules = CategoryRuleSet::from_json_str(SAMPLE_RULES).unwrap();
        assert_eq!(rules.len(), 5);
        assert_eq!(rules.rules()[1].predicates.len(), 4);
        assert_eq!(rules.rules()[4].predicates[0].field, RecordField::Procedure);
    }

    #[test]
    fn test_yaml_rules() {
        let yaml = "Groceries:\n  - supermarket\n  - description: bakery\nTransport:\n  - procedure: db bahn\n";
        let rules = CategoryRuleSet::from_yaml_str(yaml).unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[0].category, "Groceries");
        assert_eq!(rules.rules()[0].predicates.len(), 2);
        assert_eq!(rules.rules()[1].predicates[0].field, RecordField::Procedure);
    }

    #[test]
    fn test_non_mapping_top_level_is_rejected() {
        let err = CategoryRuleSet::from_json_str(r#"["supermarket"]"#).unwrap_err();
        assert!(matches!(err, CashflowError::Config(_)));
    }

    #[test]
    fn test_non_list_keywords_are_rejected() {
        let err = CategoryRuleSet::from_json_str(r#"{"Groceries": "supermarket"}"#).unwrap_err();
        assert!(matches!(err, CashflowError::Config(_)));
        assert!(err.to_string().contains("Groceries"));

        let err = CategoryRuleSet::from_json_str(r#"{"Groceries": [42]}"#).unwrap_err();
        assert!(matches!(err, CashflowError::Config(_)));

        let err =
            CategoryRuleSet::from_json_str(r#"{"Groceries": [{"client": 42}]}"#).unwrap_err();
        assert!(matches!(err, CashflowError::Config(_)));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err =
            CategoryRuleSet::from_json_str(r#"{"Groceries": [{"merchant": "aldi"}]}"#).unwrap_err();
        match err {
            CashflowError::UnknownRuleField { category, field } => {
                assert_eq!(category, "Groceries");
                assert_eq!(field, "merchant");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_path_by_extension() {
        let mut json = Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"Groceries": ["aldi"]}}"#).unwrap();
        assert_eq!(CategoryRuleSet::from_path(json.path()).unwrap().len(), 1);

        let mut yaml = Builder::new().suffix(".yml").tempfile().unwrap();
        write!(yaml, "Groceries:\n  - aldi\nRent: []\n").unwrap();
        assert_eq!(CategoryRuleSet::from_path(yaml.path()).unwrap().len(), 2);

        let err = CategoryRuleSet::from_path("/nonexistent/rules.json").unwrap_err();
        assert!(err.is_configuration());
    }
}
