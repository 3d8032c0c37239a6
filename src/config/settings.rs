//! User settings for cashflow
//!
//! Defaults for the command line: which bank format to read, where the
//! category rules live and how reports are computed and displayed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::CashflowPaths;
use crate::display::report::check_date_format;
use crate::error::CashflowError;
use crate::import::BankFormat;

/// User settings for cashflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Category rule file; `categories.json` in the config directory if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<PathBuf>,

    /// Export format assumed when `--bank` is not given
    #[serde(default = "default_bank")]
    pub default_bank: BankFormat,

    /// Report monthly averages instead of plain sums
    #[serde(default = "default_normalize_monthly")]
    pub normalize_monthly: bool,

    /// Length of the default report window, ending today
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_bank() -> BankFormat {
    BankFormat::Comdirect
}

fn default_normalize_monthly() -> bool {
    true
}

fn default_lookback_days() -> u32 {
    365
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_date_format() -> String {
    "%d.%m.%Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            rules_file: None,
            default_bank: default_bank(),
            normalize_monthly: default_normalize_monthly(),
            lookback_days: default_lookback_days(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &CashflowPaths) -> Result<Self, CashflowError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                CashflowError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                CashflowError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            settings.validate()?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CashflowPaths) -> Result<(), CashflowError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            CashflowError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| CashflowError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), CashflowError> {
        if self.lookback_days == 0 {
            return Err(CashflowError::Config(
                "lookback_days must be greater than zero".into(),
            ));
        }
        check_date_format(&self.date_format).map_err(CashflowError::Config)?;
        Ok(())
    }

    /// The rule file to use; relative paths resolve against the config directory
    pub fn rules_path(&self, paths: &CashflowPaths) -> PathBuf {
        match &self.rules_file {
            Some(path) if path.is_relative() => paths.base_dir().join(path),
            Some(path) => path.clone(),
            None => paths.rules_file(),
        }
    }
}
