//! Path management for cashflow
//!
//! ## Path Resolution Order
//!
//! 1. `CASHFLOW_CONFIG_DIR` environment variable (if set)
//! 2. `$XDG_CONFIG_HOME/cashflow`
//! 3. The platform config directory (`~/.config/cashflow`, `%APPDATA%\cashflow`)

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::CashflowError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "CASHFLOW_CONFIG_DIR";

const APP_DIR: &str = "cashflow";

/// Manages all paths used by cashflow
#[derive(Debug, Clone)]
pub struct CashflowPaths {
    base_dir: PathBuf,
}

impl CashflowPaths {
    /// Resolve the config directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, CashflowError> {
        let base_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create CashflowPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Default location of the category rule file
    pub fn rules_file(&self) -> PathBuf {
        self.base_dir.join("categories.json")
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<(), CashflowError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CashflowError::Io(format!("Failed to create config directory: {}", e)))
    }

    /// Check if cashflow has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, CashflowError> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join(APP_DIR))
        .ok_or_else(|| CashflowError::Config("Could not determine a config directory".into()))
}
