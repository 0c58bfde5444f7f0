//! Path management for the expense tracker
//!
//! ## Path Resolution Order
//!
//! 1. `EXPENSE_TRACKER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/expense-tracker` or `~/.config/expense-tracker`
//! 3. Windows: `%APPDATA%\expense-tracker`

use std::path::PathBuf;

use crate::error::ExpenseError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "EXPENSE_TRACKER_DATA_DIR";

/// Manages all paths used by the expense tracker
#[derive(Debug, Clone)]
pub struct ExpensePaths {
    base_dir: PathBuf,
}

impl ExpensePaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, ExpenseError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory rendered reports are written to (`<base>/reports/`)
    pub fn reports_dir(&self) -> PathBuf {
        self.base_dir.join("reports")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the persisted expense slot
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Ensure the base, data and reports directories exist
    pub fn ensure_directories(&self) -> Result<(), ExpenseError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ExpenseError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| ExpenseError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.reports_dir())
            .map_err(|e| ExpenseError::Io(format!("Failed to create reports directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, ExpenseError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                ExpenseError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("expense-tracker"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, ExpenseError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| ExpenseError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("expense-tracker"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.reports_dir(), temp_dir.path().join("reports"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.reports_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.expenses_file(),
            temp_dir.path().join("data").join("expenses.json")
        );
    }
}
