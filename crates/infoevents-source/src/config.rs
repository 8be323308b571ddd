use std::fs;
use std::path::Path;
use std::time::Duration;

use infoevents_store::TableConfiguration;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Records per page.
pub const DEFAULT_PAGE_SIZE: usize = 10_000;
/// Overall result cap across all pages of a session.
pub const DEFAULT_LIMIT: usize = 1_000_000;
/// Ceiling for one page execution, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Query shape settings of a session.
///
/// Missing fields in a configuration file take their defaults. The limit is
/// a hard cap: results past it are dropped without notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Records per page.
    pub page_size: usize,
    /// Overall result cap.
    pub limit: usize,
    /// Ceiling for one page execution, in seconds.
    pub timeout_secs: u64,
    /// Table layout the repository registry is built against.
    pub table: TableConfiguration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            limit: DEFAULT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            table: TableConfiguration::Global,
        }
    }
}

impl SessionConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed, or if
    /// the values fail [`validate`](SessionConfig::validate).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path)?;
        let config: SessionConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Page execution timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Rejects zero page size, limit or timeout.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.page_size == 0 {
            return Err(SourceError::InvalidConfig("page_size must be positive".into()));
        }
        if self.limit == 0 {
            return Err(SourceError::InvalidConfig("limit must be positive".into()));
        }
        if self.timeout_secs == 0 {
            return Err(SourceError::InvalidConfig("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.page_size, 10_000);
        assert_eq!(config.limit, 1_000_000);
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(config.table, TableConfiguration::Global);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"page_size": 250, "table": {{"named": "archive"}}}}"#).unwrap();

        let config = SessionConfig::load(file.path()).unwrap();
        assert_eq!(config.page_size, 250);
        assert_eq!(config.limit, DEFAULT_LIMIT);
        assert_eq!(config.table, TableConfiguration::Named("archive".into()));
    }

    #[test]
    fn zero_values_rejected() {
        for config in [
            SessionConfig {
                page_size: 0,
                ..SessionConfig::default()
            },
            SessionConfig {
                limit: 0,
                ..SessionConfig::default()
            },
            SessionConfig {
                timeout_secs: 0,
                ..SessionConfig::default()
            },
        ] {
            assert!(matches!(config.validate(), Err(SourceError::InvalidConfig(_))));
        }
    }

    #[test]
    fn unknown_fields_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"pagesize": 5}}"#).unwrap();
        assert!(matches!(
            SessionConfig::load(file.path()),
            Err(SourceError::ConfigParse(_))
        ));
    }
}
