use crate::error::{IngestError, Result};
use crate::filter::{FilterPolicy, IgnoreRuleSet, DEFAULT_IGNORE_PATTERNS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MAX_FILES: usize = 10;
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1_048_576; // 1 MB
pub const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 120;

/// Configuration for one ingestion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Maximum number of files extracted per repository
    pub max_files: usize,

    /// Files larger than this are listed but never read
    pub max_file_bytes: u64,

    /// Ignore rules (`*.ext` suffix, `/dir` anchored, anything else a path segment)
    pub ignore_patterns: Vec<String>,

    pub clone_timeout_secs: u64,

    /// Build structural digests where a grammar exists (raw text otherwise)
    pub summarize: bool,

    /// Parent directory for transient clones (system temp dir when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            clone_timeout_secs: DEFAULT_CLONE_TIMEOUT_SECS,
            summarize: true,
            temp_root: None,
        }
    }
}

impl IngestConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| IngestError::InvalidConfig(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            IngestError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_files == 0 {
            return Err(IngestError::InvalidConfig(
                "max_files must be > 0".to_string(),
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(IngestError::InvalidConfig(
                "max_file_bytes must be > 0".to_string(),
            ));
        }
        if self.clone_timeout_secs == 0 {
            return Err(IngestError::InvalidConfig(
                "clone_timeout_secs must be > 0".to_string(),
            ));
        }
        if let Some(empty) = self.ignore_patterns.iter().position(|p| p.trim().is_empty()) {
            return Err(IngestError::InvalidConfig(format!(
                "ignore_patterns[{empty}] is empty"
            )));
        }
        Ok(())
    }

    pub fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout_secs)
    }

    /// Compile the ignore rules and size cap into a filter policy
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy::new(
            IgnoreRuleSet::new(&self.ignore_patterns),
            self.max_file_bytes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_files, 10);
        assert!(config.ignore_patterns.iter().any(|p| p == "node_modules/"));
    }

    #[test]
    fn toml_overrides_keep_other_defaults() {
        let config = IngestConfig::from_toml_str(
            r#"
max_files = 3
ignore_patterns = ["vendor/", "*.snap"]
"#,
        )
        .unwrap();
        assert_eq!(config.max_files, 3);
        assert_eq!(config.ignore_patterns, vec!["vendor/", "*.snap"]);
        assert_eq!(config.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert!(config.summarize);
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(IngestConfig::from_toml_str("max_files = 0").is_err());
        assert!(IngestConfig::from_toml_str("max_file_bytes = 0").is_err());
        assert!(IngestConfig::from_toml_str("clone_timeout_secs = 0").is_err());
        assert!(IngestConfig::from_toml_str("ignore_patterns = [\" \"]").is_err());
        assert!(matches!(
            IngestConfig::from_toml_str("max_files = \"ten\""),
            Err(IngestError::InvalidConfig(_))
        ));
    }
}
