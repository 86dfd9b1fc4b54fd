//! Configuration file for `willwatch sync`.
//!
//! # Example
//!
//! ```toml
//! caller = "0x00000000000000000000000000000000000000a1"
//!
//! [sync]
//! max_parallel = 4
//! from_block = 0
//! to_block = 1200
//! ```

use std::path::Path;

use serde::Deserialize;
use willwatch_sync::SyncConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CliConfig {
    /// Address whose own will should be reported.
    pub caller: Option<String>,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Read and parse a config TOML file from `path`.
///
/// Returns a human-readable error string on failure.
pub(crate) fn read_config(path: &Path) -> Result<CliConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_caller_and_sync_table() {
        let config: CliConfig = toml::from_str(
            r#"
            caller = "0xAB"

            [sync]
            max_parallel = 3
            to_block = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.caller.as_deref(), Some("0xAB"));
        assert_eq!(config.sync.max_parallel, 3);
        assert_eq!(config.sync.from_block, 0);
        assert_eq!(config.sync.to_block, Some(90));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert!(config.caller.is_none());
        assert_eq!(config.sync, SyncConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<CliConfig>("colour = \"red\"").is_err());
    }

    #[test]
    fn read_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("willwatch.toml");
        std::fs::write(&path, "caller = 7").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(err.contains("could not parse"));
        assert!(err.contains("willwatch.toml"));

        let err = read_config(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.contains("could not read"));
    }
}
