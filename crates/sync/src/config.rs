use serde::{Deserialize, Serialize};
use willwatch_ledger::BlockRange;

/// Tuning for a synchronization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Upper bound on concurrent record lookups within one pass. Values
    /// below 1 are treated as 1.
    pub max_parallel: usize,
    /// First block of the creation-log scan.
    pub from_block: u64,
    /// Last block of the creation-log scan; `None` scans to the head.
    pub to_block: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            max_parallel: 8,
            from_block: 0,
            to_block: None,
        }
    }
}

impl SyncConfig {
    pub fn block_range(&self) -> BlockRange {
        BlockRange {
            from: self.from_block,
            to: self.to_block,
        }
    }

    pub(crate) fn permits(&self) -> usize {
        self.max_parallel.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: SyncConfig = serde_json::from_str(r#"{ "max_parallel": 2 }"#).unwrap();
        assert_eq!(config.max_parallel, 2);
        assert_eq!(config.block_range(), BlockRange::all());
    }

    #[test]
    fn zero_parallelism_still_makes_progress() {
        let config = SyncConfig {
            max_parallel: 0,
            ..SyncConfig::default()
        };
        assert_eq!(config.permits(), 1);
    }
}
